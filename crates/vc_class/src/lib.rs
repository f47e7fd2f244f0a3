#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets `$crate`-free paths inside doc tests and macros resolve to this crate.
extern crate self as vc_class;

// -----------------------------------------------------------------------------
// alloc

// The registry needs `std` for its locks. Containers are named through
// `alloc` and `core`, as the workspace lints ask.
extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;
mod type_key;

pub mod class;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use class::{Class, ClassBuilder, Function, Property};
pub use error::{ClassError, Conflict};
pub use registry::ClassRegistry;
pub use registry::{class_by_index, class_by_name, class_by_object};
pub use registry::{class_by_type, class_by_type_safe, class_count, classes};
pub use registry::{declare, declare_type};
pub use type_key::{MetaType, ObjectKey, TypeKey};
pub use value::{FromValue, IntoValue, Value, ValueError, ValueKind};
