//! Class registration and lookup.
//!
//! ## Menu
//!
//! - [`ClassRegistry`]: files classes by type and by name, resolves objects.
//! - [`Initializer`]: a function that declares classes on first lookup.
//! - [`AutoClass`]: a statically submitted initializer binding.
//! - Free functions over the [global registry](ClassRegistry::global):
//!   [`declare`], [`declare_type`], [`class_count`], [`class_by_index`],
//!   [`classes`], [`class_by_name`], [`class_by_type`],
//!   [`class_by_type_safe`] and [`class_by_object`].
//!
//! ## Lazy declaration
//!
//! A type can be bound to an [`Initializer`] instead of being declared up
//! front. The first lookup by type that misses runs the bound initializer
//! and retries; a lookup by name that misses runs every pending initializer.
//! Each initializer runs at most once per registry, even under concurrent
//! lookups, and a failed initializer is not retried.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, [`auto_class!`](crate::auto_class)
//! submits bindings at compile time through the [`inventory`] crate, and the
//! global registry picks them up on creation. Not all platforms support it
//! (although major platforms do); see [`ClassRegistry::auto_register`].
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod class_registry;
mod global;
mod initializer;

// -----------------------------------------------------------------------------
// Exports

pub use class_registry::ClassRegistry;
pub use global::{class_by_index, class_by_name, class_by_object};
pub use global::{class_by_type, class_by_type_safe, class_count, classes};
pub use global::{declare, declare_type};
pub use initializer::{AutoClass, Initializer};
