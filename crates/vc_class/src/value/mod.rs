//! Dynamically typed values exchanged with properties and functions.
//!
//! ## Menu
//!
//! - [`Value`]: the value container.
//! - [`ValueKind`]: the kind tag of a [`Value`].
//! - [`IntoValue`] / [`FromValue`]: conversions for primitive types and strings.
//! - [`ValueError`]: failed conversions.

// -----------------------------------------------------------------------------
// Modules

mod convert;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{FromValue, IntoValue};

use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ValueKind

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Real,
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Real => "real",
            Self::Str => "string",
        })
    }
}

// -----------------------------------------------------------------------------
// Value

/// A value read from a property, passed to a function or returned by one.
///
/// # Examples
///
/// ```
/// use vc_class::{Value, ValueKind};
///
/// let v = Value::from(42_u8);
/// assert_eq!(v.kind(), ValueKind::Int);
/// assert_eq!(v.to::<f64>().unwrap(), 42.0);
/// assert_eq!(v.to::<String>().unwrap(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i128),
    Real(f64),
    Str(String),
}

impl Value {
    /// Returns the kind of the value.
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Real(_) => ValueKind::Real,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// Returns `true` for [`Value::None`].
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Converts the value to `T`.
    #[inline]
    pub fn to<T: FromValue>(&self) -> Result<T, ValueError> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Real(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => f.write_str(v),
        }
    }
}

// -----------------------------------------------------------------------------
// ValueError

/// A failed [`Value`] conversion.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValueError {
    #[error("cannot convert {from} to {to}")]
    BadType { from: ValueKind, to: &'static str },

    #[error("value {value} does not fit in {to}")]
    Overflow { value: String, to: &'static str },

    #[error("cannot parse \"{text}\" as {to}")]
    Parse { text: String, to: &'static str },
}
