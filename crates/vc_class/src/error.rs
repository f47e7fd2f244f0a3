use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::value::ValueError;

// -----------------------------------------------------------------------------
// Conflict

/// Which identity of a new declaration collided with an existing class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// The Rust type already has a class.
    Type,
    /// Another class already uses the name.
    Name,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.write_str("type"),
            Self::Name => f.write_str("name"),
        }
    }
}

// -----------------------------------------------------------------------------
// ClassError

/// Errors reported by declarations, lookups and member access.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ClassError {
    #[error("class `{name}` is already declared with the same {conflict}")]
    DuplicateDeclaration { name: String, conflict: Conflict },

    #[error("class `{0}` was not found")]
    ClassNotFound(String),

    #[error("class `{class}` derives from `{base}`, which is not declared")]
    UnknownBase { class: String, base: &'static str },

    #[error("index {index} is out of range, the length is {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("class `{class}` has no property named `{property}`")]
    PropertyNotFound { class: String, property: String },

    #[error("class `{class}` has no function named `{function}`")]
    FunctionNotFound { class: String, function: String },

    #[error("class `{class}` already has a member named `{member}`")]
    DuplicateMember { class: String, member: String },

    #[error("property `{0}` is read-only")]
    ForbiddenWrite(String),

    #[error("expected an object of type `{expected}`")]
    ObjectMismatch { expected: &'static str },

    #[error("function `{function}` takes {expected} arguments but {given} were given")]
    ArgumentCount {
        function: String,
        expected: usize,
        given: usize,
    },

    #[error("argument {index} of function `{function}` is invalid: {source}")]
    BadArgument {
        function: String,
        index: usize,
        source: ValueError,
    },

    #[error("class `{0}` has no constructor")]
    NoConstructor(String),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl ClassError {
    /// Returns `true` for lookup misses, which the `*_safe` queries turn into `None`.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ClassNotFound(_))
    }
}
