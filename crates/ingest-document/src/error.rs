//! Error types for path document operations.

use thiserror::Error;

/// Result type alias for path document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while reading or writing a [`PathDocument`](crate::PathDocument).
///
/// Missing paths are never an error: reads report absence and deletes are
/// no-ops. Only structural conflicts surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The leaf value exists but is not of the requested type.
    #[error("field [{path}] of type [{found}] cannot be cast to [{expected}]")]
    TypeMismatch {
        /// The path as supplied by the caller.
        path: String,
        /// The requested type.
        expected: &'static str,
        /// The actual type found.
        found: &'static str,
    },

    /// A write was attempted without any path segment.
    #[error("cannot add null or empty field")]
    EmptyPath,

    /// A write traversed a segment whose current value is null.
    #[error("cannot add field [{path}] to null parent [{segment}], [object] expected instead")]
    NullParent {
        /// The path as supplied by the caller.
        path: String,
        /// The segment holding the null value.
        segment: String,
    },

    /// A write traversed a segment whose current value is not a mapping.
    #[error(
        "cannot add field [{path}] to parent [{segment}] of type [{found}], [object] expected instead"
    )]
    NonObjectParent {
        /// The path as supplied by the caller.
        path: String,
        /// The offending segment.
        segment: String,
        /// The actual type of the segment's value.
        found: &'static str,
    },
}

impl DocumentError {
    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        DocumentError::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a null parent error.
    #[inline]
    pub fn null_parent(path: impl Into<String>, segment: impl Into<String>) -> Self {
        DocumentError::NullParent {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a non-object parent error.
    #[inline]
    pub fn non_object_parent(
        path: impl Into<String>,
        segment: impl Into<String>,
        found: &'static str,
    ) -> Self {
        DocumentError::NonObjectParent {
            path: path.into(),
            segment: segment.into(),
            found,
        }
    }

    /// Returns true for errors caused by a bad write argument rather than a
    /// read-side type conflict.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DocumentError::EmptyPath
                | DocumentError::NullParent { .. }
                | DocumentError::NonObjectParent { .. }
        )
    }
}

/// A value could not be cast to the requested type.
///
/// Returned by [`FieldValue::as_type`](crate::FieldValue::as_type); the
/// document layer attaches the path and converts it into
/// [`DocumentError::TypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value of type [{found}] cannot be cast to [{expected}]")]
pub struct TypeMismatch {
    /// The requested type.
    pub expected: &'static str,
    /// The actual type found.
    pub found: &'static str,
}

impl TypeMismatch {
    #[inline]
    pub fn new(expected: &'static str, found: &'static str) -> Self {
        Self { expected, found }
    }

    /// Attach the caller's path.
    pub fn at(self, path: impl Into<String>) -> DocumentError {
        DocumentError::type_mismatch(path, self.expected, self.found)
    }
}
