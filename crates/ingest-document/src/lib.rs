//! Path-addressed in-memory documents for ingest pipelines.
//!
//! `ingest-document` wraps a decoded JSON-like document together with the
//! identity of the record it belongs to, and lets pipeline steps read, write,
//! check and remove fields by dotted path before the document is persisted.
//!
//! # Core Concepts
//!
//! - **PathDocument**: identity plus a mutable nested mapping, with path accessors
//! - **FieldValue**: closed sum over null, boolean, number, string, array, object
//! - **ObjectRef**: shared handle to a nested mapping
//! - **FieldType**: types a value can be cast to on read
//! - **FieldPath** / **PathConfig**: how path strings are split into segments
//!
//! # Quick Start
//!
//! ```
//! use ingest_document::{DocumentError, DocumentIdentity, PathDocument};
//! use serde_json::json;
//!
//! let source = json!({"message": "hello", "http": {"status": 200}});
//! let mut doc = PathDocument::from_json(
//!     DocumentIdentity::new("logs", "event", "42"),
//!     source.as_object().cloned().unwrap(),
//! );
//!
//! // Missing paths are absent, not errors
//! assert_eq!(doc.get_value::<i64>("http.bytes").unwrap(), None);
//!
//! // Writes create intermediate mappings
//! doc.set_value("geo.location.city", "Berlin").unwrap();
//! assert!(doc.has_value("geo.location"));
//!
//! // Structural conflicts are errors
//! let err = doc.set_value("message.text", "x").unwrap_err();
//! assert!(matches!(err, DocumentError::NonObjectParent { .. }));
//!
//! doc.remove_value("http.status");
//! assert!(doc.is_modified());
//! ```
//!
//! # Copies
//!
//! `PathDocument` has no `Clone` impl. [`PathDocument::shallow_clone`] copies
//! only the top-level mapping, so nested mappings remain shared with the
//! original; [`PathDocument::deep_clone`] copies everything.
//!
//! ```
//! use ingest_document::{DocumentIdentity, PathDocument};
//! use serde_json::json;
//!
//! let original = PathDocument::from_json(
//!     DocumentIdentity::new("i", "t", "1"),
//!     json!({"a": {"b": 1}}).as_object().cloned().unwrap(),
//! );
//! let mut copy = original.shallow_clone();
//!
//! copy.set_value("a.b", 2).unwrap();
//! assert_eq!(original.get_value::<i64>("a.b").unwrap(), Some(2));
//!
//! let mut isolated = original.deep_clone();
//! isolated.set_value("a.b", 3).unwrap();
//! assert_eq!(original.get_value::<i64>("a.b").unwrap(), Some(2));
//! ```

mod config;
mod document;
mod error;
mod path;
mod value;

pub use config::PathConfig;
pub use document::{DocumentIdentity, PathDocument};
pub use error::{DocumentError, DocumentResult, TypeMismatch};
pub use path::{FieldPath, DEFAULT_SEPARATOR};
pub use value::{FieldType, FieldValue, Object, ObjectRef};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
