//! Path parsing configuration.

use crate::path::{FieldPath, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};

/// How caller-supplied path strings are split into segments.
///
/// Missing fields fall back to their defaults when deserialized, so an empty
/// config object is valid:
///
/// ```
/// use ingest_document::PathConfig;
///
/// let config: PathConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, PathConfig::default());
///
/// let config: PathConfig = serde_json::from_str(r#"{"separator": "/"}"#).unwrap();
/// assert_eq!(config.separator, '/');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Segment separator, `.` unless configured otherwise.
    pub separator: char,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl PathConfig {
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }

    /// Parse a path string with this config.
    #[inline]
    pub fn parse(&self, path: &str) -> FieldPath {
        FieldPath::parse_with(path, self.separator)
    }
}
