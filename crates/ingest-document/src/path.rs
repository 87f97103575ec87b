//! Dotted field paths.
//!
//! A path like `"user.address.city"` addresses a value at arbitrary depth.
//! Every segment is a literal mapping key; there is no index syntax.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default segment separator.
pub const DEFAULT_SEPARATOR: char = '.';

/// A parsed field path.
///
/// Empty segments are dropped while parsing, so `"a..b"` and `"a.b"` address
/// the same field. A path without any segment is "no path".
///
/// # Examples
///
/// ```
/// use ingest_document::FieldPath;
///
/// let path = FieldPath::parse("user.address.city");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.leaf(), Some("city"));
/// assert!(FieldPath::parse("..").is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Parse a path using the default `.` separator.
    #[inline]
    pub fn parse(path: &str) -> Self {
        Self::parse_with(path, DEFAULT_SEPARATOR)
    }

    /// Parse a path using a custom separator.
    pub fn parse_with(path: &str, separator: char) -> Self {
        if path.is_empty() {
            return Self::default();
        }

        path.split(separator)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Create a path from already split segments.
    ///
    /// Segments are taken verbatim, so a segment may contain the separator.
    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The final segment, naming the key that is read, written or removed.
    #[inline]
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Split into the parent segments and the leaf key.
    ///
    /// A single-segment path has no parent segments; its parent is the root.
    #[inline]
    pub fn split_leaf(&self) -> Option<(&[String], &str)> {
        self.0
            .split_last()
            .map(|(leaf, parents)| (parents, leaf.as_str()))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{}", DEFAULT_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl FromIterator<String> for FieldPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        FieldPath(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
