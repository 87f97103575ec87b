//! Path-addressed document with record identity.

use crate::config::PathConfig;
use crate::error::{DocumentError, DocumentResult};
use crate::value::{
    deep_clone_object, object_from_json, object_to_json, FieldType, FieldValue, Object, ObjectRef,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};
use tracing::{debug, trace};

/// Which logical record a document represents.
///
/// Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentIdentity {
    index: String,
    #[serde(rename = "type")]
    doc_type: String,
    id: String,
}

impl DocumentIdentity {
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }

    /// Container the record belongs to.
    #[inline]
    pub fn index(&self) -> &str {
        &self.index
    }

    #[inline]
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A decoded document plus the identity of the record it belongs to.
///
/// Values are addressed by dotted paths such as `"user.address.city"`. Reads
/// and deletes treat missing paths as absent; writes create missing
/// intermediate mappings.
///
/// `PathDocument` is deliberately not `Clone`: pick [`shallow_clone`] when
/// nested mappings may be shared with the original, or [`deep_clone`] for a
/// fully independent copy.
///
/// Writes are not transactional: a failed `set_value` rolls back nothing it
/// created on the way down, and does not mark the document modified.
///
/// # Examples
///
/// ```
/// use ingest_document::{DocumentIdentity, PathDocument};
/// use serde_json::json;
///
/// let mut doc = PathDocument::from_json(
///     DocumentIdentity::new("logs", "event", "1"),
///     json!({"user": {"name": "alice"}}).as_object().cloned().unwrap(),
/// );
///
/// assert_eq!(doc.get_value::<String>("user.name").unwrap(), Some("alice".into()));
///
/// doc.set_value("geo.city", "Berlin").unwrap();
/// assert!(doc.has_value("geo.city"));
/// assert!(doc.is_modified());
/// assert_eq!(doc.to_json(), json!({"user": {"name": "alice"}, "geo": {"city": "Berlin"}}));
/// ```
///
/// [`shallow_clone`]: PathDocument::shallow_clone
/// [`deep_clone`]: PathDocument::deep_clone
#[derive(Debug)]
pub struct PathDocument {
    identity: DocumentIdentity,
    document: Object,
    modified: bool,
    config: PathConfig,
}

impl PathDocument {
    pub fn new(identity: DocumentIdentity, document: Object) -> Self {
        Self {
            identity,
            document,
            modified: false,
            config: PathConfig::default(),
        }
    }

    /// Build from an already decoded JSON object.
    pub fn from_json(identity: DocumentIdentity, document: Map<String, Value>) -> Self {
        Self::new(identity, object_from_json(document))
    }

    /// Use `config` to parse paths passed to this document.
    pub fn with_config(mut self, config: PathConfig) -> Self {
        self.config = config;
        self
    }

    /// Copy the top-level mapping; nested mappings stay shared with `self`.
    ///
    /// Writes that land inside an existing nested mapping of either document
    /// are visible through both. Replacing a top-level key is not. The copy
    /// starts unmodified.
    pub fn shallow_clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            document: self.document.clone(),
            modified: false,
            config: self.config.clone(),
        }
    }

    /// Copy the whole document. The copy starts unmodified.
    pub fn deep_clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            document: deep_clone_object(&self.document),
            modified: false,
            config: self.config.clone(),
        }
    }

    #[inline]
    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    #[inline]
    pub fn index(&self) -> &str {
        self.identity.index()
    }

    #[inline]
    pub fn doc_type(&self) -> &str {
        self.identity.doc_type()
    }

    #[inline]
    pub fn id(&self) -> &str {
        self.identity.id()
    }

    #[inline]
    pub fn document(&self) -> &Object {
        &self.document
    }

    /// Whether any write or delete has changed this document.
    ///
    /// Once set this never goes back to false.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn into_document(self) -> Object {
        self.document
    }

    /// Convert the document body to JSON for serialization.
    pub fn to_json(&self) -> Value {
        Value::Object(object_to_json(&self.document))
    }

    /// Read the value at `path` as `T`.
    ///
    /// Returns `Ok(None)` if the path is empty, does not resolve, or holds
    /// null. Fails with [`DocumentError::TypeMismatch`] if the value is
    /// present but not a `T`.
    pub fn get_value<T: FieldType>(&self, path: &str) -> DocumentResult<Option<T>> {
        let field_path = self.config.parse(path);
        let Some((parents, leaf)) = field_path.split_leaf() else {
            return Ok(None);
        };

        self.with_parent(parents, |map| {
            map.get(leaf)
                .filter(|value| !value.is_null())
                .map(FieldValue::as_type::<T>)
        })
        .flatten()
        .transpose()
        .map_err(|mismatch| mismatch.at(path))
    }

    /// Whether `path` resolves to a present key. A null value counts as
    /// present.
    pub fn has_value(&self, path: &str) -> bool {
        let field_path = self.config.parse(path);
        let Some((parents, leaf)) = field_path.split_leaf() else {
            return false;
        };

        self.with_parent(parents, |map| map.contains_key(leaf))
            .unwrap_or(false)
    }

    /// Remove the value at `path`, returning it if it was present.
    ///
    /// Missing paths are a no-op.
    pub fn remove_value(&mut self, path: &str) -> Option<FieldValue> {
        let field_path = self.config.parse(path);
        let (parents, leaf) = field_path.split_leaf()?;

        let removed = self.with_parent_mut(parents, |map| map.remove(leaf)).flatten();
        if removed.is_some() {
            self.modified = true;
            trace!(path = %path, "removed document field");
        }
        removed
    }

    /// Set `value` at `path`, creating missing intermediate mappings.
    ///
    /// Any existing value at the leaf is replaced regardless of its type.
    /// Fails if the path is empty, or if an intermediate segment holds null
    /// or a non-mapping value.
    pub fn set_value(&mut self, path: &str, value: impl Into<FieldValue>) -> DocumentResult<()> {
        let field_path = self.config.parse(path);
        let Some((parents, leaf)) = field_path.split_leaf() else {
            return Err(DocumentError::EmptyPath);
        };

        let value = value.into();
        let result = match parents.split_first() {
            None => {
                self.document.insert(leaf.to_owned(), value);
                Ok(())
            }
            Some((first, rest)) => {
                vivify_parent(&mut self.document, first, rest, path).map(|parent| {
                    parent.borrow_mut().insert(leaf.to_owned(), value);
                })
            }
        };

        match &result {
            Ok(()) => {
                self.modified = true;
                trace!(path = %path, "set document field");
            }
            Err(err) => debug!(path = %path, error = %err, "rejected document write"),
        }
        result
    }

    /// Run `f` on the mapping that directly contains the leaf of a path with
    /// the given parent segments, or return `None` if it does not resolve.
    fn with_parent<R>(&self, parents: &[String], f: impl FnOnce(&Object) -> R) -> Option<R> {
        match parents.split_first() {
            None => Some(f(&self.document)),
            Some((first, rest)) => {
                let parent = resolve_parent(&self.document, first, rest)?;
                let result = f(&parent.borrow());
                Some(result)
            }
        }
    }

    fn with_parent_mut<R>(
        &mut self,
        parents: &[String],
        f: impl FnOnce(&mut Object) -> R,
    ) -> Option<R> {
        match parents.split_first() {
            None => Some(f(&mut self.document)),
            Some((first, rest)) => {
                let parent = resolve_parent(&self.document, first, rest)?;
                let result = f(&mut parent.borrow_mut());
                Some(result)
            }
        }
    }
}

fn child_object(map: &Object, segment: &str) -> Option<ObjectRef> {
    match map.get(segment) {
        Some(FieldValue::Object(obj)) => Some(obj.clone()),
        _ => None,
    }
}

/// Walk parent segments below the root without creating anything.
fn resolve_parent(root: &Object, first: &str, rest: &[String]) -> Option<ObjectRef> {
    let mut current = child_object(root, first)?;
    for segment in rest {
        let next = child_object(&current.borrow(), segment)?;
        current = next;
    }
    Some(current)
}

/// Descend into `segment`, inserting an empty mapping if it is missing.
fn child_object_or_insert(map: &mut Object, segment: &str, path: &str) -> DocumentResult<ObjectRef> {
    match map.get(segment) {
        Some(FieldValue::Object(obj)) => Ok(obj.clone()),
        Some(FieldValue::Null) => Err(DocumentError::null_parent(path, segment)),
        Some(other) => Err(DocumentError::non_object_parent(
            path,
            segment,
            other.type_name(),
        )),
        None => {
            let obj = ObjectRef::new();
            map.insert(segment.to_owned(), FieldValue::Object(obj.clone()));
            Ok(obj)
        }
    }
}

/// Walk parent segments below the root, creating missing mappings.
fn vivify_parent(
    root: &mut Object,
    first: &str,
    rest: &[String],
    path: &str,
) -> DocumentResult<ObjectRef> {
    let mut current = child_object_or_insert(root, first, path)?;
    for segment in rest {
        let next = child_object_or_insert(&mut current.borrow_mut(), segment, path)?;
        current = next;
    }
    Ok(current)
}

/// Documents are equal when identity and content are equal. Configuration
/// and the modified flag are ignored.
impl PartialEq for PathDocument {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.document == other.document
    }
}

impl Eq for PathDocument {}

impl Hash for PathDocument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.document.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> PathDocument {
        let map = value.as_object().cloned().unwrap_or_default();
        PathDocument::from_json(DocumentIdentity::new("index", "type", "id"), map)
    }

    #[test]
    fn test_get_value_nested() {
        let d = doc(json!({"a": {"b": {"c": "x"}}}));
        assert_eq!(d.get_value::<String>("a.b.c").unwrap(), Some("x".to_string()));
        let b = d.get_value::<ObjectRef>("a.b").unwrap().unwrap();
        assert!(b.contains_key("c"));
    }

    #[test]
    fn test_get_value_missing_is_none() {
        let d = doc(json!({"a": {"b": 1}, "s": "str"}));
        assert_eq!(d.get_value::<i64>("a.x").unwrap(), None);
        assert_eq!(d.get_value::<i64>("x.y.z").unwrap(), None);
        // intermediate segment that is not a mapping
        assert_eq!(d.get_value::<i64>("s.b").unwrap(), None);
        assert_eq!(d.get_value::<i64>("a.b.c").unwrap(), None);
    }

    #[test]
    fn test_get_value_empty_path() {
        let d = doc(json!({"a": 1}));
        assert_eq!(d.get_value::<FieldValue>("").unwrap(), None);
        assert_eq!(d.get_value::<FieldValue>("..").unwrap(), None);
        assert!(!d.has_value(""));
    }

    #[test]
    fn test_get_value_null_leaf_is_none_but_present() {
        let d = doc(json!({"a": null}));
        assert_eq!(d.get_value::<String>("a").unwrap(), None);
        assert!(d.has_value("a"));
    }

    #[test]
    fn test_get_value_type_mismatch() {
        let d = doc(json!({"a": {"b": 5}}));
        let err = d.get_value::<String>("a.b").unwrap_err();
        assert_eq!(err, DocumentError::type_mismatch("a.b", "string", "integer"));
    }

    #[test]
    fn test_set_value_creates_parents() {
        let mut d = doc(json!({}));
        d.set_value("a.b.c", 5).unwrap();
        assert_eq!(d.get_value::<i64>("a.b.c").unwrap(), Some(5));
        assert_eq!(d.to_json(), json!({"a": {"b": {"c": 5}}}));
        assert!(d.is_modified());
    }

    #[test]
    fn test_set_value_overwrites_with_other_type() {
        let mut d = doc(json!({"a": {"b": 1}}));
        d.set_value("a.b", json!({"nested": true})).unwrap();
        assert_eq!(d.get_value::<bool>("a.b.nested").unwrap(), Some(true));
    }

    #[test]
    fn test_set_value_empty_path_fails() {
        let mut d = doc(json!({}));
        assert_eq!(d.set_value("", 1), Err(DocumentError::EmptyPath));
        assert_eq!(d.set_value("...", 1), Err(DocumentError::EmptyPath));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_set_value_through_scalar_fails() {
        let mut d = doc(json!({"a": "string"}));
        let err = d.set_value("a.b", 1).unwrap_err();
        assert_eq!(err, DocumentError::non_object_parent("a.b", "a", "string"));
        assert!(err.is_invalid_argument());
        assert!(!d.is_modified());
    }

    #[test]
    fn test_set_value_through_null_fails() {
        let mut d = doc(json!({"a": {"b": null}}));
        let err = d.set_value("a.b.c", 1).unwrap_err();
        assert_eq!(err, DocumentError::null_parent("a.b.c", "b"));
    }

    #[test]
    fn test_failed_set_leaves_existing_structure() {
        let mut d = doc(json!({"a": {"list": [1]}}));
        let err = d.set_value("a.list.b", 1).unwrap_err();
        assert_eq!(err, DocumentError::non_object_parent("a.list.b", "list", "array"));
        assert_eq!(d.to_json(), json!({"a": {"list": [1]}}));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_remove_value() {
        let mut d = doc(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(d.remove_value("a.b"), Some(FieldValue::from(1)));
        assert!(d.is_modified());
        assert!(!d.has_value("a.b"));
        assert!(d.has_value("a.c"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut d = doc(json!({"a": 1}));
        assert_eq!(d.remove_value("b"), None);
        assert_eq!(d.remove_value("a.b"), None);
        assert_eq!(d.remove_value(""), None);
        assert!(!d.is_modified());
    }

    #[test]
    fn test_remove_null_value_marks_modified() {
        let mut d = doc(json!({"a": null}));
        assert_eq!(d.remove_value("a"), Some(FieldValue::Null));
        assert!(d.is_modified());
    }

    #[test]
    fn test_custom_separator() {
        let mut d = doc(json!({"a.b": {"c": 1}})).with_config(PathConfig::with_separator('/'));
        assert_eq!(d.get_value::<i64>("a.b/c").unwrap(), Some(1));
        d.set_value("x/y", true).unwrap();
        assert_eq!(d.to_json()["x"], json!({"y": true}));
    }

    #[test]
    fn test_equality_ignores_modified_flag() {
        let mut a = doc(json!({"x": 1}));
        let b = doc(json!({"x": 1}));
        a.set_value("x", 1).unwrap();
        assert!(a.is_modified());
        assert_eq!(a, b);

        let c = PathDocument::from_json(
            DocumentIdentity::new("index", "type", "other"),
            json!({"x": 1}).as_object().cloned().unwrap(),
        );
        assert_ne!(a, c);
    }
}
