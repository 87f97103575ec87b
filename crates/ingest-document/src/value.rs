//! Dynamically shaped document values.
//!
//! [`FieldValue`] is a closed sum over the JSON value kinds. Nested mappings
//! are held through [`ObjectRef`], a shared handle: cloning an `ObjectRef`
//! (or a `FieldValue` holding one) aliases the mapping instead of copying it.
//! Use [`FieldValue::deep_clone`] / [`ObjectRef::deep_clone`] when full
//! isolation is required.

use crate::error::TypeMismatch;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A mapping from string keys to values.
pub type Object = BTreeMap<String, FieldValue>;

/// A single document value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<FieldValue>),
    /// Nested mapping, shared on clone.
    Object(ObjectRef),
}

impl FieldValue {
    /// Name of this value's type, as reported in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(n) if n.is_f64() => "float",
            FieldValue::Number(_) => "integer",
            FieldValue::String(_) => "string",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }

    /// Cast to `T`, or report which type was found instead.
    ///
    /// ```
    /// use ingest_document::FieldValue;
    ///
    /// let v = FieldValue::from(5);
    /// assert_eq!(v.as_type::<i64>(), Ok(5));
    /// let err = v.as_type::<String>().unwrap_err();
    /// assert_eq!((err.expected, err.found), ("string", "integer"));
    /// ```
    pub fn as_type<T: FieldType>(&self) -> Result<T, TypeMismatch> {
        T::from_field(self).ok_or_else(|| TypeMismatch::new(T::NAME, self.type_name()))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, FieldValue::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            FieldValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Copy this value, duplicating every nested mapping.
    pub fn deep_clone(&self) -> FieldValue {
        match self {
            FieldValue::Array(items) => {
                FieldValue::Array(items.iter().map(FieldValue::deep_clone).collect())
            }
            FieldValue::Object(obj) => FieldValue::Object(obj.deep_clone()),
            other => other.clone(),
        }
    }

    /// Convert to a `serde_json::Value` for serialization.
    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

/// Shared handle to a nested mapping.
///
/// Clones alias the same mapping; writes through one handle are visible
/// through every other. Equality and hashing compare contents, not identity.
///
/// A mapping inserted beneath itself forms a cycle. Comparing, hashing,
/// formatting or converting such a value does not terminate.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Object) -> Self {
        Self(Rc::new(RefCell::new(map)))
    }

    /// Borrow the mapping.
    ///
    /// # Panics
    ///
    /// Panics if the mapping is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Mutably borrow the mapping.
    ///
    /// # Panics
    ///
    /// Panics if the mapping is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Get a (shallow) copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.0.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<FieldValue> {
        self.0.borrow_mut().remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Returns true if both handles alias the same mapping.
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copy the mapping and everything beneath it into a fresh handle.
    pub fn deep_clone(&self) -> ObjectRef {
        ObjectRef::from_map(deep_clone_object(&self.0.borrow()))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(object_to_json(&self.0.borrow()))
    }
}

pub(crate) fn deep_clone_object(map: &Object) -> Object {
    map.iter()
        .map(|(k, v)| (k.clone(), v.deep_clone()))
        .collect()
}

pub(crate) fn object_to_json(map: &Object) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect()
}

pub(crate) fn object_from_json(map: Map<String, Value>) -> Object {
    map.into_iter()
        .map(|(k, v)| (k, FieldValue::from(v)))
        .collect()
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.borrow().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0.borrow(), f)
    }
}

impl From<Object> for ObjectRef {
    fn from(map: Object) -> Self {
        ObjectRef::from_map(map)
    }
}

impl From<Map<String, Value>> for ObjectRef {
    fn from(map: Map<String, Value>) -> Self {
        ObjectRef::from_map(object_from_json(map))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ObjectRef {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ObjectRef::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for ObjectRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Object::deserialize(deserializer).map(ObjectRef::from_map)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Array(items) => items.serialize(serializer),
            FieldValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

// Conversions

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Object(ObjectRef::from(map)),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            FieldValue::Object(obj) => obj.to_json(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(v.into())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Number(v.into())
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Number(v.into())
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats become `Null`.
    fn from(v: f64) -> Self {
        Number::from_f64(v).map_or(FieldValue::Null, FieldValue::Number)
    }
}

impl From<Number> for FieldValue {
    fn from(v: Number) -> Self {
        FieldValue::Number(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_owned())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl From<ObjectRef> for FieldValue {
    fn from(v: ObjectRef) -> Self {
        FieldValue::Object(v)
    }
}

impl From<Object> for FieldValue {
    fn from(v: Object) -> Self {
        FieldValue::Object(ObjectRef::from_map(v))
    }
}

/// Types a [`FieldValue`] can be cast to when read by path.
///
/// The set is open: implement this for your own types to read them with
/// [`PathDocument::get_value`](crate::PathDocument::get_value).
pub trait FieldType: Sized {
    /// Type name reported as `expected` in mismatch errors.
    const NAME: &'static str;

    /// Cast, or `None` if the value is of another type.
    fn from_field(value: &FieldValue) -> Option<Self>;
}

impl FieldType for FieldValue {
    const NAME: &'static str = "value";

    fn from_field(value: &FieldValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FieldType for String {
    const NAME: &'static str = "string";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FieldType for bool {
    const NAME: &'static str = "boolean";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldType for i64 {
    const NAME: &'static str = "integer";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldType for u64 {
    const NAME: &'static str = "unsigned integer";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    const NAME: &'static str = "number";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FieldType for Number {
    const NAME: &'static str = "number";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Number(n) => Some(n.clone()),
            _ => None,
        }
    }
}

impl FieldType for Vec<FieldValue> {
    const NAME: &'static str = "array";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_array().map(<[FieldValue]>::to_vec)
    }
}

/// Reading an `ObjectRef` aliases the stored mapping.
impl FieldType for ObjectRef {
    const NAME: &'static str = "object";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

/// Reading an `Object` copies the mapping's top level only.
impl FieldType for Object {
    const NAME: &'static str = "object";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_object().map(|obj| obj.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_name() {
        assert_eq!(FieldValue::from(json!(null)).type_name(), "null");
        assert_eq!(FieldValue::from(json!(true)).type_name(), "boolean");
        assert_eq!(FieldValue::from(json!(42)).type_name(), "integer");
        assert_eq!(FieldValue::from(json!(4.5)).type_name(), "float");
        assert_eq!(FieldValue::from(json!("hello")).type_name(), "string");
        assert_eq!(FieldValue::from(json!([1, 2, 3])).type_name(), "array");
        assert_eq!(FieldValue::from(json!({"a": 1})).type_name(), "object");
    }

    #[test]
    fn test_as_type() {
        let v = FieldValue::from("x");
        assert_eq!(v.as_type::<String>(), Ok("x".to_string()));
        assert_eq!(
            v.as_type::<bool>(),
            Err(TypeMismatch::new("boolean", "string"))
        );

        let v = FieldValue::from(3);
        assert_eq!(v.as_type::<i64>(), Ok(3));
        assert_eq!(v.as_type::<u64>(), Ok(3));
        assert_eq!(v.as_type::<f64>(), Ok(3.0));

        let v = FieldValue::from(-3);
        assert!(v.as_type::<u64>().is_err());

        let v = FieldValue::from(1.5);
        assert_eq!(v.as_type::<f64>(), Ok(1.5));
        assert_eq!(
            v.as_type::<i64>(),
            Err(TypeMismatch::new("integer", "float"))
        );
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert!(FieldValue::from(f64::NAN).is_null());
        assert!(FieldValue::from(f64::INFINITY).is_null());
    }

    #[test]
    fn test_option_conversion() {
        assert!(FieldValue::from(None::<i64>).is_null());
        assert_eq!(FieldValue::from(Some("a")), FieldValue::from("a"));
    }

    #[test]
    fn test_json_conversion_roundtrip() {
        let json = json!({"a": {"b": [1, "two", null, {"c": true}]}, "d": 2.5});
        let value = FieldValue::from(json.clone());
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_clone_shares_nested_object() {
        let obj: ObjectRef = [("k", 1)].into_iter().collect();
        let value = FieldValue::Object(obj.clone());
        let copy = value.clone();

        obj.insert("k", 2);
        assert_eq!(copy.as_object().unwrap().get("k"), Some(FieldValue::from(2)));
        assert!(copy.as_object().unwrap().ptr_eq(&obj));
    }

    #[test]
    fn test_deep_clone_isolates_nested_object() {
        let inner: ObjectRef = [("k", 1)].into_iter().collect();
        let value = FieldValue::from(vec![FieldValue::Object(inner.clone())]);
        let copy = value.deep_clone();

        inner.insert("k", 2);
        let copied_inner = copy.as_array().unwrap()[0].as_object().unwrap().clone();
        assert_eq!(copied_inner.get("k"), Some(FieldValue::from(1)));
        assert!(!copied_inner.ptr_eq(&inner));
    }

    #[test]
    fn test_object_equality_is_by_content() {
        let a: ObjectRef = [("x", 1)].into_iter().collect();
        let b: ObjectRef = [("x", 1)].into_iter().collect();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);

        b.insert("y", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde() {
        let json = json!({"name": "Alice", "tags": ["a", "b"], "age": 30, "extra": null});
        let value: FieldValue = serde_json::from_value(json.clone()).unwrap();
        assert!(value.is_object());
        assert_eq!(serde_json::to_value(&value).unwrap(), json);
    }
}
