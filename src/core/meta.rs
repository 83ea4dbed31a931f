//! Copy-on-write metadata attached to logger handles
//!
//! A [`Meta`] is never mutated once shared. Every update returns a new map,
//! so records can hold the handle's snapshot by reference while derived
//! handles keep growing their own copies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Value type for metadata fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::String(s) => write!(f, "{}", s),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Float(fl) => write!(f, "{}", fl),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        MetaValue::Int(i as i64)
    }
}

impl From<u32> for MetaValue {
    fn from(i: u32) -> Self {
        MetaValue::Int(i as i64)
    }
}

impl From<f64> for MetaValue {
    fn from(f: f64) -> Self {
        MetaValue::Float(f)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

/// Immutable key/value metadata, cheap to clone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta {
    fields: Arc<BTreeMap<String, MetaValue>>,
}

/// Shorthand for a single-field [`Meta`]
///
/// # Example
///
/// ```
/// use logr::meta;
///
/// let m = meta("request_id", "abc-123");
/// assert_eq!(m.len(), 1);
/// ```
pub fn meta<K, V>(key: K, value: V) -> Meta
where
    K: Into<String>,
    V: Into<MetaValue>,
{
    Meta::new().with(key, value)
}

impl Meta {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this map with `key` set to `value`
    #[must_use]
    pub fn with<K, V>(&self, key: K, value: V) -> Meta
    where
        K: Into<String>,
        V: Into<MetaValue>,
    {
        let mut fields = (*self.fields).clone();
        fields.insert(key.into(), value.into());
        Meta {
            fields: Arc::new(fields),
        }
    }

    /// Return the union of both maps; keys in `other` win on conflict
    #[must_use]
    pub fn merge(&self, other: &Meta) -> Meta {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut fields = (*self.fields).clone();
        for (key, value) in other.fields.iter() {
            fields.insert(key.clone(), value.clone());
        }
        Meta {
            fields: Arc::new(fields),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.fields.iter()
    }

    /// True when both handles share the same underlying map
    pub fn ptr_eq(&self, other: &Meta) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.fields.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Meta
where
    K: Into<String>,
    V: Into<MetaValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<BTreeMap<_, _>>();
        Meta {
            fields: Arc::new(fields),
        }
    }
}
