//! Attribute bag attached to every element.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

const ID_KEY: &str = "id";
const CLASSES_KEY: &str = "classes";

/// Element attributes: an optional `id`, an optional class list and any other
/// key/value pairs, kept in insertion order.
///
/// Stored as a YAML mapping so block-form meta with nested values survives a
/// round trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementMeta(Mapping);

impl ElementMeta {
    #[must_use]
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY)?.as_str()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert(ID_KEY.into(), Value::String(id.into()));
    }

    /// String entries of the `classes` list.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        match self.0.get(CLASSES_KEY) {
            Some(Value::Sequence(classes)) => classes.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(class)) => vec![class.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = Value::String(class.into());
        match self.0.get_mut(CLASSES_KEY) {
            Some(Value::Sequence(classes)) => classes.push(class),
            _ => {
                self.0.insert(CLASSES_KEY.into(), Value::Sequence(vec![class]));
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Value::String(key.into()), value.into())
    }

    /// `true` only for a `+key` style boolean.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// Every entry other than `id` and `classes`, in insertion order.
    pub fn props(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), Some(ID_KEY | CLASSES_KEY)))
    }

    #[must_use]
    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    #[must_use]
    pub fn into_mapping(self) -> Mapping {
        self.0
    }
}

impl From<Mapping> for ElementMeta {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ElementMeta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Self::new();
        for (key, value) in iter {
            meta.insert(key, value);
        }
        meta
    }
}
