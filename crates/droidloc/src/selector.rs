use crate::attributes::{AttributeKey, AttributeValue, Relation};
use crate::validator;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Declarative attribute constraints for one element, with at most one
/// nested mapping reached through a hierarchical relation.
///
/// Attributes are kept in [`AttributeKey`] order, which is the order every
/// generator emits them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorMap {
    attributes: BTreeMap<AttributeKey, AttributeValue>,
    relation: Option<(Relation, Box<SelectorMap>)>,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable form of [`SelectorMap::insert`].
    pub fn with(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Chainable form of [`SelectorMap::set_relation`].
    pub fn with_relation(mut self, relation: Relation, nested: SelectorMap) -> Self {
        self.set_relation(relation, nested);
        self
    }

    /// Stores a constraint, returning the previous value for the key.
    /// No checks are made here; see [`crate::validator::validate`].
    pub fn insert(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(key, value.into())
    }

    pub fn remove(&mut self, key: AttributeKey) -> Option<AttributeValue> {
        self.attributes.remove(&key)
    }

    /// Replaces the hierarchical relation of this level.
    pub fn set_relation(&mut self, relation: Relation, nested: SelectorMap) {
        self.relation = Some((relation, Box::new(nested)));
    }

    pub fn clear_relation(&mut self) -> Option<(Relation, SelectorMap)> {
        self.relation.take().map(|(r, nested)| (r, *nested))
    }

    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(&key)
    }

    pub fn contains_key(&self, key: AttributeKey) -> bool {
        self.attributes.contains_key(&key)
    }

    /// Attributes of this level in generation order.
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeKey, &AttributeValue)> + '_ {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub fn relation(&self) -> Option<(Relation, &SelectorMap)> {
        self.relation.as_ref().map(|(r, nested)| (*r, nested.as_ref()))
    }

    /// Number of attributes on this level, not counting the relation.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when there is neither an attribute nor a relation.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.relation.is_none()
    }

    /// Number of levels, 1 for a mapping without a relation.
    pub fn depth(&self) -> usize {
        1 + self.relation().map_or(0, |(_, nested)| nested.depth())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in self.attributes() {
            let json = match value {
                AttributeValue::String(s) => serde_json::Value::from(s.as_str()),
                AttributeValue::Boolean(b) => serde_json::Value::from(*b),
                AttributeValue::Integer(n) => serde_json::Value::from(*n),
            };
            object.insert(key.as_str().to_string(), json);
        }
        if let Some((relation, nested)) = self.relation() {
            object.insert(relation.as_str().to_string(), nested.to_json());
        }
        serde_json::Value::Object(object)
    }
}

impl fmt::Display for SelectorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for SelectorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.attributes.len() + usize::from(self.relation.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in self.attributes() {
            map.serialize_entry(key.as_str(), value)?;
        }
        if let Some((relation, nested)) = self.relation() {
            map.serialize_entry(relation.as_str(), nested)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SelectorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        validator::selector_from_json(&value).map_err(D::Error::custom)
    }
}
