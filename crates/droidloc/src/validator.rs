//! Structural checks for selector mappings.

use crate::attributes::{AttributeKey, AttributeValue, BaseAttribute, Relation, ValueKind};
use crate::errors::ValidationError;
use crate::selector::SelectorMap;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// Checks every level of `selector`: non-empty, one variant per base
/// attribute, values of the type their key expects.
pub fn validate(selector: &SelectorMap) -> Result<(), ValidationError> {
    let mut level = Some(selector);
    let mut depth = 0usize;
    while let Some(current) = level {
        validate_level(current)?;
        trace!(depth, attributes = current.len(), "validated selector level");
        level = current.relation().map(|(_, nested)| nested);
        depth += 1;
    }
    Ok(())
}

fn validate_level(selector: &SelectorMap) -> Result<(), ValidationError> {
    if selector.is_empty() {
        return Err(ValidationError::EmptySelector);
    }

    let mut seen: BTreeMap<BaseAttribute, AttributeKey> = BTreeMap::new();
    for (key, value) in selector.attributes() {
        if value.kind() != key.value_kind() {
            return Err(ValidationError::InvalidValueType {
                key: key.to_string(),
                expected: key.value_kind().to_string(),
                found: value.kind().to_string(),
            });
        }
        if let Some(first) = seen.insert(key.base(), key) {
            return Err(ValidationError::ConflictingAttributeVariants {
                first: first.to_string(),
                second: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Rejects `key` when `selector` already holds it or another variant of
/// the same base attribute.
pub fn check_insert(selector: &SelectorMap, key: AttributeKey) -> Result<(), ValidationError> {
    if selector.contains_key(key) {
        return Err(ValidationError::DuplicateAttribute {
            key: key.to_string(),
        });
    }
    match selector.attributes().find(|(k, _)| k.base() == key.base()) {
        Some((existing, _)) => Err(ValidationError::ConflictingAttributeVariants {
            first: existing.to_string(),
            second: key.to_string(),
        }),
        None => Ok(()),
    }
}

/// Builds a validated mapping from its JSON form.
pub fn selector_from_json(value: &Value) -> Result<SelectorMap, ValidationError> {
    let selector = level_from_json(value)?;
    validate(&selector)?;
    Ok(selector)
}

fn level_from_json(value: &Value) -> Result<SelectorMap, ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::WrongTopLevelType {
            found: json_type_name(value).to_string(),
        })?;

    let mut selector = SelectorMap::new();
    let mut relation_key: Option<&str> = None;

    for (key, value) in object {
        if let Some(relation) = Relation::from_key(key) {
            if !value.is_object() {
                return Err(ValidationError::HierarchicalValueTypeError {
                    relation: key.clone(),
                    found: json_type_name(value).to_string(),
                });
            }
            if let Some(first) = relation_key {
                return Err(ValidationError::MultipleRelations {
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
            relation_key = Some(key.as_str());
            selector.set_relation(relation, level_from_json(value)?);
            continue;
        }

        let attribute = AttributeKey::from_key(key)
            .ok_or_else(|| ValidationError::UnknownAttribute { key: key.clone() })?;
        selector.insert(attribute, value_from_json(attribute, value)?);
    }

    Ok(selector)
}

fn value_from_json(key: AttributeKey, value: &Value) -> Result<AttributeValue, ValidationError> {
    let converted = match key.value_kind() {
        ValueKind::String => value.as_str().map(|s| AttributeValue::String(s.to_string())),
        ValueKind::Boolean => value.as_bool().map(AttributeValue::Boolean),
        ValueKind::Integer => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(AttributeValue::Integer),
    };
    converted.ok_or_else(|| ValidationError::InvalidValueType {
        key: key.to_string(),
        expected: key.value_kind().to_string(),
        found: json_type_name(value).to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_selector() {
        match selector_from_json(&json!({})) {
            Err(ValidationError::EmptySelector) => {}
            other => panic!("Expected EmptySelector, got: {other:?}"),
        }
        match validate(&SelectorMap::new()) {
            Err(ValidationError::EmptySelector) => {}
            other => panic!("Expected EmptySelector, got: {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_text_variants() {
        match selector_from_json(&json!({"text": "OK", "textContains": "H"})) {
            Err(ValidationError::ConflictingAttributeVariants { first, second }) => {
                assert_eq!(first, "text");
                assert_eq!(second, "textContains");
            }
            other => panic!("Expected ConflictingAttributeVariants, got: {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_description_variants() {
        let selector = SelectorMap::new()
            .with(AttributeKey::DescriptionStartsWith, "Sub")
            .with(AttributeKey::DescriptionMatches, ".*");
        match validate(&selector) {
            Err(ValidationError::ConflictingAttributeVariants { first, second }) => {
                assert_eq!(first, "content-descStartsWith");
                assert_eq!(second, "content-descMatches");
            }
            other => panic!("Expected ConflictingAttributeVariants, got: {other:?}"),
        }
    }

    #[test]
    fn test_nested_conflict_is_detected() {
        let value = json!({
            "class": "Layout",
            "childSelector": {"text": "A", "textMatches": "B.*"}
        });
        match selector_from_json(&value) {
            Err(ValidationError::ConflictingAttributeVariants { .. }) => {}
            other => panic!("Expected ConflictingAttributeVariants, got: {other:?}"),
        }
    }

    #[test]
    fn test_hierarchical_value_must_be_mapping() {
        match selector_from_json(&json!({"text": "A", "childSelector": "B"})) {
            Err(ValidationError::HierarchicalValueTypeError { relation, found }) => {
                assert_eq!(relation, "childSelector");
                assert_eq!(found, "string");
            }
            other => panic!("Expected HierarchicalValueTypeError, got: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_top_level_type() {
        match selector_from_json(&json!(["text", "OK"])) {
            Err(ValidationError::WrongTopLevelType { found }) => assert_eq!(found, "array"),
            other => panic!("Expected WrongTopLevelType, got: {other:?}"),
        }
    }

    #[test]
    fn test_multiple_relations() {
        let value = json!({
            "text": "A",
            "childSelector": {"text": "B"},
            "sibling": {"text": "C"}
        });
        match selector_from_json(&value) {
            Err(ValidationError::MultipleRelations { .. }) => {}
            other => panic!("Expected MultipleRelations, got: {other:?}"),
        }
    }

    #[test]
    fn test_value_types_are_checked() {
        match selector_from_json(&json!({"clickable": "yes"})) {
            Err(ValidationError::InvalidValueType { key, found, .. }) => {
                assert_eq!(key, "clickable");
                assert_eq!(found, "string");
            }
            other => panic!("Expected InvalidValueType, got: {other:?}"),
        }
        match selector_from_json(&json!({"index": -1})) {
            Err(ValidationError::InvalidValueType { key, .. }) => assert_eq!(key, "index"),
            other => panic!("Expected InvalidValueType, got: {other:?}"),
        }
        let selector = SelectorMap::new().with(AttributeKey::Text, true);
        match validate(&selector) {
            Err(ValidationError::InvalidValueType { key, .. }) => assert_eq!(key, "text"),
            other => panic!("Expected InvalidValueType, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_attribute() {
        match selector_from_json(&json!({"bounds": "[0,0][1,1]"})) {
            Err(ValidationError::UnknownAttribute { key }) => assert_eq!(key, "bounds"),
            other => panic!("Expected UnknownAttribute, got: {other:?}"),
        }
    }

    #[test]
    fn test_relation_only_level_is_valid() {
        let value = json!({"fromParent": {"fromParent": {"text": "deep"}}, "text": "A"});
        let selector = selector_from_json(&value).unwrap();
        assert_eq!(selector.depth(), 3);
    }

    #[test]
    fn test_check_insert() {
        let selector = SelectorMap::new().with(AttributeKey::Text, "A");
        assert!(check_insert(&selector, AttributeKey::Clickable).is_ok());
        match check_insert(&selector, AttributeKey::Text) {
            Err(ValidationError::DuplicateAttribute { key }) => assert_eq!(key, "text"),
            other => panic!("Expected DuplicateAttribute, got: {other:?}"),
        }
        match check_insert(&selector, AttributeKey::TextContains) {
            Err(ValidationError::ConflictingAttributeVariants { first, second }) => {
                assert_eq!(first, "text");
                assert_eq!(second, "textContains");
            }
            other => panic!("Expected ConflictingAttributeVariants, got: {other:?}"),
        }
    }
}
