use crate::attributes::{AttributeTable, AttributeValue, ValueKind};
use crate::errors::ValidationError;
use crate::selector::SelectorMap;
use crate::validator;

/// Argument passed to one builder method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Value(AttributeValue),
    /// Nested selector of `childSelector`, `fromParent` or `sibling`
    Chain(CallChain),
}

/// One `.method(argument)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: String,
    pub argument: Option<Argument>,
    /// Byte offset of the method name in the source
    pub position: usize,
}

/// Ordered method calls of a builder string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallChain {
    pub calls: Vec<Call>,
}

impl CallChain {
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Folds the calls into a mapping by reversing the method table.
    ///
    /// A boolean method called without an argument means `true`.
    pub fn to_selector(&self, table: &AttributeTable) -> Result<SelectorMap, ValidationError> {
        let mut selector = SelectorMap::new();
        let mut relation_method: Option<&str> = None;

        for call in &self.calls {
            if let Some(relation) = table.relation_for_method(&call.method) {
                if let Some(first) = relation_method {
                    return Err(ValidationError::MultipleRelations {
                        first: first.to_string(),
                        second: call.method.clone(),
                    });
                }
                let nested = match &call.argument {
                    Some(Argument::Chain(chain)) => chain.to_selector(table)?,
                    Some(Argument::Value(value)) => {
                        return Err(ValidationError::HierarchicalValueTypeError {
                            relation: relation.to_string(),
                            found: value.kind().to_string(),
                        })
                    }
                    None => {
                        return Err(ValidationError::HierarchicalValueTypeError {
                            relation: relation.to_string(),
                            found: "nothing".to_string(),
                        })
                    }
                };
                relation_method = Some(call.method.as_str());
                selector.set_relation(relation, nested);
                continue;
            }

            let key = table
                .key_for_method(&call.method)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    key: call.method.clone(),
                })?;
            let value = match &call.argument {
                Some(Argument::Value(value)) => value.clone(),
                None if key.value_kind() == ValueKind::Boolean => AttributeValue::Boolean(true),
                other => {
                    return Err(ValidationError::InvalidValueType {
                        key: key.to_string(),
                        expected: key.value_kind().to_string(),
                        found: match other {
                            Some(Argument::Chain(_)) => "a nested selector".to_string(),
                            _ => "nothing".to_string(),
                        },
                    })
                }
            };
            validator::check_insert(&selector, key)?;
            selector.insert(key, value);
        }

        Ok(selector)
    }
}
