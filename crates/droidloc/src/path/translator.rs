//! Folds a path syntax tree into a selector mapping or a builder string.

use crate::attributes::{
    AttributeKey, AttributeValue, BaseAttribute, MatchKind, PathFunction, Relation, ValueKind,
};
use crate::builder::generator::write_selector;
use crate::config::LocatorConfig;
use crate::errors::{ConversionError, LocatorError, ValidationError};
use crate::path::ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Separator, Step};
use crate::selector::SelectorMap;
use crate::validator;
use tracing::{debug, trace};

/// One nesting level produced by walking the steps.
#[derive(Debug)]
struct Level {
    /// Relation linking this level to the previous one; `None` for the root.
    relation: Option<Relation>,
    selector: SelectorMap,
}

/// Translates path syntax trees using the tables of a [`LocatorConfig`].
pub struct PathTranslator<'a> {
    config: &'a LocatorConfig,
}

impl<'a> PathTranslator<'a> {
    pub fn new(config: &'a LocatorConfig) -> Self {
        Self { config }
    }

    /// Folds `path` into a validated mapping.
    pub fn to_selector(&self, path: &LocationPath) -> Result<SelectorMap, LocatorError> {
        let levels = self.levels(path)?;
        let selector = fold(levels);
        validator::validate(&selector)?;
        Ok(selector)
    }

    /// Folds `path` straight into a top-level builder string.
    pub fn to_builder_string(&self, path: &LocationPath) -> Result<String, LocatorError> {
        let levels = self.levels(path)?;
        if levels.last().map_or(true, |level| level.selector.is_empty()) {
            return Err(ValidationError::EmptySelector.into());
        }

        let mut out = String::new();
        for level in &levels {
            if let Some(relation) = level.relation {
                let method = self.config.table.relation_method(relation).ok_or_else(|| {
                    ConversionError::UnsupportedAttribute {
                        attribute: relation.to_string(),
                    }
                })?;
                out.push('.');
                out.push_str(method);
                out.push('(');
            }
            write_selector(&level.selector, self.config, &mut out)?;
        }
        for _ in 1..levels.len() {
            out.push(')');
        }

        let mut out = balance_parentheses(&out)?;
        out.push(';');
        debug!(levels = levels.len(), output = %out, "translated path to builder string");
        Ok(out)
    }

    fn levels(&self, path: &LocationPath) -> Result<Vec<Level>, LocatorError> {
        for step in &path.steps {
            if let Some(predicate) = step.predicates.iter().find(|p| p.has_logical_operator()) {
                return Err(ConversionError::LogicalOperatorsUnsupported {
                    expression: predicate.to_string(),
                }
                .into());
            }
        }

        let mut levels: Vec<Level> = Vec::new();
        let mut pending_up = 0usize;

        for (i, step) in path.steps.iter().enumerate() {
            let relation = match step.axis {
                Axis::Parent => {
                    if i == 0 {
                        return Err(unsupported(step, "a path cannot start with a parent step"));
                    }
                    if step.separator == Separator::Descendant
                        || !step.predicates.is_empty()
                        || !matches!(step.node_test, NodeTest::Node | NodeTest::Any)
                    {
                        return Err(unsupported(step, "only a plain '/..' parent step is supported"));
                    }
                    pending_up += 1;
                    continue;
                }
                Axis::Child | Axis::Descendant | Axis::DescendantOrSelf => {
                    if i == 0 {
                        if step.axis != Axis::Child {
                            return Err(unsupported(step, "the first step must use the child axis"));
                        }
                        None
                    } else if pending_up > 0 {
                        for _ in 1..pending_up {
                            levels.push(Level {
                                relation: Some(Relation::FromParent),
                                selector: SelectorMap::new(),
                            });
                        }
                        pending_up = 0;
                        Some(Relation::FromParent)
                    } else {
                        Some(Relation::ChildSelector)
                    }
                }
                Axis::FollowingSibling => {
                    if i == 0 || pending_up > 0 || step.separator == Separator::Descendant {
                        return Err(unsupported(
                            step,
                            "a following-sibling step must directly follow an element step",
                        ));
                    }
                    Some(Relation::Sibling)
                }
                axis => {
                    return Err(unsupported(
                        step,
                        &format!("the {} axis is not supported", axis.name()),
                    ))
                }
            };

            let selector = self.step_selector(step)?;
            trace!(step = %step, ?relation, "folded path step");
            levels.push(Level { relation, selector });
        }

        if pending_up > 0 {
            let last = path.steps.last().map(ToString::to_string).unwrap_or_default();
            return Err(ConversionError::UnsupportedNode {
                node: last,
                reason: "a parent step must be followed by an element step".to_string(),
            }
            .into());
        }

        debug!(steps = path.steps.len(), levels = levels.len(), "walked path steps");
        Ok(levels)
    }

    fn step_selector(&self, step: &Step) -> Result<SelectorMap, LocatorError> {
        let mut selector = SelectorMap::new();
        match &step.node_test {
            NodeTest::Any | NodeTest::Node => {}
            NodeTest::Name(name) => {
                selector.insert(AttributeKey::ClassName, name.as_str());
            }
            NodeTest::Text => return Err(unsupported(step, "text() steps select no element")),
        }
        for predicate in &step.predicates {
            self.fold_predicate(&mut selector, predicate)?;
        }
        Ok(selector)
    }

    fn fold_predicate(&self, selector: &mut SelectorMap, expr: &Expr) -> Result<(), LocatorError> {
        match expr {
            Expr::Compare { op, left, right } => {
                if *op != CompareOp::Equal {
                    return Err(ConversionError::UnsupportedComparisonOperator {
                        operator: op.symbol().to_string(),
                        expression: expr.to_string(),
                    }
                    .into());
                }
                match (left.as_ref(), right.as_ref()) {
                    (Expr::Attribute(name), value) | (value, Expr::Attribute(name)) => {
                        self.fold_equality(selector, name, value, expr)
                    }
                    (Expr::Call { name, args }, value) | (value, Expr::Call { name, args })
                        if name == "position" && args.is_empty() =>
                    {
                        let position = value
                            .as_integer()
                            .filter(|n| *n >= 1)
                            .ok_or_else(|| ConversionError::InvalidValue {
                                attribute: "position()".to_string(),
                                value: value.to_string(),
                            })?;
                        insert(selector, AttributeKey::Index, to_u32(position - 1))
                    }
                    _ => Err(ConversionError::UnsupportedPredicate {
                        predicate: expr.to_string(),
                    }
                    .into()),
                }
            }
            Expr::Call { name, args } => match PathFunction::from_name(name) {
                Some(function) => self.fold_function(selector, function, args, expr),
                None => Err(ConversionError::UnsupportedFunction {
                    function: name.clone(),
                }
                .into()),
            },
            Expr::Attribute(name) => {
                let base = self.config.table.base_for_path_name(name);
                match base {
                    Some(base) if base.value_kind() == ValueKind::Boolean => {
                        let key = self.exact_key(base, name)?;
                        insert(selector, key, AttributeValue::Boolean(true))
                    }
                    _ => Err(ConversionError::AttributePresenceNotSupported {
                        attribute: name.clone(),
                    }
                    .into()),
                }
            }
            Expr::Number(_) => {
                let position = expr.as_integer().filter(|n| *n >= 1).ok_or_else(|| {
                    ConversionError::InvalidValue {
                        attribute: AttributeKey::Instance.to_string(),
                        value: expr.to_string(),
                    }
                })?;
                insert(selector, AttributeKey::Instance, to_u32(position - 1))
            }
            Expr::Or(..) | Expr::And(..) => Err(ConversionError::LogicalOperatorsUnsupported {
                expression: expr.to_string(),
            }
            .into()),
            Expr::Literal(_) | Expr::Path(_) => Err(ConversionError::UnsupportedPredicate {
                predicate: expr.to_string(),
            }
            .into()),
        }
    }

    fn fold_equality(
        &self,
        selector: &mut SelectorMap,
        name: &str,
        value: &Expr,
        expr: &Expr,
    ) -> Result<(), LocatorError> {
        let base = self.config.table.base_for_path_name(name).ok_or_else(|| {
            ConversionError::UnsupportedAttribute {
                attribute: name.to_string(),
            }
        })?;
        let key = self.exact_key(base, name)?;
        let invalid = || ConversionError::InvalidValue {
            attribute: name.to_string(),
            value: value.to_string(),
        };

        let parsed = match base.value_kind() {
            ValueKind::String => match (literal_value(value), value) {
                (Some(s), _) => AttributeValue::String(s),
                (None, Expr::Number(_)) => AttributeValue::String(value.to_string()),
                _ => {
                    return Err(ConversionError::UnsupportedPredicate {
                        predicate: expr.to_string(),
                    }
                    .into())
                }
            },
            ValueKind::Boolean => {
                let text = literal_value(value).ok_or_else(invalid)?;
                match text.to_ascii_lowercase().as_str() {
                    "true" => AttributeValue::Boolean(true),
                    "false" => AttributeValue::Boolean(false),
                    _ => return Err(invalid().into()),
                }
            }
            ValueKind::Integer => {
                let n = match value {
                    Expr::Number(_) => value.as_integer(),
                    _ => literal_value(value).and_then(|s| s.trim().parse::<u64>().ok()),
                };
                let n = n
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(invalid)?;
                AttributeValue::Integer(n)
            }
        };
        insert(selector, key, parsed)
    }

    fn fold_function(
        &self,
        selector: &mut SelectorMap,
        function: PathFunction,
        args: &[Expr],
        expr: &Expr,
    ) -> Result<(), LocatorError> {
        let unsupported_predicate = || ConversionError::UnsupportedPredicate {
            predicate: expr.to_string(),
        };
        let [Expr::Attribute(name), value] = args else {
            return Err(unsupported_predicate().into());
        };

        let base = self.config.table.base_for_path_name(name).ok_or_else(|| {
            ConversionError::UnsupportedAttribute {
                attribute: name.clone(),
            }
        })?;
        let not_supported = || ConversionError::FunctionNotSupportedForAttribute {
            function: function.name().to_string(),
            attribute: name.clone(),
        };
        if !self.config.table.supports(base, function) {
            return Err(not_supported().into());
        }
        let key = self
            .config
            .table
            .key_for(base, function.match_kind())
            .ok_or_else(not_supported)?;
        let value = literal_value(value).ok_or_else(unsupported_predicate)?;
        insert(selector, key, AttributeValue::String(value))
    }

    fn exact_key(
        &self,
        base: BaseAttribute,
        name: &str,
    ) -> Result<AttributeKey, ConversionError> {
        self.config
            .table
            .key_for(base, MatchKind::Exact)
            .ok_or_else(|| ConversionError::UnsupportedAttribute {
                attribute: name.to_string(),
            })
    }
}

fn insert(
    selector: &mut SelectorMap,
    key: AttributeKey,
    value: impl Into<AttributeValue>,
) -> Result<(), LocatorError> {
    validator::check_insert(selector, key)?;
    selector.insert(key, value);
    Ok(())
}

fn unsupported(step: &Step, reason: &str) -> LocatorError {
    ConversionError::UnsupportedNode {
        node: step.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn to_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// String value of a literal or of `concat(...)` over literals.
fn literal_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal(s) => Some(s.clone()),
        Expr::Call { name, args } if name == "concat" && args.len() >= 2 => {
            args.iter().map(literal_value).collect()
        }
        _ => None,
    }
}

/// Nests every level under the previous one through its relation.
fn fold(levels: Vec<Level>) -> SelectorMap {
    let mut result: Option<SelectorMap> = None;
    let mut inner_relation: Option<Relation> = None;
    for level in levels.into_iter().rev() {
        let mut selector = level.selector;
        if let (Some(relation), Some(inner)) = (inner_relation, result.take()) {
            selector.set_relation(relation, inner);
        }
        inner_relation = level.relation;
        result = Some(selector);
    }
    result.unwrap_or_default()
}

/// Drops surplus `)` from the end of a composed builder string.
///
/// Parentheses inside string literals are ignored. A missing `)` is a
/// composition bug and is reported, never patched.
pub fn balance_parentheses(expression: &str) -> Result<String, ConversionError> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in expression.chars() {
        if in_string {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }

    if depth > 0 || in_string {
        return Err(ConversionError::UnbalancedComposition {
            expression: expression.to_string(),
        });
    }

    let mut balanced = expression.to_string();
    while depth < 0 && balanced.ends_with(')') {
        balanced.pop();
        depth += 1;
    }
    if depth < 0 {
        return Err(ConversionError::UnbalancedComposition {
            expression: expression.to_string(),
        });
    }
    Ok(balanced)
}
