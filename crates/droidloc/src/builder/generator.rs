use crate::attributes::AttributeValue;
use crate::config::LocatorConfig;
use crate::errors::{ConversionError, LocatorError};
use crate::selector::SelectorMap;
use crate::validator;

/// Renders a validated mapping as a top-level builder string, e.g.
/// `new UiSelector().text("OK").clickable(true);`.
pub fn to_builder_string(
    selector: &SelectorMap,
    config: &LocatorConfig,
) -> Result<String, LocatorError> {
    validator::validate(selector)?;
    let mut out = String::new();
    write_selector(selector, config, &mut out)?;
    out.push(';');
    Ok(out)
}

/// Writes `new CLASS()` followed by the calls of `selector`, without the
/// terminating `;`. Nested relations are written the same way inside the
/// relation call's parentheses.
pub(crate) fn write_selector(
    selector: &SelectorMap,
    config: &LocatorConfig,
    out: &mut String,
) -> Result<(), ConversionError> {
    out.push_str(&config.constructor());
    for (key, value) in selector.attributes() {
        let method = config.table.method_name(key).ok_or_else(|| {
            ConversionError::UnsupportedAttribute {
                attribute: key.to_string(),
            }
        })?;
        out.push('.');
        out.push_str(method);
        out.push('(');
        write_value(value, out);
        out.push(')');
    }
    if let Some((relation, nested)) = selector.relation() {
        let method = config.table.relation_method(relation).ok_or_else(|| {
            ConversionError::UnsupportedAttribute {
                attribute: relation.to_string(),
            }
        })?;
        out.push('.');
        out.push_str(method);
        out.push('(');
        write_selector(nested, config, out)?;
        out.push(')');
    }
    Ok(())
}

pub(crate) fn write_value(value: &AttributeValue, out: &mut String) {
    match value {
        AttributeValue::String(s) => {
            out.push('"');
            out.push_str(&escape(s));
            out.push('"');
        }
        AttributeValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        AttributeValue::Integer(n) => out.push_str(&n.to_string()),
    }
}

/// Escapes a value for use inside a double-quoted builder literal.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
