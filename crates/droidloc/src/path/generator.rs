use crate::attributes::{AttributeKey, AttributeValue, Relation};
use crate::config::{IndexStyle, LocatorConfig};
use crate::errors::{ConversionError, LocatorError};
use crate::selector::SelectorMap;
use crate::validator;

/// Renders a validated mapping as a path expression.
///
/// Every level becomes a `*` step whose predicates follow the key order.
/// `instance` is written as the bare positional predicate `[N+1]`; `index`
/// as `[@index=N]` or `[position()=N+1]` depending on [`IndexStyle`].
pub fn to_path_expression(
    selector: &SelectorMap,
    config: &LocatorConfig,
) -> Result<String, LocatorError> {
    validator::validate(selector)?;
    let mut out = String::from("//*");
    write_level(selector, config, &mut out)?;
    Ok(out)
}

fn write_level(
    selector: &SelectorMap,
    config: &LocatorConfig,
    out: &mut String,
) -> Result<(), ConversionError> {
    for (key, value) in selector.attributes() {
        write_predicate(key, value, config, out)?;
    }

    if let Some((relation, nested)) = selector.relation() {
        out.push_str(match relation {
            Relation::ChildSelector => "//*",
            Relation::FromParent => "/..//*",
            Relation::Sibling => "/following-sibling::*",
        });
        write_level(nested, config, out)?;
    }
    Ok(())
}

fn write_predicate(
    key: AttributeKey,
    value: &AttributeValue,
    config: &LocatorConfig,
    out: &mut String,
) -> Result<(), ConversionError> {
    let invalid = || ConversionError::InvalidValue {
        attribute: key.to_string(),
        value: value.to_string(),
    };

    match key {
        AttributeKey::Instance => {
            let AttributeValue::Integer(n) = value else {
                return Err(invalid());
            };
            out.push_str(&format!("[{}]", u64::from(*n) + 1));
            return Ok(());
        }
        AttributeKey::Index => {
            let AttributeValue::Integer(n) = value else {
                return Err(invalid());
            };
            match config.options.index_style {
                IndexStyle::Attribute => out.push_str(&format!("[@index={n}]")),
                IndexStyle::Position => {
                    out.push_str(&format!("[position()={}]", u64::from(*n) + 1))
                }
            }
            return Ok(());
        }
        _ => {}
    }

    let name = key
        .base()
        .path_name()
        .ok_or_else(|| ConversionError::UnsupportedAttribute {
            attribute: key.to_string(),
        })?;
    let literal = match value {
        AttributeValue::String(s) => quote(s),
        AttributeValue::Boolean(b) => format!("'{b}'"),
        AttributeValue::Integer(n) => n.to_string(),
    };

    match key.match_kind().function() {
        None => out.push_str(&format!("[@{name}={literal}]")),
        Some(function) => out.push_str(&format!("[{}(@{name},{literal})]", function.name())),
    }
    Ok(())
}

/// Quotes a string as a path literal.
///
/// Path literals have no escapes, so a value holding an apostrophe is
/// double-quoted, and one holding both quote kinds becomes `concat(...)`.
pub fn quote(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let mut parts = Vec::new();
    for (i, chunk) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{chunk}'"));
        }
    }
    format!("concat({})", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(selector: &SelectorMap) -> String {
        to_path_expression(selector, &LocatorConfig::default()).unwrap()
    }

    #[test]
    fn test_text() {
        assert_eq!(
            render(&SelectorMap::new().with(AttributeKey::Text, "OK")),
            "//*[@text='OK']"
        );
    }

    #[test]
    fn test_predicates_follow_key_order() {
        let selector = SelectorMap::new()
            .with(AttributeKey::Index, 1u32)
            .with(AttributeKey::Enabled, false)
            .with(AttributeKey::ClassName, "Button");
        assert_eq!(
            render(&selector),
            "//*[@class='Button'][@enabled='false'][@index=1]"
        );
    }

    #[test]
    fn test_string_functions() {
        let selector = SelectorMap::new()
            .with(AttributeKey::TextContains, "Hello")
            .with(AttributeKey::DescriptionStartsWith, "Nav")
            .with(AttributeKey::ResourceIdMatches, ".*:id/btn_.*");
        assert_eq!(
            render(&selector),
            "//*[contains(@text,'Hello')][starts-with(@content-desc,'Nav')][matches(@resource-id,'.*:id/btn_.*')]"
        );
    }

    #[test]
    fn test_instance_uses_bare_position() {
        let out = render(&SelectorMap::new().with(AttributeKey::Instance, 1u32));
        assert_eq!(out, "//*[2]");
        assert!(!out.contains("@index"));
    }

    #[test]
    fn test_index_position_style() {
        let mut config = LocatorConfig::default();
        config.options.index_style = IndexStyle::Position;
        let selector = SelectorMap::new().with(AttributeKey::Index, 2u32);
        assert_eq!(
            to_path_expression(&selector, &config).unwrap(),
            "//*[position()=3]"
        );
    }

    #[test]
    fn test_relations() {
        let child = SelectorMap::new()
            .with(AttributeKey::ClassName, "android.widget.LinearLayout")
            .with_relation(
                Relation::ChildSelector,
                SelectorMap::new().with(AttributeKey::Text, "Item"),
            );
        assert_eq!(
            render(&child),
            "//*[@class='android.widget.LinearLayout']//*[@text='Item']"
        );

        let parent = SelectorMap::new()
            .with(AttributeKey::Text, "Child")
            .with_relation(
                Relation::FromParent,
                SelectorMap::new().with(AttributeKey::ClassName, "android.widget.FrameLayout"),
            );
        assert_eq!(
            render(&parent),
            "//*[@text='Child']/..//*[@class='android.widget.FrameLayout']"
        );

        let sibling = SelectorMap::new()
            .with(AttributeKey::Text, "First")
            .with_relation(
                Relation::Sibling,
                SelectorMap::new().with(AttributeKey::Text, "Second"),
            );
        assert_eq!(
            render(&sibling),
            "//*[@text='First']/following-sibling::*[@text='Second']"
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("OK"), "'OK'");
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(
            quote(r#"say "it's""#),
            r#"concat('say "it',"'",'s"')"#
        );
    }
}
