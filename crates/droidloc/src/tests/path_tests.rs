//! Tests for translating path expressions

use crate::attributes::{AttributeKey, Relation};
use crate::config::{IndexStyle, LocatorConfig, LocatorOptions};
use crate::errors::{ConversionError, LocatorError, ValidationError};
use crate::path::{parse_path, to_path_expression, PathTranslator};
use crate::selector::SelectorMap;

fn to_selector(input: &str) -> Result<SelectorMap, LocatorError> {
    super::init_tracing();
    let config = LocatorConfig::default();
    let ast = parse_path(input).map_err(ConversionError::from)?;
    PathTranslator::new(&config).to_selector(&ast)
}

fn to_builder(input: &str) -> Result<String, LocatorError> {
    let config = LocatorConfig::default();
    let ast = parse_path(input).map_err(ConversionError::from)?;
    PathTranslator::new(&config).to_builder_string(&ast)
}

#[test]
fn test_exact_and_boolean_predicates() {
    let selector = to_selector("//*[@text='OK'][@clickable='true']").unwrap();
    assert_eq!(
        selector,
        SelectorMap::new()
            .with(AttributeKey::Text, "OK")
            .with(AttributeKey::Clickable, true)
    );
}

#[test]
fn test_double_quoted_literals() {
    let selector =
        to_selector(r#"//*[@class="RadioButton"]/..//*[@resource-id="id/pm"]"#).unwrap();
    assert_eq!(
        selector,
        SelectorMap::new()
            .with(AttributeKey::ClassName, "RadioButton")
            .with_relation(
                Relation::FromParent,
                SelectorMap::new().with(AttributeKey::ResourceId, "id/pm"),
            )
    );
}

#[test]
fn test_function_predicates() {
    let selector = to_selector(
        "//*[contains(@text,'Hello')][starts-with(@content-desc,'Nav')][matches(@class,'.*Button')]",
    )
    .unwrap();
    assert_eq!(
        selector,
        SelectorMap::new()
            .with(AttributeKey::TextContains, "Hello")
            .with(AttributeKey::DescriptionStartsWith, "Nav")
            .with(AttributeKey::ClassNameMatches, ".*Button")
    );
}

#[test]
fn test_positional_predicates() {
    let selector = to_selector("//*[@text='Item'][3]").unwrap();
    assert_eq!(selector.get(AttributeKey::Instance).map(ToString::to_string), Some("2".into()));

    let selector = to_selector("//*[@text='Item'][position()=3]").unwrap();
    assert_eq!(selector.get(AttributeKey::Index).map(ToString::to_string), Some("2".into()));

    let selector = to_selector("//*[@text='Item'][@index=3]").unwrap();
    assert_eq!(selector.get(AttributeKey::Index).map(ToString::to_string), Some("3".into()));
}

#[test]
fn test_named_node_test_becomes_class() {
    let selector = to_selector("//android.widget.Button[@text='OK']").unwrap();
    assert_eq!(
        selector,
        SelectorMap::new()
            .with(AttributeKey::Text, "OK")
            .with(AttributeKey::ClassName, "android.widget.Button")
    );
}

#[test]
fn test_child_and_sibling_steps() {
    let selector =
        to_selector("//*[@class='List']//*[@text='A']/following-sibling::*[@text='B']").unwrap();
    let expected = SelectorMap::new()
        .with(AttributeKey::ClassName, "List")
        .with_relation(
            Relation::ChildSelector,
            SelectorMap::new().with(AttributeKey::Text, "A").with_relation(
                Relation::Sibling,
                SelectorMap::new().with(AttributeKey::Text, "B"),
            ),
        );
    assert_eq!(selector, expected);
}

#[test]
fn test_repeated_parent_steps_nest_from_parent() {
    let selector = to_selector("//*[@text='Leaf']/../..//*[@class='Root']").unwrap();
    let expected = SelectorMap::new()
        .with(AttributeKey::Text, "Leaf")
        .with_relation(
            Relation::FromParent,
            SelectorMap::new().with_relation(
                Relation::FromParent,
                SelectorMap::new().with(AttributeKey::ClassName, "Root"),
            ),
        );
    assert_eq!(selector, expected);
    assert_eq!(selector.depth(), 3);
}

#[test]
fn test_concat_literal() {
    let selector = to_selector(r#"//*[@text=concat('say "it',"'",'s"')]"#).unwrap();
    assert_eq!(
        selector,
        SelectorMap::new().with(AttributeKey::Text, r#"say "it's""#)
    );
}

#[test]
fn test_logical_operators_rejected() {
    for input in [
        "//*[@text='A' or @text='B']",
        "//*[@text='A' and @clickable='true']",
    ] {
        match to_selector(input) {
            Err(LocatorError::Conversion(ConversionError::LogicalOperatorsUnsupported {
                expression,
            })) => assert!(expression.contains("@text='A'")),
            other => panic!("Expected LogicalOperatorsUnsupported for {input}, got {other:?}"),
        }
    }
}

#[test]
fn test_unsupported_function_for_attribute() {
    match to_selector("//*[contains(@resource-id,'btn')]") {
        Err(LocatorError::Conversion(ConversionError::FunctionNotSupportedForAttribute {
            function,
            attribute,
        })) => {
            assert_eq!(function, "contains");
            assert_eq!(attribute, "resource-id");
        }
        other => panic!("Expected FunctionNotSupportedForAttribute, got {other:?}"),
    }
}

#[test]
fn test_unknown_function() {
    assert!(matches!(
        to_selector("//*[ends-with(@text,'x')]"),
        Err(LocatorError::Conversion(ConversionError::UnsupportedFunction { .. }))
    ));
}

#[test]
fn test_unknown_attribute() {
    assert!(matches!(
        to_selector("//*[@bounds='[0,0][1,1]']"),
        Err(LocatorError::Conversion(ConversionError::UnsupportedAttribute { .. }))
    ));
}

#[test]
fn test_comparison_operator() {
    match to_selector("//*[@index>1]") {
        Err(LocatorError::Conversion(ConversionError::UnsupportedComparisonOperator {
            operator,
            ..
        })) => assert_eq!(operator, ">"),
        other => panic!("Expected UnsupportedComparisonOperator, got {other:?}"),
    }
}

#[test]
fn test_attribute_presence() {
    let selector = to_selector("//*[@checked]").unwrap();
    assert_eq!(selector, SelectorMap::new().with(AttributeKey::Checked, true));

    assert!(matches!(
        to_selector("//*[@text]"),
        Err(LocatorError::Conversion(ConversionError::AttributePresenceNotSupported { .. }))
    ));
}

#[test]
fn test_unsupported_axes() {
    for input in [
        "//*[@text='A']/ancestor::*[@text='B']",
        "//*[@text='A']/..",
        "/..//*[@text='A']",
        "//*[@text='A']/text()",
    ] {
        assert!(
            matches!(
                to_selector(input),
                Err(LocatorError::Conversion(ConversionError::UnsupportedNode { .. }))
            ),
            "{input}"
        );
    }
}

#[test]
fn test_invalid_boolean_value() {
    assert!(matches!(
        to_selector("//*[@clickable='yes']"),
        Err(LocatorError::Conversion(ConversionError::InvalidValue { .. }))
    ));
}

#[test]
fn test_conflicting_predicates() {
    assert!(matches!(
        to_selector("//*[@text='A'][contains(@text,'B')]"),
        Err(LocatorError::Validation(ValidationError::ConflictingAttributeVariants { .. }))
    ));
}

#[test]
fn test_bare_wildcard_is_empty() {
    assert!(matches!(
        to_selector("//*"),
        Err(LocatorError::Validation(ValidationError::EmptySelector))
    ));
}

#[test]
fn test_syntax_error_position() {
    match to_selector("//[invalid") {
        Err(LocatorError::Conversion(ConversionError::InvalidExpression { position, .. })) => {
            assert_eq!(position, 2);
        }
        other => panic!("Expected InvalidExpression, got {other:?}"),
    }
}

#[test]
fn test_builder_string_from_path() {
    assert_eq!(
        to_builder("//*[@text='OK'][@clickable='true']").unwrap(),
        r#"new UiSelector().text("OK").clickable(true);"#
    );
    assert_eq!(
        to_builder("//*[@class='List']//*[@text='A']/..//*[@text='B']").unwrap(),
        r#"new UiSelector().className("List").childSelector(new UiSelector().text("A").fromParent(new UiSelector().text("B")));"#
    );
}

#[test]
fn test_index_style_round_trip() {
    let config = LocatorConfig::new(LocatorOptions {
        index_style: IndexStyle::Position,
        ..LocatorOptions::default()
    });
    let selector = SelectorMap::new()
        .with(AttributeKey::Text, "Row")
        .with(AttributeKey::Index, 4u32);
    let path = to_path_expression(&selector, &config).unwrap();
    assert_eq!(path, "//*[@text='Row'][position()=5]");
    assert_eq!(to_selector(&path).unwrap(), selector);
}
