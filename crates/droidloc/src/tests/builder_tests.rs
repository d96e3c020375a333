//! Tests for parsing builder strings into selector mappings

use crate::attributes::{AttributeKey, Relation};
use crate::builder::{parse_chain, parse_selector, tokenize, TokenKind};
use crate::config::{LocatorConfig, LocatorOptions};
use crate::errors::{LexError, LocatorError, ParseError, ValidationError};
use crate::selector::SelectorMap;

fn parse(input: &str) -> Result<SelectorMap, LocatorError> {
    super::init_tracing();
    parse_selector(input, &LocatorConfig::default())
}

#[test]
fn test_parse_single_call() {
    let selector = parse(r#"new UiSelector().text("OK");"#).unwrap();
    assert_eq!(selector, SelectorMap::new().with(AttributeKey::Text, "OK"));
}

#[test]
fn test_parse_mixed_value_types() {
    let selector = parse(
        r#"new UiSelector().className("android.widget.Button").enabled(false).index(2).instance(0);"#,
    )
    .unwrap();
    assert_eq!(
        selector,
        SelectorMap::new()
            .with(AttributeKey::ClassName, "android.widget.Button")
            .with(AttributeKey::Enabled, false)
            .with(AttributeKey::Index, 2u32)
            .with(AttributeKey::Instance, 0u32)
    );
}

#[test]
fn test_parse_without_constructor() {
    let selector = parse(r#"text("OK").clickable(true);"#).unwrap();
    assert_eq!(selector.get(AttributeKey::Text).map(ToString::to_string), Some("OK".into()));
    assert_eq!(selector.len(), 2);
}

#[test]
fn test_boolean_without_argument_means_true() {
    let selector = parse("new UiSelector().scrollable();").unwrap();
    assert_eq!(selector, SelectorMap::new().with(AttributeKey::Scrollable, true));
}

#[test]
fn test_parse_nested_relations() {
    let selector = parse(
        r#"new UiSelector().className("android.widget.LinearLayout").childSelector(new UiSelector().text("Item").sibling(new UiSelector().checked(true)));"#,
    )
    .unwrap();

    let expected = SelectorMap::new()
        .with(AttributeKey::ClassName, "android.widget.LinearLayout")
        .with_relation(
            Relation::ChildSelector,
            SelectorMap::new().with(AttributeKey::Text, "Item").with_relation(
                Relation::Sibling,
                SelectorMap::new().with(AttributeKey::Checked, true),
            ),
        );
    assert_eq!(selector, expected);
    assert_eq!(selector.depth(), 3);
}

#[test]
fn test_escaped_string_value() {
    let selector = parse(r#"new UiSelector().text("say \"hi\"\n");"#).unwrap();
    assert_eq!(
        selector,
        SelectorMap::new().with(AttributeKey::Text, "say \"hi\"\n")
    );
}

#[test]
fn test_missing_closing_paren_is_expected_token() {
    match parse(r#"new UiSelector().text("OK""#) {
        Err(LocatorError::Parse(ParseError::ExpectedToken { position, .. })) => {
            assert_eq!(position, 26);
        }
        other => panic!("Expected ExpectedToken, got {other:?}"),
    }
}

#[test]
fn test_missing_semicolon_is_expected_token() {
    match parse(r#"new UiSelector().text("OK")"#) {
        Err(LocatorError::Parse(ParseError::ExpectedToken { expected, .. })) => {
            assert_eq!(expected, "';'");
        }
        other => panic!("Expected ExpectedToken, got {other:?}"),
    }
}

#[test]
fn test_semicolon_optional_when_configured() {
    let config = LocatorConfig::new(LocatorOptions {
        require_terminator: false,
        ..LocatorOptions::default()
    });
    let selector = parse_selector(r#"new UiSelector().text("OK")"#, &config).unwrap();
    assert_eq!(selector, SelectorMap::new().with(AttributeKey::Text, "OK"));
}

#[test]
fn test_unmatched_closing_paren_is_unbalanced() {
    match parse(r#"new UiSelector().text("OK"));"#) {
        Err(LocatorError::Parse(ParseError::UnbalancedExpression { position })) => {
            assert_eq!(position, 27);
        }
        other => panic!("Expected UnbalancedExpression, got {other:?}"),
    }
}

#[test]
fn test_unterminated_string() {
    match parse(r#"new UiSelector().text("OK);"#) {
        Err(LocatorError::Lex(LexError::UnterminatedString { position })) => {
            assert_eq!(position, 22);
        }
        other => panic!("Expected UnterminatedString, got {other:?}"),
    }
}

#[test]
fn test_bad_escape() {
    match parse(r#"new UiSelector().text("a\qb");"#) {
        Err(LocatorError::Lex(LexError::BadEscape { escape, .. })) => assert_eq!(escape, 'q'),
        other => panic!("Expected BadEscape, got {other:?}"),
    }
}

#[test]
fn test_unexpected_character() {
    match parse("new UiSelector().text('OK');") {
        Err(LocatorError::Lex(LexError::UnexpectedChar { ch, position })) => {
            assert_eq!(ch, '\'');
            assert_eq!(position, 22);
        }
        other => panic!("Expected UnexpectedChar, got {other:?}"),
    }
}

#[test]
fn test_too_many_arguments() {
    match parse(r#"new UiSelector().text("a", "b");"#) {
        Err(LocatorError::Parse(ParseError::TooManyArguments { method, .. })) => {
            assert_eq!(method, "text");
        }
        other => panic!("Expected TooManyArguments, got {other:?}"),
    }
}

#[test]
fn test_unsupported_method() {
    match parse(r#"new UiSelector().textFoo("a");"#) {
        Err(LocatorError::Parse(ParseError::UnsupportedMethod { method, position })) => {
            assert_eq!(method, "textFoo");
            assert_eq!(position, 17);
        }
        other => panic!("Expected UnsupportedMethod, got {other:?}"),
    }
}

#[test]
fn test_missing_argument_for_string_method() {
    assert!(matches!(
        parse("new UiSelector().text();"),
        Err(LocatorError::Parse(ParseError::MissingArgument { .. }))
    ));
}

#[test]
fn test_wrong_literal_type() {
    assert!(matches!(
        parse(r#"new UiSelector().index("1");"#),
        Err(LocatorError::Parse(ParseError::UnexpectedToken { .. }))
    ));
    assert!(matches!(
        parse("new UiSelector().text(true);"),
        Err(LocatorError::Parse(ParseError::UnexpectedToken { .. }))
    ));
}

#[test]
fn test_relation_requires_nested_selector() {
    assert!(matches!(
        parse(r#"new UiSelector().childSelector("x");"#),
        Err(LocatorError::Parse(ParseError::UnexpectedToken { .. }))
    ));
}

#[test]
fn test_number_overflow() {
    assert!(matches!(
        parse("new UiSelector().index(99999999999);"),
        Err(LocatorError::Parse(ParseError::InvalidNumber { .. }))
    ));
}

#[test]
fn test_conflicting_variants() {
    match parse(r#"new UiSelector().text("OK").textContains("O");"#) {
        Err(LocatorError::Validation(ValidationError::ConflictingAttributeVariants {
            first,
            second,
        })) => {
            assert_eq!(first, "text");
            assert_eq!(second, "textContains");
        }
        other => panic!("Expected ConflictingAttributeVariants, got {other:?}"),
    }
}

#[test]
fn test_repeated_call() {
    assert!(matches!(
        parse("new UiSelector().index(1).index(2);"),
        Err(LocatorError::Validation(ValidationError::DuplicateAttribute { .. }))
    ));
}

#[test]
fn test_two_relations_on_one_level() {
    assert!(matches!(
        parse(
            r#"new UiSelector().text("A").childSelector(new UiSelector().text("B")).sibling(new UiSelector().text("C"));"#
        ),
        Err(LocatorError::Validation(ValidationError::MultipleRelations { .. }))
    ));
}

#[test]
fn test_empty_constructor_is_empty_selector() {
    assert!(matches!(
        parse("new UiSelector();"),
        Err(LocatorError::Validation(ValidationError::EmptySelector))
    ));
}

#[test]
fn test_custom_builder_class() {
    let config = LocatorConfig::new(LocatorOptions {
        builder_class: "By".to_string(),
        ..LocatorOptions::default()
    });
    let selector = parse_selector(r#"new By().text("OK");"#, &config).unwrap();
    assert_eq!(selector, SelectorMap::new().with(AttributeKey::Text, "OK"));

    assert!(matches!(
        parse_selector(r#"new UiSelector().text("OK");"#, &config),
        Err(LocatorError::Parse(ParseError::ExpectedToken { .. }))
    ));
}

#[test]
fn test_chain_keeps_call_order() {
    let chain = parse_chain(
        r#"new UiSelector().index(1).text("A");"#,
        &LocatorConfig::default(),
    )
    .unwrap();
    let methods: Vec<_> = chain.calls.iter().map(|c| c.method.as_str()).collect();
    assert_eq!(methods, vec!["index", "text"]);
}

#[test]
fn test_tokens_end_with_eof() {
    let tokens = tokenize(r#"new UiSelector().text("OK");"#).unwrap();
    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}
