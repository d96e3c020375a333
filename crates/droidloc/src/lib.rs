//! Android UI locator conversion
//!
//! Converts element locators between three interchangeable notations: the
//! declarative selector mapping, the `UiSelector` builder string, and the
//! path expression evaluated against a UI hierarchy dump.

pub mod attributes;
pub mod builder;
pub mod config;
pub mod converter;
pub mod errors;
pub mod path;
pub mod selector;
#[cfg(test)]
mod tests;
pub mod ui_selector;
pub mod validator;

pub use attributes::{AttributeKey, AttributeTable, AttributeValue, MatchKind, Relation};
pub use config::{ConfigError, IndexStyle, LocatorConfig, LocatorOptions};
pub use converter::{Locator, LocatorConverter, Notation};
pub use errors::{ConversionError, LexError, LocatorError, ParseError, ValidationError};
pub use selector::SelectorMap;
pub use ui_selector::UiSelector;
