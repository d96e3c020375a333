//! The builder-string notation: `new UiSelector().text("OK");`

pub mod chain;
pub mod generator;
pub mod lexer;
pub mod parser;

pub use chain::{Argument, Call, CallChain};
pub use generator::to_builder_string;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::config::LocatorConfig;
use crate::errors::LocatorError;
use crate::selector::SelectorMap;
use crate::validator;
use tracing::debug;

/// Lexes and parses a builder string into its call chain.
pub fn parse_chain(input: &str, config: &LocatorConfig) -> Result<CallChain, LocatorError> {
    let tokens = tokenize(input)?;
    debug!(tokens = tokens.len(), "tokenized builder string");
    Ok(Parser::new(&tokens, config).parse()?)
}

/// Parses a builder string into a validated mapping.
pub fn parse_selector(input: &str, config: &LocatorConfig) -> Result<SelectorMap, LocatorError> {
    let chain = parse_chain(input, config)?;
    let selector = chain.to_selector(&config.table)?;
    validator::validate(&selector)?;
    Ok(selector)
}
