use crate::attributes::{AttributeKey, AttributeValue, ValueKind};
use crate::builder::chain::{Argument, Call, CallChain};
use crate::builder::lexer::{Token, TokenKind};
use crate::config::LocatorConfig;
use crate::errors::ParseError;
use tracing::trace;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    value: String::new(),
    position: 0,
};

/// Recursive-descent parser from builder tokens to a [`CallChain`].
///
/// Grammar:
///
/// ```text
/// selector  := chain ';'
/// chain     := [ 'new' CLASS '(' ')' ] call*
/// call      := ['.'] IDENT '(' [ argument ] ')'
/// argument  := STRING | NUMBER | BOOLEAN | chain
/// ```
///
/// The leading dot may only be left out on the first call of a chain
/// without a constructor.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    config: &'a LocatorConfig,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as produced by the lexer.
    pub fn new(tokens: &'a [Token], config: &'a LocatorConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            config,
        }
    }

    /// Parses a complete top-level builder string.
    pub fn parse(mut self) -> Result<CallChain, ParseError> {
        check_balance(self.tokens)?;

        let chain = self.parse_chain()?;

        if self.check(TokenKind::Semicolon) {
            self.advance();
        } else if self.config.options.require_terminator {
            return Err(self.expected("';'"));
        }

        let token = self.peek();
        if token.kind != TokenKind::Eof {
            return Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: token.describe(),
                position: token.position,
            });
        }

        trace!(calls = chain.len(), "parsed builder string");
        Ok(chain)
    }

    fn parse_chain(&mut self) -> Result<CallChain, ParseError> {
        let mut calls = Vec::new();
        let has_constructor = self.parse_constructor()?;

        if !has_constructor && self.check(TokenKind::Identifier) {
            calls.push(self.parse_call()?);
        }

        while self.check(TokenKind::Dot) {
            self.advance();
            calls.push(self.parse_call()?);
        }

        Ok(CallChain { calls })
    }

    /// Consumes `new CLASS()` if present.
    fn parse_constructor(&mut self) -> Result<bool, ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier || token.value != "new" {
            return Ok(false);
        }
        self.advance();

        let config = self.config;
        let class = &config.options.builder_class;
        let token = self.peek();
        if token.kind != TokenKind::Identifier || &token.value != class {
            return Err(self.expected(&format!("'{class}'")));
        }
        self.advance();
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::RParen)?;
        Ok(true)
    }

    fn parse_call(&mut self) -> Result<Call, ParseError> {
        let token = self.peek().clone();
        if token.kind != TokenKind::Identifier {
            return Err(self.expected("method name"));
        }
        self.advance();

        let method = token.value;
        let table = &self.config.table;
        let relation = table.relation_for_method(&method);
        let key = table.key_for_method(&method);
        if relation.is_none() && key.is_none() {
            return Err(ParseError::UnsupportedMethod {
                method,
                position: token.position,
            });
        }

        self.expect(TokenKind::LParen)?;

        let argument = if self.check(TokenKind::RParen) {
            match key {
                Some(key) if key.value_kind() == ValueKind::Boolean => None,
                _ => {
                    return Err(ParseError::MissingArgument {
                        method,
                        position: token.position,
                    })
                }
            }
        } else if relation.is_some() {
            Some(self.parse_nested_argument()?)
        } else if let Some(key) = key {
            Some(Argument::Value(self.parse_literal(key)?))
        } else {
            None
        };

        if self.check(TokenKind::Comma) {
            return Err(ParseError::TooManyArguments {
                method,
                position: self.peek().position,
            });
        }
        self.expect(TokenKind::RParen)?;

        Ok(Call {
            method,
            argument,
            position: token.position,
        })
    }

    fn parse_nested_argument(&mut self) -> Result<Argument, ParseError> {
        let token = self.peek();
        let starts_chain = matches!(token.kind, TokenKind::Identifier | TokenKind::Dot);
        if !starts_chain {
            return Err(ParseError::UnexpectedToken {
                expected: "nested selector".to_string(),
                found: token.describe(),
                position: token.position,
            });
        }
        Ok(Argument::Chain(self.parse_chain()?))
    }

    fn parse_literal(&mut self, key: AttributeKey) -> Result<AttributeValue, ParseError> {
        let token = self.peek().clone();
        let value = match (key.value_kind(), token.kind) {
            (ValueKind::String, TokenKind::StringLiteral) => AttributeValue::String(token.value),
            (ValueKind::Boolean, TokenKind::BooleanLiteral) => {
                AttributeValue::Boolean(token.value == "true")
            }
            (ValueKind::Integer, TokenKind::NumberLiteral) => {
                let n = token
                    .value
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidNumber {
                        literal: token.value.clone(),
                        position: token.position,
                    })?;
                AttributeValue::Integer(n)
            }
            (kind, _) => {
                let expected = match kind {
                    ValueKind::String => TokenKind::StringLiteral,
                    ValueKind::Boolean => TokenKind::BooleanLiteral,
                    ValueKind::Integer => TokenKind::NumberLiteral,
                };
                return Err(ParseError::UnexpectedToken {
                    expected: format!("{expected} for '{key}'"),
                    found: token.describe(),
                    position: token.position,
                });
            }
        };
        self.advance();
        Ok(value)
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&kind.to_string()))
        }
    }

    fn expected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::ExpectedToken {
            expected: expected.to_string(),
            found: token.describe(),
            position: token.position,
        }
    }
}

/// Rejects a `)` that closes nothing. Unclosed `(` are left to the parser,
/// which reports the missing token where it was expected.
fn check_balance(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for token in tokens {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                if depth == 0 {
                    return Err(ParseError::UnbalancedExpression {
                        position: token.position,
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Ok(())
}
