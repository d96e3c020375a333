//! Recursive-descent parser producing a [`LocationPath`].
//!
//! Covers absolute location paths with axis steps and bracketed predicates.
//! Predicate expressions support `or`, `and`, comparisons, function calls,
//! attribute references, literals and numbers. Whether a construct can be
//! translated is decided later by the translator, so this parser accepts
//! more than the translator does.

use crate::path::ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Separator, Step};
use crate::path::lexer::{PathLexer, PathSyntaxError, PathToken, PathTokenKind};

/// Parses a path expression into its syntax tree.
///
/// A path wrapped in one pair of parentheses, `(//*[@text='OK'])`, is
/// accepted as long as nothing follows the closing parenthesis.
pub fn parse_path(input: &str) -> Result<LocationPath, PathSyntaxError> {
    let tokens = PathLexer::new(input).tokenize()?;
    let mut parser = PathParser::new(tokens);

    let grouped = parser.eat(&PathTokenKind::LeftParen);
    let path = parser.parse_location_path()?;
    if grouped {
        parser.expect(&PathTokenKind::RightParen)?;
    }
    if !parser.check(&PathTokenKind::Eof) {
        let message = if grouped {
            "a grouped path cannot be followed by predicates or steps"
        } else {
            "unmatched ')'"
        };
        return Err(parser.error(message));
    }
    Ok(path)
}

struct PathParser {
    tokens: Vec<PathToken>,
    pos: usize,
}

impl PathParser {
    fn new(tokens: Vec<PathToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_location_path(&mut self) -> Result<LocationPath, PathSyntaxError> {
        let mut steps = Vec::new();
        loop {
            let separator = match self.peek_kind() {
                PathTokenKind::Slash => Separator::Child,
                PathTokenKind::DoubleSlash => Separator::Descendant,
                PathTokenKind::Eof | PathTokenKind::RightParen if !steps.is_empty() => break,
                PathTokenKind::Eof => return Err(self.error("empty path expression")),
                PathTokenKind::Pipe => {
                    return Err(self.error("union expressions are not supported"))
                }
                _ if steps.is_empty() => {
                    return Err(self.error("path expression must start with '/' or '//'"))
                }
                other => return Err(self.error(&format!("unexpected {other} after step"))),
            };
            self.advance();
            steps.push(self.parse_step(separator)?);
        }
        Ok(LocationPath { steps })
    }

    fn parse_step(&mut self, separator: Separator) -> Result<Step, PathSyntaxError> {
        let position = self.peek().position;

        let abbreviated = match self.peek_kind() {
            PathTokenKind::DotDot => Some(Axis::Parent),
            PathTokenKind::Dot => Some(Axis::SelfAxis),
            _ => None,
        };
        if let Some(axis) = abbreviated {
            self.advance();
            if self.check(&PathTokenKind::LeftBracket) {
                return Err(self.error("abbreviated steps cannot have predicates"));
            }
            return Ok(Step {
                separator,
                axis,
                node_test: NodeTest::Node,
                predicates: Vec::new(),
                abbreviated: true,
                position,
            });
        }

        let mut abbreviated = false;
        let axis = if self.eat(&PathTokenKind::At) {
            abbreviated = true;
            Axis::Attribute
        } else if let (PathTokenKind::Name(name), PathTokenKind::ColonColon) =
            (self.peek_kind(), self.peek_kind_at(1))
        {
            let axis = Axis::from_name(name)
                .ok_or_else(|| self.error(&format!("unknown axis '{name}'")))?;
            self.advance();
            self.advance();
            axis
        } else {
            Axis::Child
        };

        let node_test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;

        Ok(Step {
            separator,
            axis,
            node_test,
            predicates,
            abbreviated,
            position,
        })
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, PathSyntaxError> {
        match self.peek_kind().clone() {
            PathTokenKind::Star => {
                self.advance();
                Ok(NodeTest::Any)
            }
            PathTokenKind::Name(name) => {
                self.advance();
                if !self.eat(&PathTokenKind::LeftParen) {
                    return Ok(NodeTest::Name(name));
                }
                self.expect(&PathTokenKind::RightParen)?;
                match name.as_str() {
                    "node" => Ok(NodeTest::Node),
                    "text" => Ok(NodeTest::Text),
                    _ => Err(self.error(&format!("'{name}()' is not a node test"))),
                }
            }
            other => Err(self.error(&format!("expected node test, found {other}"))),
        }
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, PathSyntaxError> {
        let mut predicates = Vec::new();
        while self.eat(&PathTokenKind::LeftBracket) {
            predicates.push(self.parse_or_expr()?);
            self.expect(&PathTokenKind::RightBracket)?;
        }
        Ok(predicates)
    }

    fn parse_or_expr(&mut self) -> Result<Expr, PathSyntaxError> {
        let mut left = self.parse_and_expr()?;
        while self.eat_keyword("or") {
            let right = self.parse_and_expr()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, PathSyntaxError> {
        let mut left = self.parse_equality_expr()?;
        while self.eat_keyword("and") {
            let right = self.parse_equality_expr()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr, PathSyntaxError> {
        let mut left = self.parse_relational_expr()?;
        loop {
            let op = match self.peek_kind() {
                PathTokenKind::Equal => CompareOp::Equal,
                PathTokenKind::NotEqual => CompareOp::NotEqual,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational_expr()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_relational_expr(&mut self) -> Result<Expr, PathSyntaxError> {
        let mut left = self.parse_primary_expr()?;
        loop {
            let op = match self.peek_kind() {
                PathTokenKind::LessThan => CompareOp::LessThan,
                PathTokenKind::LessThanEqual => CompareOp::LessThanEqual,
                PathTokenKind::GreaterThan => CompareOp::GreaterThan,
                PathTokenKind::GreaterThanEqual => CompareOp::GreaterThanEqual,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_primary_expr()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, PathSyntaxError> {
        match self.peek_kind().clone() {
            PathTokenKind::At => {
                self.advance();
                match self.peek_kind().clone() {
                    PathTokenKind::Name(name) => {
                        self.advance();
                        Ok(Expr::Attribute(name))
                    }
                    other => Err(self.error(&format!("expected attribute name, found {other}"))),
                }
            }
            PathTokenKind::Literal(value) => {
                self.advance();
                Ok(Expr::Literal(value))
            }
            PathTokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            PathTokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_or_expr()?;
                self.expect(&PathTokenKind::RightParen)?;
                Ok(inner)
            }
            PathTokenKind::Star => {
                self.advance();
                Ok(Expr::Path("*".to_string()))
            }
            PathTokenKind::Name(name) => {
                self.advance();
                if !self.eat(&PathTokenKind::LeftParen) {
                    return Ok(Expr::Path(name));
                }
                let mut args = Vec::new();
                if !self.eat(&PathTokenKind::RightParen) {
                    loop {
                        args.push(self.parse_or_expr()?);
                        if self.eat(&PathTokenKind::RightParen) {
                            break;
                        }
                        self.expect(&PathTokenKind::Comma)?;
                    }
                }
                Ok(Expr::Call { name, args })
            }
            other => Err(self.error(&format!("expected predicate expression, found {other}"))),
        }
    }

    fn peek(&self) -> &PathToken {
        // The lexer always ends the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &PathTokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, offset: usize) -> &PathTokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn check(&self, kind: &PathTokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &PathTokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `and`/`or` when it appears in operator position.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek_kind() {
            PathTokenKind::Name(name) if name == keyword => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: &PathTokenKind) -> Result<(), PathSyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {kind}, found {}", self.peek_kind())))
        }
    }

    fn error(&self, message: &str) -> PathSyntaxError {
        PathSyntaxError::new(message, self.peek().position)
    }
}
