//! Tokenizer for the path-expression subset understood by the translator.

use std::fmt;

/// A syntax error in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSyntaxError {
    pub message: String,
    /// Byte offset in the expression
    pub position: usize,
}

impl PathSyntaxError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for PathSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for PathSyntaxError {}

#[derive(Debug, Clone, PartialEq)]
pub enum PathTokenKind {
    Slash,
    DoubleSlash,
    Dot,
    DotDot,
    Star,
    At,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Comma,
    ColonColon,
    Pipe,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Literal(String),
    Number(f64),
    Name(String),
    Eof,
}

impl fmt::Display for PathTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathTokenKind::Slash => f.write_str("'/'"),
            PathTokenKind::DoubleSlash => f.write_str("'//'"),
            PathTokenKind::Dot => f.write_str("'.'"),
            PathTokenKind::DotDot => f.write_str("'..'"),
            PathTokenKind::Star => f.write_str("'*'"),
            PathTokenKind::At => f.write_str("'@'"),
            PathTokenKind::LeftBracket => f.write_str("'['"),
            PathTokenKind::RightBracket => f.write_str("']'"),
            PathTokenKind::LeftParen => f.write_str("'('"),
            PathTokenKind::RightParen => f.write_str("')'"),
            PathTokenKind::Comma => f.write_str("','"),
            PathTokenKind::ColonColon => f.write_str("'::'"),
            PathTokenKind::Pipe => f.write_str("'|'"),
            PathTokenKind::Equal => f.write_str("'='"),
            PathTokenKind::NotEqual => f.write_str("'!='"),
            PathTokenKind::LessThan => f.write_str("'<'"),
            PathTokenKind::LessThanEqual => f.write_str("'<='"),
            PathTokenKind::GreaterThan => f.write_str("'>'"),
            PathTokenKind::GreaterThanEqual => f.write_str("'>='"),
            PathTokenKind::Literal(s) => write!(f, "literal '{s}'"),
            PathTokenKind::Number(n) => write!(f, "number {n}"),
            PathTokenKind::Name(n) => write!(f, "name '{n}'"),
            PathTokenKind::Eof => f.write_str("end of expression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathToken {
    pub kind: PathTokenKind,
    pub position: usize,
}

/// Byte-oriented lexer. Names may contain `-` and `.` so that
/// `resource-id` and `android.widget.Button` are single tokens.
pub struct PathLexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> PathLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenizes the whole expression. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<PathToken>, PathSyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.advance_while(|b| b.is_ascii_whitespace());
            let start = self.pos;
            let Some(ch) = self.peek_byte() else {
                tokens.push(PathToken {
                    kind: PathTokenKind::Eof,
                    position: start,
                });
                return Ok(tokens);
            };
            let kind = self.next_kind(ch)?;
            tokens.push(PathToken {
                kind,
                position: start,
            });
        }
    }

    fn next_kind(&mut self, ch: u8) -> Result<PathTokenKind, PathSyntaxError> {
        let start = self.pos;
        let single = match ch {
            b'[' => Some(PathTokenKind::LeftBracket),
            b']' => Some(PathTokenKind::RightBracket),
            b'(' => Some(PathTokenKind::LeftParen),
            b')' => Some(PathTokenKind::RightParen),
            b'@' => Some(PathTokenKind::At),
            b',' => Some(PathTokenKind::Comma),
            b'|' => Some(PathTokenKind::Pipe),
            b'=' => Some(PathTokenKind::Equal),
            b'*' => Some(PathTokenKind::Star),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return Ok(kind);
        }

        match ch {
            b'/' => Ok(self.pair(b'/', PathTokenKind::DoubleSlash, PathTokenKind::Slash)),
            b'<' => Ok(self.pair(b'=', PathTokenKind::LessThanEqual, PathTokenKind::LessThan)),
            b'>' => Ok(self.pair(
                b'=',
                PathTokenKind::GreaterThanEqual,
                PathTokenKind::GreaterThan,
            )),
            b'!' => {
                self.advance();
                if self.peek_byte() == Some(b'=') {
                    self.advance();
                    Ok(PathTokenKind::NotEqual)
                } else {
                    Err(PathSyntaxError::new("expected '=' after '!'", start))
                }
            }
            b':' => {
                self.advance();
                if self.peek_byte() == Some(b':') {
                    self.advance();
                    Ok(PathTokenKind::ColonColon)
                } else {
                    Err(PathSyntaxError::new("expected ':' after ':'", start))
                }
            }
            b'.' => {
                if matches!(self.peek_byte_at(self.pos + 1), Some(b'0'..=b'9')) {
                    return self.read_number();
                }
                Ok(self.pair(b'.', PathTokenKind::DotDot, PathTokenKind::Dot))
            }
            b'\'' | b'"' => self.read_literal(ch),
            b'0'..=b'9' => self.read_number(),
            _ if is_name_start_char(ch) => {
                self.advance_while(is_name_char);
                Ok(PathTokenKind::Name(self.source[start..self.pos].to_string()))
            }
            _ => {
                let found = self.source[start..].chars().next().unwrap_or('?');
                Err(PathSyntaxError::new(
                    format!("unexpected character '{found}'"),
                    start,
                ))
            }
        }
    }

    /// Consumes one byte, then `second` if it follows.
    fn pair(&mut self, second: u8, double: PathTokenKind, single: PathTokenKind) -> PathTokenKind {
        self.advance();
        if self.peek_byte() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn read_literal(&mut self, quote: u8) -> Result<PathTokenKind, PathSyntaxError> {
        let start = self.pos;
        self.advance();
        let content_start = self.pos;
        self.advance_while(|b| b != quote);
        if self.pos >= self.input.len() {
            return Err(PathSyntaxError::new("unterminated string literal", start));
        }
        let content = self.source[content_start..self.pos].to_string();
        self.advance();
        Ok(PathTokenKind::Literal(content))
    }

    fn read_number(&mut self) -> Result<PathTokenKind, PathSyntaxError> {
        let start = self.pos;
        self.advance_while(|b| b.is_ascii_digit());
        if self.peek_byte() == Some(b'.') {
            self.advance();
            self.advance_while(|b| b.is_ascii_digit());
        }
        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(PathTokenKind::Number)
            .map_err(|_| PathSyntaxError::new(format!("invalid number literal: {text}"), start))
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_byte_at(&self, pos: usize) -> Option<u8> {
        self.input.get(pos).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek_byte().is_some_and(&pred) {
            self.pos += 1;
        }
    }
}

fn is_name_start_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.'
}
