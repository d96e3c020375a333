use crate::errors::LexError;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Token kinds of a builder string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    LParen,
    RParen,
    Dot,
    Comma,
    Semicolon,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::NumberLiteral => "number literal",
            TokenKind::BooleanLiteral => "boolean literal",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A token with its literal value and byte offset in the source.
///
/// For string literals `value` holds the unescaped contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier => format!("identifier '{}'", self.value),
            TokenKind::StringLiteral => format!("string literal \"{}\"", self.value),
            TokenKind::NumberLiteral | TokenKind::BooleanLiteral => {
                format!("{} {}", self.kind, self.value)
            }
            _ => self.kind.to_string(),
        }
    }
}

/// Single-pass tokenizer over a builder string.
///
/// Yields tokens until the input is exhausted, then one `Eof` token.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }

        let Some((start, ch)) = self.chars.next() else {
            return Ok(Token::new(TokenKind::Eof, "", self.input.len()));
        };

        let token = match ch {
            '(' => Token::new(TokenKind::LParen, "(", start),
            ')' => Token::new(TokenKind::RParen, ")", start),
            '.' => Token::new(TokenKind::Dot, ".", start),
            ',' => Token::new(TokenKind::Comma, ",", start),
            ';' => Token::new(TokenKind::Semicolon, ";", start),
            '"' => self.string_literal(start)?,
            c if c.is_ascii_digit() => {
                let end = self.take_while(|c| c.is_ascii_digit());
                Token::new(TokenKind::NumberLiteral, &self.input[start..end], start)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
                let word = &self.input[start..end];
                let kind = match word {
                    "true" | "false" => TokenKind::BooleanLiteral,
                    _ => TokenKind::Identifier,
                };
                Token::new(kind, word, start)
            }
            c => {
                return Err(LexError::UnexpectedChar {
                    ch: c,
                    position: start,
                })
            }
        };
        Ok(token)
    }

    /// Consumes characters matching `pred`, returning the end byte offset.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(idx, c)) = self.chars.peek() {
            if !pred(c) {
                return idx;
            }
            self.chars.next();
        }
        self.input.len()
    }

    fn string_literal(&mut self, start: usize) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(LexError::UnterminatedString { position: start }),
                Some((_, '"')) => return Ok(Token::new(TokenKind::StringLiteral, value, start)),
                Some((escape_at, '\\')) => match self.chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, other)) => {
                        return Err(LexError::BadEscape {
                            escape: other,
                            position: escape_at,
                        })
                    }
                    None => return Err(LexError::UnterminatedString { position: start }),
                },
                Some((_, c)) => value.push(c),
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(token) if token.kind == TokenKind::Eof) || result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

/// Tokenizes a whole builder string. The last token is always `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_chain() {
        assert_eq!(
            kinds(r#"new UiSelector().text("OK");"#),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::StringLiteral,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals_and_positions() {
        let tokens = tokenize(r#"index(12).clickable(false)"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::NumberLiteral);
        assert_eq!(tokens[2].value, "12");
        assert_eq!(tokens[2].position, 6);
        assert_eq!(tokens[7].kind, TokenKind::BooleanLiteral);
        assert_eq!(tokens[7].value, "false");
        assert_eq!(tokens.last().map(|t| t.position), Some(26));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""say \"hi\" C:\\tmp\n""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].value, "say \"hi\" C:\\tmp\n");
    }

    #[test]
    fn test_unterminated_string() {
        match tokenize(r#"text("OK)"#) {
            Err(LexError::UnterminatedString { position }) => assert_eq!(position, 5),
            other => panic!("Expected UnterminatedString, got: {other:?}"),
        }
        match tokenize(r#"text("OK\"#) {
            Err(LexError::UnterminatedString { position }) => assert_eq!(position, 5),
            other => panic!("Expected UnterminatedString, got: {other:?}"),
        }
    }

    #[test]
    fn test_bad_escape() {
        match tokenize(r#"text("a\qb")"#) {
            Err(LexError::BadEscape { escape, position }) => {
                assert_eq!(escape, 'q');
                assert_eq!(position, 7);
            }
            other => panic!("Expected BadEscape, got: {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_char() {
        match tokenize("text('OK')") {
            Err(LexError::UnexpectedChar { ch, position }) => {
                assert_eq!(ch, '\'');
                assert_eq!(position, 5);
            }
            other => panic!("Expected UnexpectedChar, got: {other:?}"),
        }
        match tokenize("index(-1)") {
            Err(LexError::UnexpectedChar { ch, .. }) => assert_eq!(ch, '-'),
            other => panic!("Expected UnexpectedChar, got: {other:?}"),
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut lexer = Lexer::new("a # b");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_non_ascii_inside_string() {
        let tokens = tokenize("text(\"Привет\")").unwrap();
        assert_eq!(tokens[2].value, "Привет");
        assert_eq!(tokens[3].kind, TokenKind::RParen);
    }
}
