use crate::error::ParseError;
use crate::text::TextRange;
use crate::token::{PUNCTUATORS, Token, TokenKind, is_keyword};

/// Split `source` into a flat list of tokens covering every byte, followed
/// by a zero-width `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, pos: 0, tokens: Vec::with_capacity(source.len() / 3 + 1) }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let kind = self.next_kind(c)?;
            self.tokens.push(Token::new(kind, TextRange::new(start, self.pos)));
        }
        self.tokens.push(Token::new(TokenKind::Eof, TextRange::empty(self.source.len())));
        Ok(self.tokens)
    }

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn next_kind(&mut self, c: char) -> Result<TokenKind, ParseError> {
        let kind = match c {
            '\n' => {
                self.bump();
                TokenKind::Newline
            }
            '\r' => {
                self.bump();
                if self.peek() == Some('\n') {
                    self.bump();
                }
                TokenKind::Newline
            }
            c if c.is_whitespace() || c == '\u{feff}' => {
                self.bump_while(|c| {
                    (c.is_whitespace() || c == '\u{feff}') && c != '\n' && c != '\r'
                });
                TokenKind::Whitespace
            }
            '/' if self.peek_second() == Some('/') => {
                self.bump_while(|c| c != '\n' && c != '\r');
                TokenKind::LineComment
            }
            '/' if self.peek_second() == Some('*') => {
                let start = self.pos;
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(ParseError::new("unterminated block comment", start)),
                }
                TokenKind::BlockComment
            }
            '"' | '\'' => self.string(c)?,
            c if c.is_ascii_digit() => self.number()?,
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number()?,
            c if is_identifier_start(c) => {
                let start = self.pos;
                self.bump_while(is_identifier_part);
                if is_keyword(&self.source[start..self.pos]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            _ => {
                let rest = self.rest();
                match PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
                    Some(punct) => {
                        self.pos += punct.len();
                        TokenKind::Punctuator
                    }
                    None => {
                        return Err(ParseError::new(
                            format!("unexpected character `{c}`"),
                            self.pos,
                        ));
                    }
                }
            }
        };
        Ok(kind)
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(TokenKind::String),
                Some('\\') => {
                    // Line continuations are allowed, any other escape is
                    // taken verbatim.
                    if self.peek() == Some('\r') {
                        self.bump();
                    }
                    self.bump();
                }
                Some('\n' | '\r') | None => {
                    return Err(ParseError::new("unterminated string literal", start));
                }
                Some(_) => {}
            }
        }
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            self.bump_while(|c| c.is_ascii_hexdigit());
            if self.pos == start + 2 {
                return Err(ParseError::new("expected hexadecimal digits", self.pos));
            }
        } else {
            self.bump_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                self.bump();
                self.bump_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                let digits = self.pos;
                self.bump_while(|c| c.is_ascii_digit());
                if self.pos == digits {
                    return Err(ParseError::new("expected exponent digits", self.pos));
                }
            }
        }
        if self.peek().is_some_and(is_identifier_start) {
            return Err(ParseError::new(
                "identifier starts immediately after numeric literal",
                self.pos,
            ));
        }
        Ok(TokenKind::Number)
    }
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric()
}
