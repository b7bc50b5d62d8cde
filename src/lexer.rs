use std::fmt;

use tracing::trace;

use crate::diagnostics::{LexError, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Integer,
    Plus,
    Minus,
    Multiply,
    Divide,
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Integer => "INTEGER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Divide => "DIVIDE",
            TokenKind::EndOfInput => "EOF",
        };
        f.write_str(name)
    }
}

/// Payload carried alongside a [`TokenKind`].
///
/// Only `Integer` tokens carry a number, and that number is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue {
    Integer(i64),
    Char(char),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: SourceSpan,
}

impl Token {
    fn end_of_input(at: usize) -> Self {
        Self {
            kind: TokenKind::EndOfInput,
            value: TokenValue::None,
            span: SourceSpan::point(at),
        }
    }

    fn operator(kind: TokenKind, ch: char, start: usize) -> Self {
        Self {
            kind,
            value: TokenValue::Char(ch),
            span: SourceSpan::new(start, start + ch.len_utf8()),
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match self.value {
            TokenValue::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TokenValue::Integer(n) => write!(f, "Token({}, {n})", self.kind),
            TokenValue::Char(ch) => write!(f, "Token({}, '{ch}')", self.kind),
            TokenValue::None => write!(f, "Token({}, None)", self.kind),
        }
    }
}

/// Scans the token that starts at or after `pos`.
///
/// Returns the token together with the cursor just past it. At end of input
/// the cursor is returned unchanged, so repeated calls keep yielding
/// `EndOfInput`. A `pos` inside a multi-byte character is moved back to the
/// start of that character.
pub fn next_token(text: &str, pos: usize) -> Result<(Token, usize), LexError> {
    let rest = &text[floor_char_boundary(text, pos)..];
    let trimmed = rest.trim_start();
    let start = text.len() - trimmed.len();

    let Some(ch) = trimmed.chars().next() else {
        trace!(pos = start, "end of input");
        return Ok((Token::end_of_input(start), start));
    };

    let token = match ch {
        '0'..='9' => integer_literal(text, start)?,
        '+' => Token::operator(TokenKind::Plus, ch, start),
        '-' => Token::operator(TokenKind::Minus, ch, start),
        '*' => Token::operator(TokenKind::Multiply, ch, start),
        '/' => Token::operator(TokenKind::Divide, ch, start),
        _ => {
            return Err(LexError::UnrecognizedCharacter {
                ch,
                position: start,
            })
        }
    };
    trace!(%token, "scanned");
    let end = token.span.end;
    Ok((token, end))
}

pub(crate) fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn integer_literal(text: &str, start: usize) -> Result<Token, LexError> {
    let digits = text[start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let end = start + digits;
    let literal = &text[start..end];
    let span = SourceSpan::new(start, end);
    let value = literal
        .parse::<i64>()
        .map_err(|_| LexError::IntegerOverflow {
            literal: literal.to_string(),
            span,
        })?;
    Ok(Token {
        kind: TokenKind::Integer,
        value: TokenValue::Integer(value),
        span,
    })
}

/// Lazy token stream over one line of input.
///
/// Yields every token up to and including `EndOfInput`, then stops. A lexical
/// error is yielded once and also ends the stream.
pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: 0,
            done: false,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next_token(self.text, self.cursor) {
            Ok((token, cursor)) => {
                self.cursor = cursor;
                self.done = token.kind == TokenKind::EndOfInput;
                Some(Ok(token))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
