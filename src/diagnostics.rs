use std::fmt;

use thiserror::Error;

use crate::{
    lexer::{floor_char_boundary, TokenKind},
    parser::Operator,
};

/// Represents a byte span within a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// Classification of a diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexer,
    Parser,
    Runtime,
}

/// A calculation failure as shown at the prompt: which stage rejected the
/// line, why, and the byte span of the input it points at.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Renders the diagnostic against the line it was produced from, marking
    /// the offending span with carets.
    ///
    /// ```text
    /// Lexer: unrecognized character `%`
    ///   | 5 % 2
    ///   |   ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{:?}: {}", self.kind, self.message);
        if let Some(span) = self.span {
            let start = floor_char_boundary(source, span.start);
            let end = floor_char_boundary(source, span.end.max(span.start));
            let pad = source[..start].chars().count();
            let width = source[start..end].chars().count().max(1);
            out.push_str(&format!("\n  | {source}\n  | {}{}", " ".repeat(pad), "^".repeat(width)));
        }
        for note in &self.notes {
            out.push_str(&format!("\n  note: {note}"));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}..{})", span.start, span.end)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Failures raised while turning text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized character `{ch}` at position {position}")]
    UnrecognizedCharacter { ch: char, position: usize },
    #[error("integer literal `{literal}` does not fit in a 64-bit integer")]
    IntegerOverflow { literal: String, span: SourceSpan },
}

/// The token stream did not match `INTEGER OPERATOR INTEGER`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected an integer, found {found}")]
    ExpectedInteger { found: TokenKind, span: SourceSpan },
    #[error("expected one of `+ - * /`, found {found}")]
    ExpectedOperator { found: TokenKind, span: SourceSpan },
}

/// Every way a single `evaluate` call can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("division by zero")]
    DivisionByZero { span: SourceSpan },
    #[error("`{left} {op} {right}` overflows a 64-bit integer")]
    Overflow {
        op: Operator,
        left: i64,
        right: i64,
    },
}

impl EvalError {
    /// Converts the error into a user-facing diagnostic carrying the span of
    /// the offending input.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            EvalError::Lex(LexError::UnrecognizedCharacter { ch, position }) => Diagnostic::new(
                DiagnosticKind::Lexer,
                format!("unrecognized character `{ch}`"),
            )
            .with_span(SourceSpan::new(*position, position + ch.len_utf8())),
            EvalError::Lex(err @ LexError::IntegerOverflow { span, .. }) => {
                Diagnostic::new(DiagnosticKind::Lexer, err.to_string())
                    .with_span(*span)
                    .with_note(format!("the largest accepted literal is {}", i64::MAX))
            }
            EvalError::Parse(err) => {
                let span = match err {
                    ParseError::ExpectedInteger { span, .. }
                    | ParseError::ExpectedOperator { span, .. } => *span,
                };
                Diagnostic::new(DiagnosticKind::Parser, err.to_string())
                    .with_span(span)
                    .with_note("input must have the form `INTEGER OPERATOR INTEGER`")
            }
            EvalError::DivisionByZero { span } => {
                Diagnostic::new(DiagnosticKind::Runtime, self.to_string()).with_span(*span)
            }
            EvalError::Overflow { .. } => Diagnostic::new(DiagnosticKind::Runtime, self.to_string()),
        }
    }
}

/// Unified error type for the calcline toolchain.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_offending_character() {
        let diag = EvalError::Lex(LexError::UnrecognizedCharacter {
            ch: '%',
            position: 2,
        })
        .diagnostic();
        let rendered = diag.render("5 % 2");
        assert_eq!(
            rendered,
            "Lexer: unrecognized character `%`\n  | 5 % 2\n  |   ^"
        );
    }

    #[test]
    fn render_marks_end_of_input() {
        let diag = Diagnostic::new(DiagnosticKind::Parser, "expected an integer, found EOF")
            .with_span(SourceSpan::point(4));
        let rendered = diag.render("5 + ");
        assert!(rendered.ends_with("  | 5 + \n  |     ^"), "{rendered}");
    }

    #[test]
    fn render_tolerates_spans_past_the_end() {
        let diag = Diagnostic::new(DiagnosticKind::Runtime, "boom").with_span(SourceSpan::new(10, 12));
        assert!(diag.render("1/0").contains("  |    ^"));
    }

    #[test]
    fn display_includes_span_and_notes() {
        let diag = Diagnostic::new(DiagnosticKind::Runtime, "division by zero")
            .with_span(SourceSpan::new(4, 5))
            .with_note("divisor is zero");
        assert_eq!(
            diag.to_string(),
            "Runtime: division by zero (4..5)\n  note: divisor is zero"
        );
    }
}
