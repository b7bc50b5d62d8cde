//! Core library for calcline, a line-oriented calculator that evaluates one
//! `INTEGER OPERATOR INTEGER` expression per line. Implements scanning,
//! parsing, evaluation, and the line host used by the `calcline` binary.

pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod value;

pub use diagnostics::{
    CalcError, Diagnostic, DiagnosticKind, EvalError, LexError, ParseError, SourceSpan,
};
pub use lexer::{next_token, Scanner, Token, TokenKind, TokenValue};
pub use parser::{evaluate, parse, BinaryExpr, Operator};
pub use repl::{Repl, ReplConfig};
pub use value::Number;
