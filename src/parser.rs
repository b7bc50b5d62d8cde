use std::fmt;

use tracing::debug;

use crate::{
    diagnostics::{EvalError, ParseError, SourceSpan},
    lexer::{next_token, TokenKind},
    value::Number,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Operator::Add),
            TokenKind::Minus => Some(Operator::Sub),
            TokenKind::Multiply => Some(Operator::Mul),
            TokenKind::Divide => Some(Operator::Div),
            TokenKind::Integer | TokenKind::EndOfInput => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An operand together with where it appeared in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub value: i64,
    pub span: SourceSpan,
}

/// The single production `INTEGER OPERATOR INTEGER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryExpr {
    pub left: Operand,
    pub op: Operator,
    pub right: Operand,
}

impl BinaryExpr {
    pub fn evaluate(&self) -> Result<Number, EvalError> {
        let (left, right) = (self.left.value, self.right.value);
        let checked = match self.op {
            Operator::Add => left.checked_add(right),
            Operator::Sub => left.checked_sub(right),
            Operator::Mul => left.checked_mul(right),
            Operator::Div => {
                if right == 0 {
                    return Err(EvalError::DivisionByZero {
                        span: self.right.span,
                    });
                }
                return Ok(Number::Float(quotient(left, right)));
            }
        };
        checked.map(Number::Int).ok_or(EvalError::Overflow {
            op: self.op,
            left,
            right,
        })
    }
}

/// `left / right` rounded once to the nearest `f64`.
///
/// Casting each operand to `f64` first loses low bits above 2^53, so the
/// division is done in integers: the numerator is shifted until the integer
/// quotient carries well over 53 significant bits, a nonzero remainder is
/// folded into the lowest bit, and the single `u128 -> f64` conversion does
/// the rounding. Scaling back by a power of two is exact.
fn quotient(left: i64, right: i64) -> f64 {
    let (num, den) = (left.unsigned_abs() as u128, right.unsigned_abs() as u128);
    if num == 0 {
        return 0.0;
    }
    let shift = num.leading_zeros() - 1;
    let scaled = num << shift;
    let mut q = scaled / den;
    if scaled % den != 0 {
        q |= 1;
    }
    let magnitude = q as f64 / 2f64.powi(shift as i32);
    if (left < 0) != (right < 0) {
        -magnitude
    } else {
        magnitude
    }
}

/// Parses one line into a [`BinaryExpr`].
///
/// Exactly three tokens are read; whatever follows the right operand is never
/// scanned, so trailing text is ignored.
pub fn parse(text: &str) -> Result<BinaryExpr, EvalError> {
    let (left, pos) = expect_integer(text, 0)?;
    let (op_token, pos) = next_token(text, pos)?;
    let op = Operator::from_kind(op_token.kind).ok_or(ParseError::ExpectedOperator {
        found: op_token.kind,
        span: op_token.span,
    })?;
    let (right, _) = expect_integer(text, pos)?;
    Ok(BinaryExpr { left, op, right })
}

fn expect_integer(text: &str, pos: usize) -> Result<(Operand, usize), EvalError> {
    let (token, pos) = next_token(text, pos)?;
    let value = token.integer().ok_or(ParseError::ExpectedInteger {
        found: token.kind,
        span: token.span,
    })?;
    Ok((
        Operand {
            value,
            span: token.span,
        },
        pos,
    ))
}

/// Scans, parses and evaluates one line of input.
pub fn evaluate(text: &str) -> Result<Number, EvalError> {
    let expr = parse(text)?;
    let result = expr.evaluate();
    debug!(
        left = expr.left.value,
        op = %expr.op,
        right = expr.right.value,
        ?result,
        "evaluated"
    );
    result
}
