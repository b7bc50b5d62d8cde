use std::fmt;

/// Result of evaluating one expression.
///
/// `+`, `-` and `*` stay in the integers; `/` always produces a quotient in
/// floating point, even when it happens to be whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn type_name(self) -> &'static str {
        match self {
            Number::Int(_) => "Int",
            Number::Float(_) => "Float",
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // Debug keeps the trailing `.0` on whole quotients.
            Number::Float(n) => write!(f, "{n:?}"),
        }
    }
}
