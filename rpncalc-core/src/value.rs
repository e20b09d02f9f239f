use core::fmt;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use thiserror::Error;

use crate::codec::{self, Base};

// RUST CONCEPT: Two numeric representations share one stack
// Int: arbitrary precision integer (never overflows on add/sub/mul)
// Float: IEEE double, contagious once it appears in an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(i) => i.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Int(_) => "int",
            Number::Float(_) => "float",
        }
    }

    /// Widens to a float. Integers too large for a finite double are rejected.
    pub fn to_f64(&self) -> Result<f64, OpError> {
        match self {
            Number::Float(f) => Ok(*f),
            Number::Int(i) => i
                .to_f64()
                .filter(|f| f.is_finite())
                .ok_or_else(|| OpError::Overflow("integer too large to convert to float".into())),
        }
    }

    /// Integer view used by the bitwise operators: floats truncate toward zero.
    pub fn to_int(&self) -> Result<BigInt, OpError> {
        match self {
            Number::Int(i) => Ok(i.clone()),
            Number::Float(f) if f.is_nan() => {
                Err(OpError::Domain("cannot convert float NaN to integer".into()))
            }
            Number::Float(f) => BigInt::from_f64(f.trunc()).ok_or_else(|| {
                OpError::Overflow("cannot convert float infinity to integer".into())
            }),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::format(self, Base::Decimal))
    }
}

/// Failure to read a buffer as a number in the active base.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no digits in {0:?}")]
    NoDigits(String),
    #[error("invalid digit {digit:?} for base {base}")]
    InvalidDigit { digit: char, base: u32 },
    #[error("misplaced digit separator in {0:?}")]
    Separator(String),
    #[error("invalid float literal {0:?}")]
    InvalidFloat(String),
}

/// Failure of a function body to tokenize or parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LambdaError {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid literal {0:?}")]
    InvalidLiteral(String),
    #[error("expected {expected}, found {found}")]
    Expected { expected: &'static str, found: String },
    #[error("missing ':' between parameters and body")]
    MissingColon,
    #[error("duplicate parameter {0:?}")]
    DuplicateParam(String),
    #[error("unknown name {0:?}")]
    UnknownName(String),
    #[error("{name} takes {expected} arguments, got {got}")]
    CallArity { name: String, expected: &'static str, got: usize },
    #[error("expression nested too deeply")]
    TooDeep,
}

/// Failure of an operator. `Arity` is reported as `param error`, everything
/// else as `op error`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    #[error("needs {needed} values, stack has {available}")]
    Arity { needed: usize, available: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("domain error: {0}")]
    Domain(String),
    #[error("overflow: {0}")]
    Overflow(String),
    #[error("invalid function: {0}")]
    Lambda(#[from] LambdaError),
    #[error("function support is disabled")]
    Unsupported,
}
