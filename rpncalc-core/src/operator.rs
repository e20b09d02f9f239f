// Stack engine: the operator table and the commit/pop/apply/push cycle.

use tracing::warn;

use crate::buffer::{OP_ERROR, PARAM_ERROR};
#[cfg(feature = "lambda")]
use crate::lambda::Lambda;
use crate::primitives::{arithmetic, bitwise, stack};
use crate::settings::Settings;
use crate::state::CalcState;
use crate::value::{Number, OpError};

/// The fixed-arity operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    And,
    Or,
    Xor,
    Not,
    Lsl,
    Lsr,
    Swap,
    Pop,
    Dup,
    Neg,
}

impl Builtin {
    pub fn arity(self) -> usize {
        match self {
            Builtin::Not | Builtin::Pop | Builtin::Dup | Builtin::Neg => 1,
            _ => 2,
        }
    }

    /// `args` holds exactly `arity()` values, deepest first.
    pub fn apply(self, args: &[Number], settings: &Settings) -> Result<Vec<Number>, OpError> {
        let (a, b) = match args {
            [a] => (a, a),
            [a, b] => (a, b),
            _ => {
                return Err(OpError::Arity {
                    needed: self.arity(),
                    available: args.len(),
                });
            }
        };

        let single = |result: Result<Number, OpError>| result.map(|n| vec![n]);
        match self {
            Builtin::Add => single(arithmetic::add(a, b)),
            Builtin::Sub => single(arithmetic::sub(a, b)),
            Builtin::Mul => single(arithmetic::mul(a, b)),
            Builtin::Div => single(arithmetic::div(a, b)),
            Builtin::IntDiv => single(arithmetic::int_div(a, b)),
            Builtin::Mod => single(arithmetic::modulo(a, b)),
            Builtin::Pow => single(arithmetic::pow(a, b, settings.max_int_bits)),
            Builtin::And => single(bitwise::and(a, b)),
            Builtin::Or => single(bitwise::or(a, b)),
            Builtin::Xor => single(bitwise::xor(a, b)),
            Builtin::Not => single(bitwise::not(a)),
            Builtin::Lsl => single(bitwise::shift_left(a, b, settings.max_int_bits)),
            Builtin::Lsr => single(bitwise::shift_right(a, b)),
            Builtin::Swap => Ok(stack::swap(a, b)),
            Builtin::Pop => Ok(stack::pop(a)),
            Builtin::Dup => Ok(stack::dup(a)),
            Builtin::Neg => Ok(vec![arithmetic::neg(a)]),
        }
    }
}

// RUST CONCEPT: One interface for fixed and user-defined operators
// The arity is a property of the value, never discovered by reflection.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Builtin(Builtin),
    #[cfg(feature = "lambda")]
    Function(Lambda),
}

impl Operator {
    pub fn arity(&self) -> usize {
        match self {
            Operator::Builtin(builtin) => builtin.arity(),
            #[cfg(feature = "lambda")]
            Operator::Function(lambda) => lambda.arity(),
        }
    }

    pub fn apply(&self, args: &[Number], settings: &Settings) -> Result<Vec<Number>, OpError> {
        match self {
            Operator::Builtin(builtin) => builtin.apply(args, settings),
            #[cfg(feature = "lambda")]
            Operator::Function(lambda) => lambda.call(args, settings),
        }
    }
}

impl From<Builtin> for Operator {
    fn from(builtin: Builtin) -> Self {
        Operator::Builtin(builtin)
    }
}

pub struct OperatorInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub builtin: Builtin,
    pub doc: &'static str,
}

pub static OPERATORS: &[OperatorInfo] = &[
    OperatorInfo {
        name: "add",
        aliases: &["+"],
        builtin: Builtin::Add,
        doc: "Add two numbers.\nUsage: a b add => a+b\nExample: 5 3 add => 8",
    },
    OperatorInfo {
        name: "sub",
        aliases: &["-"],
        builtin: Builtin::Sub,
        doc: "Subtract the top from the second.\nUsage: a b sub => a-b\nExample: 10 3 sub => 7",
    },
    OperatorInfo {
        name: "mul",
        aliases: &["*"],
        builtin: Builtin::Mul,
        doc: "Multiply two numbers.\nUsage: a b mul => a*b\nExample: 6 7 mul => 42",
    },
    OperatorInfo {
        name: "div",
        aliases: &["/"],
        builtin: Builtin::Div,
        doc: "True division, always a float.\nUsage: a b div => a/b\nExample: 7 2 div => 3.5",
    },
    OperatorInfo {
        name: "intdiv",
        aliases: &["//"],
        builtin: Builtin::IntDiv,
        doc: "Floor division.\nUsage: a b intdiv => floor(a/b)\nExample: -7 2 intdiv => -4",
    },
    OperatorInfo {
        name: "mod",
        aliases: &["%"],
        builtin: Builtin::Mod,
        doc: "Floor modulo, sign follows the divisor.\nUsage: a b mod => a%b\nExample: -7 2 mod => 1",
    },
    OperatorInfo {
        name: "pow",
        aliases: &["**"],
        builtin: Builtin::Pow,
        doc: "Raise to a power.\nUsage: a b pow => a**b\nExample: 2 10 pow => 1024",
    },
    OperatorInfo {
        name: "and",
        aliases: &["&"],
        builtin: Builtin::And,
        doc: "Bitwise AND.\nUsage: a b and => a&b\nExample: 12 10 and => 8",
    },
    OperatorInfo {
        name: "or",
        aliases: &["|"],
        builtin: Builtin::Or,
        doc: "Bitwise OR.\nUsage: a b or => a|b\nExample: 12 10 or => 14",
    },
    OperatorInfo {
        name: "xor",
        aliases: &["^"],
        builtin: Builtin::Xor,
        doc: "Bitwise XOR.\nUsage: a b xor => a^b\nExample: 12 10 xor => 6",
    },
    OperatorInfo {
        name: "not",
        aliases: &["~"],
        builtin: Builtin::Not,
        doc: "Bitwise NOT.\nUsage: a not => ~a\nExample: 5 not => -6",
    },
    OperatorInfo {
        name: "lsl",
        aliases: &["<<"],
        builtin: Builtin::Lsl,
        doc: "Shift left.\nUsage: a n lsl => a<<n\nExample: 1 4 lsl => 16",
    },
    OperatorInfo {
        name: "lsr",
        aliases: &[">>"],
        builtin: Builtin::Lsr,
        doc: "Arithmetic shift right.\nUsage: a n lsr => a>>n\nExample: 16 2 lsr => 4",
    },
    OperatorInfo {
        name: "swap",
        aliases: &[],
        builtin: Builtin::Swap,
        doc: "Exchange the top two values.\nUsage: a b swap => b a",
    },
    OperatorInfo {
        name: "pop",
        aliases: &[],
        builtin: Builtin::Pop,
        doc: "Discard the top value.\nUsage: a pop =>",
    },
    OperatorInfo {
        name: "dup",
        aliases: &[],
        builtin: Builtin::Dup,
        doc: "Duplicate the top value.\nUsage: a dup => a a",
    },
    OperatorInfo {
        name: "neg",
        aliases: &[],
        builtin: Builtin::Neg,
        doc: "Negate the top value.\nUsage: a neg => -a\nExample: 5 neg => -5",
    },
];

pub fn lookup(name: &str) -> Option<&'static OperatorInfo> {
    OPERATORS
        .iter()
        .find(|info| info.name == name || info.aliases.iter().any(|alias| *alias == name))
}

/// Pop `arity` values, apply, push the results. Too few values leaves
/// `param error` in the buffer; a failing operator leaves `op error` and the
/// stack exactly as it was.
pub fn run(state: &mut CalcState, operator: &Operator, settings: &Settings) {
    let arity = operator.arity();
    if state.stack.len() < arity {
        warn!(arity, depth = state.stack.len(), "not enough values on the stack");
        state.buffer = PARAM_ERROR.to_string();
        return;
    }

    let split = state.stack.len() - arity;
    match operator.apply(&state.stack[split..], settings) {
        Ok(results) => {
            let tainted = state.stack[split..].iter().any(Number::is_float)
                || results.iter().any(Number::is_float);
            state.stack.truncate(split);
            state.stack.extend(results);
            state.is_float |= tainted;
        }
        Err(error) => {
            warn!(%error, "operator failed");
            state.buffer = OP_ERROR.to_string();
        }
    }
}
