//! The command surface: every entry point takes the host context and the
//! command argument and returns the record to emit.

use core::fmt;
use core::str::FromStr;

use tracing::{debug, warn};

use crate::buffer::{self, OP_ERROR};
use crate::codec::Base;
use crate::history::{self, Context};
#[cfg(feature = "lambda")]
use crate::lambda::Lambda;
use crate::operator::{self, Builtin, Operator};
use crate::record::Record;
use crate::state::{CalcState, Compose, compose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Put,
    DeleteLast,
    ClearBuffer,
    Extend,
    ClearStack,
    ClearAll,
    End,
    Push(Base),
    Operator(Builtin),
    ApplyFunction,
}

/// Names of the commands that are not operators, with their help text.
pub static COMMANDS: &[(&str, &str)] = &[
    ("put", "Append the argument to the buffer.\nUsage: put <text>"),
    ("delete-last", "Remove the last buffer character.\nUsage: delete-last"),
    ("clear-buffer", "Empty the buffer.\nUsage: clear-buffer"),
    (
        "extend",
        "Pull recently typed plain text into the buffer.\nUsage: extend",
    ),
    ("clear-stack", "Empty the stack, keeping the buffer.\nUsage: clear-stack"),
    ("clear-all", "Erase the calculator display.\nUsage: clear-all"),
    ("end", "Finish the chain, leaving the display as text.\nUsage: end"),
    (
        "push",
        "Append the argument and push the buffer in decimal.\nUsage: push [digits]\nExample: push 42",
    ),
    (
        "push-binary",
        "Append the argument and push the buffer in binary.\nUsage: push-binary [digits]\nExample: push-binary 101",
    ),
    (
        "push-hex",
        "Append the argument and push the buffer in hex.\nUsage: push-hex [digits]\nExample: push-hex ff",
    ),
    (
        "apply-function",
        "Apply a function to the top values.\nUsage: apply-function <params>: <body>\nExample: apply-function x, y: x * y + 1",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "put" => Command::Put,
            "delete-last" => Command::DeleteLast,
            "clear-buffer" => Command::ClearBuffer,
            "extend" => Command::Extend,
            "clear-stack" => Command::ClearStack,
            "clear-all" => Command::ClearAll,
            "end" => Command::End,
            "push" => Command::Push(Base::Decimal),
            "push-binary" | "push_bin" => Command::Push(Base::Binary),
            "push-hex" | "push_hex" => Command::Push(Base::Hex),
            "apply-function" => Command::ApplyFunction,
            other => return operator::lookup(other).map(|info| Command::Operator(info.builtin)),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Put => "put",
            Command::DeleteLast => "delete-last",
            Command::ClearBuffer => "clear-buffer",
            Command::Extend => "extend",
            Command::ClearStack => "clear-stack",
            Command::ClearAll => "clear-all",
            Command::End => "end",
            Command::Push(Base::Decimal) => "push",
            Command::Push(Base::Binary) => "push-binary",
            Command::Push(Base::Hex) => "push-hex",
            Command::Operator(builtin) => operator::OPERATORS
                .iter()
                .find(|info| info.builtin == builtin)
                .map_or("?", |info| info.name),
            Command::ApplyFunction => "apply-function",
        }
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_name(s).ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn dispatch(ctx: &impl Context, command: Command, arg: &str) -> Record {
    debug!(%command, arg, previous = ?ctx.last_record().map(|r| &r.text), "dispatch");
    match command {
        Command::Put => put(ctx, arg),
        Command::DeleteLast => delete_last(ctx, arg),
        Command::ClearBuffer => clear_buffer(ctx, arg),
        Command::Extend => extend(ctx, arg),
        Command::ClearStack => clear_stack(ctx, arg),
        Command::ClearAll => clear_all(ctx, arg),
        Command::End => end(ctx, arg),
        Command::Push(base) => push_in(ctx, arg, base),
        Command::Operator(builtin) => apply_operator(ctx, &Operator::Builtin(builtin)),
        Command::ApplyFunction => apply_function(ctx, arg),
    }
}

// Buffer edits: ( -- ) with the stack carried over untouched

fn edit_buffer(ctx: &impl Context, edit: impl FnOnce(&str) -> String) -> Record {
    let previous = ctx.last_record();
    let mut state = CalcState::recover(previous);
    state.buffer = edit(&state.buffer);
    compose(ctx.new_record(), previous, state, Compose::default())
}

pub fn put(ctx: &impl Context, text: &str) -> Record {
    edit_buffer(ctx, |buffer| buffer::append(buffer, text))
}

pub fn delete_last(ctx: &impl Context, _arg: &str) -> Record {
    edit_buffer(ctx, buffer::delete_last)
}

pub fn clear_buffer(ctx: &impl Context, _arg: &str) -> Record {
    edit_buffer(ctx, buffer::clear)
}

pub fn extend(ctx: &impl Context, _arg: &str) -> Record {
    history::extend(ctx)
}

// Reset and terminal commands

pub fn clear_stack(ctx: &impl Context, _arg: &str) -> Record {
    let previous = ctx.last_record();
    let mut state = CalcState::recover(previous);
    state.stack.clear();
    state.buffer = state.buffer.trim().to_string();
    compose(ctx.new_record(), previous, state, Compose::default())
}

pub fn clear_all(ctx: &impl Context, _arg: &str) -> Record {
    let builder = ctx.new_record().text("");
    match ctx.last_record() {
        Some(previous) => builder.replacing(previous.text.clone()).build(),
        None => builder.build(),
    }
}

pub fn end(ctx: &impl Context, _arg: &str) -> Record {
    let previous = ctx.last_record();
    let mut state = CalcState::recover(previous);
    state.buffer = state.buffer.trim().to_string();
    compose(
        ctx.new_record(),
        previous,
        state,
        Compose {
            end: true,
            ..Compose::default()
        },
    )
}

// Pushes: append the argument, commit in the given base, make it sticky

fn push_in(ctx: &impl Context, arg: &str, base: Base) -> Record {
    let previous = ctx.last_record();
    let mut state = CalcState::recover(previous);
    state.buffer = format!("{}{}", state.buffer, arg).trim().to_string();
    buffer::commit(&mut state, base);
    compose(
        ctx.new_record(),
        previous,
        state,
        Compose {
            base: Some(base),
            ..Compose::default()
        },
    )
}

pub fn push(ctx: &impl Context, arg: &str) -> Record {
    push_in(ctx, arg, Base::Decimal)
}

pub fn push_binary(ctx: &impl Context, arg: &str) -> Record {
    push_in(ctx, arg, Base::Binary)
}

pub fn push_hex(ctx: &impl Context, arg: &str) -> Record {
    push_in(ctx, arg, Base::Hex)
}

// Operators: commit the pending buffer, then run

pub fn apply_operator(ctx: &impl Context, operator: &Operator) -> Record {
    let previous = ctx.last_record();
    let mut state = CalcState::recover(previous);
    state.buffer = state.buffer.trim().to_string();
    let base = state.base;
    buffer::commit(&mut state, base);
    operator::run(&mut state, operator, &ctx.settings());
    compose(ctx.new_record(), previous, state, Compose::default())
}

pub fn apply_function(ctx: &impl Context, definition: &str) -> Record {
    match function_operator(definition) {
        Ok(operator) => apply_operator(ctx, &operator),
        Err(error) => {
            warn!(definition, %error, "cannot build function");
            let previous = ctx.last_record();
            let mut state = CalcState::recover(previous);
            state.buffer = state.buffer.trim().to_string();
            let base = state.base;
            buffer::commit(&mut state, base);
            state.buffer = OP_ERROR.to_string();
            compose(ctx.new_record(), previous, state, Compose::default())
        }
    }
}

#[cfg(feature = "lambda")]
fn function_operator(definition: &str) -> Result<Operator, crate::value::OpError> {
    Ok(Operator::Function(Lambda::parse(definition)?))
}

#[cfg(not(feature = "lambda"))]
fn function_operator(_definition: &str) -> Result<Operator, crate::value::OpError> {
    Err(crate::value::OpError::Unsupported)
}

macro_rules! operator_commands {
    ($($name:ident => $builtin:ident),* $(,)?) => {
        $(
            pub fn $name(ctx: &impl Context, _arg: &str) -> Record {
                apply_operator(ctx, &Operator::Builtin(Builtin::$builtin))
            }
        )*
    };
}

operator_commands! {
    add => Add,
    sub => Sub,
    mul => Mul,
    div => Div,
    intdiv => IntDiv,
    modulo => Mod,
    pow => Pow,
    and => And,
    or => Or,
    xor => Xor,
    not => Not,
    lsl => Lsl,
    lsr => Lsr,
    swap => Swap,
    pop => Pop,
    dup => Dup,
    neg => Neg,
}
