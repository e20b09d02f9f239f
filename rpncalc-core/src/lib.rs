//! # rpncalc core
//!
//! An incremental RPN calculator driven one keystroke-sized command at a
//! time from inside a text-producing host.
//!
//! The evaluator never holds a session. Each command recovers its stack,
//! buffer and sticky flags from the record it emitted last, applies one
//! change, and returns a new immutable [`Record`] whose display replaces the
//! previous one in the host's text. Host-side undo just hands back an older
//! record.
//!
//! ## Features
//!
//! - **Exact integers**: arbitrary precision, displayed in base 2, 10 or 16
//! - **Sticky float mode**: once a float appears the chain shows base 10
//! - **Errors as text**: `parse error`, `param error` and `op error` take the
//!   place of the buffer instead of failing the command
//! - **`apply-function`**: a sandboxed expression language (feature `lambda`)
//!
//! ## Example
//!
//! ```
//! use rpncalc_core::{Transcript, commands};
//!
//! let mut transcript = Transcript::new();
//! for (command, arg) in [("push", "5"), ("push", "3"), ("add", "")] {
//!     let command = command.parse().unwrap();
//!     let record = commands::dispatch(&transcript, command, arg);
//!     transcript.apply(record);
//! }
//! assert_eq!(transcript.rendered(), "8");
//! ```

pub mod buffer;
pub mod codec;
pub mod commands;
pub mod history;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod operator;
pub mod primitives;
pub mod record;
pub mod settings;
pub mod state;
pub mod transcript;
pub mod value;

// Re-exports for convenience
pub use codec::Base;
pub use commands::{Command, UnknownCommand, dispatch};
pub use history::{Context, OutputUnit};
pub use operator::{Builtin, Operator};
pub use record::{Record, RecordBuilder, RecordKind, Snapshot};
pub use settings::Settings;
pub use state::CalcState;
pub use transcript::Transcript;
pub use value::{LambdaError, Number, OpError, ParseError};
