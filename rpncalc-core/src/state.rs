// Working state recovered from the previous record, and the builder that
// freezes it back into the next record.
//
// RUST CONCEPT: No session object
// Every command starts from `CalcState::recover(previous)` and ends with
// `compose(...)`. The only memory between commands is the record the host
// hands back, so undo/redo on the host side can never desynchronise us.

use crate::codec::{self, Base};
use crate::record::{Record, RecordBuilder, Snapshot};
use crate::value::Number;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalcState {
    pub stack: Vec<Number>,
    pub buffer: String,
    pub is_float: bool,
    pub base: Base,
}

impl CalcState {
    /// Resume from the previous record. Plain text, finished chains and the
    /// start of history all resume as an empty calculator in base 10.
    pub fn recover(previous: Option<&Record>) -> Self {
        previous
            .and_then(Record::live_snapshot)
            .map(Self::from_snapshot)
            .unwrap_or_default()
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            stack: snapshot.stack.clone(),
            buffer: snapshot.buffer.clone(),
            is_float: snapshot.is_float,
            base: snapshot.base,
        }
    }
}

/// How the next record relates to the previous one.
#[derive(Debug, Clone, Default)]
pub struct Compose {
    /// Base chosen by a push command; `None` inherits.
    pub base: Option<Base>,
    /// Build a finished (non-live) record.
    pub end: bool,
    /// Exact trailing text to replace, overriding the previous record's.
    pub force_delete: Option<String>,
}

/// Render `state` into a record following `previous` in the host's output.
pub fn compose(
    builder: RecordBuilder,
    previous: Option<&Record>,
    state: CalcState,
    options: Compose,
) -> Record {
    let base = if state.is_float {
        Base::Decimal
    } else {
        options.base.unwrap_or(state.base)
    };

    let text = display_text(&state.stack, &state.buffer, base);

    let builder = match options.force_delete.filter(|text| !text.is_empty()) {
        Some(force) => builder.replacing(force),
        None => match previous.filter(|record| record.is_live_calculator()) {
            Some(record) => builder.replacing(record.text.clone()),
            None => builder,
        },
    };

    builder
        .text(text)
        .calculator(Snapshot {
            stack: state.stack,
            buffer: state.buffer,
            is_float: state.is_float,
            base,
            live: !options.end,
        })
        .build()
}

/// `8` for a lone value, otherwise `[ a | b > buffer ]`.
pub fn display_text(stack: &[Number], buffer: &str, base: Base) -> String {
    let joined = stack
        .iter()
        .map(|value| codec::format(value, base))
        .collect::<Vec<_>>()
        .join(" | ");

    if stack.len() == 1 && buffer.is_empty() {
        return joined;
    }

    let suffix = match (stack.is_empty(), buffer.is_empty()) {
        (_, true) => String::new(),
        (true, false) => format!("> {buffer}"),
        (false, false) => format!(" > {buffer}"),
    };
    format!("[ {joined}{suffix} ]")
}
