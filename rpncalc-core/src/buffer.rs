// Buffer engine: edits to the pending token and committing it to the stack.

use tracing::warn;

use crate::codec::{self, Base};
use crate::state::CalcState;

pub const PARSE_ERROR: &str = "parse error";
pub const OP_ERROR: &str = "op error";
pub const PARAM_ERROR: &str = "param error";

// An error message sitting in the buffer is ordinary text: typing appends
// to it and committing fails again, until it is deleted or cleared.
pub fn append(buffer: &str, text: &str) -> String {
    format!("{}{}", buffer, text).trim().to_string()
}

pub fn delete_last(buffer: &str) -> String {
    let mut chars = buffer.chars();
    chars.next_back();
    chars.as_str().trim().to_string()
}

pub fn clear(_buffer: &str) -> String {
    String::new()
}

/// Parse the pending buffer in `base` and push it. On failure the buffer
/// becomes `parse error` and the stack is left alone.
pub fn commit(state: &mut CalcState, base: Base) {
    match codec::parse(&state.buffer, base) {
        Ok(Some(value)) => {
            state.is_float |= value.is_float();
            state.stack.push(value);
            state.buffer.clear();
        }
        Ok(None) => state.buffer.clear(),
        Err(error) => {
            warn!(buffer = %state.buffer, base = base.radix(), %error, "buffer does not parse");
            state.buffer = PARSE_ERROR.to_string();
        }
    }
}
