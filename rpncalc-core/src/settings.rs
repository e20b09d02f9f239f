//! Tunables shared by every command.

/// Characters of plain history the `extend` scan may walk past before it
/// gives up looking for a live calculator record.
pub const DEFAULT_EXTEND_LIMIT: usize = 50;

/// Largest integer result, in bits, that `pow` and `lsl` will build.
pub const DEFAULT_MAX_INT_BITS: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub extend_limit: usize,
    pub max_int_bits: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extend_limit: DEFAULT_EXTEND_LIMIT,
            max_int_bits: DEFAULT_MAX_INT_BITS,
        }
    }
}

impl Settings {
    pub fn with_extend_limit(mut self, limit: usize) -> Self {
        self.extend_limit = limit;
        self
    }

    pub fn with_max_int_bits(mut self, bits: u64) -> Self {
        self.max_int_bits = bits;
        self
    }
}
