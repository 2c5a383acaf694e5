//! Nullable random: deterministic random number generation.

use duck_types::{RandomSource, TypesError};
use std::sync::Mutex;

/// A deterministic random source for testing.
///
/// Returns pre-configured values in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<u64>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic values.
    pub fn new(outputs: Vec<u64>) -> Self {
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for NullRandom {
    fn next_u64(&self) -> Result<u64, TypesError> {
        if self.outputs.is_empty() {
            return Ok(0);
        }
        let mut idx = self.index.lock().unwrap();
        let value = self.outputs[*idx % self.outputs.len()];
        *idx += 1;
        Ok(value)
    }
}
