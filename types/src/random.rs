//! Randomness abstraction used when the ledger has to pick among accounts.

use crate::error::TypesError;

/// A source of uniformly distributed `u64` values.
pub trait RandomSource: Send + Sync {
    fn next_u64(&self) -> Result<u64, TypesError>;

    /// Pick an index in `0..len`, or `None` for an empty range.
    fn pick(&self, len: usize) -> Result<Option<usize>, TypesError> {
        if len == 0 {
            return Ok(None);
        }
        Ok(Some((self.next_u64()? % len as u64) as usize))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for std::sync::Arc<R> {
    fn next_u64(&self) -> Result<u64, TypesError> {
        (**self).next_u64()
    }
}

/// Operating-system entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_u64(&self) -> Result<u64, TypesError> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf).map_err(|e| TypesError::Entropy(e.to_string()))?;
        Ok(u64::from_le_bytes(buf))
    }
}
