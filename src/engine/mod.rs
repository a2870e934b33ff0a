//! The storage engine contract.
//!
//! An engine is a partitioned key/value store with three primitives (`get`,
//! `set`, `incr`) and a scoped exclusive-access combinator (`multi`). The
//! fact log core only ever reads through this contract; the commit path is
//! an external collaborator.
//!
//! Mutating operations must serialise across the process; reads may overlap
//! with reads. `multi` hands the callee a transaction handle with the same
//! three primitives and guarantees the exclusive scope is released on every
//! exit path.

mod memory;

pub use memory::MemoryEngine;

use crate::error::Result;

/// Transaction handle exposed to [`Engine::multi`] callees.
///
/// The handle operates under the exclusive access already acquired by
/// `multi`, so implementations do not take locks of their own.
pub trait Tx {
    /// Fetches the value stored under `(partition, key)`, if present.
    fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `(partition, key)`, overwriting any previous
    /// value.
    fn set(&mut self, partition: &str, key: &str, value: Vec<u8>) -> Result<()>;

    /// Increments and returns the counter at `(partition, key)`.
    /// Counters start at 1 and are strictly monotonic per key.
    fn incr(&mut self, partition: &str, key: &str) -> Result<u64>;
}

/// A partitioned key/value store with atomic multi-operation scope.
///
/// The engine is the only shared mutable resource in the system; every
/// other structure is write-once or iterator-local.
pub trait Engine: Send + Sync {
    /// Fetches the value stored under `(partition, key)`, if present.
    fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `(partition, key)`.
    fn set(&self, partition: &str, key: &str, value: Vec<u8>) -> Result<()>;

    /// Increments and returns the counter at `(partition, key)`.
    fn incr(&self, partition: &str, key: &str) -> Result<u64>;

    /// Runs `f` with exclusive access to the store.
    ///
    /// The exclusive scope is released when `f` returns, whether it
    /// succeeds or fails.
    fn multi(&self, f: &mut dyn FnMut(&mut dyn Tx) -> Result<()>) -> Result<()>;
}

/// Encodes a counter value in the fixed big-endian form.
#[must_use]
pub fn encode_counter(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decodes a counter value from its big-endian form.
///
/// Short or oversized payloads decode as zero, matching an absent counter.
#[must_use]
pub fn decode_counter(bytes: &[u8]) -> u64 {
    match <[u8; 8]>::try_from(bytes) {
        Ok(raw) => u64::from_be_bytes(raw),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check: the engine contract stays object-safe.
    fn _assert_engine_object_safe(_: &dyn Engine) {}
    fn _assert_tx_object_safe(_: &dyn Tx) {}

    #[test]
    fn test_counter_codec_roundtrip() {
        for value in [0u64, 1, 255, 256, u64::MAX] {
            assert_eq!(decode_counter(&encode_counter(value)), value);
        }
    }

    #[test]
    fn test_counter_codec_is_big_endian() {
        assert_eq!(encode_counter(1), [0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_decode_counter_tolerates_bad_width() {
        assert_eq!(decode_counter(&[]), 0);
        assert_eq!(decode_counter(&[1, 2, 3]), 0);
    }
}
