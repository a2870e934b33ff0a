//! In-memory storage engine.
//!
//! Thread-safe reference implementation of the [`Engine`] contract,
//! intended for embedded usage and tests. Data lives in keyed partitions;
//! reads share a lock, mutations take it exclusively, and `multi` holds it
//! for the whole callback scope.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::engine::{decode_counter, encode_counter, Engine, Tx};
use crate::error::{Error, Result};

type Partitions = HashMap<String, HashMap<String, Vec<u8>>>;

fn lock_err(context: &'static str) -> Error {
    Error::Io(format!("poisoned lock: {context}"))
}

/// In-memory engine keeping data in keyed partitions.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    parts: RwLock<Partitions>,
}

impl MemoryEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

struct MemoryTx<'a> {
    parts: &'a mut Partitions,
}

impl Tx for MemoryTx<'_> {
    fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .parts
            .get(partition)
            .and_then(|part| part.get(key).cloned()))
    }

    fn set(&mut self, partition: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.parts
            .entry(partition.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn incr(&mut self, partition: &str, key: &str) -> Result<u64> {
        let part = self.parts.entry(partition.to_string()).or_default();

        let id = part.get(key).map_or(0, |v| decode_counter(v)) + 1;
        part.insert(key.to_string(), encode_counter(id).to_vec());

        Ok(id)
    }
}

impl Engine for MemoryEngine {
    fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let parts = self.parts.read().map_err(|_| lock_err("get"))?;
        Ok(parts
            .get(partition)
            .and_then(|part| part.get(key).cloned()))
    }

    fn set(&self, partition: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let mut parts = self.parts.write().map_err(|_| lock_err("set"))?;
        MemoryTx { parts: &mut *parts }.set(partition, key, value)
    }

    fn incr(&self, partition: &str, key: &str) -> Result<u64> {
        let mut parts = self.parts.write().map_err(|_| lock_err("incr"))?;
        MemoryTx { parts: &mut *parts }.incr(partition, key)
    }

    fn multi(&self, f: &mut dyn FnMut(&mut dyn Tx) -> Result<()>) -> Result<()> {
        let mut parts = self.parts.write().map_err(|_| lock_err("multi"))?;
        f(&mut MemoryTx { parts: &mut *parts })
    }
}
