//! Reading a persisted log.
//!
//! A log is located by `(domain, name)`: the head record points at the most
//! recent segment, each segment header describes its fact blocks, and
//! `next` chains segments until it reaches zero. [`LogIter`] walks that
//! layout lazily, loading one segment header or block per storage lookup.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::fact::{Fact, Facts};
use crate::stream::FactStream;
use crate::view::codec;

/// Default name of a domain's commit log.
pub const COMMIT_LOG: &str = "commit";

/// The on-store record of a single commit within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment id; equals the committing transaction id.
    pub id: u64,

    /// Domain the segment belongs to.
    pub domain: String,

    /// Commit time. Not part of the wire header; the reader materialises
    /// the Unix epoch.
    pub time: DateTime<Utc>,

    /// Number of fact blocks in the segment.
    pub blocks: i32,

    /// Total facts in the segment.
    pub count: i32,

    /// Encoded payload size.
    pub bytes: i32,

    /// Segment this one was built against; zero if none.
    pub base: u64,

    /// Segment that follows in the log chain; zero at the tail. May differ
    /// from `base` when a conflict reshuffled the position; the reader
    /// treats `next` as authoritative.
    pub next: u64,
}

/// Loads a segment header, or `None` if the key is absent.
fn load_segment(engine: &dyn Engine, domain: &str, id: u64) -> Result<Option<Segment>> {
    let key = codec::segment_key(id);

    let Some(bytes) = engine.get(domain, &key)? else {
        return Ok(None);
    };

    let record = codec::decode_segment(&key, &bytes)?;

    Ok(Some(Segment {
        id: record.id,
        domain: domain.to_string(),
        time: DateTime::UNIX_EPOCH,
        blocks: record.blocks,
        count: record.count,
        bytes: record.bytes,
        base: record.base.unwrap_or(0),
        next: record.next.unwrap_or(0),
    }))
}

/// Loads a block of facts, or `None` if the key is absent.
fn load_block(engine: &dyn Engine, domain: &str, id: u64, index: i32) -> Result<Option<Facts>> {
    let key = codec::block_key(id, index);

    let Some(bytes) = engine.get(domain, &key)? else {
        return Ok(None);
    };

    codec::decode_block(&key, &bytes, domain, id).map(Some)
}

/// An ordered sequence of facts within a domain, located by name.
#[derive(Clone)]
pub struct Log {
    /// Name of the log within the domain partition.
    pub name: String,

    /// Domain the log belongs to.
    pub domain: String,

    head: u64,
    engine: Arc<dyn Engine>,
}

impl Log {
    /// Opens a log for reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DoesNotExist`] if no head record is stored under
    /// `(domain, name)`, [`Error::Decode`] if the head record is
    /// malformed, or [`Error::Io`] if the engine fails.
    pub fn open(engine: Arc<dyn Engine>, domain: &str, name: &str) -> Result<Self> {
        let Some(bytes) = engine.get(domain, name)? else {
            return Err(Error::DoesNotExist {
                domain: domain.to_string(),
                name: name.to_string(),
            });
        };

        let head = codec::decode_log(name, &bytes)?.unwrap_or(0);

        Ok(Self {
            name: name.to_string(),
            domain: domain.to_string(),
            head,
            engine,
        })
    }

    /// The most recent segment id, or zero for an empty log.
    #[must_use]
    pub const fn head(&self) -> u64 {
        self.head
    }

    /// Returns a fresh iterator over the log.
    ///
    /// Iterators share the engine but no mutable state, so independent
    /// consumers can walk the same log concurrently.
    #[must_use]
    pub fn iter(&self) -> LogIter {
        LogIter {
            engine: Arc::clone(&self.engine),
            domain: self.domain.clone(),
            head: self.head,
            segment: None,
            block: None,
            bindex: 0,
            bpos: 0,
            done: false,
            error: None,
            visited: HashSet::new(),
        }
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// Lazy stream over a log's segment chain.
///
/// Facts are emitted in log order: segments as chained by `next`, blocks
/// by index within each segment, facts by position within each block. A
/// missing block terminates the stream cleanly; a revisited segment id is
/// an [`Error::InvariantViolation`]; storage and decode failures are
/// terminal and surface through `err()`.
pub struct LogIter {
    engine: Arc<dyn Engine>,
    domain: String,
    head: u64,
    segment: Option<Segment>,
    block: Option<Facts>,
    bindex: i32,
    bpos: usize,
    done: bool,
    error: Option<Error>,
    visited: HashSet<u64>,
}

impl LogIter {
    fn advance(&mut self) -> Result<Option<Fact>> {
        loop {
            if self.done {
                return Ok(None);
            }

            // Emit from the current block while it has facts left.
            if let Some(block) = &self.block {
                if self.bpos < block.len() {
                    let fact = block[self.bpos].clone();
                    self.bpos += 1;
                    return Ok(Some(fact));
                }
            }

            // Load the next block of the current segment.
            if let Some(segment) = &self.segment {
                if self.bindex < segment.blocks {
                    match load_block(&*self.engine, &segment.domain, segment.id, self.bindex)? {
                        None => {
                            // A missing block exhausts the stream cleanly.
                            self.done = true;
                            return Ok(None);
                        }
                        Some(block) => {
                            self.block = Some(block);
                            self.bpos = 0;
                            self.bindex += 1;
                            continue;
                        }
                    }
                }
            }

            // Advance the segment chain: the head first, then `next`.
            let id = match &self.segment {
                None => self.head,
                Some(segment) => segment.next,
            };

            if id == 0 {
                self.done = true;
                return Ok(None);
            }

            if !self.visited.insert(id) {
                return Err(Error::InvariantViolation(format!(
                    "segment chain revisits segment {id} in domain {}",
                    self.domain
                )));
            }

            match load_segment(&*self.engine, &self.domain, id)? {
                None => {
                    self.done = true;
                    return Ok(None);
                }
                Some(segment) => {
                    self.segment = Some(segment);
                    self.block = None;
                    self.bindex = 0;
                    self.bpos = 0;
                }
            }
        }
    }
}

impl FactStream for LogIter {
    fn next(&mut self) -> Option<Fact> {
        if self.error.is_some() {
            return None;
        }

        match self.advance() {
            Ok(fact) => fact,
            Err(err) => {
                self.error = Some(err);
                self.done = true;
                None
            }
        }
    }

    fn err(&self) -> Option<Error> {
        self.error.clone()
    }
}
