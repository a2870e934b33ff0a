//! # factlog - a domain-partitioned, append-only fact log
//!
//! factlog stores immutable assertions and retractions of
//! `(entity, attribute, value)` triples, time-stamped and tagged with a
//! monotonic transaction id. Facts are grouped into segments (one per
//! commit) chained per domain, and persisted into a pluggable key/value
//! engine as serialized blocks.
//!
//! ## Core concepts
//!
//! - **Ident**: a `(domain, name)` pair naming an entity, attribute, or
//!   typed value
//! - **Fact**: an immutable assertion or retraction with time and
//!   transaction provenance
//! - **Comparator**: a total ordering on facts; the canonical index orders
//!   (EAVT, AVET, AEVT, VAET) are composed comparators
//! - **FactStream**: a pull-based lazy fact stream with transformers
//!   (slice, filter, group-by) and collectors (projections, read-all)
//! - **Engine**: the partitioned key/value storage contract the log is
//!   persisted into
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use factlog::engine::MemoryEngine;
//! use factlog::view::{Log, COMMIT_LOG};
//! use factlog::{read_all, Comparator};
//!
//! let engine = Arc::new(MemoryEngine::new());
//!
//! // Open a domain's commit log and drain it in log order.
//! let log = Log::open(engine, "people", COMMIT_LOG)?;
//! let mut facts = read_all(&mut log.iter())?;
//!
//! // Re-rank into the attribute-value-entity-time index order.
//! factlog::sort(&mut facts, &Comparator::avet());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core model
pub mod buffer;
pub mod comparator;
pub mod error;
pub mod fact;
pub mod ident;
pub mod sort;
pub mod stream;

// Storage and read path
pub mod engine;
pub mod view;

// Presentation layer
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export primary types at the crate root for convenience
pub use buffer::{Buffer, BufferStream};
pub use comparator::{Comparator, Dimension};
pub use error::{Error, Result};
pub use fact::{Fact, FactBuilder, Facts, Operation};
pub use ident::Ident;
pub use sort::{is_sorted, sort, sorted};
pub use stream::{
    attributes, copy, entities, entity, exists, filter, first, group_by, map, map_groups, read,
    read_all, slice, transactions, values, FactStream, FactWriter, Filter, GroupBy, GroupStream,
    Slice,
};

/// Crate version, surfaced by the HTTP root route.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
