//! Wire records and key layout for the persisted log.
//!
//! Everything a log stores lives in three key classes inside the domain
//! partition: the log head under the log name, segment headers under
//! `segment.<id>`, and fact blocks under `segment.<id>.<index>`. Payloads
//! are protocol-buffer messages with fixed field tags; blocks are
//! length-prefixed sequences of fact messages.
//!
//! Fact times travel as integer nanoseconds since the Unix epoch. A fact's
//! transaction is not on the wire at all: it is the id of the segment the
//! block belongs to.

use chrono::{DateTime, TimeZone, Utc};
use prost::Message;

use crate::error::{Error, Result};
use crate::fact::{Fact, Facts};
use crate::ident::Ident;

/// Storage key of a segment header within its domain partition.
#[must_use]
pub fn segment_key(id: u64) -> String {
    format!("segment.{id}")
}

/// Storage key of a fact block within its domain partition.
#[must_use]
pub fn block_key(id: u64, index: i32) -> String {
    format!("segment.{id}.{index}")
}

/// Log head message. Field tags are fixed; do not reorder.
#[derive(Clone, PartialEq, Message)]
pub struct LogRecord {
    /// Most recent segment id, absent for an empty log record.
    #[prost(uint64, optional, tag = "1")]
    pub head: Option<u64>,
}

/// Segment header message. Field tags are fixed; do not reorder.
#[derive(Clone, PartialEq, Message)]
pub struct SegmentRecord {
    /// Segment id; equals the committing transaction id.
    #[prost(uint64, tag = "1")]
    pub id: u64,

    /// Number of fact blocks in the segment.
    #[prost(int32, tag = "2")]
    pub blocks: i32,

    /// Total facts in the segment.
    #[prost(int32, tag = "3")]
    pub count: i32,

    /// Encoded payload size.
    #[prost(int32, tag = "4")]
    pub bytes: i32,

    /// Segment that follows in the log chain; absent or zero at the tail.
    #[prost(uint64, optional, tag = "5")]
    pub next: Option<u64>,

    /// Segment this one was built against; absent or zero if none.
    #[prost(uint64, optional, tag = "6")]
    pub base: Option<u64>,
}

/// Transaction message written by the commit path. Field tags are fixed.
#[derive(Clone, PartialEq, Message)]
pub struct TransactionRecord {
    /// Transaction id.
    #[prost(uint64, tag = "1")]
    pub id: u64,

    /// Nanoseconds since the epoch when the transaction began.
    #[prost(int64, tag = "2")]
    pub start_time: i64,

    /// Nanoseconds since the epoch when the transaction ended.
    #[prost(int64, tag = "3")]
    pub end_time: i64,
}

/// Fact message. Field tags are fixed; do not reorder.
#[derive(Clone, PartialEq, Message)]
pub struct FactRecord {
    /// True for an assertion, false for a retraction.
    #[prost(bool, tag = "1")]
    pub added: bool,

    /// Entity domain; an empty value inherits the segment's domain.
    #[prost(string, tag = "2")]
    pub entity_domain: String,

    /// Entity name.
    #[prost(string, tag = "3")]
    pub entity: String,

    /// Attribute domain; an empty value inherits the segment's domain.
    #[prost(string, tag = "4")]
    pub attribute_domain: String,

    /// Attribute name.
    #[prost(string, tag = "5")]
    pub attribute: String,

    /// Value domain; absent for a literal.
    #[prost(string, optional, tag = "6")]
    pub value_domain: Option<String>,

    /// Value name.
    #[prost(string, tag = "7")]
    pub value: String,

    /// Nanoseconds since the epoch; absent decodes to the epoch.
    #[prost(int64, optional, tag = "8")]
    pub time: Option<i64>,
}

/// Encodes a log head record.
#[must_use]
pub fn encode_log(head: Option<u64>) -> Vec<u8> {
    LogRecord { head }.encode_to_vec()
}

/// Decodes a log head record stored under `key`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload is malformed.
pub fn decode_log(key: &str, bytes: &[u8]) -> Result<Option<u64>> {
    let record = LogRecord::decode(bytes).map_err(|e| Error::decode(key, e))?;
    Ok(record.head)
}

/// Encodes a segment header record.
#[must_use]
pub fn encode_segment(record: &SegmentRecord) -> Vec<u8> {
    record.encode_to_vec()
}

/// Decodes a segment header record stored under `key`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload is malformed.
pub fn decode_segment(key: &str, bytes: &[u8]) -> Result<SegmentRecord> {
    SegmentRecord::decode(bytes).map_err(|e| Error::decode(key, e))
}

/// Encodes a block as a length-prefixed sequence of fact messages.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentity`] if a fact carries an empty name in
/// any identity component; malformed facts must not reach storage.
pub fn encode_block(facts: &[Fact]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    for fact in facts {
        for (field, name) in [
            ("entity", &fact.entity.name),
            ("attribute", &fact.attribute.name),
            ("value", &fact.value.name),
        ] {
            if name.is_empty() {
                return Err(Error::invalid_identity(format!("{field} name is empty")));
            }
        }

        let record = FactRecord {
            added: fact.added,
            entity_domain: fact.entity.domain.clone(),
            entity: fact.entity.name.clone(),
            attribute_domain: fact.attribute.domain.clone(),
            attribute: fact.attribute.name.clone(),
            value_domain: if fact.value.domain.is_empty() {
                None
            } else {
                Some(fact.value.domain.clone())
            },
            value: fact.value.name.clone(),
            time: fact.time.timestamp_nanos_opt(),
        };

        // encode_length_delimited into a Vec cannot fail.
        record
            .encode_length_delimited(&mut buf)
            .map_err(|e| Error::io(e))?;
    }

    Ok(buf)
}

/// Decodes a block stored under `key` into facts.
///
/// The facts inherit `transaction` from the owning segment's id, and an
/// empty entity or attribute domain inherits the segment's `domain`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload is malformed, or
/// [`Error::InvalidIdentity`] if a decoded identity is ill-formed.
pub fn decode_block(key: &str, bytes: &[u8], domain: &str, transaction: u64) -> Result<Facts> {
    let mut slice = bytes;
    let mut facts = Facts::new();

    while !slice.is_empty() {
        let record =
            FactRecord::decode_length_delimited(&mut slice).map_err(|e| Error::decode(key, e))?;

        let inherit = |d: String| if d.is_empty() { domain.to_string() } else { d };

        let fact = Fact {
            entity: Ident::new(inherit(record.entity_domain), record.entity)?,
            attribute: Ident::new(inherit(record.attribute_domain), record.attribute)?,
            value: Ident::new(record.value_domain.unwrap_or_default(), record.value)?,
            time: record
                .time
                .map_or(DateTime::UNIX_EPOCH, |nanos| Utc.timestamp_nanos(nanos)),
            transaction,
            added: record.added,
        };

        facts.push(fact);
    }

    Ok(facts)
}

/// Encodes a transaction record.
#[must_use]
pub fn encode_transaction(record: &TransactionRecord) -> Vec<u8> {
    record.encode_to_vec()
}

/// Decodes a transaction record stored under `key`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload is malformed.
pub fn decode_transaction(key: &str, bytes: &[u8]) -> Result<TransactionRecord> {
    TransactionRecord::decode(bytes).map_err(|e| Error::decode(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::canonical_facts;

    #[test]
    fn test_keys() {
        assert_eq!(segment_key(3), "segment.3");
        assert_eq!(block_key(3, 0), "segment.3.0");
        assert_eq!(block_key(12, 7), "segment.12.7");
    }

    #[test]
    fn test_log_roundtrip() {
        let bytes = encode_log(Some(42));
        assert_eq!(decode_log("commit", &bytes).unwrap(), Some(42));

        let bytes = encode_log(None);
        assert_eq!(decode_log("commit", &bytes).unwrap(), None);
    }

    #[test]
    fn test_segment_roundtrip() {
        let record = SegmentRecord {
            id: 3,
            blocks: 2,
            count: 4,
            bytes: 128,
            next: Some(2),
            base: Some(2),
        };

        let bytes = encode_segment(&record);
        assert_eq!(decode_segment("segment.3", &bytes).unwrap(), record);
    }

    #[test]
    fn test_block_roundtrip_restamps_transaction() {
        let facts = canonical_facts();
        let bytes = encode_block(&facts).unwrap();

        // The wire carries no transaction; the segment id supplies it.
        let decoded = decode_block("segment.9.0", &bytes, "people", 9).unwrap();
        assert_eq!(decoded.len(), 4);

        for (decoded, fact) in decoded.iter().zip(&facts) {
            assert_eq!(decoded.entity, fact.entity);
            assert_eq!(decoded.attribute, fact.attribute);
            assert_eq!(decoded.value, fact.value);
            assert_eq!(decoded.time, fact.time);
            assert_eq!(decoded.added, fact.added);
            assert_eq!(decoded.transaction, 9);
        }
    }

    #[test]
    fn test_block_domain_inheritance() {
        let record = FactRecord {
            added: true,
            entity_domain: String::new(),
            entity: "bob".to_string(),
            attribute_domain: String::new(),
            attribute: "name".to_string(),
            value_domain: None,
            value: "Bob".to_string(),
            time: None,
        };

        let mut bytes = Vec::new();
        record.encode_length_delimited(&mut bytes).unwrap();

        let facts = decode_block("segment.1.0", &bytes, "people", 1).unwrap();
        assert_eq!(facts[0].entity, Ident::new("people", "bob").unwrap());
        assert_eq!(facts[0].attribute, Ident::new("people", "name").unwrap());
        // The value stays scalar; only entity and attribute inherit.
        assert!(facts[0].value.is_scalar());
        // Absent time decodes to the epoch.
        assert_eq!(facts[0].time, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_decode_block_rejects_garbage() {
        let err = decode_block("segment.1.0", &[0xff, 0xff, 0xff], "d", 1).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_empty_block() {
        let bytes = encode_block(&[]).unwrap();
        assert!(bytes.is_empty());
        assert!(decode_block("segment.1.0", &bytes, "d", 1)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_encode_block_rejects_malformed_identity() {
        let mut facts = canonical_facts();
        facts[0].value.name.clear();

        let err = encode_block(&facts).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentity { .. }));
    }

    #[test]
    fn test_transaction_roundtrip() {
        let record = TransactionRecord {
            id: 5,
            start_time: 1_420_070_400_000_000_000,
            end_time: 1_420_070_400_000_000_500,
        };

        let bytes = encode_transaction(&record);
        assert_eq!(decode_transaction("transaction.5", &bytes).unwrap(), record);
    }
}
