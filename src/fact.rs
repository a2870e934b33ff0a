//! The fact model.
//!
//! A fact is an immutable assertion or retraction of an
//! `(entity, attribute, value)` triple, stamped with a wall-clock time and
//! the transaction that committed it. Facts are value objects; once
//! constructed they are never mutated.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ident::Ident;

/// An ordered, finite sequence of facts.
pub type Facts = Vec<Fact>;

/// Whether a fact asserts or retracts its triple.
///
/// The operation is derived from the `added` flag; it exists so callers can
/// match on intent without reading a bare boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// The triple is being asserted.
    Assert,
    /// The triple is being retracted.
    Retract,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assert => write!(f, "assert"),
            Self::Retract => write!(f, "retract"),
        }
    }
}

/// An immutable assertion or retraction of a triple with time and
/// transaction provenance.
///
/// Facts read from a log always carry a positive transaction id (the id of
/// the segment that committed them). Facts produced locally through
/// [`Fact::assert`], [`Fact::retract`], or [`FactBuilder`] carry transaction
/// `0` until a commit assigns one.
///
/// # Examples
///
/// ```
/// use factlog::{Fact, Ident, Operation};
///
/// let fact = Fact::assert(
///     Ident::new("people", "bob").unwrap(),
///     Ident::new("people", "name").unwrap(),
///     Ident::scalar("Bob").unwrap(),
/// );
///
/// assert!(fact.added);
/// assert_eq!(fact.operation(), Operation::Assert);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Subject of the triple.
    pub entity: Ident,

    /// Predicate of the triple.
    pub attribute: Ident,

    /// Object of the triple. An empty domain denotes a literal.
    pub value: Ident,

    /// Wall-clock assertion time.
    pub time: DateTime<Utc>,

    /// Commit id; strictly monotonic per store. Zero until committed.
    pub transaction: u64,

    /// True for an assertion, false for a retraction.
    pub added: bool,
}

impl Fact {
    /// Creates an assertion of the triple, stamped with the current time
    /// and a zero (not-yet-committed) transaction.
    #[must_use]
    pub fn assert(entity: Ident, attribute: Ident, value: Ident) -> Self {
        Self {
            entity,
            attribute,
            value,
            time: Utc::now(),
            transaction: 0,
            added: true,
        }
    }

    /// Creates a retraction of the triple, stamped with the current time
    /// and a zero (not-yet-committed) transaction.
    #[must_use]
    pub fn retract(entity: Ident, attribute: Ident, value: Ident) -> Self {
        Self {
            entity,
            attribute,
            value,
            time: Utc::now(),
            transaction: 0,
            added: false,
        }
    }

    /// Returns the operation derived from the `added` flag.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        if self.added {
            Operation::Assert
        } else {
            Operation::Retract
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.operation(),
            self.entity,
            self.attribute,
            self.value
        )
    }
}

/// Incremental constructor for facts.
///
/// This is the portable surface of record-to-fact derivation: callers (or
/// host-language bindings doing field introspection) supply attribute and
/// value pairs one component at a time and finish with [`build`].
///
/// Only the three identity components are required; time defaults to now
/// and the transaction to zero (not yet committed).
///
/// [`build`]: FactBuilder::build
///
/// # Examples
///
/// ```
/// use factlog::{FactBuilder, Ident};
///
/// let fact = FactBuilder::new()
///     .entity(Ident::new("people", "bob").unwrap())
///     .attribute(Ident::new("people", "color").unwrap())
///     .value(Ident::scalar("red").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(fact.value.name, "red");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FactBuilder {
    entity: Option<Ident>,
    attribute: Option<Ident>,
    value: Option<Ident>,
    time: Option<DateTime<Utc>>,
    transaction: u64,
    added: Option<bool>,
}

impl FactBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity identity.
    #[must_use]
    pub fn entity(mut self, entity: Ident) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the attribute identity.
    #[must_use]
    pub fn attribute(mut self, attribute: Ident) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Sets the value identity.
    #[must_use]
    pub fn value(mut self, value: Ident) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the assertion time. Defaults to the current time.
    #[must_use]
    pub const fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the committing transaction id.
    #[must_use]
    pub const fn transaction(mut self, transaction: u64) -> Self {
        self.transaction = transaction;
        self
    }

    /// Marks the fact as a retraction. Defaults to an assertion.
    #[must_use]
    pub const fn retracted(mut self) -> Self {
        self.added = Some(false);
        self
    }

    /// Builds the fact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if any of entity, attribute, or
    /// value is missing.
    pub fn build(self) -> Result<Fact> {
        let entity = self
            .entity
            .ok_or_else(|| Error::invalid_identity("fact is missing an entity"))?;
        let attribute = self
            .attribute
            .ok_or_else(|| Error::invalid_identity("fact is missing an attribute"))?;
        let value = self
            .value
            .ok_or_else(|| Error::invalid_identity("fact is missing a value"))?;

        Ok(Fact {
            entity,
            attribute,
            value,
            time: self.time.unwrap_or_else(Utc::now),
            transaction: self.transaction,
            added: self.added.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> (Ident, Ident, Ident) {
        (
            Ident::new("people", "bob").unwrap(),
            Ident::new("people", "name").unwrap(),
            Ident::scalar("Bob").unwrap(),
        )
    }

    #[test]
    fn test_assert_and_retract() {
        let (e, a, v) = triple();
        let fact = Fact::assert(e.clone(), a.clone(), v.clone());
        assert!(fact.added);
        assert_eq!(fact.operation(), Operation::Assert);
        assert_eq!(fact.transaction, 0);

        let fact = Fact::retract(e, a, v);
        assert!(!fact.added);
        assert_eq!(fact.operation(), Operation::Retract);
    }

    #[test]
    fn test_display() {
        let (e, a, v) = triple();
        let fact = Fact::assert(e, a, v);
        assert_eq!(fact.to_string(), "assert people/bob people/name Bob");
    }

    #[test]
    fn test_builder_requires_triple() {
        let (e, a, v) = triple();

        let err = FactBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::InvalidIdentity { .. }));

        let err = FactBuilder::new().entity(e.clone()).build().unwrap_err();
        assert!(matches!(err, Error::InvalidIdentity { .. }));

        let fact = FactBuilder::new()
            .entity(e)
            .attribute(a)
            .value(v)
            .transaction(7)
            .retracted()
            .build()
            .unwrap();

        assert_eq!(fact.transaction, 7);
        assert!(!fact.added);
    }

    #[test]
    fn test_serde_roundtrip() {
        let (e, a, v) = triple();
        let fact = Fact::assert(e, a, v);
        let json = serde_json::to_string(&fact).unwrap();
        let back: Fact = serde_json::from_str(&json).unwrap();
        assert_eq!(fact, back);
    }
}
