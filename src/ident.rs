//! Identity types.
//!
//! An identity names an entity, attribute, or typed value as a
//! `(domain, name)` pair. Identities are the anchor of the fact model:
//! equality, ordering, and the canonical index orders are all defined in
//! terms of them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `(domain, name)` pair naming an entity, attribute, or typed value.
///
/// The domain may be empty, which denotes a *scalar* value identity (a bare
/// literal). The name is non-empty for any well-formed identity; use
/// [`Ident::new`] to enforce this.
///
/// Identities are immutable value objects. Equality is componentwise and
/// ordering is lexicographic on `(domain, name)`.
///
/// # Examples
///
/// ```
/// use factlog::Ident;
///
/// let attr = Ident::new("people", "name").unwrap();
/// let value = Ident::scalar("Bob").unwrap();
///
/// assert_eq!(attr.to_string(), "people/name");
/// assert_eq!(value.to_string(), "Bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ident {
    /// Domain the name is scoped to. Empty for scalar values.
    pub domain: String,

    /// Local name within the domain. Never empty for well-formed identities.
    pub name: String,
}

impl Ident {
    /// Creates a new identity, validating that the name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `name` is empty.
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let domain = domain.into();
        let name = name.into();

        if name.is_empty() {
            return Err(Error::invalid_identity("name must be non-empty"));
        }

        Ok(Self { domain, name })
    }

    /// Creates a scalar value identity (empty domain).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `name` is empty.
    pub fn scalar(name: impl Into<String>) -> Result<Self> {
        Self::new("", name)
    }

    /// Returns true if this identity denotes a bare literal value.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.domain.is_empty()
    }

    /// Componentwise equivalence test against another identity.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        self.domain == other.domain && self.name == other.name
    }

    /// Lexicographic comparison on `(domain, name)`.
    ///
    /// This is the one ordering used everywhere: for attribute and entity
    /// dimensions, and deliberately for values as well. Values are not
    /// interpreted numerically, so `"10"` sorts before `"9"`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.domain
            .cmp(&other.domain)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.domain.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.domain, self.name)
        }
    }
}
