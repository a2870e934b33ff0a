//! The comparator algebra.
//!
//! A comparator is a total ordering on facts. Atomic comparators order by a
//! single dimension (entity, attribute, value, or time); composed
//! comparators chain dimensions left to right, returning the first
//! non-equal result. The canonical index orders (EAVT, AVET, AEVT, VAET)
//! are composed comparators with time as the final tie-breaker.
//!
//! Identity comparison is `(domain, name)` lexicographic everywhere. Value
//! comparison is identity comparison: literals are never interpreted
//! numerically, so `"10"` sorts before `"9"`. Canonical ordering is
//! type-agnostic.

use std::cmp::Ordering;

use crate::fact::Fact;

/// A single ordering dimension of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Order by the entity identity.
    Entity,
    /// Order by the attribute identity.
    Attribute,
    /// Order by the value identity.
    Value,
    /// Order by time, breaking ties on the transaction id.
    Time,
}

impl Dimension {
    /// Compares two facts along this dimension alone.
    #[must_use]
    pub fn compare(self, a: &Fact, b: &Fact) -> Ordering {
        match self {
            Self::Entity => a.entity.compare(&b.entity),
            Self::Attribute => a.attribute.compare(&b.attribute),
            Self::Value => a.value.compare(&b.value),
            Self::Time => a
                .time
                .cmp(&b.time)
                .then_with(|| a.transaction.cmp(&b.transaction)),
        }
    }
}

/// A total ordering on facts, composed from a left-to-right dimension chain.
///
/// Build custom chains with [`Comparator::new`], or use the canonical
/// constructors ([`Comparator::eavt`] and friends). Each composed
/// comparator is a total order on distinct facts; ties can only occur on
/// duplicate facts (with respect to the chained dimensions).
///
/// # Examples
///
/// ```
/// use factlog::{Comparator, Dimension};
///
/// let eavt = Comparator::eavt();
/// let custom = Comparator::new([Dimension::Value, Dimension::Time]);
/// assert_eq!(custom.dimensions().len(), 2);
/// assert_eq!(eavt.dimensions().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    dimensions: Vec<Dimension>,
}

impl Comparator {
    /// Composes a comparator from a dimension chain.
    #[must_use]
    pub fn new(dimensions: impl Into<Vec<Dimension>>) -> Self {
        Self {
            dimensions: dimensions.into(),
        }
    }

    /// Orders by entity alone.
    #[must_use]
    pub fn entity() -> Self {
        Self::new([Dimension::Entity])
    }

    /// Orders by attribute alone.
    #[must_use]
    pub fn attribute() -> Self {
        Self::new([Dimension::Attribute])
    }

    /// Orders by value alone.
    #[must_use]
    pub fn value() -> Self {
        Self::new([Dimension::Value])
    }

    /// Orders by time, then transaction.
    #[must_use]
    pub fn time() -> Self {
        Self::new([Dimension::Time])
    }

    /// The entity-attribute-value-time canonical index order.
    #[must_use]
    pub fn eavt() -> Self {
        Self::new([
            Dimension::Entity,
            Dimension::Attribute,
            Dimension::Value,
            Dimension::Time,
        ])
    }

    /// The attribute-value-entity-time canonical index order.
    #[must_use]
    pub fn avet() -> Self {
        Self::new([
            Dimension::Attribute,
            Dimension::Value,
            Dimension::Entity,
            Dimension::Time,
        ])
    }

    /// The attribute-entity-value-time canonical index order.
    #[must_use]
    pub fn aevt() -> Self {
        Self::new([
            Dimension::Attribute,
            Dimension::Entity,
            Dimension::Value,
            Dimension::Time,
        ])
    }

    /// The value-attribute-entity-time canonical index order.
    #[must_use]
    pub fn vaet() -> Self {
        Self::new([
            Dimension::Value,
            Dimension::Attribute,
            Dimension::Entity,
            Dimension::Time,
        ])
    }

    /// The dimension chain, in comparison order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Compares two facts, returning the first non-equal dimension result.
    #[must_use]
    pub fn compare(&self, a: &Fact, b: &Fact) -> Ordering {
        for dim in &self.dimensions {
            let ord = dim.compare(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }

        Ordering::Equal
    }

    /// Equivalence under this comparator.
    ///
    /// This is the equality to feed group-by alongside a stream sorted by
    /// the same comparator.
    #[must_use]
    pub fn equal(&self, a: &Fact, b: &Fact) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::canonical_facts;

    // The canonical four facts: (bob name Bob t0 tx1), (bob color red t0 tx1),
    // (sue name Sue t1 tx2), (sue color blue t1 tx2). Indices 0..4 in that
    // order; the assertions below name them through those indices.

    fn check(comp: &Comparator, expected: [usize; 4]) {
        let facts = canonical_facts();
        let mut sorted = facts.clone();
        crate::sort::sort(&mut sorted, comp);

        let expected: Vec<_> = expected.iter().map(|&i| facts[i].clone()).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_entity_comparator() {
        check(&Comparator::entity(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_attribute_comparator() {
        check(&Comparator::attribute(), [1, 3, 0, 2]);
    }

    #[test]
    fn test_value_comparator() {
        // Bob, Sue, blue, red -- lexicographic, uppercase first.
        check(&Comparator::value(), [0, 2, 3, 1]);
    }

    #[test]
    fn test_time_comparator() {
        check(&Comparator::time(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_eavt_comparator() {
        check(&Comparator::eavt(), [1, 0, 3, 2]);
    }

    #[test]
    fn test_avet_comparator() {
        check(&Comparator::avet(), [3, 1, 0, 2]);
    }

    #[test]
    fn test_aevt_comparator() {
        check(&Comparator::aevt(), [1, 3, 0, 2]);
    }

    #[test]
    fn test_vaet_comparator() {
        check(&Comparator::vaet(), [0, 2, 3, 1]);
    }

    #[test]
    fn test_totality_and_antisymmetry() {
        let facts = canonical_facts();
        for comp in [
            Comparator::entity(),
            Comparator::attribute(),
            Comparator::value(),
            Comparator::time(),
            Comparator::eavt(),
            Comparator::avet(),
            Comparator::aevt(),
            Comparator::vaet(),
        ] {
            for a in &facts {
                for b in &facts {
                    assert_eq!(comp.compare(a, b), comp.compare(b, a).reverse());
                }
                assert_eq!(comp.compare(a, a), Ordering::Equal);
            }
        }
    }

    #[test]
    fn test_time_breaks_ties_on_transaction() {
        let facts = canonical_facts();
        let mut a = facts[0].clone();
        let mut b = facts[0].clone();
        a.transaction = 1;
        b.transaction = 2;

        assert_eq!(Comparator::time().compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_equal_matches_compare() {
        let facts = canonical_facts();
        let comp = Comparator::entity();

        // bob/name and bob/color share an entity.
        assert!(comp.equal(&facts[0], &facts[1]));
        assert!(!comp.equal(&facts[0], &facts[2]));
    }
}
