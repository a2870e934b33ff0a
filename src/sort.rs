//! Stable, comparator-parameterised sorting of fact sequences.
//!
//! The contract is stability (equal-ranked facts retain input order) and
//! adaptive performance: linear on already-sorted or reverse-sorted runs,
//! O(n log n) worst case. The standard library's stable sort is a
//! Timsort-style adaptive merge sort and satisfies both bounds, so the
//! primitives here delegate to it rather than re-deriving the merge logic.

use crate::comparator::Comparator;
use crate::fact::{Fact, Facts};

/// Sorts the facts in place under the comparator. Stable.
pub fn sort(facts: &mut [Fact], comparator: &Comparator) {
    facts.sort_by(|a, b| comparator.compare(a, b));
}

/// Returns a sorted copy, leaving the input untouched.
///
/// Facts are value objects, so sorting never mutates shared state; this
/// helper makes that explicit at call sites that hold the original order.
#[must_use]
pub fn sorted(facts: &[Fact], comparator: &Comparator) -> Facts {
    let mut out = facts.to_vec();
    sort(&mut out, comparator);
    out
}

/// Returns true if the facts are already monotone under the comparator.
#[must_use]
pub fn is_sorted(facts: &[Fact], comparator: &Comparator) -> bool {
    facts
        .windows(2)
        .all(|w| comparator.compare(&w[0], &w[1]) != std::cmp::Ordering::Greater)
}
