//! An in-memory fact sequence that is both a writer sink and a stream
//! source.
//!
//! Buffers are not thread-safe; callers serialise access.

use crate::error::Result;
use crate::fact::{Fact, Facts};
use crate::stream::{FactStream, FactWriter};

/// An append-only fact sequence with amortised O(1) append.
///
/// A buffer acts as both ends of the iterator algebra: it implements
/// [`FactWriter`] so streams can be drained into it, and [`Buffer::stream`]
/// yields a fresh stream over a snapshot of the current contents.
///
/// # Examples
///
/// ```
/// use factlog::{read_all, Buffer, Fact, Ident};
///
/// let mut buf = Buffer::new();
/// buf.push(Fact::assert(
///     Ident::new("people", "bob").unwrap(),
///     Ident::new("people", "name").unwrap(),
///     Ident::scalar("Bob").unwrap(),
/// ));
///
/// let facts = read_all(&mut buf.iter()).unwrap();
/// assert_eq!(facts.len(), 1);
/// assert_eq!(buf.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    facts: Facts,
}

impl Buffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer seeded with the given facts.
    #[must_use]
    pub fn with_facts(facts: Facts) -> Self {
        Self { facts }
    }

    /// Appends a fact. Never fails in memory.
    pub fn push(&mut self, fact: Fact) {
        self.facts.push(fact);
    }

    /// Number of buffered facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the buffer holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Drains the buffered facts, leaving the buffer empty.
    #[must_use]
    pub fn facts(&mut self) -> Facts {
        std::mem::take(&mut self.facts)
    }

    /// Returns a fresh stream over a snapshot of the current contents.
    ///
    /// Multiple streams taken from the same buffer are independent.
    #[must_use]
    pub fn iter(&self) -> BufferStream {
        BufferStream {
            facts: self.facts.clone().into_iter(),
        }
    }
}

impl FactWriter for Buffer {
    fn write(&mut self, fact: Fact) -> Result<()> {
        self.push(fact);
        Ok(())
    }
}

/// Stream over a buffer snapshot. Always exhausts cleanly.
#[derive(Debug)]
pub struct BufferStream {
    facts: std::vec::IntoIter<Fact>,
}

impl FactStream for BufferStream {
    fn next(&mut self) -> Option<Fact> {
        self.facts.next()
    }

    fn err(&self) -> Option<crate::error::Error> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::canonical_facts;

    #[test]
    fn test_push_and_len() {
        let mut buf = Buffer::new();
        assert!(buf.is_empty());

        for fact in canonical_facts() {
            buf.push(fact);
        }
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_facts_drains() {
        let mut buf = Buffer::with_facts(canonical_facts());
        let facts = buf.facts();
        assert_eq!(facts, canonical_facts());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_stream_is_a_snapshot() {
        let mut buf = Buffer::with_facts(canonical_facts());
        let mut stream = buf.iter();

        // Appending after taking the stream does not extend it.
        buf.push(canonical_facts()[0].clone());

        let mut n = 0;
        while stream.next().is_some() {
            n += 1;
        }
        assert_eq!(n, 4);
        assert!(stream.err().is_none());

        // Exhausted streams stay exhausted.
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_independent_streams() {
        let buf = Buffer::with_facts(canonical_facts());
        let mut a = buf.iter();
        let mut b = buf.iter();

        let _ = a.next();
        let _ = a.next();

        // b is unaffected by a's progress.
        assert_eq!(b.next(), Some(canonical_facts()[0].clone()));
    }
}
