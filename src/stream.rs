//! The iterator algebra: lazy pull-based fact streams and transformers.
//!
//! A stream exposes the capability set `{next, err}`: `next()` yields the
//! next fact or end-of-stream, and once the stream is exhausted `err()`
//! reports either a terminal error or clean exhaustion (`None`). Streams
//! are single-pass and strictly synchronous; `next()` may block on storage
//! I/O but never yields cooperatively.
//!
//! Transformers (slice, filter, group-by) wrap their upstream by value and
//! preserve its order. Collectors (`read_all`, `entities`, `transactions`,
//! ...) drain the stream eagerly.

use std::collections::HashSet;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::fact::{Fact, Facts};
use crate::ident::Ident;

/// A pull-based lazy stream of facts.
///
/// After `next()` returns `None` once, it continues to return `None`.
/// An error reported by `err()` is terminal: the stream must not yield
/// further facts after reporting it.
pub trait FactStream {
    /// Returns the next fact, or `None` when the stream is exhausted or
    /// has failed.
    fn next(&mut self) -> Option<Fact>;

    /// Returns the terminal error, or `None` for clean exhaustion.
    fn err(&self) -> Option<Error>;
}

impl<S: FactStream + ?Sized> FactStream for &mut S {
    fn next(&mut self) -> Option<Fact> {
        (**self).next()
    }

    fn err(&self) -> Option<Error> {
        (**self).err()
    }
}

/// A sink for facts.
///
/// `flush` has a no-op default so that unbuffered writers satisfy the
/// contract that [`copy`] flushes exactly once.
pub trait FactWriter {
    /// Writes one fact to the underlying sink.
    fn write(&mut self, fact: Fact) -> Result<()>;

    /// Flushes any buffered state. The default does nothing.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<W: FactWriter + ?Sized> FactWriter for &mut W {
    fn write(&mut self, fact: Fact) -> Result<()> {
        (**self).write(fact)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Pulls up to `limit` facts into `buf`, returning the count appended.
///
/// Exhaustion is signalled by a short fill, not by an error. On failure
/// `buf` retains the facts pulled before the stream failed.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn read<S>(stream: &mut S, buf: &mut Facts, limit: usize) -> Result<usize>
where
    S: FactStream + ?Sized,
{
    let mut n = 0;

    while n < limit {
        let Some(fact) = stream.next() else {
            break;
        };
        buf.push(fact);
        n += 1;
    }

    match stream.err() {
        Some(err) => Err(err),
        None => Ok(n),
    }
}

/// Drains the stream into a fresh sequence.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn read_all<S>(stream: &mut S) -> Result<Facts>
where
    S: FactStream + ?Sized,
{
    let mut buf = Buffer::new();
    copy(stream, &mut buf)?;
    Ok(buf.facts())
}

/// Drains the stream into a writer, returning the number of facts written.
///
/// The writer is flushed exactly once, even when a read or write error cut
/// the drain short; the first error encountered wins.
///
/// # Errors
///
/// Returns the first read, write, or flush error.
pub fn copy<S, W>(stream: &mut S, writer: &mut W) -> Result<usize>
where
    S: FactStream + ?Sized,
    W: FactWriter + ?Sized,
{
    let mut n = 0;
    let mut failure: Option<Error> = None;

    while let Some(fact) = stream.next() {
        if let Err(err) = writer.write(fact) {
            failure = Some(err);
            break;
        }
        n += 1;
    }

    if failure.is_none() {
        failure = stream.err();
    }

    let flushed = writer.flush();
    if failure.is_none() {
        failure = flushed.err();
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(n),
    }
}

/// Applies `f` to each fact, aborting on the first `f` error.
///
/// # Errors
///
/// Returns the first callback error, or the stream's terminal error.
pub fn map<S, F>(stream: &mut S, mut f: F) -> Result<()>
where
    S: FactStream + ?Sized,
    F: FnMut(Fact) -> Result<()>,
{
    while let Some(fact) = stream.next() {
        f(fact)?;
    }

    match stream.err() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Skips the first `offset` facts and emits at most `limit` (0 = unlimited).
pub fn slice<S: FactStream>(stream: S, offset: usize, limit: usize) -> Slice<S> {
    Slice {
        stream,
        offset,
        limit,
        index: 0,
        count: 0,
    }
}

/// Lazy offset/limit window over an upstream. See [`slice`].
#[derive(Debug)]
pub struct Slice<S> {
    stream: S,
    offset: usize,
    limit: usize,
    index: usize,
    count: usize,
}

impl<S: FactStream> FactStream for Slice<S> {
    fn next(&mut self) -> Option<Fact> {
        if self.limit > 0 && self.count >= self.limit {
            return None;
        }

        loop {
            let fact = self.stream.next()?;

            if self.index >= self.offset {
                self.index += 1;
                self.count += 1;
                return Some(fact);
            }

            self.index += 1;
        }
    }

    fn err(&self) -> Option<Error> {
        self.stream.err()
    }
}

/// Lazily keeps the facts matching the predicate.
pub fn filter<S, P>(stream: S, predicate: P) -> Filter<S, P>
where
    S: FactStream,
    P: FnMut(&Fact) -> bool,
{
    Filter { stream, predicate }
}

/// Lazy predicate filter over an upstream. See [`filter`].
#[derive(Debug)]
pub struct Filter<S, P> {
    stream: S,
    predicate: P,
}

impl<S, P> FactStream for Filter<S, P>
where
    S: FactStream,
    P: FnMut(&Fact) -> bool,
{
    fn next(&mut self) -> Option<Fact> {
        loop {
            let fact = self.stream.next()?;
            if (self.predicate)(&fact) {
                return Some(fact);
            }
        }
    }

    fn err(&self) -> Option<Error> {
        self.stream.err()
    }
}

/// Convenience filter keeping only facts about the given entity.
pub fn entity<S: FactStream>(stream: S, id: Ident) -> Filter<S, impl FnMut(&Fact) -> bool> {
    filter(stream, move |fact: &Fact| fact.entity.is(&id))
}

/// Returns the first fact matching the predicate, if any.
pub fn first<S, P>(stream: &mut S, predicate: P) -> Option<Fact>
where
    S: FactStream + ?Sized,
    P: FnMut(&Fact) -> bool,
{
    filter(stream, predicate).next()
}

/// Returns true if any fact matches the predicate. Short-circuits.
pub fn exists<S, P>(stream: &mut S, predicate: P) -> bool
where
    S: FactStream + ?Sized,
    P: FnMut(&Fact) -> bool,
{
    first(stream, predicate).is_some()
}

fn unique_idents<S, F>(stream: &mut S, select: F) -> Result<Vec<Ident>>
where
    S: FactStream + ?Sized,
    F: Fn(&Fact) -> &Ident,
{
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut idents = Vec::new();

    while let Some(fact) = stream.next() {
        let ident = select(&fact);
        if seen.insert((ident.domain.clone(), ident.name.clone())) {
            idents.push(ident.clone());
        }
    }

    match stream.err() {
        Some(err) => Err(err),
        None => Ok(idents),
    }
}

/// Eagerly collects the distinct entity identities, in first-seen order.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn entities<S: FactStream + ?Sized>(stream: &mut S) -> Result<Vec<Ident>> {
    unique_idents(stream, |fact| &fact.entity)
}

/// Eagerly collects the distinct attribute identities, in first-seen order.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn attributes<S: FactStream + ?Sized>(stream: &mut S) -> Result<Vec<Ident>> {
    unique_idents(stream, |fact| &fact.attribute)
}

/// Eagerly collects the distinct value identities, in first-seen order.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn values<S: FactStream + ?Sized>(stream: &mut S) -> Result<Vec<Ident>> {
    unique_idents(stream, |fact| &fact.value)
}

/// Eagerly collects the distinct transaction ids, in first-seen order.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn transactions<S: FactStream + ?Sized>(stream: &mut S) -> Result<Vec<u64>> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut txes = Vec::new();

    while let Some(fact) = stream.next() {
        if seen.insert(fact.transaction) {
            txes.push(fact.transaction);
        }
    }

    match stream.err() {
        Some(err) => Err(err),
        None => Ok(txes),
    }
}

/// A pull-based stream of fact groups.
///
/// Mirrors [`FactStream`], but each pull yields a whole group.
pub trait GroupStream {
    /// Returns the next group, or `None` when exhausted or failed.
    /// A group always contains at least one fact.
    fn next(&mut self) -> Option<Facts>;

    /// Returns the terminal error, or `None` for clean exhaustion.
    fn err(&self) -> Option<Error>;
}

/// Groups adjacent facts satisfying the equivalence predicate.
///
/// The predicate must be reflexive, symmetric, and stable across calls.
/// The intended feed is a stream already sorted by some comparator,
/// together with [`Comparator::equal`] as the equivalence.
///
/// [`Comparator::equal`]: crate::comparator::Comparator::equal
pub fn group_by<S, E>(stream: S, equiv: E) -> GroupBy<S, E>
where
    S: FactStream,
    E: FnMut(&Fact, &Fact) -> bool,
{
    GroupBy {
        stream,
        equiv,
        last: None,
        buffer: Buffer::new(),
    }
}

/// Adjacent-equivalence grouping stream. See [`group_by`].
#[derive(Debug)]
pub struct GroupBy<S, E> {
    stream: S,
    equiv: E,
    last: Option<Fact>,
    buffer: Buffer,
}

impl<S, E> GroupStream for GroupBy<S, E>
where
    S: FactStream,
    E: FnMut(&Fact, &Fact) -> bool,
{
    fn next(&mut self) -> Option<Facts> {
        if self.stream.err().is_some() {
            return None;
        }

        // The boundary fact that closed the previous group opens this one.
        if let Some(last) = &self.last {
            self.buffer.push(last.clone());
        }

        let mut matched = true;

        loop {
            let Some(fact) = self.stream.next() else {
                // Unset the boundary so subsequent calls don't emit
                // single-fact groups.
                self.last = None;
                break;
            };

            match &self.last {
                None => self.buffer.push(fact.clone()),
                Some(last) => {
                    matched = (self.equiv)(last, &fact);
                    if matched {
                        self.buffer.push(fact.clone());
                    }
                }
            }

            self.last = Some(fact);

            if !matched {
                break;
            }
        }

        if self.stream.err().is_some() {
            return None;
        }

        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer.facts())
        }
    }

    fn err(&self) -> Option<Error> {
        self.stream.err()
    }
}

/// Applies `f` to each group, aborting on the first `f` error.
///
/// # Errors
///
/// Returns the first callback error, or the stream's terminal error.
pub fn map_groups<G, F>(groups: &mut G, mut f: F) -> Result<()>
where
    G: GroupStream + ?Sized,
    F: FnMut(Facts) -> Result<()>,
{
    while let Some(group) = groups.next() {
        f(group)?;
    }

    match groups.err() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
