//! Operations that require a sequence node.
//!
//! In-place operations (`push`, `pop`, `shift`, `unshift`, `splice`,
//! `reverse`, `fill`, `copy_within`) edit the receiver's handle list, so every
//! view holding the receiver sees the change. Derivations (`filter`, `sort`,
//! `entries`, the removed half of `splice`) allocate a new container whose
//! children are the receiver's own handles.

use std::cmp::Ordering;
use std::iter::Copied;
use std::ops::Range;
use std::slice;

use tracing::trace;

use crate::coerce::{relative_index, relative_range};
use crate::data::Data;
use crate::error::Result;
use crate::node::{NodeData, NodeId};
use crate::store::Store;

/// Restartable iterator over the child handles of a sequence.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: Copied<slice::Iter<'a, NodeId>>,
}

impl<'a> Children<'a> {
    fn new(items: &'a [NodeId]) -> Self {
        Self {
            inner: items.iter().copied(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Sequence-only operations.
///
/// Callbacks receive the store, the child handle and its position, so they
/// can read (but not mutate) the data while the operation runs.
pub trait SequenceOps {
    /// Append values; returns the new length.
    fn push<I>(&mut self, seq: NodeId, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Data>;

    /// Remove and return the last child.
    fn pop(&mut self, seq: NodeId) -> Result<Option<NodeId>>;

    /// Remove and return the first child.
    fn shift(&mut self, seq: NodeId) -> Result<Option<NodeId>>;

    /// Prepend values, keeping their order; returns the new length.
    fn unshift<I>(&mut self, seq: NodeId, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Data>;

    /// Remove `delete_count` children at `start` (all remaining when `None`)
    /// and insert `items` there. Returns a new sequence of the removed nodes.
    fn splice<I>(
        &mut self,
        seq: NodeId,
        start: i64,
        delete_count: Option<usize>,
        items: I,
    ) -> Result<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<Data>;

    fn reverse(&mut self, seq: NodeId) -> Result<NodeId>;

    /// Sort by text form with undefined values last.
    fn sort(&mut self, seq: NodeId) -> Result<NodeId>;

    /// Stable sort of the receiver in place; also returns a new sequence
    /// holding the same handles in sorted order.
    ///
    /// `compare` must be a total order. Otherwise the resulting order is
    /// unspecified and the sort may panic.
    fn sort_by<F>(&mut self, seq: NodeId, compare: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, NodeId) -> Ordering;

    /// Store `value` in every slot of `[start, end)`. Raw values are wrapped
    /// once per slot.
    fn fill(&mut self, seq: NodeId, value: impl Into<Data>, start: i64, end: Option<i64>)
        -> Result<NodeId>;

    /// Copy the handles of `[start, end)` to `target`, within the receiver.
    fn copy_within(&mut self, seq: NodeId, target: i64, start: i64, end: Option<i64>)
        -> Result<NodeId>;

    fn for_each<F>(&self, seq: NodeId, f: F) -> Result<()>
    where
        F: FnMut(&Self, NodeId, usize);

    /// Collect the callback's results into a plain vector.
    fn map<T, F>(&self, seq: NodeId, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Self, NodeId, usize) -> T;

    fn reduce<T, F>(&self, seq: NodeId, init: T, f: F) -> Result<T>
    where
        F: FnMut(T, &Self, NodeId, usize) -> T;

    fn reduce_right<T, F>(&self, seq: NodeId, init: T, f: F) -> Result<T>
    where
        F: FnMut(T, &Self, NodeId, usize) -> T;

    fn every<F>(&self, seq: NodeId, predicate: F) -> Result<bool>
    where
        F: FnMut(&Self, NodeId, usize) -> bool;

    fn some<F>(&self, seq: NodeId, predicate: F) -> Result<bool>
    where
        F: FnMut(&Self, NodeId, usize) -> bool;

    /// First matching child, or a fresh undefined node.
    fn find<F>(&mut self, seq: NodeId, predicate: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, usize) -> bool;

    fn find_index<F>(&self, seq: NodeId, predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(&Self, NodeId, usize) -> bool;

    /// New sequence of the matching children (shared, not copied).
    fn filter<F>(&mut self, seq: NodeId, predicate: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, usize) -> bool;

    /// Join the text form of every child with `separator`.
    fn join(&self, seq: NodeId, separator: &str) -> Result<String>;

    fn to_locale_string(&self, seq: NodeId) -> Result<String>;

    /// New sequence of `[index, child]` pairs; the child is shared.
    fn entries(&mut self, seq: NodeId) -> Result<NodeId>;

    fn values(&self, seq: NodeId) -> Result<Children<'_>>;

    fn keys(&self, seq: NodeId) -> Result<Range<usize>>;

    fn iter(&self, seq: NodeId) -> Result<Children<'_>>;
}

impl Store {
    /// Default sort order: undefined last, then by text form compared as
    /// UTF-16 code units.
    pub fn default_order(&self, a: NodeId, b: NodeId) -> Ordering {
        match (self.is_undefined(a), self.is_undefined(b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let (a, b) = (self.stringify(a), self.stringify(b));
                a.encode_utf16().cmp(b.encode_utf16())
            }
        }
    }

    fn wrap_all<I>(&mut self, values: I) -> Vec<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<Data>,
    {
        values.into_iter().map(|v| self.wrap(v)).collect()
    }
}

impl SequenceOps for Store {
    fn push<I>(&mut self, seq: NodeId, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Data>,
    {
        self.items(seq, "push")?;
        let added = self.wrap_all(values);
        let items = self.items_mut(seq, "push")?;
        items.extend(added);
        trace!(node = %seq, len = items.len(), "push");
        Ok(items.len())
    }

    fn pop(&mut self, seq: NodeId) -> Result<Option<NodeId>> {
        Ok(self.items_mut(seq, "pop")?.pop())
    }

    fn shift(&mut self, seq: NodeId) -> Result<Option<NodeId>> {
        let items = self.items_mut(seq, "shift")?;
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Some(items.remove(0)))
    }

    fn unshift<I>(&mut self, seq: NodeId, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Data>,
    {
        self.items(seq, "unshift")?;
        let added = self.wrap_all(values);
        let items = self.items_mut(seq, "unshift")?;
        let mut next = added;
        next.extend_from_slice(items);
        *items = next;
        trace!(node = %seq, len = items.len(), "unshift");
        Ok(items.len())
    }

    fn splice<I>(
        &mut self,
        seq: NodeId,
        start: i64,
        delete_count: Option<usize>,
        items: I,
    ) -> Result<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<Data>,
    {
        let len = self.items(seq, "splice")?.len();
        let from = relative_index(start, len);
        let count = delete_count.map_or(len - from, |n| n.min(len - from));
        let inserted = self.wrap_all(items);
        let removed: Vec<NodeId> = self
            .items_mut(seq, "splice")?
            .splice(from..from + count, inserted)
            .collect();
        trace!(node = %seq, from, removed = removed.len(), "splice");
        Ok(self.alloc(NodeData::Sequence(removed)))
    }

    fn reverse(&mut self, seq: NodeId) -> Result<NodeId> {
        self.items_mut(seq, "reverse")?.reverse();
        trace!(node = %seq, "reverse");
        Ok(seq)
    }

    fn sort(&mut self, seq: NodeId) -> Result<NodeId> {
        self.items(seq, "sort")?;
        self.sort_by(seq, Store::default_order)
    }

    fn sort_by<F>(&mut self, seq: NodeId, mut compare: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, NodeId) -> Ordering,
    {
        let this: &Self = self;
        let mut sorted = this.items(seq, "sort")?.to_vec();
        sorted.sort_by(|&a, &b| compare(this, a, b));
        self.items_mut(seq, "sort")?.clone_from(&sorted);
        trace!(node = %seq, len = sorted.len(), "sort");
        Ok(self.alloc(NodeData::Sequence(sorted)))
    }

    fn fill(
        &mut self,
        seq: NodeId,
        value: impl Into<Data>,
        start: i64,
        end: Option<i64>,
    ) -> Result<NodeId> {
        let len = self.items(seq, "fill")?.len();
        let (from, to) = relative_range(start, end, len);
        let value = value.into();
        let fresh: Vec<NodeId> = (from..to).map(|_| self.wrap(value.clone())).collect();
        self.items_mut(seq, "fill")?[from..to].copy_from_slice(&fresh);
        trace!(node = %seq, from, to, "fill");
        Ok(seq)
    }

    fn copy_within(
        &mut self,
        seq: NodeId,
        target: i64,
        start: i64,
        end: Option<i64>,
    ) -> Result<NodeId> {
        let items = self.items_mut(seq, "copy_within")?;
        let len = items.len();
        let to = relative_index(target, len);
        let (from, until) = relative_range(start, end, len);
        let count = (until - from).min(len - to);
        if count > 0 {
            items.copy_within(from..from + count, to);
        }
        trace!(node = %seq, to, from, count, "copy_within");
        Ok(seq)
    }

    fn for_each<F>(&self, seq: NodeId, mut f: F) -> Result<()>
    where
        F: FnMut(&Self, NodeId, usize),
    {
        for (i, &child) in self.items(seq, "for_each")?.iter().enumerate() {
            f(self, child, i);
        }
        Ok(())
    }

    fn map<T, F>(&self, seq: NodeId, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Self, NodeId, usize) -> T,
    {
        let items = self.items(seq, "map")?;
        Ok(items.iter().enumerate().map(|(i, &c)| f(self, c, i)).collect())
    }

    fn reduce<T, F>(&self, seq: NodeId, init: T, mut f: F) -> Result<T>
    where
        F: FnMut(T, &Self, NodeId, usize) -> T,
    {
        let items = self.items(seq, "reduce")?;
        Ok(items
            .iter()
            .enumerate()
            .fold(init, |acc, (i, &c)| f(acc, self, c, i)))
    }

    fn reduce_right<T, F>(&self, seq: NodeId, init: T, mut f: F) -> Result<T>
    where
        F: FnMut(T, &Self, NodeId, usize) -> T,
    {
        let items = self.items(seq, "reduce_right")?;
        Ok(items
            .iter()
            .enumerate()
            .rev()
            .fold(init, |acc, (i, &c)| f(acc, self, c, i)))
    }

    fn every<F>(&self, seq: NodeId, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Self, NodeId, usize) -> bool,
    {
        let items = self.items(seq, "every")?;
        Ok(items.iter().enumerate().all(|(i, &c)| predicate(self, c, i)))
    }

    fn some<F>(&self, seq: NodeId, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Self, NodeId, usize) -> bool,
    {
        let items = self.items(seq, "some")?;
        Ok(items.iter().enumerate().any(|(i, &c)| predicate(self, c, i)))
    }

    fn find<F>(&mut self, seq: NodeId, mut predicate: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, usize) -> bool,
    {
        let this: &Self = self;
        let found = this
            .items(seq, "find")?
            .iter()
            .enumerate()
            .find(|&(i, &c)| predicate(this, c, i))
            .map(|(_, &c)| c);
        Ok(found.unwrap_or_else(|| self.undefined()))
    }

    fn find_index<F>(&self, seq: NodeId, mut predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(&Self, NodeId, usize) -> bool,
    {
        let items = self.items(seq, "find_index")?;
        Ok(items
            .iter()
            .enumerate()
            .position(|(i, &c)| predicate(self, c, i)))
    }

    fn filter<F>(&mut self, seq: NodeId, mut predicate: F) -> Result<NodeId>
    where
        F: FnMut(&Self, NodeId, usize) -> bool,
    {
        let this: &Self = self;
        let kept: Vec<NodeId> = this
            .items(seq, "filter")?
            .iter()
            .enumerate()
            .filter(|&(i, &c)| predicate(this, c, i))
            .map(|(_, &c)| c)
            .collect();
        Ok(self.alloc(NodeData::Sequence(kept)))
    }

    fn join(&self, seq: NodeId, separator: &str) -> Result<String> {
        let parts: Vec<String> = self
            .items(seq, "join")?
            .iter()
            .map(|&c| self.stringify(c))
            .collect();
        Ok(parts.join(separator))
    }

    fn to_locale_string(&self, seq: NodeId) -> Result<String> {
        self.items(seq, "to_locale_string")?;
        Ok(self.stringify(seq))
    }

    fn entries(&mut self, seq: NodeId) -> Result<NodeId> {
        let items = self.items(seq, "entries")?.to_vec();
        let pairs: Vec<NodeId> = items
            .into_iter()
            .enumerate()
            .map(|(i, child)| {
                let index = self.wrap(i);
                self.alloc(NodeData::Sequence(vec![index, child]))
            })
            .collect();
        Ok(self.alloc(NodeData::Sequence(pairs)))
    }

    fn values(&self, seq: NodeId) -> Result<Children<'_>> {
        Ok(Children::new(self.items(seq, "values")?))
    }

    fn keys(&self, seq: NodeId) -> Result<Range<usize>> {
        Ok(0..self.items(seq, "keys")?.len())
    }

    fn iter(&self, seq: NodeId) -> Result<Children<'_>> {
        Ok(Children::new(self.items(seq, "iter")?))
    }
}
