//! Persistent, structurally shared history of variant-local changes.
//!
//! A [`History`] is a singly-linked list of reference-counted nodes whose
//! head is the most recent record. Pushing allocates a new head that points
//! at the previous one; existing nodes are never touched. Cloning copies
//! the head pointer only, so a cloned variant starts as an alias of its
//! parent's history and both diverge independently afterwards.

use std::sync::Arc;

use gridlog_types::ChangeRecord;

#[derive(Debug)]
struct Node {
    record: ChangeRecord,
    next: Option<Arc<Node>>,
}

/// Persistent list of change records, newest first.
///
/// Records must be pushed in ascending sequence order; the changelog is the
/// only writer and assigns sequences monotonically.
#[derive(Debug, Clone, Default)]
pub struct History {
    head: Option<Arc<Node>>,
    len: usize,
}

impl History {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of records reachable from this head.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the history holds no records.
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Push a record as the new head.
    ///
    /// Other histories aliasing the previous head are unaffected.
    pub fn push(&mut self, record: ChangeRecord) {
        let next = self.head.take();
        self.head = Some(Arc::new(Node { record, next }));
        self.len = self.len.saturating_add(1);
    }

    /// The most recently pushed record.
    pub fn latest(&self) -> Option<&ChangeRecord> {
        self.head.as_deref().map(|node| &node.record)
    }

    /// Iterate from the newest record to the oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Collect references in ascending sequence order.
    pub fn to_ascending(&self) -> Vec<&ChangeRecord> {
        let mut records: Vec<&ChangeRecord> = Vec::with_capacity(self.len);
        records.extend(self.iter());
        records.reverse();
        records
    }

    /// Whether both histories share the same head node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Drop for History {
    // Unlink uniquely owned nodes one by one so long chains do not recurse.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Newest-first iterator over a [`History`].
#[derive(Debug)]
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ChangeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.record)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a ChangeRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
