//! Cursor over leaf entries.

use crate::common::PageId;

/// Position of one logical entry at the leaf level.
///
/// A cursor names a leaf page and an entry index within it. It is
/// produced by [`BTreeIndex::locate`] and consumed by
/// [`BTreeIndex::read_forward`], which advances it entry by entry,
/// hopping to the next leaf through the next-leaf link when a leaf is
/// exhausted. Once the last leaf runs out, the page id becomes 0 and
/// the cursor reports itself exhausted.
///
/// [`BTreeIndex::locate`]: super::BTreeIndex::locate
/// [`BTreeIndex::read_forward`]: super::BTreeIndex::read_forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCursor {
    /// Leaf page holding the entry.
    pub pid: PageId,
    /// Entry index within the leaf.
    pub eid: usize,
}

impl IndexCursor {
    /// Create a cursor at the given position.
    #[inline]
    pub fn new(pid: PageId, eid: usize) -> Self {
        Self { pid, eid }
    }

    /// Whether this cursor has run off the end of the index.
    ///
    /// Node pages are numbered 1 and up, so any page id at or below 0
    /// cannot point at a leaf entry.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pid.0 <= 0
    }
}
