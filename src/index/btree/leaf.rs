//! Leaf node codec.
//!
//! A leaf node stores sorted (key, record id) entries and a link to the
//! next leaf, so the bottom level of the tree can be scanned in key
//! order without touching internal nodes.

use crate::common::{Error, PageId, RecordId, Result};
use crate::storage::{Page, PageFile};

use super::{read_i32, write_i32, LEAF_CAPACITY, LEAF_ENTRY_SIZE, NEXT_LEAF_OFFSET};

/// One (key, record id) pair in a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEntry {
    pub key: i32,
    pub rid: RecordId,
}

/// Decoded contents of a leaf page.
///
/// # Page Layout
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       12    entry 0 (4-byte key, 8-byte RecordId)
/// 12      12    entry 1
/// ...
/// 1008    12    entry 84
/// 1020    4     next-leaf page id (0 = none)
/// ```
///
/// Entries are sorted ascending by key and occupy a prefix of the slot
/// array; a zero key terminates the used prefix, and the tail is
/// zero-filled. All offset arithmetic stays inside [`from_page`] and
/// [`to_page`].
///
/// [`from_page`]: LeafNode::from_page
/// [`to_page`]: LeafNode::to_page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    entries: Vec<LeafEntry>,
    next: PageId,
}

impl LeafNode {
    /// Create an empty leaf with no next-leaf link.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next: PageId::new(0),
        }
    }

    /// Decode a leaf node from a raw page.
    ///
    /// Scans entry slots from offset 0 until a zero key or the slot
    /// array is exhausted. No validation beyond that.
    pub fn from_page(page: &Page) -> Self {
        let data = page.as_slice();

        let mut entries = Vec::new();
        for slot in 0..LEAF_CAPACITY {
            let offset = slot * LEAF_ENTRY_SIZE;
            let key = read_i32(data, offset);
            if key == 0 {
                break;
            }
            let rid = RecordId::from_bytes(&data[offset + 4..offset + LEAF_ENTRY_SIZE]);
            entries.push(LeafEntry { key, rid });
        }

        let next = PageId::new(read_i32(data, NEXT_LEAF_OFFSET));
        Self { entries, next }
    }

    /// Encode this leaf node into a fresh page.
    ///
    /// Unused trailing slots are zero-filled, so encoding a decoded
    /// page reproduces it byte for byte.
    pub fn to_page(&self) -> Page {
        let mut page = Page::new();
        let data = page.as_mut_slice();

        for (slot, entry) in self.entries.iter().enumerate() {
            let offset = slot * LEAF_ENTRY_SIZE;
            write_i32(data, offset, entry.key);
            data[offset + 4..offset + LEAF_ENTRY_SIZE].copy_from_slice(&entry.rid.to_bytes());
        }

        write_i32(data, NEXT_LEAF_OFFSET, self.next.0);
        page
    }

    /// Read and decode the node stored at `pid`.
    pub fn load(pf: &mut PageFile, pid: PageId) -> Result<Self> {
        Ok(Self::from_page(&pf.read_page(pid)?))
    }

    /// Encode and write this node to `pid`.
    pub fn store(&self, pf: &mut PageFile, pid: PageId) -> Result<()> {
        pf.write_page(pid, &self.to_page())
    }

    /// Number of entries currently stored.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Insert a (key, rid) pair, keeping entries sorted.
    ///
    /// The new entry lands before the first existing key that is
    /// greater than or equal to `key`; everything after it shifts one
    /// slot right. Duplicate keys are permitted and get no special
    /// handling.
    ///
    /// # Errors
    /// `Error::NodeFull` if the node already holds [`LEAF_CAPACITY`]
    /// entries. The node is left unchanged in that case.
    pub fn insert(&mut self, key: i32, rid: RecordId) -> Result<()> {
        if self.entries.len() == LEAF_CAPACITY {
            return Err(Error::NodeFull);
        }

        let at = self.entries.partition_point(|e| e.key < key);
        self.entries.insert(at, LeafEntry { key, rid });
        Ok(())
    }

    /// Insert into a full node by splitting it with `sibling`.
    ///
    /// The first `ceil((capacity + 1) / 2)` entries stay here; the rest
    /// move to `sibling`, which also inherits this node's next-leaf
    /// link. The new entry then goes to whichever node owns its key
    /// range (compared against the sibling's lowest key).
    ///
    /// Returns the sibling's first key, which the caller must promote
    /// into the parent. The caller is also responsible for pointing
    /// this node's next-leaf link at the sibling's page.
    ///
    /// # Errors
    /// `Error::InvalidState` if this node is not exactly full or if
    /// `sibling` is not empty.
    pub fn insert_and_split(
        &mut self,
        key: i32,
        rid: RecordId,
        sibling: &mut LeafNode,
    ) -> Result<i32> {
        if self.entries.len() < LEAF_CAPACITY {
            return Err(Error::InvalidState("split of a node that is not full"));
        }
        if sibling.entry_count() != 0 {
            return Err(Error::InvalidState("sibling is not empty"));
        }

        let retained = (LEAF_CAPACITY + 1).div_ceil(2);
        sibling.entries = self.entries.split_off(retained);
        sibling.next = self.next;

        // The sibling owns keys from its first key upward.
        if key >= sibling.entries[0].key {
            sibling.insert(key, rid)?;
        } else {
            self.insert(key, rid)?;
        }

        Ok(sibling.entries[0].key)
    }

    /// Find `search_key` among the stored entries.
    ///
    /// Returns `(eid, true)` on an exact match, or
    /// `(insertion point, false)` when absent; the insertion point is
    /// the index of the first key greater than `search_key` (possibly
    /// one past the last entry).
    pub fn locate(&self, search_key: i32) -> (usize, bool) {
        for (eid, entry) in self.entries.iter().enumerate() {
            if entry.key == search_key {
                return (eid, true);
            }
            if entry.key > search_key {
                return (eid, false);
            }
        }
        (self.entries.len(), false)
    }

    /// Read the entry at index `eid`.
    ///
    /// # Errors
    /// `Error::NoSuchRecord` if `eid` is outside `[0, entry_count())`.
    pub fn entry(&self, eid: usize) -> Result<LeafEntry> {
        self.entries.get(eid).copied().ok_or(Error::NoSuchRecord)
    }

    /// Page id of the next leaf, `PageId(0)` if none.
    #[inline]
    pub fn next_leaf(&self) -> PageId {
        self.next
    }

    /// Set the next-leaf link.
    ///
    /// # Errors
    /// `Error::InvalidPointer` for negative page ids.
    pub fn set_next_leaf(&mut self, pid: PageId) -> Result<()> {
        if pid.0 < 0 {
            return Err(Error::InvalidPointer(pid.0));
        }
        self.next = pid;
        Ok(())
    }
}

impl Default for LeafNode {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
