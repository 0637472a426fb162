//! Internal node codec.
//!
//! An internal node routes a search key to one of its children. The
//! leading pointer covers keys below the first stored key; pair `i`
//! covers keys in `[pair[i].key, pair[i+1].key)`, with the last pair
//! extending to positive infinity.

use crate::common::{Error, PageId, Result};
use crate::storage::{Page, PageFile};

use super::{
    read_i32, write_i32, INTERNAL_CAPACITY, INTERNAL_ENTRIES_OFFSET, INTERNAL_ENTRY_SIZE,
};

/// One (key, child page id) pair in an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalEntry {
    pub key: i32,
    pub child: PageId,
}

/// Decoded contents of an internal page.
///
/// # Page Layout
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     leading child page id
/// 4       4     unused (padding)
/// 8       8     pair 0 (4-byte key, 4-byte child page id)
/// 16      8     pair 1
/// ...
/// 1016    8     pair 126
/// ```
///
/// Pairs are sorted ascending by key; a zero key terminates the used
/// prefix, same as in leaf nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    first_child: PageId,
    entries: Vec<InternalEntry>,
}

impl InternalNode {
    /// Create an empty internal node.
    pub fn new() -> Self {
        Self {
            first_child: PageId::new(0),
            entries: Vec::new(),
        }
    }

    /// Build a brand-new root over two children separated by `key`.
    ///
    /// Used exactly once per root split: `left` keeps the keys below
    /// `key`, `right` the keys at or above it.
    pub fn initialize_root(left: PageId, key: i32, right: PageId) -> Result<Self> {
        let mut node = Self::new();
        node.first_child = left;
        node.insert(key, right)?;
        Ok(node)
    }

    /// Decode an internal node from a raw page.
    pub fn from_page(page: &Page) -> Self {
        let data = page.as_slice();

        let first_child = PageId::new(read_i32(data, 0));

        let mut entries = Vec::new();
        for slot in 0..INTERNAL_CAPACITY {
            let offset = INTERNAL_ENTRIES_OFFSET + slot * INTERNAL_ENTRY_SIZE;
            let key = read_i32(data, offset);
            if key == 0 {
                break;
            }
            let child = PageId::new(read_i32(data, offset + 4));
            entries.push(InternalEntry { key, child });
        }

        Self {
            first_child,
            entries,
        }
    }

    /// Encode this internal node into a fresh page.
    pub fn to_page(&self) -> Page {
        let mut page = Page::new();
        let data = page.as_mut_slice();

        write_i32(data, 0, self.first_child.0);

        for (slot, entry) in self.entries.iter().enumerate() {
            let offset = INTERNAL_ENTRIES_OFFSET + slot * INTERNAL_ENTRY_SIZE;
            write_i32(data, offset, entry.key);
            write_i32(data, offset + 4, entry.child.0);
        }

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

    /// Number of (key, child) pairs currently stored.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Child pointer for keys below the first stored key.
    #[inline]
    pub fn first_child(&self) -> PageId {
        self.first_child
    }

    /// Insert a (key, child) pair, keeping pairs sorted.
    ///
    /// # Errors
    /// `Error::NodeFull` if the node already holds
    /// [`INTERNAL_CAPACITY`] pairs. The node is left unchanged.
    pub fn insert(&mut self, key: i32, child: PageId) -> Result<()> {
        if self.entries.len() == INTERNAL_CAPACITY {
            return Err(Error::NodeFull);
        }

        let at = self.entries.partition_point(|e| e.key < key);
        self.entries.insert(at, InternalEntry { key, child });
        Ok(())
    }

    /// Insert into a full node by splitting it with `sibling`.
    ///
    /// Unlike a leaf split, the promoted middle key is removed from the
    /// keyspace of both halves; only the parent stores it. The middle
    /// key is picked among three candidates:
    ///
    /// - the last key of the retained half, when the new key sorts
    ///   below it (its child becomes the sibling's leading pointer and
    ///   the new pair goes into the retained half);
    /// - the first key of the departing half, when the new key sorts
    ///   above it (symmetric: its child leads the sibling and the new
    ///   pair goes into the sibling);
    /// - the new key itself otherwise (it lands in neither half and its
    ///   child becomes the sibling's leading pointer).
    ///
    /// Returns the promoted middle key.
    ///
    /// # Errors
    /// `Error::InvalidState` if this node is not exactly full or if
    /// `sibling` is not empty.
    pub fn insert_and_split(
        &mut self,
        key: i32,
        child: PageId,
        sibling: &mut InternalNode,
    ) -> Result<i32> {
        if self.entries.len() < INTERNAL_CAPACITY {
            return Err(Error::InvalidState("split of a node that is not full"));
        }
        if sibling.entry_count() != 0 {
            return Err(Error::InvalidState("sibling is not empty"));
        }

        let retained = (INTERNAL_CAPACITY + 1).div_ceil(2);
        let last_retained = self.entries[retained - 1];
        let first_departing = self.entries[retained];

        if key < last_retained.key {
            // Promote the last retained pair; its child leads the sibling.
            sibling.entries = self.entries.split_off(retained);
            sibling.first_child = last_retained.child;
            self.entries.truncate(retained - 1);
            self.insert(key, child)?;
            Ok(last_retained.key)
        } else if key > first_departing.key {
            // Promote the first departing pair; its child leads the sibling.
            sibling.entries = self.entries.split_off(retained + 1);
            sibling.first_child = first_departing.child;
            self.entries.truncate(retained);
            sibling.insert(key, child)?;
            Ok(first_departing.key)
        } else {
            // The new key is the middle key; it is stored in neither half.
            sibling.entries = self.entries.split_off(retained);
            sibling.first_child = child;
            Ok(key)
        }
    }

    /// Find the child pointer to follow for `search_key`.
    ///
    /// Starts at the leading pointer and walks the pairs left to right
    /// while `search_key` is at or above the pair's key.
    pub fn locate_child_ptr(&self, search_key: i32) -> PageId {
        let mut pid = self.first_child;
        for entry in &self.entries {
            if search_key >= entry.key {
                pid = entry.child;
            } else {
                break;
            }
        }
        pid
    }

    /// Read the pair at index `eid`.
    ///
    /// # Errors
    /// `Error::NoSuchRecord` if `eid` is outside `[0, entry_count())`.
    pub fn entry(&self, eid: usize) -> Result<InternalEntry> {
        self.entries.get(eid).copied().ok_or(Error::NoSuchRecord)
    }
}

impl Default for InternalNode {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Full node with keys 10, 20, ..., 1270 and child = key / 10 + 100.
    fn full_internal() -> InternalNode {
        let mut node = InternalNode::new();
        node.first_child = PageId::new(99);
        for i in 1..=INTERNAL_CAPACITY as i32 {
            node.insert(10 * i, PageId::new(100 + i)).unwrap();
        }
        node
    }

    fn keys_of(node: &InternalNode) -> Vec<i32> {
        (0..node.entry_count())
            .map(|eid| node.entry(eid).unwrap().key)
            .collect()
    }

    #[test]
    fn test_new_internal_is_empty() {
        let node = InternalNode::new();
        assert_eq!(node.entry_count(), 0);
        assert_eq!(node.first_child(), PageId::new(0));
    }

    #[test]
    fn test_insert_keeps_sorted_order() {
        let mut node = InternalNode::new();
        for key in [30, 10, 20] {
            node.insert(key, PageId::new(key)).unwrap();
        }

        assert_eq!(keys_of(&node), vec![10, 20, 30]);
        assert_eq!(node.entry(1).unwrap().child, PageId::new(20));
    }

    #[test]
    fn test_insert_full_node_fails_unchanged() {
        let mut node = full_internal();
        let before = node.clone();

        assert!(matches!(
            node.insert(5, PageId::new(1)),
            Err(Error::NodeFull)
        ));
        assert_eq!(node, before);
    }

    #[test]
    fn test_locate_child_ptr_ranges() {
        let mut node = InternalNode::new();
        node.first_child = PageId::new(1);
        node.insert(10, PageId::new(2)).unwrap();
        node.insert(20, PageId::new(3)).unwrap();

        // Below the first key: leading pointer.
        assert_eq!(node.locate_child_ptr(5), PageId::new(1));
        // At a separator key: the pair's own child.
        assert_eq!(node.locate_child_ptr(10), PageId::new(2));
        assert_eq!(node.locate_child_ptr(15), PageId::new(2));
        assert_eq!(node.locate_child_ptr(20), PageId::new(3));
        // Above everything: the last child.
        assert_eq!(node.locate_child_ptr(1000), PageId::new(3));
    }

    #[test]
    fn test_initialize_root() {
        let root = InternalNode::initialize_root(PageId::new(4), 50, PageId::new(7)).unwrap();

        assert_eq!(root.entry_count(), 1);
        assert_eq!(root.first_child(), PageId::new(4));
        assert_eq!(root.entry(0).unwrap().key, 50);
        assert_eq!(root.entry(0).unwrap().child, PageId::new(7));

        assert_eq!(root.locate_child_ptr(49), PageId::new(4));
        assert_eq!(root.locate_child_ptr(50), PageId::new(7));
    }

    #[test]
    fn test_page_roundtrip_is_byte_identical() {
        let mut node = InternalNode::new();
        node.first_child = PageId::new(3);
        node.insert(10, PageId::new(4)).unwrap();
        node.insert(20, PageId::new(5)).unwrap();

        let page = node.to_page();
        let reloaded = InternalNode::from_page(&page);
        assert_eq!(reloaded, node);
        assert_eq!(reloaded.to_page().as_slice(), page.as_slice());
    }

    #[test]
    fn test_page_layout_bytes() {
        let mut node = InternalNode::new();
        node.first_child = PageId::new(0x01020304);
        node.insert(7, PageId::new(9)).unwrap();

        let page = node.to_page();
        let data = page.as_slice();

        // Leading child pointer at offset 0, little-endian.
        assert_eq!(&data[0..4], &[0x04, 0x03, 0x02, 0x01]);
        // Four padding bytes stay zero.
        assert_eq!(&data[4..8], &[0, 0, 0, 0]);
        // First pair at offset 8.
        assert_eq!(&data[8..12], &7i32.to_le_bytes());
        assert_eq!(&data[12..16], &9i32.to_le_bytes());
        // Second slot unused: zero key terminator.
        assert_eq!(&data[16..20], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_split_preconditions() {
        let mut not_full = InternalNode::new();
        not_full.insert(1, PageId::new(1)).unwrap();
        let mut sibling = InternalNode::new();
        assert!(matches!(
            not_full.insert_and_split(2, PageId::new(2), &mut sibling),
            Err(Error::InvalidState(_))
        ));

        let mut full = full_internal();
        let mut dirty_sibling = InternalNode::new();
        dirty_sibling.insert(5, PageId::new(5)).unwrap();
        assert!(matches!(
            full.insert_and_split(5, PageId::new(5), &mut dirty_sibling),
            Err(Error::InvalidState(_))
        ));
    }

    /// Shared checks for all three split shapes.
    fn check_split(
        node: &InternalNode,
        sibling: &InternalNode,
        promoted: i32,
        inserted_key: i32,
        inserted_child: PageId,
    ) {
        // One key was promoted out of 127 + 1 total.
        assert_eq!(
            node.entry_count() + sibling.entry_count(),
            INTERNAL_CAPACITY
        );

        // Left keys < promoted < right keys; promoted stored in neither.
        for key in keys_of(node) {
            assert!(key < promoted);
        }
        for key in keys_of(sibling) {
            assert!(key > promoted);
        }

        // The inserted pair survives in exactly one half, unless its key
        // was itself promoted (then its child leads the sibling).
        let holds = |n: &InternalNode| {
            (0..n.entry_count()).any(|eid| {
                let e = n.entry(eid).unwrap();
                e.key == inserted_key && e.child == inserted_child
            })
        };
        if inserted_key == promoted {
            assert_eq!(sibling.first_child(), inserted_child);
        } else {
            assert!(holds(node) ^ holds(sibling));
        }
    }

    #[test]
    fn test_split_new_key_below_retained_half() {
        let mut node = full_internal(); // keys 10..=1270 step 10
        let mut sibling = InternalNode::new();

        let promoted = node
            .insert_and_split(5, PageId::new(500), &mut sibling)
            .unwrap();

        // Last key of the retained half (64th pair: key 640) is promoted
        // and its child becomes the sibling's leading pointer.
        assert_eq!(promoted, 640);
        assert_eq!(sibling.first_child(), PageId::new(164));
        check_split(&node, &sibling, promoted, 5, PageId::new(500));
    }

    #[test]
    fn test_split_new_key_above_departing_half() {
        let mut node = full_internal();
        let mut sibling = InternalNode::new();

        let promoted = node
            .insert_and_split(9999, PageId::new(500), &mut sibling)
            .unwrap();

        // First key of the departing half (65th pair: key 650) is promoted.
        assert_eq!(promoted, 650);
        assert_eq!(sibling.first_child(), PageId::new(165));
        check_split(&node, &sibling, promoted, 9999, PageId::new(500));
    }

    #[test]
    fn test_split_new_key_is_middle_key() {
        let mut node = full_internal();
        let mut sibling = InternalNode::new();

        // 645 falls between the retained half's last key (640) and the
        // departing half's first key (650).
        let promoted = node
            .insert_and_split(645, PageId::new(500), &mut sibling)
            .unwrap();

        assert_eq!(promoted, 645);
        assert_eq!(sibling.first_child(), PageId::new(500));
        check_split(&node, &sibling, promoted, 645, PageId::new(500));
    }
}
