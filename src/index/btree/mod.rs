//! Disk-resident B+Tree index.
//!
//! The tree lives in a [`PageFile`](crate::storage::PageFile): page 0
//! holds the index header (root page id and tree height), every other
//! page holds one node. Nodes come in two kinds with fixed layouts:
//!
//! - [`LeafNode`] - sorted (key, [`RecordId`](crate::common::RecordId))
//!   entries plus a next-leaf link, so the leaf level forms a singly
//!   linked list for range scans.
//! - [`InternalNode`] - a leading child pointer followed by sorted
//!   (key, child page id) pairs.
//!
//! [`BTreeIndex`] owns the header state and drives search and recursive
//! insertion; it touches pages only through the node codecs, which keep
//! all offset arithmetic behind their (de)serialization boundary.
//!
//! Both node kinds terminate their used entry prefix with a zero key,
//! which makes key 0 unusable as a real key. This is a limitation of
//! the on-disk format, kept for compatibility with existing index
//! files.

mod cursor;
mod internal;
mod leaf;
mod tree;

pub use cursor::IndexCursor;
pub use internal::{InternalEntry, InternalNode};
pub use leaf::{LeafEntry, LeafNode};
pub use tree::BTreeIndex;

use crate::common::config::{KEY_SIZE, PAGE_ID_SIZE, PAGE_SIZE};
use crate::common::RecordId;

/// On-disk width of one leaf entry: 4-byte key + 8-byte record locator.
pub const LEAF_ENTRY_SIZE: usize = KEY_SIZE + RecordId::SIZE;

/// Maximum number of entries a leaf node can hold.
///
/// The trailing 4 bytes of the page are the next-leaf link, the rest is
/// entry slots: (1024 - 4) / 12 = 85.
pub const LEAF_CAPACITY: usize = (PAGE_SIZE - PAGE_ID_SIZE) / LEAF_ENTRY_SIZE;

/// Byte offset of the next-leaf link within a leaf page.
pub const NEXT_LEAF_OFFSET: usize = PAGE_SIZE - PAGE_ID_SIZE;

/// On-disk width of one internal entry: 4-byte key + 4-byte child pid.
pub const INTERNAL_ENTRY_SIZE: usize = KEY_SIZE + PAGE_ID_SIZE;

/// Maximum number of (key, child) pairs an internal node can hold.
///
/// The leading child pointer field takes the first 8 bytes (4 used, 4
/// padding), leaving (1024 - 4) / 8 = 127 pair slots.
pub const INTERNAL_CAPACITY: usize = (PAGE_SIZE - PAGE_ID_SIZE) / INTERNAL_ENTRY_SIZE;

/// Byte offset of the first (key, child) pair within an internal page.
pub const INTERNAL_ENTRIES_OFFSET: usize = 8;

/// Read a little-endian i32 at `offset`.
pub(crate) fn read_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Write a little-endian i32 at `offset`.
pub(crate) fn write_i32(data: &mut [u8], offset: usize, value: i32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_layout_constants() {
        assert_eq!(LEAF_ENTRY_SIZE, 12);
        assert_eq!(LEAF_CAPACITY, 85);
        assert_eq!(NEXT_LEAF_OFFSET, 1020);
        // Entry slots and the next-leaf link tile the page exactly.
        assert!(LEAF_CAPACITY * LEAF_ENTRY_SIZE <= NEXT_LEAF_OFFSET);
    }

    #[test]
    fn test_internal_layout_constants() {
        assert_eq!(INTERNAL_ENTRY_SIZE, 8);
        assert_eq!(INTERNAL_CAPACITY, 127);
        // Leading pointer field plus 127 pairs fill the page exactly.
        assert_eq!(
            INTERNAL_ENTRIES_OFFSET + INTERNAL_CAPACITY * INTERNAL_ENTRY_SIZE,
            PAGE_SIZE
        );
    }

    #[test]
    fn test_i32_helpers_roundtrip() {
        let mut buf = [0u8; 16];
        write_i32(&mut buf, 4, -123456);
        assert_eq!(read_i32(&buf, 4), -123456);
        assert_eq!(read_i32(&buf, 0), 0);
    }
}
