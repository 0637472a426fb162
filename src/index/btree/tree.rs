//! Tree manager: header state, search, and recursive insertion.

use std::path::Path;

use crate::common::{Error, PageId, RecordId, Result};
use crate::storage::{Mode, Page, PageFile};

use super::cursor::IndexCursor;
use super::internal::InternalNode;
use super::leaf::LeafNode;
use super::{read_i32, write_i32};

/// The index header page.
const HEADER_PID: PageId = PageId(0);
/// Byte offset of the root page id within the header page.
const ROOT_PID_OFFSET: usize = 0;
/// Byte offset of the tree height within the header page.
const HEIGHT_OFFSET: usize = 4;

/// Outcome of inserting into one level of the tree.
///
/// Each level reports at most one split to its caller, so a single
/// insertion can grow the tree height by at most one.
enum InsertEffect {
    /// The entry fit; nothing for the parent to do.
    None,
    /// The node split. The parent must record `key` as the separator
    /// for the new sibling at `pid`.
    Split { key: i32, pid: PageId },
}

/// A disk-resident B+Tree index over (i32 key, [`RecordId`]) pairs.
///
/// The tree holds only two pieces of in-memory state, the root page id
/// and the height; everything else lives in the page file. Height 0 is
/// an empty tree, height 1 a single leaf root, height 2 and up an
/// internal root.
///
/// # Concurrency
/// Single writer, no concurrent readers. Callers must serialize access
/// externally; there is no locking, versioning, or crash recovery.
///
/// # Example
/// ```no_run
/// use treeline::{BTreeIndex, Mode, RecordId};
///
/// let mut index = BTreeIndex::open("table.idx", Mode::ReadWrite).unwrap();
/// index.insert(42, RecordId::new(3, 0)).unwrap();
///
/// let (mut cursor, found) = index.locate(42).unwrap();
/// assert!(found);
/// let (key, rid) = index.read_forward(&mut cursor).unwrap();
/// assert_eq!((key, rid), (42, RecordId::new(3, 0)));
///
/// index.close().unwrap();
/// ```
pub struct BTreeIndex {
    pf: PageFile,
    /// Page of the root node; `PageId::INVALID` while the tree is empty.
    root_pid: PageId,
    /// Number of node levels, root to leaf inclusive. 0 = empty tree.
    height: i32,
}

impl BTreeIndex {
    /// Open an index file, creating it in [`Mode::ReadWrite`] if missing.
    ///
    /// A file with zero pages is a freshly created index; its header is
    /// implicit (no root, height 0) and nothing is written until
    /// [`close`](Self::close).
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> Result<Self> {
        let mut pf = PageFile::open(path, mode)?;

        let mut root_pid = PageId::INVALID;
        let mut height = 0;

        if pf.page_count() > 0 {
            let header = pf.read_page(HEADER_PID)?;
            let stored_root = read_i32(header.as_slice(), ROOT_PID_OFFSET);
            let stored_height = read_i32(header.as_slice(), HEIGHT_OFFSET);

            // Adopt the stored header only if both fields are sane; a
            // zeroed header page means the index is still empty.
            if stored_root > 0 && stored_height > 0 {
                root_pid = PageId::new(stored_root);
                height = stored_height;
            }
        }

        Ok(Self {
            pf,
            root_pid,
            height,
        })
    }

    /// Persist the header and close the index file.
    ///
    /// The header is only written in [`Mode::ReadWrite`]; a read-only
    /// index cannot have changed it.
    pub fn close(mut self) -> Result<()> {
        if self.pf.mode() == Mode::ReadWrite {
            if self.pf.page_count() == 0 {
                // Brand-new file: reserve the header page.
                self.pf.allocate_page()?;
            }

            let mut header = Page::new();
            write_i32(header.as_mut_slice(), ROOT_PID_OFFSET, self.root_pid.0);
            write_i32(header.as_mut_slice(), HEIGHT_OFFSET, self.height);
            self.pf.write_page(HEADER_PID, &header)?;
        }

        self.pf.close()
    }

    /// Number of node levels from root to leaf inclusive; 0 when empty.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Page id of the root node; `PageId::INVALID` while empty.
    #[inline]
    pub fn root_pid(&self) -> PageId {
        self.root_pid
    }

    /// Insert a (key, rid) pair into the index.
    ///
    /// Descends to the owning leaf and inserts there; full nodes split
    /// on the way back up, and a split of the old root grows the tree
    /// by exactly one level.
    pub fn insert(&mut self, key: i32, rid: RecordId) -> Result<()> {
        // Empty tree: the first leaf becomes the root.
        if self.height == 0 {
            let mut leaf = LeafNode::new();
            leaf.insert(key, rid)?;

            if self.pf.page_count() == 0 {
                // Reserve page 0 for the header before any node page.
                self.pf.allocate_page()?;
            }
            let root_pid = self.pf.allocate_page()?;
            leaf.store(&mut self.pf, root_pid)?;

            self.root_pid = root_pid;
            self.height = 1;
            return Ok(());
        }

        match self.insert_recursive(key, rid, self.root_pid, 1)? {
            InsertEffect::None => Ok(()),
            InsertEffect::Split {
                key: mid_key,
                pid: sibling_pid,
            } => {
                // The old root split: grow a new root over both halves.
                let root = InternalNode::initialize_root(self.root_pid, mid_key, sibling_pid)?;
                let root_pid = self.pf.allocate_page()?;
                root.store(&mut self.pf, root_pid)?;

                self.root_pid = root_pid;
                self.height += 1;
                Ok(())
            }
        }
    }

    /// Insert at `pid` (level `level`, counted from the root at 1) and
    /// report a split, if any, to the caller.
    fn insert_recursive(
        &mut self,
        key: i32,
        rid: RecordId,
        pid: PageId,
        level: i32,
    ) -> Result<InsertEffect> {
        if level == self.height {
            // Leaf level.
            let mut leaf = LeafNode::load(&mut self.pf, pid)?;

            match leaf.insert(key, rid) {
                Ok(()) => {
                    leaf.store(&mut self.pf, pid)?;
                    Ok(InsertEffect::None)
                }
                Err(Error::NodeFull) => {
                    let mut sibling = LeafNode::new();
                    let sibling_key = leaf.insert_and_split(key, rid, &mut sibling)?;

                    let sibling_pid = self.pf.allocate_page()?;
                    leaf.set_next_leaf(sibling_pid)?;

                    sibling.store(&mut self.pf, sibling_pid)?;
                    leaf.store(&mut self.pf, pid)?;

                    Ok(InsertEffect::Split {
                        key: sibling_key,
                        pid: sibling_pid,
                    })
                }
                Err(e) => Err(e),
            }
        } else {
            // Internal level: descend, then handle a reported split.
            let mut node = InternalNode::load(&mut self.pf, pid)?;
            let child = node.locate_child_ptr(key);

            match self.insert_recursive(key, rid, child, level + 1)? {
                InsertEffect::None => Ok(InsertEffect::None),
                InsertEffect::Split {
                    key: promoted,
                    pid: new_child,
                } => match node.insert(promoted, new_child) {
                    Ok(()) => {
                        node.store(&mut self.pf, pid)?;
                        Ok(InsertEffect::None)
                    }
                    Err(Error::NodeFull) => {
                        let mut sibling = InternalNode::new();
                        let mid_key = node.insert_and_split(promoted, new_child, &mut sibling)?;

                        let sibling_pid = self.pf.allocate_page()?;
                        sibling.store(&mut self.pf, sibling_pid)?;
                        node.store(&mut self.pf, pid)?;

                        Ok(InsertEffect::Split {
                            key: mid_key,
                            pid: sibling_pid,
                        })
                    }
                    Err(e) => Err(e),
                },
            }
        }
    }

    /// Find the leaf position for `search_key`.
    ///
    /// Returns the cursor at the matching entry and `true` on an exact
    /// match, or the cursor at the insertion point and `false` when the
    /// key is absent. On an empty tree the cursor is already exhausted.
    pub fn locate(&mut self, search_key: i32) -> Result<(IndexCursor, bool)> {
        if self.height == 0 {
            return Ok((IndexCursor::new(PageId::new(0), 0), false));
        }

        let mut pid = self.root_pid;
        for _ in 1..self.height {
            let node = InternalNode::load(&mut self.pf, pid)?;
            pid = node.locate_child_ptr(search_key);
        }

        let leaf = LeafNode::load(&mut self.pf, pid)?;
        let (eid, found) = leaf.locate(search_key);
        Ok((IndexCursor::new(pid, eid), found))
    }

    /// Read the entry under `cursor` and advance it one position.
    ///
    /// Moving past the last entry of a leaf follows the next-leaf link;
    /// past the last leaf, the cursor becomes exhausted and subsequent
    /// calls fail.
    ///
    /// # Errors
    /// `Error::InvalidCursor` if the cursor is exhausted or was never
    /// positioned on a node page.
    pub fn read_forward(&mut self, cursor: &mut IndexCursor) -> Result<(i32, RecordId)> {
        if cursor.is_exhausted() {
            return Err(Error::InvalidCursor(cursor.pid.0));
        }

        let leaf = LeafNode::load(&mut self.pf, cursor.pid)?;
        let entry = leaf.entry(cursor.eid)?;

        if cursor.eid + 1 == leaf.entry_count() {
            cursor.pid = leaf.next_leaf();
            cursor.eid = 0;
        } else {
            cursor.eid += 1;
        }

        Ok((entry.key, entry.rid))
    }
}

// ============================================================================
// TESTS
// ============================================================================
