//! Page identifier type.

use std::fmt;

/// Identifies a page in an index file.
///
/// Backed by `i32` to match the signed 32-bit page ids in the on-disk
/// format: the header stores the root pid as a signed integer, negative
/// ids are rejected as sibling/child links, and a cursor with a
/// non-positive pid is exhausted.
///
/// Page 0 is reserved for the index header, so node pages are always
/// numbered 1 or higher. A next-leaf link of `PageId(0)` means
/// "no next leaf".
///
/// # Example
/// ```
/// use treeline::PageId;
///
/// let page_id = PageId::new(42);
/// assert!(page_id.is_valid());
/// assert_eq!(page_id.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub i32);

impl PageId {
    /// Invalid/sentinel page ID.
    ///
    /// Used for "no page" or uninitialized state, e.g. the root pid of
    /// an empty index.
    pub const INVALID: PageId = PageId(-1);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: i32) -> Self {
        PageId(id)
    }

    /// Check if this page ID can address a page (non-negative).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Page({})", self.0)
        } else {
            write!(f, "Page(INVALID)")
        }
    }
}
