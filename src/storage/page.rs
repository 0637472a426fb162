//! Page - the fundamental 1KB unit of storage.
//!
//! A [`Page`] is a raw 1024-byte array that serves as the unit of I/O
//! between the index file and memory. Node codecs decode a `Page` into
//! a typed node and encode it back; nothing outside the codecs touches
//! page bytes directly.

use crate::common::config::PAGE_SIZE;

/// A page of data (1024 bytes).
///
/// This is the fundamental unit of I/O between disk and memory. The
/// [`PageFile`](crate::storage::PageFile) reads and writes whole pages;
/// the node codecs interpret their contents.
///
/// # Clone Implementation
/// `Page` does NOT implement `Clone` in production code so that copying
/// a full page stays explicit. A `#[cfg(test)]` Clone is provided for
/// tests.
///
/// # Example
/// ```
/// use treeline::storage::Page;
///
/// let mut page = Page::new();
/// page.as_mut_slice()[0] = 0xFF;
/// assert_eq!(page.as_slice()[0], 0xFF);
/// ```
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Create a new zeroed page.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }

    /// Get immutable slice of page data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of page data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Zero out the entire page.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Get the size of a page.
    #[inline]
    pub const fn size() -> usize {
        PAGE_SIZE
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

// Clone only available in tests - forces explicit copying in production
#[cfg(test)]
impl Clone for Page {
    fn clone(&self) -> Self {
        let mut new_page = Page::new();
        new_page.data.copy_from_slice(&self.data);
        new_page
    }
}

// ============================================================================
// TESTS
// ============================================================================
