//! PageFile - low-level file I/O for index pages.
//!
//! The [`PageFile`] handles all direct file operations:
//! - Reading and writing pages
//! - Allocating new pages
//! - Managing the index file

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;

/// Access mode for an index file.
///
/// Mirrors the two open modes of the record store: readers open an
/// existing file, writers create it on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Open an existing file for reading only.
    ReadOnly,
    /// Open for reading and writing, creating the file if missing.
    ReadWrite,
}

/// Manages disk I/O for a single index file.
///
/// # File Layout
/// The index is stored as a single file with pages laid out sequentially:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ (1KB)   │ (1KB)   │ (1KB)   │         │ (1KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      1024     2048    ...    N×1024
/// ```
///
/// Page N is located at file offset `N × PAGE_SIZE`. Page 0 is reserved
/// by the index for its header and is never handed out as a node page.
///
/// # Thread Safety
/// `PageFile` is **single-threaded**. The index assumes exactly one
/// writer and no concurrent readers; callers must serialize access
/// externally.
///
/// # Durability
/// Writes go to the OS page cache; `close()` issues the one `fsync()`.
/// There is no write-ahead log or page-level commit protocol; a crash
/// mid-operation can leave the file inconsistent.
pub struct PageFile {
    file: File,
    mode: Mode,
    /// Number of pages in the file.
    page_count: i32,
}

impl PageFile {
    /// Create a new index file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            mode: Mode::ReadWrite,
            page_count: 0,
        })
    }

    /// Open an index file in the given mode.
    ///
    /// In [`Mode::ReadWrite`] the file is created if it does not exist;
    /// in [`Mode::ReadOnly`] a missing file is an error.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> Result<Self> {
        let file = match mode {
            Mode::ReadOnly => OpenOptions::new().read(true).open(&path)?,
            Mode::ReadWrite => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&path)?,
        };

        // Calculate page count from file size
        let metadata = file.metadata()?;
        let page_count = (metadata.len() / PAGE_SIZE as u64) as i32;

        Ok(Self {
            file,
            mode,
            page_count,
        })
    }

    /// Read a page from disk.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the page doesn't exist.
    pub fn read_page(&mut self, page_id: PageId) -> Result<Page> {
        if page_id.0 < 0 || page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id.0));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut page = Page::new();
        self.file.read_exact(page.as_mut_slice())?;

        Ok(page)
    }

    /// Write a page to disk.
    ///
    /// The page must have been previously allocated with `allocate_page()`.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the page hasn't been allocated.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        if page_id.0 < 0 || page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id.0));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;

        Ok(())
    }

    /// Allocate a new page at the end of the file.
    ///
    /// Returns the `PageId` of the newly allocated page. The page is
    /// initialized with zeros.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        let page_id = PageId::new(self.page_count);

        // Extend file with a zeroed page
        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let zeros = [0u8; PAGE_SIZE];
        self.file.write_all(&zeros)?;

        self.page_count += 1;
        Ok(page_id)
    }

    /// Get the number of pages in the file.
    #[inline]
    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    /// The id one past the last allocated page (the next free page id).
    #[inline]
    pub fn end_pid(&self) -> PageId {
        PageId::new(self.page_count)
    }

    /// The mode this file was opened in.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Flush and close the file.
    pub fn close(self) -> Result<()> {
        if self.mode == Mode::ReadWrite {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_new_page_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let pf = PageFile::create(&path).unwrap();
        assert_eq!(pf.page_count(), 0);
        assert_eq!(pf.end_pid(), PageId::new(0));
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        PageFile::create(&path).unwrap();
        assert!(PageFile::create(&path).is_err());
    }

    #[test]
    fn test_open_read_only_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.idx");

        assert!(PageFile::open(&path, Mode::ReadOnly).is_err());
    }

    #[test]
    fn test_open_read_write_creates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.idx");

        let pf = PageFile::open(&path, Mode::ReadWrite).unwrap();
        assert_eq!(pf.page_count(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_allocate_and_read_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let mut pf = PageFile::create(&path).unwrap();

        let page_id = pf.allocate_page().unwrap();
        assert_eq!(page_id, PageId::new(0));
        assert_eq!(pf.page_count(), 1);

        // Freshly allocated pages read back as zeros
        let page = pf.read_page(page_id).unwrap();
        assert_eq!(page.as_slice()[0], 0);
        assert_eq!(page.as_slice()[1023], 0);
    }

    #[test]
    fn test_write_and_read_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let mut pf = PageFile::create(&path).unwrap();
        let page_id = pf.allocate_page().unwrap();

        let mut page = Page::new();
        page.as_mut_slice()[0] = 0xAB;
        page.as_mut_slice()[100] = 0xCD;
        page.as_mut_slice()[1023] = 0xEF;

        pf.write_page(page_id, &page).unwrap();

        let read_page = pf.read_page(page_id).unwrap();
        assert_eq!(read_page.as_slice()[0], 0xAB);
        assert_eq!(read_page.as_slice()[100], 0xCD);
        assert_eq!(read_page.as_slice()[1023], 0xEF);
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        // Create and write
        {
            let mut pf = PageFile::create(&path).unwrap();
            let page_id = pf.allocate_page().unwrap();

            let mut page = Page::new();
            page.as_mut_slice()[0] = 0x42;
            pf.write_page(page_id, &page).unwrap();
            pf.close().unwrap();
        }

        // Reopen and verify
        {
            let mut pf = PageFile::open(&path, Mode::ReadOnly).unwrap();
            assert_eq!(pf.page_count(), 1);

            let page = pf.read_page(PageId::new(0)).unwrap();
            assert_eq!(page.as_slice()[0], 0x42);
        }
    }

    #[test]
    fn test_multiple_pages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let mut pf = PageFile::create(&path).unwrap();

        for i in 0..10 {
            let page_id = pf.allocate_page().unwrap();
            assert_eq!(page_id.0, i);

            let mut page = Page::new();
            page.as_mut_slice()[0] = i as u8;
            pf.write_page(page_id, &page).unwrap();
        }

        assert_eq!(pf.page_count(), 10);
        assert_eq!(pf.end_pid(), PageId::new(10));

        for i in 0..10 {
            let page = pf.read_page(PageId::new(i)).unwrap();
            assert_eq!(page.as_slice()[0], i as u8);
        }
    }

    #[test]
    fn test_read_out_of_range_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let mut pf = PageFile::create(&path).unwrap();
        pf.allocate_page().unwrap(); // Page 0 exists

        assert!(matches!(
            pf.read_page(PageId::new(1)),
            Err(Error::PageNotFound(1))
        ));
        assert!(matches!(
            pf.read_page(PageId::new(-1)),
            Err(Error::PageNotFound(-1))
        ));
    }

    #[test]
    fn test_write_unallocated_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.idx");

        let mut pf = PageFile::create(&path).unwrap();

        let page = Page::new();
        let result = pf.write_page(PageId::new(0), &page);
        assert!(matches!(result, Err(Error::PageNotFound(0))));
    }
}
