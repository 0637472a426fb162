//! treeline - a disk-resident B+Tree index over fixed-size pages.
//!
//! # Architecture
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        treeline                           │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────────────────────────────┐   │
//! │  │              Index Layer (index/)                  │   │
//! │  │   BTreeIndex: header state, search, recursive      │   │
//! │  │   insertion with split propagation, cursors        │   │
//! │  └───────────────────────────────────────────────────┘   │
//! │                            ↓                              │
//! │  ┌───────────────────────────────────────────────────┐   │
//! │  │            Node Codecs (index/btree/)              │   │
//! │  │   LeafNode / InternalNode: fixed 1KB page layouts, │   │
//! │  │   all offset arithmetic behind (de)serialization   │   │
//! │  └───────────────────────────────────────────────────┘   │
//! │                            ↓                              │
//! │  ┌───────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                 │   │
//! │  │          PageFile + Page (raw 1KB pages)           │   │
//! │  └───────────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, RecordId, Error, config)
//! - [`storage`] - Page file I/O and the raw page type
//! - [`index`] - The B+Tree index
//!
//! # Quick Start
//! ```no_run
//! use treeline::{BTreeIndex, Mode, RecordId};
//!
//! let mut index = BTreeIndex::open("table.idx", Mode::ReadWrite).unwrap();
//!
//! index.insert(7, RecordId::new(0, 3)).unwrap();
//!
//! // Range scan from key 5 upward.
//! let (mut cursor, _found) = index.locate(5).unwrap();
//! while !cursor.is_exhausted() {
//!     let (key, rid) = index.read_forward(&mut cursor).unwrap();
//!     println!("{key} -> {rid}");
//! }
//!
//! index.close().unwrap();
//! ```
//!
//! # Limitations
//! - Key 0 is reserved: the on-disk node format terminates the entry
//!   array with a zero key.
//! - Single writer, no concurrent readers, no deletion, no crash
//!   recovery. See [`BTreeIndex`] for details.

pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, PageId, RecordId, Result};

pub use index::btree::{BTreeIndex, IndexCursor};
pub use storage::{Mode, Page, PageFile};
