//! Index layer - ordered access structures over the record store.
//!
//! Currently one structure: the disk-resident [`btree`].

pub mod btree;

pub use btree::{BTreeIndex, IndexCursor};
