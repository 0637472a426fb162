//! Storage layer - disk I/O and the raw page type.
//!
//! This module handles persistent storage:
//! - [`PageFile`] - Low-level file I/O over fixed-size pages
//! - [`Page`] - The raw 1KB data container

mod page;
mod page_file;

pub use page::Page;
pub use page_file::{Mode, PageFile};
