//! Configuration constants for treeline.

/// Size of a page in bytes (1KB).
///
/// Every page in an index file (the header page and every node page)
/// is exactly this size. Page N lives at file offset `N * PAGE_SIZE`.
///
/// 1024 bytes is small by modern standards, but it is the unit the
/// on-disk node layouts are specified against: the leaf and internal
/// entry capacities (85 and 127) are derived from it and baked into
/// existing index files.
pub const PAGE_SIZE: usize = 1024;

/// Width of an on-disk key in bytes (little-endian i32).
pub const KEY_SIZE: usize = 4;

/// Width of an on-disk page id in bytes (little-endian i32).
pub const PAGE_ID_SIZE: usize = 4;
