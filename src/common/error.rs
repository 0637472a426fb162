//! Error types for treeline.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in treeline.
///
/// A single error type keeps error handling consistent across the page
/// store and the node codecs. Every codec-level error is propagated
/// unchanged through the tree manager; the core never retries or
/// recovers locally. `NodeFull` is the one variant used as control
/// flow: the insertion path catches it and answers with a split.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying page file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested page does not exist in the page file.
    #[error("page {0} not found")]
    PageNotFound(i32),

    /// Insert attempted on a node already holding its maximum entry
    /// count. Signals the caller that the node must be split.
    #[error("node is full")]
    NodeFull,

    /// Search miss, or an entry read outside the node's used range.
    #[error("no such record")]
    NoSuchRecord,

    /// Cursor page id is non-positive (exhausted or uninitialized).
    #[error("invalid cursor at page {0}")]
    InvalidCursor(i32),

    /// Negative page id assigned as a sibling or child link.
    #[error("invalid page pointer {0}")]
    InvalidPointer(i32),

    /// Split precondition violated: the node is not exactly full, or
    /// the supplied sibling is not empty.
    #[error("invalid node state: {0}")]
    InvalidState(&'static str),
}
