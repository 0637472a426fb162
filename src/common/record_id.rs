//! Record locator type.

use std::fmt;

/// Locates a record in the external record store.
///
/// The record store addresses a row by the page it sits on and the slot
/// within that page. The B+Tree never interprets these fields; it only
/// stores the locator next to the key in leaf entries and hands it back
/// on lookup.
///
/// # Layout (8 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     pid (record page, little-endian i32)
/// 4       4     sid (slot within the page, little-endian i32)
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordId {
    /// Page of the record within the record file.
    pub pid: i32,
    /// Slot number of the record within the page.
    pub sid: i32,
}

impl RecordId {
    /// Serialized width in bytes.
    pub const SIZE: usize = 8;

    /// Create a new RecordId.
    #[inline]
    pub fn new(pid: i32, sid: i32) -> Self {
        RecordId { pid, sid }
    }

    /// Serialize to the fixed 8-byte on-disk form.
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.pid.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sid.to_le_bytes());
        bytes
    }

    /// Deserialize from the fixed 8-byte on-disk form.
    ///
    /// # Panics
    /// Panics if `bytes.len() < RecordId::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::SIZE, "buffer too small for RecordId");
        RecordId {
            pid: i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            sid: i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({}, {})", self.pid, self.sid)
    }
}
