use crate::command_kind::CommandKind;
use crate::constants::{CHECKSUM_OFFSET, COMMAND_HEADER_LEN};

/// The fixed 10-byte header preceding every command's attribute block.
///
/// The command type is kept raw so that unknown types can still be checksummed
/// and reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommandHeader {
    len: u32,
    raw_kind: u16,
    checksum: u32,
}

impl CommandHeader {
    /// Creates a header for an attribute block of `len` bytes.
    #[must_use]
    pub const fn new(raw_kind: u16, len: u32, checksum: u32) -> Self {
        Self {
            len,
            raw_kind,
            checksum,
        }
    }

    /// Parses the wire representation.
    #[must_use]
    pub const fn decode(bytes: &[u8; COMMAND_HEADER_LEN]) -> Self {
        let len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let raw_kind = u16::from_le_bytes([bytes[4], bytes[5]]);
        let checksum = u32::from_le_bytes([
            bytes[CHECKSUM_OFFSET],
            bytes[CHECKSUM_OFFSET + 1],
            bytes[CHECKSUM_OFFSET + 2],
            bytes[CHECKSUM_OFFSET + 3],
        ]);
        Self::new(raw_kind, len, checksum)
    }

    /// Encodes the header in little-endian wire order.
    #[must_use]
    pub fn encode(self) -> [u8; COMMAND_HEADER_LEN] {
        let mut out = [0u8; COMMAND_HEADER_LEN];
        out[..4].copy_from_slice(&self.len.to_le_bytes());
        out[4..CHECKSUM_OFFSET].copy_from_slice(&self.raw_kind.to_le_bytes());
        out[CHECKSUM_OFFSET..].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Length of the attribute block that follows.
    #[must_use]
    #[inline]
    pub const fn len(self) -> u32 {
        self.len
    }

    /// Raw command type.
    #[must_use]
    #[inline]
    pub const fn raw_kind(self) -> u16 {
        self.raw_kind
    }

    /// Command type, if known.
    #[must_use]
    #[inline]
    pub const fn kind(self) -> Option<CommandKind> {
        CommandKind::from_u16(self.raw_kind)
    }

    /// Checksum carried by the header.
    #[must_use]
    #[inline]
    pub const fn checksum(self) -> u32 {
        self.checksum
    }
}
