//! Command checksum.
//!
//! Each command is covered by a CRC-32C (Castagnoli) computed with a zero seed
//! and without the customary final inversion, over the full command header
//! (with its checksum field zeroed) and the attribute block. The `crc32c` crate
//! implements the conventional variant, which inverts on entry and exit; the
//! helpers below undo both inversions so the result matches existing producers
//! bit for bit.

use crate::constants::{CHECKSUM_OFFSET, COMMAND_HEADER_LEN};

/// Computes the raw CRC-32C of `data` continuing from `crc`.
#[must_use]
#[inline]
pub fn crc32c_raw(crc: u32, data: &[u8]) -> u32 {
    !crc32c::crc32c_append(!crc, data)
}

/// Computes the checksum of a command from its header and attribute block.
///
/// The checksum field inside `header` is treated as zero regardless of its
/// contents.
#[must_use]
pub fn command_checksum(header: &[u8; COMMAND_HEADER_LEN], attributes: &[u8]) -> u32 {
    let mut zeroed = *header;
    zeroed[CHECKSUM_OFFSET..].fill(0);
    let crc = crc32c_raw(0, &zeroed);
    crc32c_raw(crc, attributes)
}
