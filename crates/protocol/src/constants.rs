//! Wire-level constants for the version 1 send stream.

/// Magic literal that opens every send stream, including the trailing NUL.
pub const STREAM_MAGIC: &[u8; 13] = b"btrfs-stream\0";

/// Number of bytes occupied by [`STREAM_MAGIC`].
pub const STREAM_MAGIC_LEN: usize = STREAM_MAGIC.len();

/// Number of bytes in the stream header (magic followed by a `u32` version).
pub const STREAM_HEADER_LEN: usize = STREAM_MAGIC_LEN + 4;

/// The only stream version this decoder understands.
pub const STREAM_VERSION: u32 = 1;

/// Number of bytes in a command header: `u32` length, `u16` type, `u32` checksum.
pub const COMMAND_HEADER_LEN: usize = 10;

/// Offset of the checksum field inside the command header.
pub(crate) const CHECKSUM_OFFSET: usize = 6;

/// Number of bytes in an attribute header: `u16` tag followed by `u16` length.
pub const ATTRIBUTE_HEADER_LEN: usize = 4;

/// Size of the producer's send buffer. A full command must fit strictly inside it.
pub const SEND_BUFFER_SIZE: usize = 64 * 1024;

/// Largest attribute block a command may declare.
pub const MAX_COMMAND_PAYLOAD: u32 = (SEND_BUFFER_SIZE - COMMAND_HEADER_LEN - 1) as u32;

/// Largest attribute value accepted by default.
pub const MAX_ATTRIBUTE_LEN: usize = MAX_COMMAND_PAYLOAD as usize - ATTRIBUTE_HEADER_LEN;

/// Longest path, in bytes, accepted before or after resolution.
///
/// Lengths are byte counts without a terminator: a path of exactly
/// `PATH_MAX` bytes is accepted. The receive root is counted in full
/// against the limit once paths are resolved.
pub const PATH_MAX: usize = 4096;

/// Number of bytes in an encoded uuid.
pub const UUID_LEN: usize = 16;

/// Number of bytes in an encoded timestamp (`u64` seconds + `u32` nanoseconds).
pub const TIMESPEC_LEN: usize = 12;
