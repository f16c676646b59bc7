use std::io::{self, Read, Write};

use crate::constants::{STREAM_HEADER_LEN, STREAM_MAGIC, STREAM_MAGIC_LEN, STREAM_VERSION};
use crate::error::StreamError;
use crate::reader::StreamReader;

/// Decoded stream header: the magic literal followed by the format version.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StreamHeader {
    version: u32,
}

impl StreamHeader {
    /// Header for the version this crate reads and writes.
    pub const CURRENT: Self = Self {
        version: STREAM_VERSION,
    };

    /// Returns the advertised stream version.
    #[must_use]
    #[inline]
    pub const fn version(self) -> u32 {
        self.version
    }

    /// Reads and validates a stream header.
    pub fn read<R: Read>(reader: &mut StreamReader<R>) -> Result<Self, StreamError> {
        let magic: [u8; STREAM_MAGIC_LEN] = reader.read_array()?;
        if &magic != STREAM_MAGIC {
            return Err(StreamError::BadMagic {
                found: magic.to_vec(),
            });
        }

        let version = reader.read_u32_le()?;
        if version != STREAM_VERSION {
            return Err(StreamError::UnsupportedVersion(version));
        }

        Ok(Self { version })
    }

    /// Encodes the header in its wire representation.
    #[must_use]
    pub fn encode(self) -> [u8; STREAM_HEADER_LEN] {
        let mut bytes = [0u8; STREAM_HEADER_LEN];
        bytes[..STREAM_MAGIC_LEN].copy_from_slice(STREAM_MAGIC);
        bytes[STREAM_MAGIC_LEN..].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Writes the header to `writer`.
    pub fn write_to<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode())
    }
}
