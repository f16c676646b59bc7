//! Send stream encoder.
//!
//! Produces byte-exact streams for fixtures and tooling. Encoding goes through
//! the same header and checksum code the decoder uses.

use std::io::{self, Write};

use uuid::Uuid;

use crate::attribute::AttributeTag;
use crate::checksum::command_checksum;
use crate::command::{CommandHeader, Timespec};
use crate::command_kind::CommandKind;
use crate::constants::{ATTRIBUTE_HEADER_LEN, COMMAND_HEADER_LEN, MAX_COMMAND_PAYLOAD};
use crate::header::StreamHeader;

/// Writes the version 1 stream header.
pub fn write_stream_header<W: Write + ?Sized>(writer: &mut W) -> io::Result<()> {
    StreamHeader::CURRENT.write_to(writer)
}

/// Builder for a single command.
///
/// Attributes are appended in call order. Size violations are remembered and
/// reported by [`CommandWriter::finish`].
#[derive(Clone, Debug)]
pub struct CommandWriter {
    raw_kind: u16,
    attributes: Vec<u8>,
    oversized: Option<usize>,
}

impl CommandWriter {
    /// Starts a command of type `kind`.
    #[must_use]
    pub fn new(kind: CommandKind) -> Self {
        Self::with_raw_kind(kind.as_u16())
    }

    /// Starts a command with an arbitrary type value, including unknown ones.
    #[must_use]
    pub fn with_raw_kind(raw_kind: u16) -> Self {
        Self {
            raw_kind,
            attributes: Vec::new(),
            oversized: None,
        }
    }

    /// Appends an attribute with a raw value.
    pub fn bytes(&mut self, tag: AttributeTag, value: &[u8]) -> &mut Self {
        match u16::try_from(value.len()) {
            Ok(len) => self.raw_attribute(tag.as_u16(), len, value),
            Err(_) => {
                self.oversized.get_or_insert(value.len());
                self
            }
        }
    }

    /// Appends an attribute header and value exactly as given.
    ///
    /// `declared_len` is written verbatim even when it disagrees with
    /// `value.len()`, which makes malformed blocks expressible.
    pub fn raw_attribute(&mut self, raw_tag: u16, declared_len: u16, value: &[u8]) -> &mut Self {
        self.attributes.reserve(ATTRIBUTE_HEADER_LEN + value.len());
        self.attributes.extend_from_slice(&raw_tag.to_le_bytes());
        self.attributes
            .extend_from_slice(&declared_len.to_le_bytes());
        self.attributes.extend_from_slice(value);
        self
    }

    /// Appends a little-endian `u64`.
    pub fn u64(&mut self, tag: AttributeTag, value: u64) -> &mut Self {
        self.bytes(tag, &value.to_le_bytes())
    }

    /// Appends a uuid.
    pub fn uuid(&mut self, tag: AttributeTag, value: &Uuid) -> &mut Self {
        self.bytes(tag, value.as_bytes())
    }

    /// Appends a timestamp.
    pub fn timespec(&mut self, tag: AttributeTag, value: Timespec) -> &mut Self {
        self.bytes(tag, &value.encode())
    }

    /// Appends a path or other string attribute.
    pub fn path(&mut self, tag: AttributeTag, value: impl AsRef<[u8]>) -> &mut Self {
        self.bytes(tag, value.as_ref())
    }

    /// Length of the attribute block built so far.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.attributes.len()
    }

    /// Encodes the command with a correct checksum.
    pub fn finish(&self) -> io::Result<Vec<u8>> {
        if let Some(len) = self.oversized {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("attribute value of {len} bytes does not fit a 16-bit length"),
            ));
        }

        let len = u32::try_from(self.attributes.len())
            .ok()
            .filter(|len| *len <= MAX_COMMAND_PAYLOAD)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "attribute block of {} bytes exceeds maximum {MAX_COMMAND_PAYLOAD}",
                        self.attributes.len()
                    ),
                )
            })?;

        let unsigned = CommandHeader::new(self.raw_kind, len, 0).encode();
        let checksum = command_checksum(&unsigned, &self.attributes);
        let header = CommandHeader::new(self.raw_kind, len, checksum);

        let mut out = Vec::with_capacity(COMMAND_HEADER_LEN + self.attributes.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&self.attributes);
        Ok(out)
    }

    /// Encodes the command and writes it to `writer`.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.finish()?)
    }
}
