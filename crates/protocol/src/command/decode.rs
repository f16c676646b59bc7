use std::io::Read;

use crate::attribute::AttributeSet;
use crate::checksum::command_checksum;
use crate::command_kind::CommandKind;
use crate::constants::{COMMAND_HEADER_LEN, MAX_ATTRIBUTE_LEN, MAX_COMMAND_PAYLOAD, SEND_BUFFER_SIZE};
use crate::error::StreamError;
use crate::reader::StreamReader;

use super::Command;
use super::header::CommandHeader;

/// A command together with where it was found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedCommand<'a> {
    /// Stream offset of the command header.
    pub offset: u64,
    /// Header as read from the wire.
    pub header: CommandHeader,
    /// Decoded command.
    pub command: Command<'a>,
}

impl DecodedCommand<'_> {
    /// Bytes the command occupied on the wire, header included.
    #[must_use]
    pub const fn wire_len(&self) -> u64 {
        COMMAND_HEADER_LEN as u64 + self.header.len() as u64
    }
}

/// Reads commands one at a time into a reusable buffer.
///
/// The decoder performs, in order: the declared-length bound check (before
/// any allocation), the checksum comparison, the command type lookup,
/// attribute parsing and finally schema and value validation.
#[derive(Debug)]
pub struct CommandDecoder {
    buffer: Vec<u8>,
    max_attribute_len: usize,
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDecoder {
    /// Creates a decoder using the protocol's attribute size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_attribute_len(MAX_ATTRIBUTE_LEN)
    }

    /// Creates a decoder rejecting attribute values longer than `max`.
    ///
    /// Limits above the protocol maximum are clamped to it.
    #[must_use]
    pub fn with_max_attribute_len(max: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(SEND_BUFFER_SIZE),
            max_attribute_len: max.min(MAX_ATTRIBUTE_LEN),
        }
    }

    /// Effective attribute size limit.
    #[must_use]
    pub const fn max_attribute_len(&self) -> usize {
        self.max_attribute_len
    }

    /// Reads and checksums the next command without interpreting it.
    ///
    /// On success the attribute block is held in the decoder's buffer.
    pub fn read_frame<R: Read>(
        &mut self,
        reader: &mut StreamReader<R>,
    ) -> Result<CommandHeader, StreamError> {
        let raw_header = reader.read_array::<COMMAND_HEADER_LEN>()?;
        let header = CommandHeader::decode(&raw_header);

        if header.len() > MAX_COMMAND_PAYLOAD {
            return Err(StreamError::CommandTooLarge {
                len: header.len(),
                max: MAX_COMMAND_PAYLOAD,
            });
        }

        reader.read_into(&mut self.buffer, header.len() as usize)?;

        let actual = command_checksum(&raw_header, &self.buffer);
        if actual != header.checksum() {
            return Err(StreamError::ChecksumMismatch {
                command: header.raw_kind(),
                expected: header.checksum(),
                actual,
            });
        }

        Ok(header)
    }

    /// Reads, verifies and decodes the next command.
    ///
    /// The returned command borrows from the decoder and must be dropped before
    /// the next call.
    pub fn read_command<R: Read>(
        &mut self,
        reader: &mut StreamReader<R>,
    ) -> Result<DecodedCommand<'_>, StreamError> {
        let offset = reader.offset();
        let header = self.read_frame(reader)?;
        let kind = CommandKind::from_u16(header.raw_kind())
            .ok_or(StreamError::UnknownCommand(header.raw_kind()))?;

        let attributes = AttributeSet::parse(kind, &self.buffer, self.max_attribute_len)?;
        let command = Command::from_attributes(&attributes)?;

        Ok(DecodedCommand {
            offset,
            header,
            command,
        })
    }
}
