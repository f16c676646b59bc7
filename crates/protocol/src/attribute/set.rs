use uuid::Uuid;

use crate::command::Timespec;
use crate::command_kind::CommandKind;
use crate::constants::{ATTRIBUTE_HEADER_LEN, TIMESPEC_LEN, UUID_LEN};
use crate::error::StreamError;
use crate::path::{StreamPath, check_link_target};

use super::tag::AttributeTag;

const SLOT_COUNT: usize = AttributeTag::MAX as usize + 1;

/// The attributes of one command, borrowed from the command buffer.
///
/// Parsing rejects unknown tags, duplicates, oversized values and records that
/// run past the end of the block. Values are kept as raw slices; the typed
/// accessors check widths and ranges on demand.
#[derive(Clone, Debug)]
pub struct AttributeSet<'a> {
    command: CommandKind,
    slots: [Option<&'a [u8]>; SLOT_COUNT],
    order: Vec<AttributeTag>,
}

impl<'a> AttributeSet<'a> {
    /// Parses every attribute in `block`.
    pub fn parse(
        command: CommandKind,
        block: &'a [u8],
        max_attribute_len: usize,
    ) -> Result<Self, StreamError> {
        let mut set = Self {
            command,
            slots: [None; SLOT_COUNT],
            order: Vec::new(),
        };

        let mut position = 0;
        while position < block.len() {
            let remaining = block.len() - position;
            if remaining < ATTRIBUTE_HEADER_LEN {
                return Err(StreamError::AttributeOverrun {
                    command,
                    position,
                    declared: ATTRIBUTE_HEADER_LEN,
                    remaining,
                });
            }

            let raw_tag = u16::from_le_bytes([block[position], block[position + 1]]);
            let len = usize::from(u16::from_le_bytes([
                block[position + 2],
                block[position + 3],
            ]));
            let tag = AttributeTag::from_u16(raw_tag).ok_or(StreamError::UnknownAttribute {
                command,
                tag: raw_tag,
            })?;

            if len > max_attribute_len {
                return Err(StreamError::AttributeTooLarge {
                    command,
                    attribute: tag,
                    len,
                    max: max_attribute_len,
                });
            }

            let value_start = position + ATTRIBUTE_HEADER_LEN;
            let available = block.len() - value_start;
            if len > available {
                return Err(StreamError::AttributeOverrun {
                    command,
                    position,
                    declared: len,
                    remaining: available,
                });
            }

            let slot = &mut set.slots[tag.slot()];
            if slot.is_some() {
                return Err(StreamError::DuplicateAttribute {
                    command,
                    attribute: tag,
                });
            }
            *slot = Some(&block[value_start..value_start + len]);
            set.order.push(tag);

            position = value_start + len;
        }

        Ok(set)
    }

    /// Command the attributes belong to.
    #[must_use]
    pub const fn command(&self) -> CommandKind {
        self.command
    }

    /// Number of attributes present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Reports whether the command carried no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tags in the order they appeared on the wire.
    #[must_use]
    pub fn tags(&self) -> &[AttributeTag] {
        &self.order
    }

    /// Iterates over `(tag, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeTag, &'a [u8])> + '_ {
        self.order
            .iter()
            .filter_map(|tag| self.slots[tag.slot()].map(|value| (*tag, value)))
    }

    /// Returns the raw value of `tag`, if present.
    #[must_use]
    pub fn get(&self, tag: AttributeTag) -> Option<&'a [u8]> {
        self.slots[tag.slot()]
    }

    /// Returns the raw value of `tag` or a [`StreamError::MissingAttribute`].
    pub fn bytes(&self, tag: AttributeTag) -> Result<&'a [u8], StreamError> {
        self.get(tag).ok_or(StreamError::MissingAttribute {
            command: self.command,
            attribute: tag,
        })
    }

    /// Decodes a little-endian `u64`.
    pub fn u64(&self, tag: AttributeTag) -> Result<u64, StreamError> {
        let value = self.fixed::<8>(tag)?;
        Ok(u64::from_le_bytes(value))
    }

    /// Decodes an optional little-endian `u64`.
    pub fn optional_u64(&self, tag: AttributeTag) -> Result<Option<u64>, StreamError> {
        if self.get(tag).is_none() {
            return Ok(None);
        }
        self.u64(tag).map(Some)
    }

    /// Decodes a `u64` attribute that must fit in 32 bits.
    pub fn u32(&self, tag: AttributeTag) -> Result<u32, StreamError> {
        let value = self.u64(tag)?;
        u32::try_from(value).map_err(|_| StreamError::ValueOutOfRange {
            command: self.command,
            attribute: tag,
            value,
        })
    }

    /// Decodes a 16-byte uuid.
    pub fn uuid(&self, tag: AttributeTag) -> Result<Uuid, StreamError> {
        self.fixed::<UUID_LEN>(tag).map(Uuid::from_bytes)
    }

    /// Decodes a timestamp (`u64` seconds, `u32` nanoseconds).
    pub fn timespec(&self, tag: AttributeTag) -> Result<Timespec, StreamError> {
        let raw = self.fixed::<TIMESPEC_LEN>(tag)?;
        let mut sec = [0u8; 8];
        let mut nsec = [0u8; 4];
        sec.copy_from_slice(&raw[..8]);
        nsec.copy_from_slice(&raw[8..]);

        let nsec = u32::from_le_bytes(nsec);
        Timespec::new(u64::from_le_bytes(sec), nsec).ok_or(StreamError::ValueOutOfRange {
            command: self.command,
            attribute: tag,
            value: u64::from(nsec),
        })
    }

    /// Decodes an optional timestamp.
    pub fn optional_timespec(&self, tag: AttributeTag) -> Result<Option<Timespec>, StreamError> {
        if self.get(tag).is_none() {
            return Ok(None);
        }
        self.timespec(tag).map(Some)
    }

    /// Validates and normalises a path-bearing attribute.
    pub fn path(&self, tag: AttributeTag) -> Result<StreamPath, StreamError> {
        let raw = self.bytes(tag)?;
        StreamPath::parse(raw).map_err(|source| StreamError::InvalidPath {
            command: self.command,
            attribute: tag,
            source,
        })
    }

    /// Returns link content verbatim after the NUL and length checks.
    pub fn link_target(&self, tag: AttributeTag) -> Result<&'a [u8], StreamError> {
        let raw = self.bytes(tag)?;
        check_link_target(raw).map_err(|source| StreamError::InvalidPath {
            command: self.command,
            attribute: tag,
            source,
        })?;
        Ok(raw)
    }

    fn fixed<const N: usize>(&self, tag: AttributeTag) -> Result<[u8; N], StreamError> {
        let raw = self.bytes(tag)?;
        <[u8; N]>::try_from(raw).map_err(|_| StreamError::InvalidAttributeLength {
            command: self.command,
            attribute: tag,
            expected: N,
            actual: raw.len(),
        })
    }
}
