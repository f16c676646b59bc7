use std::io;

use thiserror::Error;

use crate::attribute::AttributeTag;
use crate::command_kind::CommandKind;
use crate::path::PathError;

/// Failures raised while decoding a send stream.
///
/// Every variant is fatal: the format has no resynchronisation markers, so a
/// session that hits one of these stops at the offending record.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The byte source ended inside a record.
    #[error("send stream truncated: needed {wanted} bytes at offset {offset}")]
    Truncated {
        /// Absolute offset at which the short read began.
        offset: u64,
        /// Number of bytes the decoder asked for.
        wanted: usize,
    },
    /// The stream header did not start with the expected magic literal.
    #[error("not a send stream: bad magic {found:02x?}")]
    BadMagic {
        /// Bytes found where the magic was expected.
        found: Vec<u8>,
    },
    /// The stream header advertised a version other than 1.
    #[error("unsupported send stream version {0}")]
    UnsupportedVersion(u32),
    /// A command header declared an attribute block larger than the protocol allows.
    #[error("command length {len} exceeds maximum {max}")]
    CommandTooLarge {
        /// Declared attribute block length.
        len: u32,
        /// Largest accepted length.
        max: u32,
    },
    /// The recomputed checksum differs from the one in the command header.
    #[error("checksum mismatch for command type {command}: header has {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// Raw command type from the header.
        command: u16,
        /// Checksum carried by the header.
        expected: u32,
        /// Checksum recomputed over the received bytes.
        actual: u32,
    },
    /// The command type is not part of the protocol.
    #[error("unknown command type {0}")]
    UnknownCommand(u16),
    /// An attribute tag is not part of the protocol.
    #[error("{command}: unknown attribute tag {tag}")]
    UnknownAttribute {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Raw tag value.
        tag: u16,
    },
    /// A required attribute is absent.
    #[error("{command}: missing required attribute {attribute}")]
    MissingAttribute {
        /// Command missing the attribute.
        command: CommandKind,
        /// Attribute that was required.
        attribute: AttributeTag,
    },
    /// The same attribute appears twice in one command.
    #[error("{command}: duplicate attribute {attribute}")]
    DuplicateAttribute {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Repeated attribute.
        attribute: AttributeTag,
    },
    /// A known attribute that the command's schema does not allow.
    #[error("{command}: attribute {attribute} is not allowed")]
    UnexpectedAttribute {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Attribute outside the schema.
        attribute: AttributeTag,
    },
    /// An attribute value exceeds the configured size limit.
    #[error("{command}: attribute {attribute} is {len} bytes, limit is {max}")]
    AttributeTooLarge {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Oversized attribute.
        attribute: AttributeTag,
        /// Declared value length.
        len: usize,
        /// Configured limit.
        max: usize,
    },
    /// An attribute's declared length runs past the end of the attribute block.
    #[error("{command}: attribute at block offset {position} declares {declared} bytes but only {remaining} remain")]
    AttributeOverrun {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Offset of the attribute header inside the attribute block.
        position: usize,
        /// Bytes the record claims to need (header or value).
        declared: usize,
        /// Bytes actually left in the block.
        remaining: usize,
    },
    /// A fixed-width attribute has the wrong size.
    #[error("{command}: attribute {attribute} must be {expected} bytes, got {actual}")]
    InvalidAttributeLength {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Malformed attribute.
        attribute: AttributeTag,
        /// Required width.
        expected: usize,
        /// Width found on the wire.
        actual: usize,
    },
    /// A numeric attribute does not fit its target type.
    #[error("{command}: attribute {attribute} value {value} is out of range")]
    ValueOutOfRange {
        /// Command carrying the attribute.
        command: CommandKind,
        /// Attribute holding the value.
        attribute: AttributeTag,
        /// Decoded value.
        value: u64,
    },
    /// A path-bearing attribute failed validation.
    #[error("{command}: invalid {attribute}: {source}")]
    InvalidPath {
        /// Command carrying the path.
        command: CommandKind,
        /// Path-bearing attribute.
        attribute: AttributeTag,
        /// Validation failure.
        #[source]
        source: PathError,
    },
    /// The byte source failed for a reason other than end-of-file.
    #[error("I/O error while reading send stream: {0}")]
    Io(#[from] io::Error),
}

impl StreamError {
    /// Stable name of the error kind, suitable for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "Truncated",
            Self::BadMagic { .. } => "BadMagic",
            Self::UnsupportedVersion(_) => "UnsupportedVersion",
            Self::CommandTooLarge { .. } => "CommandTooLarge",
            Self::ChecksumMismatch { .. } => "ChecksumMismatch",
            Self::UnknownCommand(_) => "UnknownCommand",
            Self::UnknownAttribute { .. } => "UnknownAttribute",
            Self::MissingAttribute { .. } => "MissingAttribute",
            Self::DuplicateAttribute { .. } => "DuplicateAttribute",
            Self::UnexpectedAttribute { .. } => "UnexpectedAttribute",
            Self::AttributeTooLarge { .. } => "AttributeTooLarge",
            Self::AttributeOverrun { .. } => "AttributeOverrun",
            Self::InvalidAttributeLength { .. } => "InvalidAttributeLength",
            Self::ValueOutOfRange { .. } => "ValueOutOfRange",
            Self::InvalidPath { .. } => "InvalidPath",
            Self::Io(_) => "Io",
        }
    }

    /// Returns the command kind the error is attributed to, when known.
    #[must_use]
    pub const fn command(&self) -> Option<CommandKind> {
        match self {
            Self::UnknownAttribute { command, .. }
            | Self::MissingAttribute { command, .. }
            | Self::DuplicateAttribute { command, .. }
            | Self::UnexpectedAttribute { command, .. }
            | Self::AttributeTooLarge { command, .. }
            | Self::AttributeOverrun { command, .. }
            | Self::InvalidAttributeLength { command, .. }
            | Self::ValueOutOfRange { command, .. }
            | Self::InvalidPath { command, .. } => Some(*command),
            Self::ChecksumMismatch { command, .. } => CommandKind::from_u16(*command),
            _ => None,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(inner) => inner,
            StreamError::Truncated { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
