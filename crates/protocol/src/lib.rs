#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Wire format of the btrfs version 1 send stream.
//!
//! A stream is a 17-byte header (the literal `btrfs-stream\0` followed by a
//! little-endian `u32` version) and a sequence of commands. Each command is a
//! 10-byte header (`u32` attribute block length, `u16` command type, `u32`
//! CRC-32C) followed by tag/length/value attributes. The crate is split into
//! small layers that higher crates can use independently:
//!
//! - [`StreamReader`] reads exact byte counts and tracks the stream offset.
//! - [`AttributeSet`] splits an attribute block into typed-on-demand values.
//! - [`Schema`] lists the attributes each [`CommandKind`] requires or allows.
//! - [`CommandDecoder`] verifies checksums and produces typed [`Command`]s.
//! - [`StreamPath`] normalises path attributes and rejects escapes.
//! - [`CommandWriter`] encodes commands for fixtures and tooling.
//!
//! # Examples
//!
//! Encode a one-command stream and decode it again.
//!
//! ```
//! use std::io::Cursor;
//!
//! use protocol::{
//!     AttributeTag, Command, CommandDecoder, CommandKind, CommandWriter, StreamHeader,
//!     StreamReader, write_stream_header,
//! };
//!
//! let mut bytes = Vec::new();
//! write_stream_header(&mut bytes).unwrap();
//! CommandWriter::new(CommandKind::Mkdir)
//!     .path(AttributeTag::Path, "docs")
//!     .write_to(&mut bytes)
//!     .unwrap();
//!
//! let mut reader = StreamReader::new(Cursor::new(bytes));
//! assert_eq!(StreamHeader::read(&mut reader).unwrap().version(), 1);
//!
//! let mut decoder = CommandDecoder::new();
//! let decoded = decoder.read_command(&mut reader).unwrap();
//! assert!(matches!(decoded.command, Command::Mkdir { ino: None, .. }));
//! ```

mod attribute;
mod checksum;
mod command;
mod command_kind;
mod constants;
mod error;
mod header;
mod path;
mod reader;
mod schema;
mod writer;

pub use attribute::{AttributeSet, AttributeTag};
pub use checksum::{command_checksum, crc32c_raw};
pub use command::{
    CloneSource, Command, CommandDecoder, CommandHeader, DecodedCommand, Timespec,
};
pub use command_kind::{CommandKind, ParseCommandKindError};
pub use constants::{
    ATTRIBUTE_HEADER_LEN, COMMAND_HEADER_LEN, MAX_ATTRIBUTE_LEN, MAX_COMMAND_PAYLOAD, PATH_MAX,
    SEND_BUFFER_SIZE, STREAM_HEADER_LEN, STREAM_MAGIC, STREAM_MAGIC_LEN, STREAM_VERSION,
    TIMESPEC_LEN, UUID_LEN,
};
pub use error::StreamError;
pub use header::StreamHeader;
pub use path::{PathError, StreamPath, check_link_target};
pub use reader::StreamReader;
pub use schema::Schema;
pub use writer::{CommandWriter, write_stream_header};

pub use uuid::Uuid;
