#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` drives a btrfs send stream through an [`OperationHandler`]. It
//! reads the stream with the `protocol` crate, resolves every path against a
//! caller-chosen root and calls exactly one handler method per command, in
//! stream order.
//!
//! # Design
//!
//! - [`DecodeSession`] owns the reader, the reusable command buffer and the
//!   [`PathResolver`]. Each call to [`decode`] or [`decode_with_config`]
//!   builds a fresh session, so independent decodes share no state.
//! - [`dispatch`] maps a decoded command to its handler method. All paths of a
//!   command are resolved before the handler runs; a path escaping the root
//!   fails the command without a handler call.
//! - [`DumpRenderer`] is the bundled handler that prints one line per
//!   operation.
//!
//! # Invariants
//!
//! - Handlers never see unverified data: checksum, schema and path checks all
//!   happen before the call.
//! - Decoding stops at the first failure and reports the byte offset of the
//!   record that failed.
//! - Concatenated streams are read back to back; the path base returns to the
//!   root at every stream header.
//!
//! # Examples
//!
//! Dump a stream containing one directory.
//!
//! ```
//! use engine::{DumpRenderer, decode};
//! use protocol::{AttributeTag, CommandKind, CommandWriter, write_stream_header};
//!
//! let mut stream = Vec::new();
//! write_stream_header(&mut stream).unwrap();
//! CommandWriter::new(CommandKind::Mkdir)
//!     .path(AttributeTag::Path, "docs")
//!     .write_to(&mut stream)
//!     .unwrap();
//! CommandWriter::new(CommandKind::End).write_to(&mut stream).unwrap();
//!
//! let mut dump = DumpRenderer::new(Vec::new());
//! let summary = decode(stream.as_slice(), "/mnt", &mut dump).unwrap();
//! assert_eq!(summary.commands(), 2);
//!
//! let text = String::from_utf8(dump.into_inner()).unwrap();
//! assert_eq!(text, "mkdir:          /mnt/docs\n");
//! ```

mod config;
mod dispatch;
mod dump;
mod error;
mod handler;
mod resolve;
mod session;
mod trace;

pub use config::{DecodeConfig, DecodeConfigBuilder, DecodeLimits};
pub use dispatch::{DispatchError, Dispatched, dispatch};
pub use dump::DumpRenderer;
pub use error::{DecodeError, DecodeErrorKind};
pub use handler::{FileTimes, HandlerError, HandlerResult, OperationHandler};
pub use resolve::{PathResolver, ResolveError, ResolvedPath};
pub use session::{DecodeSession, DecodeSummary, decode, decode_with_config};
#[cfg(feature = "tracing")]
pub use trace::DECODE_TARGET;
