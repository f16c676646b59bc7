//! Session-level decode errors.

use std::error::Error;
use std::fmt;
use std::io;

use protocol::{CommandKind, StreamError};
use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::handler::HandlerError;
use crate::resolve::ResolveError;

/// Classification of decode failures.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    /// The byte stream is malformed, truncated or unreadable.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A decoded path could not be placed under the receive root.
    #[error("{command}: {source}")]
    InvalidPath {
        /// Command carrying the path.
        command: CommandKind,
        /// Resolution failure.
        #[source]
        source: ResolveError,
    },
    /// The operation handler reported a failure.
    #[error("{command} handler failed: {source}")]
    HandlerFailed {
        /// Command being handled.
        command: CommandKind,
        /// Handler failure.
        #[source]
        source: HandlerError,
    },
}

impl From<DispatchError> for DecodeErrorKind {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::InvalidPath { command, source } => Self::InvalidPath { command, source },
            DispatchError::HandlerFailed { command, source } => {
                Self::HandlerFailed { command, source }
            }
        }
    }
}

/// A fatal decode failure and where it happened.
///
/// The offset is the stream position at which the failing command header (or
/// stream header) starts.
#[derive(Debug)]
pub struct DecodeError {
    offset: u64,
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates an error for the record starting at `offset`.
    pub fn new(offset: u64, kind: impl Into<DecodeErrorKind>) -> Self {
        Self {
            offset,
            kind: kind.into(),
        }
    }

    /// Offset of the failing record.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub const fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> DecodeErrorKind {
        self.kind
    }

    /// Stable name of the failure, e.g. `ChecksumMismatch` or `HandlerFailed`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match &self.kind {
            DecodeErrorKind::Stream(err) => err.name(),
            DecodeErrorKind::InvalidPath { .. } => "InvalidPath",
            DecodeErrorKind::HandlerFailed { .. } => "HandlerFailed",
        }
    }

    /// Command the failure is attributed to, when known.
    #[must_use]
    pub const fn command(&self) -> Option<CommandKind> {
        match &self.kind {
            DecodeErrorKind::Stream(err) => err.command(),
            DecodeErrorKind::InvalidPath { command, .. }
            | DecodeErrorKind::HandlerFailed { command, .. } => Some(*command),
        }
    }

    /// Returns the stream error, if the failure came from the byte stream.
    #[must_use]
    pub const fn as_stream_error(&self) -> Option<&StreamError> {
        match &self.kind {
            DecodeErrorKind::Stream(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            DecodeErrorKind::Stream(err) => err.source(),
            DecodeErrorKind::InvalidPath { source, .. } => Some(source),
            DecodeErrorKind::HandlerFailed { source, .. } => Some(source),
        }
    }
}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        match err.kind {
            DecodeErrorKind::Stream(StreamError::Io(inner)) => inner,
            DecodeErrorKind::Stream(StreamError::Truncated { .. }) => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
            _ => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
