//! Decode sessions and the `decode` entry points.

use std::io::Read;
use std::path::Path;

use protocol::{CommandDecoder, StreamHeader, StreamReader};

use crate::config::DecodeConfig;
use crate::dispatch::{Dispatched, dispatch};
use crate::error::DecodeError;
use crate::handler::OperationHandler;
use crate::resolve::PathResolver;
use crate::trace::{trace_command, trace_stream_header, trace_summary};

/// Totals reported by a successful session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodeSummary {
    streams: u64,
    commands: u64,
    bytes: u64,
}

impl DecodeSummary {
    /// Number of streams read, each ended by an `end` command.
    #[must_use]
    pub const fn streams(&self) -> u64 {
        self.streams
    }

    /// Number of commands decoded, `end` commands included.
    #[must_use]
    pub const fn commands(&self) -> u64 {
        self.commands
    }

    /// Bytes consumed from the source.
    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }
}

/// State of one decode run over one byte source.
///
/// The session owns the reader, the reusable command buffer and the path
/// resolver; nothing is shared between sessions.
#[derive(Debug)]
pub struct DecodeSession<R> {
    reader: StreamReader<R>,
    decoder: CommandDecoder,
    resolver: PathResolver,
    stop_at_end: bool,
}

impl<R: Read> DecodeSession<R> {
    /// Prepares a session reading from `source`.
    pub fn new(source: R, config: &DecodeConfig) -> Self {
        Self {
            reader: StreamReader::new(source),
            decoder: CommandDecoder::with_max_attribute_len(config.limits().max_attribute_len()),
            resolver: PathResolver::new(config.root()),
            stop_at_end: config.stop_at_end(),
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.reader.offset()
    }

    /// Decodes every stream in the source, calling `handler` once per command.
    ///
    /// Stops at the first failure. Calls already made are not undone.
    pub fn run<H: OperationHandler + ?Sized>(
        mut self,
        handler: &mut H,
    ) -> Result<DecodeSummary, DecodeError> {
        let mut summary = DecodeSummary::default();

        loop {
            self.read_stream(handler, &mut summary)?;

            if self.stop_at_end {
                break;
            }
            let offset = self.reader.offset();
            if self
                .reader
                .at_eof()
                .map_err(|err| DecodeError::new(offset, err))?
            {
                break;
            }
        }

        summary.bytes = self.reader.offset();
        trace_summary(&summary);
        Ok(summary)
    }

    fn read_stream<H: OperationHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        summary: &mut DecodeSummary,
    ) -> Result<(), DecodeError> {
        let header_offset = self.reader.offset();
        let header = StreamHeader::read(&mut self.reader)
            .map_err(|err| DecodeError::new(header_offset, err))?;
        summary.streams += 1;
        trace_stream_header(header_offset, header.version(), summary.streams);
        self.resolver.reset_base();

        loop {
            let offset = self.reader.offset();
            let decoded = self
                .decoder
                .read_command(&mut self.reader)
                .map_err(|err| DecodeError::new(offset, err))?;
            summary.commands += 1;
            trace_command(offset, decoded.command.kind(), decoded.header.len());

            match dispatch(&decoded.command, &mut self.resolver, handler) {
                Ok(Dispatched::Continue) => {}
                Ok(Dispatched::End) => return Ok(()),
                Err(err) => return Err(DecodeError::new(offset, err)),
            }
        }
    }
}

/// Decodes `source`, resolving paths under `root`.
///
/// Concatenated streams are read until the source is exhausted.
pub fn decode<R, H>(
    source: R,
    root: impl AsRef<Path>,
    handler: &mut H,
) -> Result<DecodeSummary, DecodeError>
where
    R: Read,
    H: OperationHandler + ?Sized,
{
    let config = DecodeConfig::new(root.as_ref());
    decode_with_config(source, &config, handler)
}

/// Decodes `source` with explicit configuration.
pub fn decode_with_config<R, H>(
    source: R,
    config: &DecodeConfig,
    handler: &mut H,
) -> Result<DecodeSummary, DecodeError>
where
    R: Read,
    H: OperationHandler + ?Sized,
{
    DecodeSession::new(source, config).run(handler)
}
