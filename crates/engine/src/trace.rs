//! Decode tracing, compiled out without the `tracing` feature.

use protocol::CommandKind;

use crate::session::DecodeSummary;

/// Tracing target for decode events.
#[cfg(feature = "tracing")]
pub const DECODE_TARGET: &str = "sendstream::decode";

/// Traces an accepted stream header.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_stream_header(offset: u64, version: u32, index: u64) {
    tracing::debug!(
        target: DECODE_TARGET,
        offset = offset,
        version = version,
        stream = index,
        "stream header"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_stream_header(_offset: u64, _version: u32, _index: u64) {}

/// Traces a decoded command before it is dispatched.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_command(offset: u64, kind: CommandKind, len: u32) {
    tracing::trace!(
        target: DECODE_TARGET,
        offset = offset,
        command = %kind,
        len = len,
        "command"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_command(_offset: u64, _kind: CommandKind, _len: u32) {}

/// Traces the outcome of a successful session.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_summary(summary: &DecodeSummary) {
    tracing::info!(
        target: DECODE_TARGET,
        streams = summary.streams(),
        commands = summary.commands(),
        bytes = summary.bytes(),
        "decode finished"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_summary(_summary: &DecodeSummary) {}
