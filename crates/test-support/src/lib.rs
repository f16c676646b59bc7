//! Fixtures shared by the workspace's tests.
//!
//! [`StreamBuilder`] assembles send streams command by command on top of
//! [`protocol::CommandWriter`], so fixtures always carry valid checksums unless
//! a test corrupts them on purpose.

use std::io::Write;

use protocol::{AttributeTag, CommandKind, CommandWriter, Timespec, Uuid, write_stream_header};
use tempfile::NamedTempFile;

/// Uuid whose bytes are `0, 1, 2, ..., 15`.
#[must_use]
pub fn sequential_uuid() -> Uuid {
    Uuid::from_bytes(core::array::from_fn(|i| i as u8))
}

/// Builds an in-memory send stream.
#[derive(Clone, Debug)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
    offsets: Vec<u64>,
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBuilder {
    /// Starts a stream with a version 1 header.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = Vec::new();
        write_stream_header(&mut bytes).expect("writing to a Vec cannot fail");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    /// Starts from arbitrary bytes, without a header.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    /// Appends a second stream header, as in a concatenated stream.
    pub fn header(&mut self) -> &mut Self {
        write_stream_header(&mut self.bytes).expect("writing to a Vec cannot fail");
        self
    }

    /// Appends a command built by `build`.
    pub fn command(
        &mut self,
        kind: CommandKind,
        build: impl FnOnce(&mut CommandWriter),
    ) -> &mut Self {
        let mut writer = CommandWriter::new(kind);
        build(&mut writer);
        self.writer(&writer)
    }

    /// Appends an already prepared command.
    pub fn writer(&mut self, writer: &CommandWriter) -> &mut Self {
        self.offsets.push(self.bytes.len() as u64);
        let encoded = writer.finish().expect("fixture command must encode");
        self.bytes.extend_from_slice(&encoded);
        self
    }

    /// Appends bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Appends a `subvol` command.
    pub fn subvol(&mut self, path: &str, uuid: &Uuid, ctransid: u64) -> &mut Self {
        self.command(CommandKind::Subvol, |w| {
            w.path(AttributeTag::Path, path)
                .uuid(AttributeTag::Uuid, uuid)
                .u64(AttributeTag::Ctransid, ctransid);
        })
    }

    /// Appends a command whose only attribute is a path.
    pub fn path_only(&mut self, kind: CommandKind, path: &str) -> &mut Self {
        self.command(kind, |w| {
            w.path(AttributeTag::Path, path);
        })
    }

    /// Appends a `write` command.
    pub fn write(&mut self, path: &str, offset: u64, data: &[u8]) -> &mut Self {
        self.command(CommandKind::Write, |w| {
            w.path(AttributeTag::Path, path)
                .u64(AttributeTag::FileOffset, offset)
                .bytes(AttributeTag::Data, data);
        })
    }

    /// Appends a `rename` command.
    pub fn rename(&mut self, from: &str, to: &str) -> &mut Self {
        self.command(CommandKind::Rename, |w| {
            w.path(AttributeTag::Path, from)
                .path(AttributeTag::PathTo, to);
        })
    }

    /// Appends a `utimes` command with equal access, modification and change times.
    pub fn utimes(&mut self, path: &str, time: Timespec) -> &mut Self {
        self.command(CommandKind::Utimes, |w| {
            w.path(AttributeTag::Path, path)
                .timespec(AttributeTag::Atime, time)
                .timespec(AttributeTag::Mtime, time)
                .timespec(AttributeTag::Ctime, time);
        })
    }

    /// Appends an `end` command.
    pub fn end(&mut self) -> &mut Self {
        self.command(CommandKind::End, |_| {})
    }

    /// Stream offsets at which each appended command starts.
    #[must_use]
    pub fn command_offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Current length of the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a copy of the stream bytes.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Writes `bytes` to a fresh temporary file.
pub fn stream_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temporary stream file");
    file.write_all(bytes).expect("write temporary stream file");
    file.flush().expect("flush temporary stream file");
    file
}
