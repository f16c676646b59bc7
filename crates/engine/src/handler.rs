//! The operation handler interface.

use std::error::Error;
use std::fmt;
use std::io;

use protocol::{CloneSource, Timespec, Uuid};

use crate::resolve::ResolvedPath;

/// Result returned by every handler method.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure reported by an [`OperationHandler`].
///
/// Wraps any error type; the session stops at the first one.
#[derive(Debug)]
pub struct HandlerError {
    inner: Box<dyn Error + Send + Sync + 'static>,
}

impl HandlerError {
    /// Wraps an arbitrary error.
    pub fn new(inner: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Consumes the wrapper and returns the wrapped error.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.inner
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl From<io::Error> for HandlerError {
    fn from(err: io::Error) -> Self {
        Self::new(err)
    }
}

/// Timestamps carried by a `utimes` command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileTimes {
    /// Access time.
    pub atime: Timespec,
    /// Modification time.
    pub mtime: Timespec,
    /// Change time.
    pub ctime: Timespec,
    /// Creation time, when the sender provided one.
    pub otime: Option<Timespec>,
}

/// Consumer of decoded operations.
///
/// The dispatcher calls exactly one method per command, in stream order, with
/// every path already resolved under the receive root. Arguments are borrowed
/// for the duration of the call only. There are no default bodies: adding an
/// operation breaks every implementation until it handles it.
///
/// The stream's `end` command has no method; it ends the stream.
pub trait OperationHandler {
    /// A full subvolume starts at `path`.
    fn subvol(&mut self, path: &ResolvedPath, uuid: &Uuid, ctransid: u64) -> HandlerResult;

    /// A snapshot of `parent_uuid` starts at `path`.
    fn snapshot(
        &mut self,
        path: &ResolvedPath,
        uuid: &Uuid,
        ctransid: u64,
        parent_uuid: &Uuid,
        parent_ctransid: u64,
    ) -> HandlerResult;

    /// Create a regular file.
    fn mkfile(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult;

    /// Create a directory.
    fn mkdir(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult;

    /// Create a device node.
    fn mknod(&mut self, path: &ResolvedPath, mode: u32, rdev: u64, ino: Option<u64>)
    -> HandlerResult;

    /// Create a named pipe.
    fn mkfifo(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult;

    /// Create a socket node.
    fn mksock(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult;

    /// Create a symbolic link whose content is `target`, verbatim.
    fn symlink(&mut self, path: &ResolvedPath, target: &[u8], ino: Option<u64>) -> HandlerResult;

    /// Rename `from` to `to`.
    fn rename(&mut self, from: &ResolvedPath, to: &ResolvedPath) -> HandlerResult;

    /// Create `path` as a hard link to `target`.
    fn link(&mut self, path: &ResolvedPath, target: &ResolvedPath) -> HandlerResult;

    /// Remove a non-directory entry.
    fn unlink(&mut self, path: &ResolvedPath) -> HandlerResult;

    /// Remove a directory.
    fn rmdir(&mut self, path: &ResolvedPath) -> HandlerResult;

    /// Write `data` at `offset`.
    fn write(&mut self, path: &ResolvedPath, offset: u64, data: &[u8]) -> HandlerResult;

    /// Share `len` bytes at `offset` from `source`.
    fn clone_range(
        &mut self,
        path: &ResolvedPath,
        offset: u64,
        len: u64,
        source: &CloneSource,
    ) -> HandlerResult;

    /// Set extended attribute `name` to `data`.
    fn set_xattr(&mut self, path: &ResolvedPath, name: &[u8], data: &[u8]) -> HandlerResult;

    /// Remove extended attribute `name`.
    fn remove_xattr(&mut self, path: &ResolvedPath, name: &[u8]) -> HandlerResult;

    /// Set the file size.
    fn truncate(&mut self, path: &ResolvedPath, size: u64) -> HandlerResult;

    /// Change permission bits.
    fn chmod(&mut self, path: &ResolvedPath, mode: u32) -> HandlerResult;

    /// Change ownership.
    fn chown(&mut self, path: &ResolvedPath, uid: u32, gid: u32) -> HandlerResult;

    /// Set timestamps.
    fn utimes(&mut self, path: &ResolvedPath, times: &FileTimes) -> HandlerResult;

    /// A range changed without its contents being sent.
    fn update_extent(&mut self, path: &ResolvedPath, offset: u64, len: u64) -> HandlerResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_stay_reachable() {
        let err = HandlerError::from(io::Error::new(io::ErrorKind::StorageFull, "disk full"));

        assert_eq!(err.to_string(), "disk full");
        let inner = err.into_inner().downcast::<io::Error>().unwrap();
        assert_eq!(inner.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn string_messages_are_accepted() {
        let err = HandlerError::new("refused");
        assert_eq!(err.to_string(), "refused");
        assert!(err.source().is_some());
    }
}
