//! Maps decoded commands onto [`OperationHandler`] calls.

use protocol::{Command, CommandKind};
use thiserror::Error;

use crate::handler::{FileTimes, HandlerError, OperationHandler};
use crate::resolve::{PathResolver, ResolveError};

/// What the session should do after a command was dispatched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dispatched {
    /// Keep reading commands.
    Continue,
    /// The stream's `end` command was reached.
    End,
}

/// Failures raised while dispatching a single command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A path could not be placed under the receive root.
    #[error("{command}: {source}")]
    InvalidPath {
        /// Command carrying the path.
        command: CommandKind,
        /// Resolution failure.
        #[source]
        source: ResolveError,
    },
    /// The handler rejected the operation.
    #[error("{command} handler failed: {source}")]
    HandlerFailed {
        /// Command being handled.
        command: CommandKind,
        /// Handler failure.
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Command the failure is attributed to.
    #[must_use]
    pub const fn command(&self) -> CommandKind {
        match self {
            Self::InvalidPath { command, .. } | Self::HandlerFailed { command, .. } => *command,
        }
    }
}

/// Resolves every path of `command` and makes the matching handler call.
///
/// All paths are resolved before the handler runs, so a command with an
/// unresolvable path never reaches the handler.
pub fn dispatch<H: OperationHandler + ?Sized>(
    command: &Command<'_>,
    resolver: &mut PathResolver,
    handler: &mut H,
) -> Result<Dispatched, DispatchError> {
    let kind = command.kind();
    let invalid = |source| DispatchError::InvalidPath {
        command: kind,
        source,
    };

    let result = match command {
        Command::Subvol {
            path,
            uuid,
            ctransid,
        } => {
            let path = resolver.enter_subvolume(path).map_err(invalid)?;
            handler.subvol(&path, uuid, *ctransid)
        }
        Command::Snapshot {
            path,
            uuid,
            ctransid,
            parent_uuid,
            parent_ctransid,
        } => {
            let path = resolver.enter_subvolume(path).map_err(invalid)?;
            handler.snapshot(&path, uuid, *ctransid, parent_uuid, *parent_ctransid)
        }
        Command::Mkfile { path, ino } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.mkfile(&path, *ino)
        }
        Command::Mkdir { path, ino } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.mkdir(&path, *ino)
        }
        Command::Mknod {
            path,
            mode,
            rdev,
            ino,
        } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.mknod(&path, *mode, *rdev, *ino)
        }
        Command::Mkfifo { path, ino } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.mkfifo(&path, *ino)
        }
        Command::Mksock { path, ino } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.mksock(&path, *ino)
        }
        Command::Symlink { path, target, ino } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.symlink(&path, target, *ino)
        }
        Command::Rename { from, to } => {
            let from = resolver.resolve(from).map_err(invalid)?;
            let to = resolver.resolve(to).map_err(invalid)?;
            handler.rename(&from, &to)
        }
        Command::Link { path, target } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            let target = resolver.resolve(target).map_err(invalid)?;
            handler.link(&path, &target)
        }
        Command::Unlink { path } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.unlink(&path)
        }
        Command::Rmdir { path } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.rmdir(&path)
        }
        Command::SetXattr { path, name, data } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.set_xattr(&path, name, data)
        }
        Command::RemoveXattr { path, name } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.remove_xattr(&path, name)
        }
        Command::Write { path, offset, data } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.write(&path, *offset, data)
        }
        Command::Clone {
            path,
            offset,
            len,
            source,
        } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.clone_range(&path, *offset, *len, source)
        }
        Command::Truncate { path, size } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.truncate(&path, *size)
        }
        Command::Chmod { path, mode } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.chmod(&path, *mode)
        }
        Command::Chown { path, uid, gid } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.chown(&path, *uid, *gid)
        }
        Command::Utimes {
            path,
            atime,
            mtime,
            ctime,
            otime,
        } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            let times = FileTimes {
                atime: *atime,
                mtime: *mtime,
                ctime: *ctime,
                otime: *otime,
            };
            handler.utimes(&path, &times)
        }
        Command::UpdateExtent { path, offset, len } => {
            let path = resolver.resolve(path).map_err(invalid)?;
            handler.update_extent(&path, *offset, *len)
        }
        Command::End => return Ok(Dispatched::End),
    };

    result
        .map(|()| Dispatched::Continue)
        .map_err(|source| DispatchError::HandlerFailed {
            command: kind,
            source,
        })
}
