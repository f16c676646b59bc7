//! Typed commands and the decoder that produces them.

mod decode;
mod header;
mod timespec;

pub use decode::{CommandDecoder, DecodedCommand};
pub use header::CommandHeader;
pub use timespec::Timespec;

use uuid::Uuid;

use crate::attribute::{AttributeSet, AttributeTag};
use crate::command_kind::CommandKind;
use crate::error::StreamError;
use crate::path::StreamPath;
use crate::schema::Schema;

/// Source range of a `clone` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CloneSource {
    /// Uuid of the subvolume holding the source file.
    pub uuid: Uuid,
    /// Transaction id of that subvolume.
    pub ctransid: u64,
    /// Source file, relative to its subvolume.
    pub path: StreamPath,
    /// Offset of the range inside the source file.
    pub offset: u64,
}

/// A fully decoded, schema-checked command.
///
/// Byte payloads borrow from the decoder's command buffer and are only valid
/// until the next command is read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    /// Start of a full subvolume.
    Subvol {
        /// Subvolume location relative to the receive root.
        path: StreamPath,
        /// Subvolume uuid.
        uuid: Uuid,
        /// Change transaction id.
        ctransid: u64,
    },
    /// Start of a snapshot sent relative to a parent.
    Snapshot {
        /// Snapshot location relative to the receive root.
        path: StreamPath,
        /// Snapshot uuid.
        uuid: Uuid,
        /// Change transaction id.
        ctransid: u64,
        /// Uuid of the parent the delta is based on.
        parent_uuid: Uuid,
        /// Transaction id of the parent.
        parent_ctransid: u64,
    },
    /// Create a regular file.
    Mkfile {
        /// New entry.
        path: StreamPath,
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Create a directory.
    Mkdir {
        /// New entry.
        path: StreamPath,
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Create a device node.
    Mknod {
        /// New entry.
        path: StreamPath,
        /// File type and permission bits.
        mode: u32,
        /// Device number.
        rdev: u64,
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Create a named pipe.
    Mkfifo {
        /// New entry.
        path: StreamPath,
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Create a socket node.
    Mksock {
        /// New entry.
        path: StreamPath,
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Create a symbolic link.
    Symlink {
        /// New entry.
        path: StreamPath,
        /// Link content, kept verbatim apart from the NUL and length checks.
        target: &'a [u8],
        /// Inode number on the sending side.
        ino: Option<u64>,
    },
    /// Rename an entry.
    Rename {
        /// Existing entry.
        from: StreamPath,
        /// New location.
        to: StreamPath,
    },
    /// Create a hard link.
    Link {
        /// New entry.
        path: StreamPath,
        /// Existing entry the link points at.
        target: StreamPath,
    },
    /// Remove a non-directory entry.
    Unlink {
        /// Entry to remove.
        path: StreamPath,
    },
    /// Remove a directory.
    Rmdir {
        /// Directory to remove.
        path: StreamPath,
    },
    /// Set an extended attribute.
    SetXattr {
        /// Target entry.
        path: StreamPath,
        /// Attribute name.
        name: &'a [u8],
        /// Attribute value.
        data: &'a [u8],
    },
    /// Remove an extended attribute.
    RemoveXattr {
        /// Target entry.
        path: StreamPath,
        /// Attribute name.
        name: &'a [u8],
    },
    /// Write data at an offset.
    Write {
        /// Target file.
        path: StreamPath,
        /// Byte offset of the write.
        offset: u64,
        /// Bytes to write.
        data: &'a [u8],
    },
    /// Share a range of another file's extents.
    Clone {
        /// Target file.
        path: StreamPath,
        /// Offset in the target file.
        offset: u64,
        /// Length of the range.
        len: u64,
        /// Where the range comes from.
        source: CloneSource,
    },
    /// Set a file's size.
    Truncate {
        /// Target file.
        path: StreamPath,
        /// New size.
        size: u64,
    },
    /// Change permission bits.
    Chmod {
        /// Target entry.
        path: StreamPath,
        /// New mode.
        mode: u32,
    },
    /// Change ownership.
    Chown {
        /// Target entry.
        path: StreamPath,
        /// New owner.
        uid: u32,
        /// New group.
        gid: u32,
    },
    /// Set timestamps.
    Utimes {
        /// Target entry.
        path: StreamPath,
        /// Access time.
        atime: Timespec,
        /// Modification time.
        mtime: Timespec,
        /// Change time.
        ctime: Timespec,
        /// Creation time, when sent.
        otime: Option<Timespec>,
    },
    /// A range changed but its contents were not sent.
    UpdateExtent {
        /// Target file.
        path: StreamPath,
        /// Offset of the range.
        offset: u64,
        /// Length of the range.
        len: u64,
    },
    /// End of the current stream.
    End,
}

impl<'a> Command<'a> {
    /// Builds a typed command from a parsed attribute set.
    ///
    /// The set is first checked against the command's [`Schema`]; the typed
    /// accessors then validate widths, ranges and paths.
    pub fn from_attributes(attributes: &AttributeSet<'a>) -> Result<Self, StreamError> {
        use AttributeTag as Tag;

        let kind = attributes.command();
        Schema::for_command(kind).validate(attributes)?;
        let a = attributes;

        let command = match kind {
            CommandKind::Subvol => Self::Subvol {
                path: a.path(Tag::Path)?,
                uuid: a.uuid(Tag::Uuid)?,
                ctransid: a.u64(Tag::Ctransid)?,
            },
            CommandKind::Snapshot => Self::Snapshot {
                path: a.path(Tag::Path)?,
                uuid: a.uuid(Tag::Uuid)?,
                ctransid: a.u64(Tag::Ctransid)?,
                parent_uuid: a.uuid(Tag::CloneUuid)?,
                parent_ctransid: a.u64(Tag::CloneCtransid)?,
            },
            CommandKind::Mkfile => Self::Mkfile {
                path: a.path(Tag::Path)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Mkdir => Self::Mkdir {
                path: a.path(Tag::Path)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Mknod => Self::Mknod {
                path: a.path(Tag::Path)?,
                mode: a.u32(Tag::Mode)?,
                rdev: a.u64(Tag::Rdev)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Mkfifo => Self::Mkfifo {
                path: a.path(Tag::Path)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Mksock => Self::Mksock {
                path: a.path(Tag::Path)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Symlink => Self::Symlink {
                path: a.path(Tag::Path)?,
                target: a.link_target(Tag::PathLink)?,
                ino: a.optional_u64(Tag::Ino)?,
            },
            CommandKind::Rename => Self::Rename {
                from: a.path(Tag::Path)?,
                to: a.path(Tag::PathTo)?,
            },
            CommandKind::Link => Self::Link {
                path: a.path(Tag::Path)?,
                target: a.path(Tag::PathLink)?,
            },
            CommandKind::Unlink => Self::Unlink {
                path: a.path(Tag::Path)?,
            },
            CommandKind::Rmdir => Self::Rmdir {
                path: a.path(Tag::Path)?,
            },
            CommandKind::SetXattr => Self::SetXattr {
                path: a.path(Tag::Path)?,
                name: a.bytes(Tag::XattrName)?,
                data: a.bytes(Tag::XattrData)?,
            },
            CommandKind::RemoveXattr => Self::RemoveXattr {
                path: a.path(Tag::Path)?,
                name: a.bytes(Tag::XattrName)?,
            },
            CommandKind::Write => Self::Write {
                path: a.path(Tag::Path)?,
                offset: a.u64(Tag::FileOffset)?,
                data: a.bytes(Tag::Data)?,
            },
            CommandKind::Clone => Self::Clone {
                path: a.path(Tag::Path)?,
                offset: a.u64(Tag::FileOffset)?,
                len: a.u64(Tag::CloneLen)?,
                source: CloneSource {
                    uuid: a.uuid(Tag::CloneUuid)?,
                    ctransid: a.u64(Tag::CloneCtransid)?,
                    path: a.path(Tag::ClonePath)?,
                    offset: a.u64(Tag::CloneOffset)?,
                },
            },
            CommandKind::Truncate => Self::Truncate {
                path: a.path(Tag::Path)?,
                size: a.u64(Tag::Size)?,
            },
            CommandKind::Chmod => Self::Chmod {
                path: a.path(Tag::Path)?,
                mode: a.u32(Tag::Mode)?,
            },
            CommandKind::Chown => Self::Chown {
                path: a.path(Tag::Path)?,
                uid: a.u32(Tag::Uid)?,
                gid: a.u32(Tag::Gid)?,
            },
            CommandKind::Utimes => Self::Utimes {
                path: a.path(Tag::Path)?,
                atime: a.timespec(Tag::Atime)?,
                mtime: a.timespec(Tag::Mtime)?,
                ctime: a.timespec(Tag::Ctime)?,
                otime: a.optional_timespec(Tag::Otime)?,
            },
            CommandKind::UpdateExtent => Self::UpdateExtent {
                path: a.path(Tag::Path)?,
                offset: a.u64(Tag::FileOffset)?,
                len: a.u64(Tag::Size)?,
            },
            CommandKind::End => Self::End,
        };

        Ok(command)
    }

    /// Returns the command's kind.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Subvol { .. } => CommandKind::Subvol,
            Self::Snapshot { .. } => CommandKind::Snapshot,
            Self::Mkfile { .. } => CommandKind::Mkfile,
            Self::Mkdir { .. } => CommandKind::Mkdir,
            Self::Mknod { .. } => CommandKind::Mknod,
            Self::Mkfifo { .. } => CommandKind::Mkfifo,
            Self::Mksock { .. } => CommandKind::Mksock,
            Self::Symlink { .. } => CommandKind::Symlink,
            Self::Rename { .. } => CommandKind::Rename,
            Self::Link { .. } => CommandKind::Link,
            Self::Unlink { .. } => CommandKind::Unlink,
            Self::Rmdir { .. } => CommandKind::Rmdir,
            Self::SetXattr { .. } => CommandKind::SetXattr,
            Self::RemoveXattr { .. } => CommandKind::RemoveXattr,
            Self::Write { .. } => CommandKind::Write,
            Self::Clone { .. } => CommandKind::Clone,
            Self::Truncate { .. } => CommandKind::Truncate,
            Self::Chmod { .. } => CommandKind::Chmod,
            Self::Chown { .. } => CommandKind::Chown,
            Self::Utimes { .. } => CommandKind::Utimes,
            Self::UpdateExtent { .. } => CommandKind::UpdateExtent,
            Self::End => CommandKind::End,
        }
    }
}
