use ::core::fmt;
use ::core::str::FromStr;

use thiserror::Error;

/// Command types carried by a version 1 send stream.
///
/// The numeric values are the on-the-wire command codes. Code `0` is reserved
/// by the format and never decodes to a command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum CommandKind {
    #[doc(alias = "BTRFS_SEND_C_SUBVOL")]
    /// Start of a full subvolume.
    Subvol = 1,
    #[doc(alias = "BTRFS_SEND_C_SNAPSHOT")]
    /// Start of an incremental snapshot relative to a parent.
    Snapshot = 2,
    #[doc(alias = "BTRFS_SEND_C_MKFILE")]
    /// Create a regular file.
    Mkfile = 3,
    #[doc(alias = "BTRFS_SEND_C_MKDIR")]
    /// Create a directory.
    Mkdir = 4,
    #[doc(alias = "BTRFS_SEND_C_MKNOD")]
    /// Create a device node.
    Mknod = 5,
    #[doc(alias = "BTRFS_SEND_C_MKFIFO")]
    /// Create a named pipe.
    Mkfifo = 6,
    #[doc(alias = "BTRFS_SEND_C_MKSOCK")]
    /// Create a unix socket node.
    Mksock = 7,
    #[doc(alias = "BTRFS_SEND_C_SYMLINK")]
    /// Create a symbolic link.
    Symlink = 8,
    #[doc(alias = "BTRFS_SEND_C_RENAME")]
    /// Rename an entry.
    Rename = 9,
    #[doc(alias = "BTRFS_SEND_C_LINK")]
    /// Create a hard link.
    Link = 10,
    #[doc(alias = "BTRFS_SEND_C_UNLINK")]
    /// Remove a non-directory entry.
    Unlink = 11,
    #[doc(alias = "BTRFS_SEND_C_RMDIR")]
    /// Remove a directory.
    Rmdir = 12,
    #[doc(alias = "BTRFS_SEND_C_SET_XATTR")]
    /// Set an extended attribute.
    SetXattr = 13,
    #[doc(alias = "BTRFS_SEND_C_REMOVE_XATTR")]
    /// Remove an extended attribute.
    RemoveXattr = 14,
    #[doc(alias = "BTRFS_SEND_C_WRITE")]
    /// Write inline data at an offset.
    Write = 15,
    #[doc(alias = "BTRFS_SEND_C_CLONE")]
    /// Share a range of another file's extents.
    Clone = 16,
    #[doc(alias = "BTRFS_SEND_C_TRUNCATE")]
    /// Set a file's size.
    Truncate = 17,
    #[doc(alias = "BTRFS_SEND_C_CHMOD")]
    /// Change permission bits.
    Chmod = 18,
    #[doc(alias = "BTRFS_SEND_C_CHOWN")]
    /// Change ownership.
    Chown = 19,
    #[doc(alias = "BTRFS_SEND_C_UTIMES")]
    /// Set access, modification and change times.
    Utimes = 20,
    #[doc(alias = "BTRFS_SEND_C_END")]
    /// End of the current stream.
    End = 21,
    #[doc(alias = "BTRFS_SEND_C_UPDATE_EXTENT")]
    /// A range changed but its data was not sent.
    UpdateExtent = 22,
}

/// Error returned when parsing a command kind from its name fails.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown send stream command name: \"{invalid_name}\"")]
pub struct ParseCommandKindError {
    invalid_name: String,
}

impl ParseCommandKindError {
    /// Returns the name that failed to parse.
    #[must_use]
    pub fn invalid_name(&self) -> &str {
        &self.invalid_name
    }
}

impl CommandKind {
    /// Every command kind ordered by wire value.
    pub const ALL: [CommandKind; 22] = [
        CommandKind::Subvol,
        CommandKind::Snapshot,
        CommandKind::Mkfile,
        CommandKind::Mkdir,
        CommandKind::Mknod,
        CommandKind::Mkfifo,
        CommandKind::Mksock,
        CommandKind::Symlink,
        CommandKind::Rename,
        CommandKind::Link,
        CommandKind::Unlink,
        CommandKind::Rmdir,
        CommandKind::SetXattr,
        CommandKind::RemoveXattr,
        CommandKind::Write,
        CommandKind::Clone,
        CommandKind::Truncate,
        CommandKind::Chmod,
        CommandKind::Chown,
        CommandKind::Utimes,
        CommandKind::End,
        CommandKind::UpdateExtent,
    ];

    /// Returns the numeric representation used on the wire.
    #[must_use]
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Maps a wire value onto a command kind.
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Subvol),
            2 => Some(Self::Snapshot),
            3 => Some(Self::Mkfile),
            4 => Some(Self::Mkdir),
            5 => Some(Self::Mknod),
            6 => Some(Self::Mkfifo),
            7 => Some(Self::Mksock),
            8 => Some(Self::Symlink),
            9 => Some(Self::Rename),
            10 => Some(Self::Link),
            11 => Some(Self::Unlink),
            12 => Some(Self::Rmdir),
            13 => Some(Self::SetXattr),
            14 => Some(Self::RemoveXattr),
            15 => Some(Self::Write),
            16 => Some(Self::Clone),
            17 => Some(Self::Truncate),
            18 => Some(Self::Chmod),
            19 => Some(Self::Chown),
            20 => Some(Self::Utimes),
            21 => Some(Self::End),
            22 => Some(Self::UpdateExtent),
            _ => None,
        }
    }

    /// Short lowercase name used in diagnostics and dump output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Subvol => "subvol",
            Self::Snapshot => "snapshot",
            Self::Mkfile => "mkfile",
            Self::Mkdir => "mkdir",
            Self::Mknod => "mknod",
            Self::Mkfifo => "mkfifo",
            Self::Mksock => "mksock",
            Self::Symlink => "symlink",
            Self::Rename => "rename",
            Self::Link => "link",
            Self::Unlink => "unlink",
            Self::Rmdir => "rmdir",
            Self::SetXattr => "set_xattr",
            Self::RemoveXattr => "remove_xattr",
            Self::Write => "write",
            Self::Clone => "clone",
            Self::Truncate => "truncate",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
            Self::Utimes => "utimes",
            Self::End => "end",
            Self::UpdateExtent => "update_extent",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = ParseCommandKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseCommandKindError {
                invalid_name: s.to_owned(),
            })
    }
}

impl TryFrom<u16> for CommandKind {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(value)
    }
}
