use ::core::fmt;

/// Attribute tags defined by the version 1 send stream.
///
/// Values match the wire numbering. Tag `0` is reserved and, like any value
/// above [`AttributeTag::CloneLen`], is rejected as unknown.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum AttributeTag {
    #[doc(alias = "BTRFS_SEND_A_UUID")]
    /// Subvolume uuid (16 bytes).
    Uuid = 1,
    #[doc(alias = "BTRFS_SEND_A_CTRANSID")]
    /// Subvolume change transaction id.
    Ctransid = 2,
    #[doc(alias = "BTRFS_SEND_A_INO")]
    /// Inode number of a newly created entry.
    Ino = 3,
    #[doc(alias = "BTRFS_SEND_A_SIZE")]
    /// File size or range length.
    Size = 4,
    #[doc(alias = "BTRFS_SEND_A_MODE")]
    /// File mode bits.
    Mode = 5,
    #[doc(alias = "BTRFS_SEND_A_UID")]
    /// Owner user id.
    Uid = 6,
    #[doc(alias = "BTRFS_SEND_A_GID")]
    /// Owner group id.
    Gid = 7,
    #[doc(alias = "BTRFS_SEND_A_RDEV")]
    /// Device number of a device node.
    Rdev = 8,
    #[doc(alias = "BTRFS_SEND_A_CTIME")]
    /// Inode change time.
    Ctime = 9,
    #[doc(alias = "BTRFS_SEND_A_MTIME")]
    /// Modification time.
    Mtime = 10,
    #[doc(alias = "BTRFS_SEND_A_ATIME")]
    /// Access time.
    Atime = 11,
    #[doc(alias = "BTRFS_SEND_A_OTIME")]
    /// Creation time.
    Otime = 12,
    #[doc(alias = "BTRFS_SEND_A_XATTR_NAME")]
    /// Extended attribute name.
    XattrName = 13,
    #[doc(alias = "BTRFS_SEND_A_XATTR_DATA")]
    /// Extended attribute value.
    XattrData = 14,
    #[doc(alias = "BTRFS_SEND_A_PATH")]
    /// Primary path of the command.
    Path = 15,
    #[doc(alias = "BTRFS_SEND_A_PATH_TO")]
    /// Rename destination.
    PathTo = 16,
    #[doc(alias = "BTRFS_SEND_A_PATH_LINK")]
    /// Hard link source or symlink target.
    PathLink = 17,
    #[doc(alias = "BTRFS_SEND_A_FILE_OFFSET")]
    /// Byte offset inside the target file.
    FileOffset = 18,
    #[doc(alias = "BTRFS_SEND_A_DATA")]
    /// Inline write payload.
    Data = 19,
    #[doc(alias = "BTRFS_SEND_A_CLONE_UUID")]
    /// Uuid of the clone source (or snapshot parent).
    CloneUuid = 20,
    #[doc(alias = "BTRFS_SEND_A_CLONE_CTRANSID")]
    /// Transaction id of the clone source (or snapshot parent).
    CloneCtransid = 21,
    #[doc(alias = "BTRFS_SEND_A_CLONE_PATH")]
    /// Path of the clone source inside its subvolume.
    ClonePath = 22,
    #[doc(alias = "BTRFS_SEND_A_CLONE_OFFSET")]
    /// Offset inside the clone source.
    CloneOffset = 23,
    #[doc(alias = "BTRFS_SEND_A_CLONE_LEN")]
    /// Length of the cloned range.
    CloneLen = 24,
}

impl AttributeTag {
    /// Highest tag value understood by the decoder.
    pub const MAX: u16 = AttributeTag::CloneLen as u16;

    /// Returns the numeric representation used on the wire.
    #[must_use]
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Maps a wire value onto an attribute tag.
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Uuid),
            2 => Some(Self::Ctransid),
            3 => Some(Self::Ino),
            4 => Some(Self::Size),
            5 => Some(Self::Mode),
            6 => Some(Self::Uid),
            7 => Some(Self::Gid),
            8 => Some(Self::Rdev),
            9 => Some(Self::Ctime),
            10 => Some(Self::Mtime),
            11 => Some(Self::Atime),
            12 => Some(Self::Otime),
            13 => Some(Self::XattrName),
            14 => Some(Self::XattrData),
            15 => Some(Self::Path),
            16 => Some(Self::PathTo),
            17 => Some(Self::PathLink),
            18 => Some(Self::FileOffset),
            19 => Some(Self::Data),
            20 => Some(Self::CloneUuid),
            21 => Some(Self::CloneCtransid),
            22 => Some(Self::ClonePath),
            23 => Some(Self::CloneOffset),
            24 => Some(Self::CloneLen),
            _ => None,
        }
    }

    /// Short lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Ctransid => "ctransid",
            Self::Ino => "ino",
            Self::Size => "size",
            Self::Mode => "mode",
            Self::Uid => "uid",
            Self::Gid => "gid",
            Self::Rdev => "rdev",
            Self::Ctime => "ctime",
            Self::Mtime => "mtime",
            Self::Atime => "atime",
            Self::Otime => "otime",
            Self::XattrName => "xattr_name",
            Self::XattrData => "xattr_data",
            Self::Path => "path",
            Self::PathTo => "path_to",
            Self::PathLink => "path_link",
            Self::FileOffset => "file_offset",
            Self::Data => "data",
            Self::CloneUuid => "clone_uuid",
            Self::CloneCtransid => "clone_ctransid",
            Self::ClonePath => "clone_path",
            Self::CloneOffset => "clone_offset",
            Self::CloneLen => "clone_len",
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AttributeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
