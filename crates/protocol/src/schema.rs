//! Per-command attribute schemas.

use crate::attribute::{AttributeSet, AttributeTag};
use crate::command_kind::CommandKind;
use crate::error::StreamError;

use AttributeTag::{
    Atime, CloneCtransid, CloneLen, CloneOffset, ClonePath, CloneUuid, Ctime, Ctransid, Data,
    FileOffset, Gid, Ino, Mode, Mtime, Otime, Path, PathLink, PathTo, Rdev, Size, Uid, Uuid,
    XattrData, XattrName,
};

/// Required and optional attributes of one command type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schema {
    /// Attributes that must be present.
    pub required: &'static [AttributeTag],
    /// Attributes that may be present.
    pub optional: &'static [AttributeTag],
}

impl Schema {
    const fn new(required: &'static [AttributeTag], optional: &'static [AttributeTag]) -> Self {
        Self { required, optional }
    }

    /// Returns the schema for `kind`.
    #[must_use]
    pub fn for_command(kind: CommandKind) -> &'static Schema {
        match kind {
            CommandKind::Subvol => &SUBVOL,
            CommandKind::Snapshot => &SNAPSHOT,
            CommandKind::Mkfile | CommandKind::Mkdir | CommandKind::Mkfifo | CommandKind::Mksock => {
                &CREATE
            }
            CommandKind::Mknod => &MKNOD,
            CommandKind::Symlink => &SYMLINK,
            CommandKind::Rename => &RENAME,
            CommandKind::Link => &LINK,
            CommandKind::Unlink | CommandKind::Rmdir => &PATH_ONLY,
            CommandKind::SetXattr => &SET_XATTR,
            CommandKind::RemoveXattr => &REMOVE_XATTR,
            CommandKind::Write => &WRITE,
            CommandKind::Clone => &CLONE,
            CommandKind::Truncate => &TRUNCATE,
            CommandKind::Chmod => &CHMOD,
            CommandKind::Chown => &CHOWN,
            CommandKind::Utimes => &UTIMES,
            CommandKind::End => &END,
            CommandKind::UpdateExtent => &UPDATE_EXTENT,
        }
    }

    /// Reports whether `tag` may appear in a command with this schema.
    #[must_use]
    pub fn allows(&self, tag: AttributeTag) -> bool {
        self.required.contains(&tag) || self.optional.contains(&tag)
    }

    /// Checks `attributes` against the schema.
    ///
    /// Attributes outside the schema are reported first, in wire order, then
    /// missing required attributes in schema order.
    pub fn validate(&self, attributes: &AttributeSet<'_>) -> Result<(), StreamError> {
        let command = attributes.command();

        if let Some(&attribute) = attributes.tags().iter().find(|tag| !self.allows(**tag)) {
            return Err(StreamError::UnexpectedAttribute { command, attribute });
        }

        if let Some(&attribute) = self
            .required
            .iter()
            .find(|tag| attributes.get(**tag).is_none())
        {
            return Err(StreamError::MissingAttribute { command, attribute });
        }

        Ok(())
    }
}

static SUBVOL: Schema = Schema::new(&[Path, Uuid, Ctransid], &[]);
static SNAPSHOT: Schema = Schema::new(&[Path, Uuid, Ctransid, CloneUuid, CloneCtransid], &[]);
static CREATE: Schema = Schema::new(&[Path], &[Ino]);
static MKNOD: Schema = Schema::new(&[Path, Mode, Rdev], &[Ino]);
static SYMLINK: Schema = Schema::new(&[Path, PathLink], &[Ino]);
static RENAME: Schema = Schema::new(&[Path, PathTo], &[]);
static LINK: Schema = Schema::new(&[Path, PathLink], &[]);
static PATH_ONLY: Schema = Schema::new(&[Path], &[]);
static SET_XATTR: Schema = Schema::new(&[Path, XattrName, XattrData], &[]);
static REMOVE_XATTR: Schema = Schema::new(&[Path, XattrName], &[]);
static WRITE: Schema = Schema::new(&[Path, FileOffset, Data], &[]);
static CLONE: Schema = Schema::new(
    &[
        Path,
        FileOffset,
        CloneLen,
        CloneUuid,
        CloneCtransid,
        ClonePath,
        CloneOffset,
    ],
    &[],
);
static TRUNCATE: Schema = Schema::new(&[Path, Size], &[]);
static CHMOD: Schema = Schema::new(&[Path, Mode], &[]);
static CHOWN: Schema = Schema::new(&[Path, Uid, Gid], &[]);
static UTIMES: Schema = Schema::new(&[Path, Atime, Mtime, Ctime], &[Otime]);
static END: Schema = Schema::new(&[], &[]);
static UPDATE_EXTENT: Schema = Schema::new(&[Path, FileOffset, Size], &[]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ATTRIBUTE_LEN;

    fn block(tags: &[AttributeTag]) -> Vec<u8> {
        let mut out = Vec::new();
        for tag in tags {
            out.extend_from_slice(&tag.as_u16().to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        out
    }

    #[test]
    fn required_and_optional_never_overlap() {
        for kind in CommandKind::ALL {
            let schema = Schema::for_command(kind);
            for tag in schema.optional {
                assert!(!schema.required.contains(tag), "{kind}: {tag} listed twice");
            }
        }
    }

    #[test]
    fn every_command_except_end_requires_a_path() {
        for kind in CommandKind::ALL {
            let schema = Schema::for_command(kind);
            assert_eq!(
                schema.required.contains(&Path),
                kind != CommandKind::End,
                "{kind}"
            );
        }
    }

    #[test]
    fn exact_required_set_validates() {
        for kind in CommandKind::ALL {
            let schema = Schema::for_command(kind);
            let raw = block(schema.required);
            let set = AttributeSet::parse(kind, &raw, MAX_ATTRIBUTE_LEN).unwrap();
            schema.validate(&set).unwrap();
        }
    }

    #[test]
    fn dropping_any_required_attribute_is_reported() {
        for kind in CommandKind::ALL {
            let schema = Schema::for_command(kind);
            for (index, missing) in schema.required.iter().enumerate() {
                let mut tags = schema.required.to_vec();
                tags.remove(index);
                let raw = block(&tags);
                let set = AttributeSet::parse(kind, &raw, MAX_ATTRIBUTE_LEN).unwrap();

                match schema.validate(&set) {
                    Err(StreamError::MissingAttribute { command, attribute }) => {
                        assert_eq!(command, kind);
                        assert_eq!(attribute, *missing);
                    }
                    other => panic!("{kind} without {missing}: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn attributes_outside_schema_are_unexpected() {
        let raw = block(&[Path, Data]);
        let set = AttributeSet::parse(CommandKind::Unlink, &raw, MAX_ATTRIBUTE_LEN).unwrap();

        assert!(matches!(
            Schema::for_command(CommandKind::Unlink).validate(&set),
            Err(StreamError::UnexpectedAttribute {
                attribute: AttributeTag::Data,
                ..
            })
        ));
    }

    #[test]
    fn optional_attributes_are_accepted() {
        let raw = block(&[Ino, Path]);
        let set = AttributeSet::parse(CommandKind::Mkfile, &raw, MAX_ATTRIBUTE_LEN).unwrap();
        Schema::for_command(CommandKind::Mkfile)
            .validate(&set)
            .unwrap();
    }
}
