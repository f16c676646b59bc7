//! Validation of path-bearing attributes.
//!
//! Paths arrive as raw bytes relative to the current subvolume. Before any
//! handler sees them they are normalised lexically: empty and `.` segments are
//! dropped, `..` pops the previous segment, and anything that would climb above
//! the starting directory is rejected. The result is a [`StreamPath`], which by
//! construction never contains `..`, NUL, or a leading `/`.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::PATH_MAX;

/// Reasons a path-bearing attribute is rejected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PathError {
    /// The path contains a NUL byte.
    #[error("path contains a NUL byte at position {position}")]
    NulByte {
        /// Byte index of the first NUL.
        position: usize,
    },
    /// The path is absolute.
    #[error("absolute path is not allowed")]
    Absolute,
    /// A `..` segment climbs above the directory the path is relative to.
    #[error("path escapes its base directory")]
    Escapes,
    /// The path exceeds the platform length limit.
    #[error("path is {len} bytes, limit is {max}")]
    TooLong {
        /// Length of the offending path.
        len: usize,
        /// Accepted maximum.
        max: usize,
    },
}

/// A validated, lexically normalised relative path taken from the stream.
///
/// The empty path is valid and names the directory it is relative to; the
/// stream uses it for operations on a subvolume's root directory.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct StreamPath {
    bytes: Vec<u8>,
}

impl StreamPath {
    /// Validates and normalises `raw`.
    pub fn parse(raw: &[u8]) -> Result<Self, PathError> {
        check_link_target(raw)?;
        if raw.first() == Some(&b'/') {
            return Err(PathError::Absolute);
        }

        let mut segments: Vec<&[u8]> = Vec::new();
        for segment in raw.split(|byte| *byte == b'/') {
            match segment {
                b"" | b"." => {}
                b".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::Escapes);
                    }
                }
                name => segments.push(name),
            }
        }

        Ok(Self {
            bytes: segments.join(&b'/'),
        })
    }

    /// Returns the normalised bytes, segments separated by `/`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the normalised path in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether the path names its base directory itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes
            .split(|byte| *byte == b'/')
            .filter(|segment| !segment.is_empty())
    }

    /// Converts the path into a platform [`PathBuf`].
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.segments() {
            path.push(segment_to_path(segment));
        }
        path
    }

    /// Appends this path's segments to `base`.
    #[must_use]
    pub fn join_onto(&self, base: &Path) -> PathBuf {
        let mut joined = base.to_path_buf();
        for segment in self.segments() {
            joined.push(segment_to_path(segment));
        }
        joined
    }
}

/// Checks raw bytes that are stored verbatim, such as a symlink target.
///
/// Only the length limit and the NUL check apply; absolute targets and `..`
/// segments are legitimate link content.
pub fn check_link_target(raw: &[u8]) -> Result<(), PathError> {
    if raw.len() > PATH_MAX {
        return Err(PathError::TooLong {
            len: raw.len(),
            max: PATH_MAX,
        });
    }
    match memchr::memchr(0, raw) {
        Some(position) => Err(PathError::NulByte { position }),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn segment_to_path(segment: &[u8]) -> &Path {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Path::new(OsStr::from_bytes(segment))
}

#[cfg(not(unix))]
fn segment_to_path(segment: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(segment).into_owned())
}

impl fmt::Display for StreamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}
