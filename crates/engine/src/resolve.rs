//! Joins validated stream paths onto the receive root.
//!
//! Stream paths are already lexically normalised by the protocol layer, so a
//! resolved path is always `root / subvolume base / relative`. The resolver
//! still re-checks containment and the length limit on the joined result.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use protocol::{PATH_MAX, StreamPath};
use thiserror::Error;

/// Reasons a stream path cannot be placed under the receive root.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResolveError {
    /// The joined path exceeds the platform limit.
    #[error("resolved path is {len} bytes, limit is {max}")]
    TooLong {
        /// Length of the joined path.
        len: usize,
        /// Accepted maximum.
        max: usize,
    },
    /// The joined path is not lexically inside the receive root.
    #[error("resolved path {} leaves the receive root", path.display())]
    OutsideRoot {
        /// Offending joined path.
        path: PathBuf,
    },
}

/// A path placed under the receive root.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResolvedPath {
    full: PathBuf,
    relative: PathBuf,
}

impl ResolvedPath {
    /// Full path, starting with the receive root.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.full
    }

    /// Path relative to the receive root.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.full
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full.display())
    }
}

/// Session-scoped path resolver.
///
/// Holds the receive root and the base of the subvolume currently being
/// received. `subvol` and `snapshot` paths resolve against the root and
/// replace the base; every other path resolves against the base.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
    base: StreamPath,
}

impl PathResolver {
    /// Creates a resolver rooted at `root` with an empty subvolume base.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base: StreamPath::default(),
        }
    }

    /// Receive root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current subvolume base, relative to the root.
    #[must_use]
    pub fn base(&self) -> &StreamPath {
        &self.base
    }

    /// Resets the base to the root, as at the start of a stream.
    pub fn reset_base(&mut self) {
        self.base = StreamPath::default();
    }

    /// Resolves a subvolume path against the root and makes it the new base.
    pub fn enter_subvolume(&mut self, path: &StreamPath) -> Result<ResolvedPath, ResolveError> {
        let resolved = self.join(None, path)?;
        self.base = path.clone();
        Ok(resolved)
    }

    /// Resolves a path inside the current subvolume.
    pub fn resolve(&self, path: &StreamPath) -> Result<ResolvedPath, ResolveError> {
        self.join(Some(&self.base), path)
    }

    fn join(
        &self,
        base: Option<&StreamPath>,
        path: &StreamPath,
    ) -> Result<ResolvedPath, ResolveError> {
        let relative = match base {
            Some(base) => path.join_onto(&base.to_path_buf()),
            None => path.to_path_buf(),
        };
        let full = self.root.join(&relative);

        let len = full.as_os_str().len();
        if len > PATH_MAX {
            return Err(ResolveError::TooLong { len, max: PATH_MAX });
        }

        let contained = full.starts_with(&self.root)
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !contained {
            return Err(ResolveError::OutsideRoot { path: full });
        }

        Ok(ResolvedPath { full, relative })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_path(raw: &str) -> StreamPath {
        StreamPath::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn resolves_against_root_before_any_subvolume() {
        let resolver = PathResolver::new("/recv");
        let resolved = resolver.resolve(&stream_path("a/b")).unwrap();

        assert_eq!(resolved.as_path(), Path::new("/recv/a/b"));
        assert_eq!(resolved.relative(), Path::new("a/b"));
    }

    #[test]
    fn subvolume_becomes_base_for_later_paths() {
        let mut resolver = PathResolver::new("/recv");
        let subvol = resolver.enter_subvolume(&stream_path("snap")).unwrap();
        assert_eq!(subvol.as_path(), Path::new("/recv/snap"));

        let file = resolver.resolve(&stream_path("dir/file")).unwrap();
        assert_eq!(file.as_path(), Path::new("/recv/snap/dir/file"));
        assert_eq!(file.relative(), Path::new("snap/dir/file"));
    }

    #[test]
    fn next_subvolume_resolves_from_root_again() {
        let mut resolver = PathResolver::new("out");
        resolver.enter_subvolume(&stream_path("one")).unwrap();
        let second = resolver.enter_subvolume(&stream_path("two")).unwrap();

        assert_eq!(second.as_path(), Path::new("out/two"));
        assert_eq!(resolver.base().as_bytes(), b"two");
    }

    #[test]
    fn empty_path_names_the_base_itself() {
        let mut resolver = PathResolver::new("/recv");
        resolver.enter_subvolume(&stream_path("vol")).unwrap();

        let resolved = resolver.resolve(&StreamPath::default()).unwrap();
        assert_eq!(resolved.as_path(), Path::new("/recv/vol"));
    }

    #[test]
    fn reset_returns_to_root() {
        let mut resolver = PathResolver::new("/recv");
        resolver.enter_subvolume(&stream_path("vol")).unwrap();
        resolver.reset_base();

        assert!(resolver.base().is_empty());
        assert_eq!(
            resolver.resolve(&stream_path("x")).unwrap().as_path(),
            Path::new("/recv/x")
        );
    }

    #[test]
    fn joined_length_is_limited() {
        let root = "r".repeat(PATH_MAX - 2);
        let resolver = PathResolver::new(root);

        assert_eq!(
            resolver.resolve(&stream_path("abc")),
            Err(ResolveError::TooLong {
                len: PATH_MAX + 2,
                max: PATH_MAX,
            })
        );
    }

    #[test]
    fn joined_length_may_reach_the_limit() {
        let root = "r".repeat(PATH_MAX - 4);
        let resolver = PathResolver::new(root);

        let resolved = resolver.resolve(&stream_path("abc")).unwrap();
        assert_eq!(resolved.as_path().as_os_str().len(), PATH_MAX);
        assert!(resolver.resolve(&stream_path("abcd")).is_err());
    }
}
