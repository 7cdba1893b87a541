//! Root grant and node handles.
//!
//! A [`RootGrant`] is the single authorized entry point into the file system
//! for a session. Every other handle is derived from it by child-name lookup
//! and can never leave the granted subtree: lookups accept plain names only,
//! so `..`, absolute paths, and separator-bearing names are rejected up
//! front. A name that would escape the grant is reported as [`NavError::NotFound`]
//! rather than leaking whether anything exists there.
//!
//! Handles are a tagged variant, [`NodeHandle`], rather than a duck-typed
//! object probed for capabilities: directory operations exist only on
//! [`DirHandle`], streamed reads only on [`FileHandle`].

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::NavError;

/// The authorized root directory for a session. Immutable once acquired;
/// acquiring a new grant replaces the old one wholesale (see
/// [`crate::cursor::Navigator::select_root`]).
#[derive(Debug, Clone)]
pub struct RootGrant {
    root: PathBuf,
}

impl RootGrant {
    /// Authorize `path` as the session root. The path must name an existing
    /// directory; anything else is treated as a denied grant.
    pub async fn acquire(path: &Path) -> Result<Self, NavError> {
        let root = match fs::canonicalize(path).await {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Root grant denied for {}: {e}", path.display());
                return Err(NavError::NoGrant);
            }
        };
        let metadata = match fs::metadata(&root).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Root grant denied for {}: {e}", path.display());
                return Err(NavError::NoGrant);
            }
        };
        if !metadata.is_dir() {
            tracing::warn!("Root grant denied: {} is not a directory", path.display());
            return Err(NavError::NoGrant);
        }
        Ok(Self { root })
    }

    /// Real path of the granted directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Handle to the granted directory itself.
    pub fn dir(&self) -> DirHandle {
        DirHandle {
            path: self.root.clone(),
        }
    }
}

/// One node in the granted tree, tagged by capability.
#[derive(Debug, Clone)]
pub enum NodeHandle {
    Directory(DirHandle),
    File(FileHandle),
}

/// Handle to a directory inside the grant. Supports child enumeration and
/// by-name child lookup; the mutating operations live in [`crate::ops`].
#[derive(Debug, Clone)]
pub struct DirHandle {
    pub(crate) path: PathBuf,
}

impl DirHandle {
    /// Real path of this directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a plain child name to a path under this directory, rejecting
    /// names that could escape the grant.
    pub(crate) fn child_path(&self, op: &'static str, name: &str) -> Result<PathBuf, NavError> {
        if !valid_name(name) {
            return Err(NavError::NotFound {
                op,
                name: name.to_string(),
            });
        }
        Ok(self.path.join(name))
    }

    /// Look up an existing child directory by name.
    pub async fn child_dir(&self, name: &str) -> Result<DirHandle, NavError> {
        let path = self.child_path("child_dir", name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| NavError::io("child_dir", name, e))?;
        if !metadata.is_dir() {
            return Err(NavError::NotFound {
                op: "child_dir",
                name: name.to_string(),
            });
        }
        Ok(DirHandle { path })
    }

    /// Look up an existing child file by name.
    pub async fn child_file(&self, name: &str) -> Result<FileHandle, NavError> {
        let path = self.child_path("child_file", name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| NavError::io("child_file", name, e))?;
        if !metadata.is_file() {
            return Err(NavError::NotFound {
                op: "child_file",
                name: name.to_string(),
            });
        }
        Ok(FileHandle {
            path,
            name: name.to_string(),
        })
    }
}

/// Handle to a file inside the grant. Supports streamed reads and preview;
/// see [`crate::stream`].
#[derive(Debug, Clone)]
pub struct FileHandle {
    pub(crate) path: PathBuf,
    pub(crate) name: String,
}

impl FileHandle {
    /// Real path of this file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry name the handle was derived with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A child name is a single normal path component: no separators, no
/// `.`/`..`, no NUL, not empty.
fn valid_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    !name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[test]
    fn test_valid_name() {
        assert!(valid_name("file.txt"));
        assert!(valid_name("a b"));
        assert!(valid_name("..."));
        assert!(!valid_name(""));
        assert!(!valid_name("."));
        assert!(!valid_name(".."));
        assert!(!valid_name("a/b"));
        assert!(!valid_name("/a"));
        assert!(!valid_name("a\\b"));
        assert!(!valid_name("a\0b"));
    }

    #[tokio::test]
    async fn test_acquire_grant() {
        let temp = tempdir().unwrap();
        let grant = RootGrant::acquire(temp.path()).await.unwrap();
        assert!(grant.path().is_absolute());
        assert_eq!(grant.dir().path(), grant.path());
    }

    #[tokio::test]
    async fn test_acquire_grant_missing() {
        let temp = tempdir().unwrap();
        let err = RootGrant::acquire(&temp.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::NoGrant));
    }

    #[tokio::test]
    async fn test_acquire_grant_on_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("f.txt");
        std_fs::write(&file, "x").unwrap();
        let err = RootGrant::acquire(&file).await.unwrap_err();
        assert!(matches!(err, NavError::NoGrant));
    }

    #[tokio::test]
    async fn test_child_dir_lookup() {
        let temp = tempdir().unwrap();
        std_fs::create_dir(temp.path().join("sub")).unwrap();
        std_fs::write(temp.path().join("f.txt"), "x").unwrap();

        let grant = RootGrant::acquire(temp.path()).await.unwrap();
        let dir = grant.dir();

        assert!(dir.child_dir("sub").await.is_ok());
        assert!(matches!(
            dir.child_dir("missing").await.unwrap_err(),
            NavError::NotFound { .. }
        ));
        // A file is not a directory
        assert!(matches!(
            dir.child_dir("f.txt").await.unwrap_err(),
            NavError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_escaping_names_appear_missing() {
        let temp = tempdir().unwrap();
        let grant = RootGrant::acquire(temp.path()).await.unwrap();
        let dir = grant.dir();

        for name in ["..", ".", "", "a/b", "/etc"] {
            let err = dir.child_dir(name).await.unwrap_err();
            assert!(matches!(err, NavError::NotFound { .. }), "name: {name:?}");
        }
    }

    #[tokio::test]
    async fn test_child_file_lookup() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("f.txt"), "x").unwrap();
        std_fs::create_dir(temp.path().join("sub")).unwrap();

        let grant = RootGrant::acquire(temp.path()).await.unwrap();
        let dir = grant.dir();

        let file = dir.child_file("f.txt").await.unwrap();
        assert_eq!(file.name(), "f.txt");
        assert!(matches!(
            dir.child_file("sub").await.unwrap_err(),
            NavError::NotFound { .. }
        ));
    }
}
