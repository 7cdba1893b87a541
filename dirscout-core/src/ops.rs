//! Directory operations: list, create, delete, copy.
//!
//! All operations act on a [`DirHandle`] and fail fast with a [`NavError`]
//! naming the operation and the entry involved. Listing order is whatever
//! the underlying store enumerates; it is not guaranteed stable across
//! calls and consumers must not rely on it.
//!
//! `copy_entry` performs true byte-level duplication. The system this was
//! ported from implemented "copy" as a rename-in-place because its backing
//! store only offered a move primitive; that left a single renamed object
//! instead of two independent ones, so it is deliberately not preserved
//! here.

use serde::Serialize;
use tokio::fs;

use crate::error::NavError;
use crate::grant::{DirHandle, FileHandle, NodeHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One named child of a directory listing. Transient: rebuilt on every
/// [`DirHandle::list`] call, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    #[serde(skip)]
    pub handle: NodeHandle,
}

impl DirHandle {
    /// Enumerate immediate children. Non-recursive; an empty directory
    /// yields an empty vec. Children whose names are not valid UTF-8 or
    /// whose metadata cannot be read (e.g. broken symlinks) are skipped
    /// with a warning.
    pub async fn list(&self) -> Result<Vec<Entry>, NavError> {
        let dir_name = display_name(self);
        let mut dirents = fs::read_dir(&self.path)
            .await
            .map_err(|e| NavError::io("list", dir_name.clone(), e))?;

        let mut entries = Vec::new();
        loop {
            let dirent = match dirents.next_entry().await {
                Ok(Some(dirent)) => dirent,
                Ok(None) => break,
                Err(e) => return Err(NavError::io("list", dir_name, e)),
            };

            let Some(name) = dirent.file_name().to_str().map(String::from) else {
                tracing::warn!("Skipping non-UTF-8 entry in {}", self.path.display());
                continue;
            };

            // Follow symlinks so a link to a directory lists as a directory
            let path = dirent.path();
            let metadata = match fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry {name:?}: {e}");
                    continue;
                }
            };

            let (kind, handle) = if metadata.is_dir() {
                (
                    EntryKind::Directory,
                    NodeHandle::Directory(DirHandle { path }),
                )
            } else if metadata.is_file() {
                (
                    EntryKind::File,
                    NodeHandle::File(FileHandle {
                        path,
                        name: name.clone(),
                    }),
                )
            } else {
                tracing::warn!("Skipping entry {name:?}: neither file nor directory");
                continue;
            };

            entries.push(Entry { name, kind, handle });
        }

        Ok(entries)
    }

    /// Create a child directory. Idempotent: an existing directory of that
    /// name is a success, not an error. An existing entry of any other kind
    /// is a `NameConflict`.
    pub async fn create_directory(&self, name: &str) -> Result<(), NavError> {
        let path = self.child_path("create_directory", name)?;

        match fs::metadata(&path).await {
            Ok(m) if m.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(NavError::NameConflict {
                    name: name.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(NavError::io("create_directory", name, e)),
        }

        fs::create_dir(&path)
            .await
            .map_err(|e| NavError::io("create_directory", name, e))?;
        tracing::info!("Created directory {name:?} in {}", self.path.display());
        Ok(())
    }

    /// Delete the named child. Non-recursive: a non-empty directory fails
    /// with `NotEmpty` instead of cascading. Callers wanting a recursive
    /// delete must traverse and delete leaves first.
    pub async fn delete_entry(&self, name: &str) -> Result<(), NavError> {
        let path = self.child_path("delete_entry", name)?;

        // symlink_metadata so a symlink is deleted itself, never its target
        let metadata = fs::symlink_metadata(&path)
            .await
            .map_err(|e| NavError::io("delete_entry", name, e))?;

        if metadata.is_dir() {
            let mut dirents = fs::read_dir(&path)
                .await
                .map_err(|e| NavError::io("delete_entry", name, e))?;
            let occupied = dirents
                .next_entry()
                .await
                .map_err(|e| NavError::io("delete_entry", name, e))?;
            if occupied.is_some() {
                return Err(NavError::NotEmpty {
                    name: name.to_string(),
                });
            }
            fs::remove_dir(&path)
                .await
                .map_err(|e| NavError::io("delete_entry", name, e))?;
        } else {
            fs::remove_file(&path)
                .await
                .map_err(|e| NavError::io("delete_entry", name, e))?;
        }

        tracing::info!("Deleted {name:?} from {}", self.path.display());
        Ok(())
    }

    /// Duplicate the named child as a sibling and return the new name.
    /// Files are byte-copied; directories are duplicated recursively. The
    /// copy is named `Copy_of_<name>`, falling back to `Copy_of_<n>_<name>`
    /// until a free name is found.
    pub async fn copy_entry(&self, name: &str) -> Result<String, NavError> {
        let src = self.child_path("copy_entry", name)?;
        let metadata = fs::metadata(&src)
            .await
            .map_err(|e| NavError::io("copy_entry", name, e))?;

        let new_name = self.free_copy_name(name).await?;
        let dst = self.path.join(&new_name);

        if metadata.is_dir() {
            copy_tree(&src, &dst)
                .await
                .map_err(|e| NavError::io("copy_entry", name, e))?;
        } else {
            fs::copy(&src, &dst)
                .await
                .map_err(|e| NavError::io("copy_entry", name, e))?;
        }

        tracing::info!("Copied {name:?} to {new_name:?} in {}", self.path.display());
        Ok(new_name)
    }

    async fn free_copy_name(&self, name: &str) -> Result<String, NavError> {
        let candidate = format!("Copy_of_{name}");
        if !self.name_taken(&candidate, name).await? {
            return Ok(candidate);
        }
        for n in 2.. {
            let candidate = format!("Copy_of_{n}_{name}");
            if !self.name_taken(&candidate, name).await? {
                return Ok(candidate);
            }
        }
        unreachable!("unbounded counter ran out of names")
    }

    async fn name_taken(&self, candidate: &str, source: &str) -> Result<bool, NavError> {
        fs::try_exists(self.path.join(candidate))
            .await
            .map_err(|e| NavError::io("copy_entry", source, e))
    }
}

/// Recursively duplicate a directory tree with an explicit work stack.
async fn copy_tree(src: &std::path::Path, dst: &std::path::Path) -> std::io::Result<()> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to).await?;
        let mut dirents = fs::read_dir(&from).await?;
        while let Some(dirent) = dirents.next_entry().await? {
            let target = to.join(dirent.file_name());
            let file_type = dirent.file_type().await?;
            if file_type.is_dir() {
                pending.push((dirent.path(), target));
            } else if file_type.is_file() {
                fs::copy(dirent.path(), target).await?;
            }
            // other node kinds are not duplicated
        }
    }
    Ok(())
}

fn display_name(dir: &DirHandle) -> String {
    dir.path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.path.display().to_string())
}
