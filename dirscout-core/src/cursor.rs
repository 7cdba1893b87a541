//! Path cursor and session navigator.
//!
//! The navigator owns the session's [`RootGrant`] and a [`PathCursor`]
//! tracking the currently navigated location as a sequence of segment names
//! plus the directory handle they resolve to. Navigation re-resolves from
//! the root on every call instead of caching intermediate handles, so the
//! active cursor never points through a handle that external mutation has
//! invalidated; the cost is re-walking the path from the root each time.

use std::path::Path;

use crate::error::NavError;
use crate::grant::{DirHandle, RootGrant};

/// The navigator's current location: segment path plus its resolved
/// directory. Invariant: `resolved` is always the directory reached by
/// walking `segments` from the grant; empty segments resolve to the grant
/// itself. Both fields are replaced together, never half-updated.
#[derive(Debug, Clone)]
pub struct PathCursor {
    segments: Vec<String>,
    resolved: DirHandle,
}

impl PathCursor {
    /// The directory the cursor currently resolves to.
    pub fn resolved(&self) -> &DirHandle {
        &self.resolved
    }

    /// Defensive copy of the current segment path.
    pub fn segments(&self) -> Vec<String> {
        self.segments.clone()
    }
}

/// Session state: one root grant and the cursor into it. Grant and cursor
/// are created and replaced together.
#[derive(Debug, Default)]
pub struct Navigator {
    session: Option<(RootGrant, PathCursor)>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `path` as the new session root and reset the cursor to the
    /// empty path. On failure the previous session, if any, is kept.
    pub async fn select_root(&mut self, path: &Path) -> Result<&RootGrant, NavError> {
        let grant = RootGrant::acquire(path).await?;
        tracing::info!("Root granted: {}", grant.path().display());
        let cursor = PathCursor {
            segments: Vec::new(),
            resolved: grant.dir(),
        };
        self.session = Some((grant, cursor));
        Ok(&self.session.as_ref().unwrap().0)
    }

    /// Resolve `segments` against the root, one child-directory lookup per
    /// segment, and move the cursor there. Fails with `NotFound` naming the
    /// first segment that is absent or not a directory; the cursor is left
    /// unchanged on failure.
    pub async fn navigate<S: AsRef<str>>(
        &mut self,
        segments: &[S],
    ) -> Result<DirHandle, NavError> {
        let Some((grant, _)) = &self.session else {
            return Err(NavError::NoGrant);
        };

        let mut resolved = grant.dir();
        for segment in segments {
            let segment = segment.as_ref();
            resolved = resolved.child_dir(segment).await.map_err(|e| match e {
                NavError::NotFound { name, .. } => NavError::NotFound {
                    op: "navigate",
                    name,
                },
                other => other,
            })?;
        }

        let cursor = PathCursor {
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
            resolved: resolved.clone(),
        };
        self.session.as_mut().unwrap().1 = cursor;
        Ok(resolved)
    }

    /// Defensive copy of the cursor's segment path. Empty when no root has
    /// been granted yet.
    pub fn current_path(&self) -> Vec<String> {
        match &self.session {
            Some((_, cursor)) => cursor.segments(),
            None => Vec::new(),
        }
    }

    /// The directory the cursor currently resolves to.
    pub fn current_dir(&self) -> Result<DirHandle, NavError> {
        match &self.session {
            Some((_, cursor)) => Ok(cursor.resolved().clone()),
            None => Err(NavError::NoGrant),
        }
    }

    /// The active grant, if one has been authorized.
    pub fn grant(&self) -> Option<&RootGrant> {
        self.session.as_ref().map(|(grant, _)| grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_navigate_before_grant() {
        let mut nav = Navigator::new();
        let err = nav.navigate(&["a"]).await.unwrap_err();
        assert!(matches!(err, NavError::NoGrant));
        assert!(nav.current_dir().is_err());
        assert!(nav.current_path().is_empty());
    }

    #[tokio::test]
    async fn test_navigate_and_current_path() {
        let temp = tempdir().unwrap();
        std_fs::create_dir_all(temp.path().join("a/b")).unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp.path()).await.unwrap();
        assert!(nav.current_path().is_empty());

        let handle = nav.navigate(&["a", "b"]).await.unwrap();
        assert_eq!(nav.current_path(), vec!["a", "b"]);
        assert!(handle.path().ends_with("a/b"));
    }

    #[tokio::test]
    async fn test_navigate_root_round_trip() {
        let temp = tempdir().unwrap();
        std_fs::create_dir(temp.path().join("a")).unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp.path()).await.unwrap();
        let root = nav.current_dir().unwrap();

        nav.navigate(&["a"]).await.unwrap();
        let back = nav.navigate::<&str>(&[]).await.unwrap();
        assert_eq!(back.path(), root.path());
        assert!(nav.current_path().is_empty());
    }

    #[tokio::test]
    async fn test_navigate_missing_segment_keeps_cursor() {
        let temp = tempdir().unwrap();
        std_fs::create_dir(temp.path().join("a")).unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp.path()).await.unwrap();
        nav.navigate(&["a"]).await.unwrap();

        let err = nav.navigate(&["a", "missing"]).await.unwrap_err();
        assert!(matches!(
            err,
            NavError::NotFound { op: "navigate", ref name } if name == "missing"
        ));
        // Failed navigation leaves the cursor where it was
        assert_eq!(nav.current_path(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_navigate_through_file_fails() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("f.txt"), "x").unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp.path()).await.unwrap();
        let err = nav.navigate(&["f.txt"]).await.unwrap_err();
        assert!(matches!(err, NavError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_new_grant_replaces_session() {
        let temp1 = tempdir().unwrap();
        let temp2 = tempdir().unwrap();
        std_fs::create_dir(temp1.path().join("a")).unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp1.path()).await.unwrap();
        nav.navigate(&["a"]).await.unwrap();

        nav.select_root(temp2.path()).await.unwrap();
        assert!(nav.current_path().is_empty());
        assert_eq!(
            nav.current_dir().unwrap().path(),
            nav.grant().unwrap().path()
        );
    }

    #[tokio::test]
    async fn test_failed_grant_keeps_session() {
        let temp = tempdir().unwrap();

        let mut nav = Navigator::new();
        nav.select_root(temp.path()).await.unwrap();
        let before = nav.grant().unwrap().path().to_path_buf();

        let err = nav.select_root(&temp.path().join("missing")).await;
        assert!(err.is_err());
        assert_eq!(nav.grant().unwrap().path(), before);
    }
}
