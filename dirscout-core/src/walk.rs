//! Recursive traverser.
//!
//! Walks a whole subtree depth-first, pre-order, driving the stream reader
//! for every file and handing the open stream to a caller-supplied visitor.
//! Failures are isolated per entry: an unreadable file or a failing visitor
//! is recorded as a [`WalkFailure`] and the walk continues with its
//! siblings; a directory whose enumeration fails is recorded the same way
//! and its subtree is skipped. The walk itself never raises.
//!
//! The descent uses an explicit frame stack instead of call-stack recursion
//! so depth is bounded by heap, and each frame boundary is where a
//! cooperative cancellation check would slot in if one is ever needed.
//!
//! One file at a time: the visitor is invoked sequentially, never
//! re-entrantly, and no two streams are open at once. Callers wanting
//! concurrency layer it on top with independent traversals, and are
//! responsible for serializing mutation against an in-flight walk of the
//! same subtree.

use std::path::{Path, PathBuf};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::NavError;
use crate::grant::{DirHandle, NodeHandle};
use crate::ops::Entry;
use crate::stream::ChunkStream;

/// One isolated failure from a traversal, with the grant-relative path of
/// the entry for diagnosis.
#[derive(Debug)]
pub struct WalkFailure {
    pub path: String,
    pub error: NavError,
}

impl Serialize for WalkFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("WalkFailure", 2)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.end()
    }
}

/// The processing step applied to every file a traversal encounters.
///
/// `path` is relative to the traversal root. The stream is single-pass and
/// open only for the duration of the call; the visitor may drain it fully,
/// partially, or not at all. A returned error is isolated into the walk's
/// failure report, never propagated.
#[async_trait::async_trait(?Send)]
pub trait FileVisitor {
    async fn visit(&mut self, path: &Path, stream: &mut ChunkStream) -> anyhow::Result<()>;
}

/// Adapts a closure over fully drained content into a [`FileVisitor`].
/// Every file's bytes are buffered whole, so this is for trees of
/// reasonably sized files; visitors that care about memory pull chunks
/// themselves.
pub struct ContentVisitor<F>(pub F);

#[async_trait::async_trait(?Send)]
impl<F> FileVisitor for ContentVisitor<F>
where
    F: FnMut(&Path, Vec<u8>) -> anyhow::Result<()>,
{
    async fn visit(&mut self, path: &Path, stream: &mut ChunkStream) -> anyhow::Result<()> {
        let mut content = Vec::new();
        while let Some(chunk) = stream.next_chunk().await? {
            content.extend_from_slice(chunk);
        }
        (self.0)(path, content)
    }
}

struct Frame {
    prefix: PathBuf,
    entries: std::vec::IntoIter<Entry>,
}

/// Depth-first walk of the subtree under `root`, invoking `visitor` once
/// per file in enumeration order, directories descended into as they are
/// encountered. Returns the collected per-entry failures; an empty vec is
/// a fully clean walk.
pub async fn traverse<V: FileVisitor + ?Sized>(
    root: &DirHandle,
    visitor: &mut V,
) -> Vec<WalkFailure> {
    let mut failures = Vec::new();
    let mut stack = Vec::new();

    match root.list().await {
        Ok(entries) => stack.push(Frame {
            prefix: PathBuf::new(),
            entries: entries.into_iter(),
        }),
        Err(error) => {
            failures.push(WalkFailure {
                path: String::new(),
                error,
            });
        }
    }

    loop {
        let next = match stack.last_mut() {
            Some(frame) => frame.entries.next().map(|e| (e, frame.prefix.clone())),
            None => break,
        };
        let Some((entry, prefix)) = next else {
            stack.pop();
            continue;
        };

        let rel = prefix.join(&entry.name);
        match entry.handle {
            NodeHandle::File(file) => match file.open_stream().await {
                Ok(mut stream) => {
                    if let Err(cause) = visitor.visit(&rel, &mut stream).await {
                        tracing::warn!("Visitor failed on {}: {cause:#}", rel.display());
                        failures.push(WalkFailure {
                            path: rel.display().to_string(),
                            error: NavError::Visit {
                                name: entry.name,
                                cause,
                            },
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!("Could not open {}: {error}", rel.display());
                    failures.push(WalkFailure {
                        path: rel.display().to_string(),
                        error,
                    });
                }
            },
            NodeHandle::Directory(dir) => match dir.list().await {
                Ok(entries) => stack.push(Frame {
                    prefix: rel,
                    entries: entries.into_iter(),
                }),
                Err(error) => {
                    // Subtree is skipped, siblings continue
                    tracing::warn!("Could not enumerate {}: {error}", rel.display());
                    failures.push(WalkFailure {
                        path: rel.display().to_string(),
                        error,
                    });
                }
            },
        }
    }

    failures
}
