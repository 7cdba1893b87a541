//! Scoped directory navigation with streaming traversal.
//!
//! All access is rooted at a single [`RootGrant`] authorized by the caller;
//! handles derived from it cannot escape the granted subtree. On top of the
//! handles sit four layers: the [`cursor::Navigator`] tracking the current
//! path, the directory operations in [`ops`], the chunked stream reader in
//! [`stream`], and the depth-first [`walk::traverse`] that drives a
//! caller-supplied processing step over every file in a subtree, isolating
//! per-entry failures. The [`text`] module supplies ready-made processing
//! steps.

pub mod cursor;
pub mod error;
pub mod grant;
pub mod ops;
pub mod stream;
pub mod text;
pub mod walk;

// Public library API - the types most callers need, re-exported flat.
pub use cursor::{Navigator, PathCursor};
pub use error::NavError;
pub use grant::{DirHandle, FileHandle, NodeHandle, RootGrant};
pub use ops::{Entry, EntryKind};
pub use stream::{ChunkStream, Preview, DEFAULT_CHUNK_SIZE};
pub use walk::{traverse, ContentVisitor, FileVisitor, WalkFailure};
