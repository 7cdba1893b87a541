//! Text processing steps.
//!
//! Standalone utilities over borrowed text plus [`TextTally`], a
//! [`crate::walk::FileVisitor`] that aggregates statistics across a
//! traversal. Nothing here touches the file system; content arrives through
//! the stream reader or as plain strings.

pub mod cipher;
pub mod stats;
pub mod tally;
pub mod transform;

pub use tally::TextTally;
