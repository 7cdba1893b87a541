//! Aggregate text statistics over a traversal.

use std::path::Path;

use serde::Serialize;

use crate::stream::ChunkStream;
use crate::text::stats;
use crate::walk::FileVisitor;

/// A [`FileVisitor`] that tallies word, character, and line counts across
/// every UTF-8 file in a subtree. Files that do not decode as UTF-8 are
/// counted as processed but contribute nothing; they are content, not
/// failures.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TextTally {
    pub files: u64,
    pub binary_files: u64,
    pub words: u64,
    pub chars: u64,
    pub lines: u64,
}

#[async_trait::async_trait(?Send)]
impl FileVisitor for TextTally {
    async fn visit(&mut self, _path: &Path, stream: &mut ChunkStream) -> anyhow::Result<()> {
        let mut content = Vec::new();
        while let Some(chunk) = stream.next_chunk().await? {
            content.extend_from_slice(chunk);
        }

        self.files += 1;
        let Ok(text) = String::from_utf8(content) else {
            self.binary_files += 1;
            return Ok(());
        };

        self.words += stats::word_count(&text) as u64;
        self.chars += stats::char_count(&text, false) as u64;
        self.lines += text.lines().count() as u64;
        Ok(())
    }
}
