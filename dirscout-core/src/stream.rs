//! Chunked stream reader.
//!
//! File content is exposed as a [`ChunkStream`]: a lazy, finite, single-pass
//! sequence of byte buffers in file order. The traverser only ever pulls
//! chunks, so files of arbitrary size are processed in bounded memory.
//! [`ChunkStream::read_all`] exists for small-file convenience (previews,
//! text snippets) and is never used by the traverser.

use base64::Engine;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::error::NavError;
use crate::grant::FileHandle;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A lazy, one-pass sequence of content buffers. Not restartable: once a
/// chunk has been consumed the stream only moves forward, and once
/// `next_chunk` returns `None` the stream is exhausted.
#[derive(Debug)]
pub struct ChunkStream {
    file: fs::File,
    buf: Vec<u8>,
    name: String,
    done: bool,
}

impl ChunkStream {
    /// Pull the next chunk, or `None` when the content is exhausted. A
    /// 0-byte file is exhausted immediately. The returned slice is only
    /// valid until the next pull.
    pub async fn next_chunk(&mut self) -> Result<Option<&[u8]>, NavError> {
        if self.done {
            return Ok(None);
        }
        let n = self
            .file
            .read(&mut self.buf)
            .await
            .map_err(|e| NavError::Stream {
                name: self.name.clone(),
                source: e,
            })?;
        if n == 0 {
            self.done = true;
            return Ok(None);
        }
        Ok(Some(&self.buf[..n]))
    }

    /// Drain the stream into one buffer. Convenience for content known to
    /// be small; unbounded input belongs on `next_chunk`.
    pub async fn read_all(mut self) -> Result<Vec<u8>, NavError> {
        let mut content = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            content.extend_from_slice(chunk);
        }
        Ok(content)
    }
}

/// Preview of a file's content, classified by kind. An unsupported kind is
/// a valid `None` result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum Preview {
    /// Base64 of the whole buffer.
    Image(String),
    /// Decoded text (invalid UTF-8 replaced).
    Text(String),
    None,
}

impl FileHandle {
    /// Open the file for streamed reading. Fails with `NotFound` when the
    /// handle no longer resolves to an existing file, e.g. after a
    /// concurrent delete.
    pub async fn open_stream(&self) -> Result<ChunkStream, NavError> {
        self.open_stream_with_chunk_size(DEFAULT_CHUNK_SIZE).await
    }

    pub async fn open_stream_with_chunk_size(
        &self,
        chunk_size: usize,
    ) -> Result<ChunkStream, NavError> {
        let metadata = fs::metadata(&self.path)
            .await
            .map_err(|e| NavError::io("open_stream", &self.name, e))?;
        if !metadata.is_file() {
            return Err(NavError::NotFound {
                op: "open_stream",
                name: self.name.clone(),
            });
        }
        let file = fs::File::open(&self.path)
            .await
            .map_err(|e| NavError::io("open_stream", &self.name, e))?;
        Ok(ChunkStream {
            file,
            buf: vec![0; chunk_size.max(1)],
            name: self.name.clone(),
            done: false,
        })
    }

    /// Produce a preview of the file's content: base64 for image kinds,
    /// decoded text for text/JSON kinds, `Preview::None` for anything else.
    /// Whole-buffer by nature, so only suitable for preview-sized files.
    pub async fn preview(&self) -> Result<Preview, NavError> {
        match classify(&self.name) {
            ContentKind::Image => {
                let content = self.open_stream().await?.read_all().await?;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&content);
                Ok(Preview::Image(encoded))
            }
            ContentKind::Text => {
                let content = self.open_stream().await?.read_all().await?;
                Ok(Preview::Text(String::from_utf8_lossy(&content).into_owned()))
            }
            ContentKind::Other => Ok(Preview::None),
        }
    }
}

enum ContentKind {
    Image,
    Text,
    Other,
}

/// The original system classified by MIME type (`image/*`, `text/*`,
/// `application/json`); without a browser to ask, extension is the closest
/// stand-in.
fn classify(name: &str) -> ContentKind {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "ico" | "svg" => ContentKind::Image,
        "txt" | "md" | "markdown" | "csv" | "log" | "html" | "htm" | "css" | "js" | "json" => {
            ContentKind::Text
        }
        _ => ContentKind::Other,
    }
}
