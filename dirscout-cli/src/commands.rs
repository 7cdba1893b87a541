//! Subcommand dispatch.
//!
//! Each invocation grants the root, resolves the requested path through the
//! navigator, and performs exactly one operation. Results are printed as
//! JSON; `cat` prints raw content. Selection state lives entirely in the
//! arguments, never in the core.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use dirscout_core::text::TextTally;
use dirscout_core::{traverse, ContentVisitor, Navigator};
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries of a directory
    List {
        #[arg(default_value = "")]
        path: String,
    },
    /// Create a directory (no error if it already exists)
    Mkdir { path: String },
    /// Delete a file or an empty directory
    Rm { path: String },
    /// Duplicate a file or directory as a sibling copy
    Cp { path: String },
    /// Print a file's raw content
    Cat { path: String },
    /// Preview a file: base64 for images, decoded text for text kinds
    Preview { path: String },
    /// Walk a subtree, reporting visited files and isolated failures
    Walk {
        #[arg(default_value = "")]
        path: String,
        /// Aggregate text statistics over every file instead of listing them
        #[arg(long)]
        stats: bool,
    },
}

pub async fn run(root: &Path, command: Command) -> Result<()> {
    let mut nav = Navigator::new();
    nav.select_root(root)
        .await
        .with_context(|| format!("Cannot grant root {}", root.display()))?;

    match command {
        Command::List { path } => {
            let dir = nav.navigate(&segments(&path)).await?;
            let entries = dir.list().await?;
            print(json!({ "path": nav.current_path(), "entries": entries }))
        }
        Command::Mkdir { path } => {
            let (parent, name) = split_parent(&path)?;
            let dir = nav.navigate(&parent).await?;
            dir.create_directory(&name).await?;
            print(json!({ "created": path }))
        }
        Command::Rm { path } => {
            let (parent, name) = split_parent(&path)?;
            let dir = nav.navigate(&parent).await?;
            dir.delete_entry(&name).await?;
            print(json!({ "deleted": path }))
        }
        Command::Cp { path } => {
            let (parent, name) = split_parent(&path)?;
            let dir = nav.navigate(&parent).await?;
            let new_name = dir.copy_entry(&name).await?;
            print(json!({ "source": path, "copy": new_name }))
        }
        Command::Cat { path } => {
            let (parent, name) = split_parent(&path)?;
            let dir = nav.navigate(&parent).await?;
            let file = dir.child_file(&name).await?;
            let content = file.open_stream().await?.read_all().await?;
            print!("{}", String::from_utf8_lossy(&content));
            Ok(())
        }
        Command::Preview { path } => {
            let (parent, name) = split_parent(&path)?;
            let dir = nav.navigate(&parent).await?;
            let file = dir.child_file(&name).await?;
            print(json!(file.preview().await?))
        }
        Command::Walk { path, stats } => {
            let dir = nav.navigate(&segments(&path)).await?;
            if stats {
                let mut tally = TextTally::default();
                let failures = traverse(&dir, &mut tally).await;
                print(json!({ "stats": tally, "failures": failures }))
            } else {
                let mut visited = Vec::new();
                let mut visitor = ContentVisitor(|path: &Path, _| {
                    visited.push(path.display().to_string());
                    Ok(())
                });
                let failures = traverse(&dir, &mut visitor).await;
                print(json!({ "visited": visited, "failures": failures }))
            }
        }
    }
}

/// Split a slash-separated path into navigation segments.
fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split a path into parent segments and the final entry name.
fn split_parent(path: &str) -> Result<(Vec<String>, String)> {
    let mut parts = segments(path);
    let Some(name) = parts.pop() else {
        bail!("A path naming an entry is required, got {path:?}");
    };
    Ok((parts, name))
}

fn print(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
