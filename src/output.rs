//! Output formatting for project snapshots.
//!
//! The Markdown layout is fixed: a title, the folder tree in a plain code
//! fence, then one heading and language-tagged fence per source file. File
//! content is written exactly as read.

use crate::error::{ProjcatError, Result};
use crate::types::ProjectSnapshot;
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Formats the snapshot into a string.
pub fn format_snapshot(snapshot: &ProjectSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(format_markdown(snapshot)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
    }
}

/// Writes the formatted snapshot to `path`, replacing any existing file.
pub fn write_snapshot_to_file(
    snapshot: &ProjectSnapshot,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<()> {
    let content = format_snapshot(snapshot, format)?;
    fs::write(&path, content).map_err(|e| ProjcatError::io(path.as_ref(), e))?;
    Ok(())
}

/// Renders the Markdown document.
pub fn format_markdown(snapshot: &ProjectSnapshot) -> String {
    let mut out = String::with_capacity(
        1024 + snapshot.files.iter().map(|f| f.content.len() + 64).sum::<usize>(),
    );
    out.push_str("# Project Structure and Code\n\n");

    out.push_str("## Folder Structure\n\n");
    out.push_str("```\n");
    out.push_str(&snapshot.tree.join("\n"));
    out.push_str("\n```\n\n");

    out.push_str("## File Contents\n\n");
    for file in &snapshot.files {
        out.push_str(&format!(
            "### {}\n\n```{}\n",
            file.path.display(),
            file.language
        ));
        out.push_str(&file.content);
        out.push_str("\n```\n\n");
    }
    out
}
