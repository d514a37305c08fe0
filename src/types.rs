use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions whose files get a content section.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "tsx", "ts", "js", "jsx"];

/// Placeholder recorded when a file is not valid UTF-8.
pub const ENCODING_PLACEHOLDER: &str = "# Unable to read file: encoding issue";

/// Placeholder recorded when binary detection flags a file.
pub const BINARY_PLACEHOLDER: &str = "# Unable to read file: binary content";

/// What ended up in [`FileRecord::content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// The raw file text.
    Text,
    /// Not valid UTF-8; content is [`ENCODING_PLACEHOLDER`].
    Undecodable,
    /// Opening or reading failed.
    Unreadable,
    /// Flagged by binary detection.
    Binary,
    /// Over the configured size limit.
    TooLarge,
}

/// A source file selected for the content section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Fence tag, the file extension as written.
    pub language: String,
    /// The file text, or a placeholder message when `status` is not `Text`.
    pub content: String,
    pub status: ContentStatus,
}

/// Everything a run collects before rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Name on the first tree line.
    pub root_label: String,
    /// Rendered tree lines, in traversal order.
    pub tree: Vec<String>,
    /// Eligible files, in traversal order.
    pub files: Vec<FileRecord>,
}
