//! # Projcat
//!
//! `projcat` turns a project directory, or a repository on a known hosting
//! service, into one Markdown document: a folder tree followed by the
//! contents of its Python, JavaScript and TypeScript sources.
//!
//! A run loads the exclusion rules ([`IgnoreRuleSet`]) from the ignore-file
//! at the project root plus a built-in list, walks the root once while
//! pruning excluded directories ([`snapshot`]), and renders the collected
//! [`ProjectSnapshot`] with [`output::format_markdown`]. Remote input is
//! cloned into a temporary [`Workspace`] that is removed when the run ends.
//!
//! # Features
//!
//! - `logging` (default): debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use projcat::{ProjcatBuilder, MatchMode, output, snapshot};
//!
//! let options = ProjcatBuilder::new(".")
//!     .match_mode(MatchMode::WholePath)
//!     .ignore_patterns(vec!["*.log".into()])
//!     .build();
//!
//! let result = snapshot(&options).expect("Failed to scan directory");
//!
//! print!("{}", output::format_markdown(&result));
//! for file in &result.files {
//!     println!("File: {} ({:?})", file.path.display(), file.status);
//! }
//! ```

mod error;
mod options;
pub mod output;
pub mod rules;
mod source;
mod tree;
mod types;
mod walker;

pub use error::{ProjcatError, Result};
pub use options::{
    BinaryDetection, DEFAULT_IGNORE_FILE, MatchMode, ProjcatBuilder, ProjcatOptions,
    TraversalOrder,
};
pub use rules::IgnoreRuleSet;
pub use source::{
    GitCli, InputSource, KNOWN_HOSTS, RemoteRepo, RepoFetcher, Workspace, snapshot_source,
};
pub use types::{
    BINARY_PLACEHOLDER, ContentStatus, ENCODING_PLACEHOLDER, FileRecord, ProjectSnapshot,
    SOURCE_EXTENSIONS,
};
pub use walker::{snapshot, source_extension};
