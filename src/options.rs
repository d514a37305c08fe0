use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name looked up at the project root for exclusion rules.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    Simple,
    Accurate,
    None,
}

/// How exclusion patterns are applied to a relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Each pattern is a shell glob matched against the whole relative path
    /// string. `*` crosses separators, and a pattern only reaches a nested
    /// directory if it spells out the separator (`*/build`, not `build`).
    WholePath,
    /// Ignore-file style: patterns without a `/` match the last path
    /// component at any depth; patterns with a `/` are anchored at the root.
    Segment,
}

/// Order in which the entries of each directory are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// Files first, then subdirectories, each sorted by name.
    Sorted,
    /// Whatever order the directory listing yields.
    Filesystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjcatOptions {
    pub root: PathBuf,
    /// Name shown on the first tree line. Defaults to the root's directory name.
    pub root_label: Option<String>,
    pub ignore_file: String,
    pub builtin_ignores: bool,
    pub ignore_patterns: Vec<String>,
    pub match_mode: MatchMode,
    pub case_insensitive: bool,
    pub order: TraversalOrder,
    pub follow_links: bool,
    pub binary_detection: BinaryDetection,
    pub file_size_limit: Option<u64>,
    /// Absolute paths left out of the walk, typically the output document.
    pub skip_paths: Vec<PathBuf>,
}

impl Default for ProjcatOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            root_label: None,
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            builtin_ignores: true,
            ignore_patterns: Vec::new(),
            match_mode: MatchMode::WholePath,
            case_insensitive: false,
            order: TraversalOrder::Sorted,
            follow_links: false,
            binary_detection: BinaryDetection::None,
            file_size_limit: None,
            skip_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProjcatBuilder {
    options: ProjcatOptions,
}

impl ProjcatBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ProjcatOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.options.root_label = Some(label.into());
        self
    }
    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.options.ignore_file = name.into();
        self
    }
    pub fn builtin_ignores(mut self, yes: bool) -> Self {
        self.options.builtin_ignores = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.options.match_mode = mode;
        self
    }
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.options.case_insensitive = yes;
        self
    }
    pub fn order(mut self, order: TraversalOrder) -> Self {
        self.options.order = order;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn file_size_limit(mut self, limit: Option<u64>) -> Self {
        self.options.file_size_limit = limit;
        self
    }
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.skip_paths.push(path.into());
        self
    }
    pub fn build(self) -> ProjcatOptions {
        self.options
    }
}
