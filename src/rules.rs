//! Exclusion rules: the ignore-file at the project root, the built-in
//! patterns, and any extra patterns passed through the options.

use crate::error::{ProjcatError, Result};
use crate::options::{MatchMode, ProjcatOptions};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;
#[cfg(feature = "logging")]
use tracing;

/// Dependency, build-cache, environment and bytecode entries that are never
/// worth documenting. Written as names; [`builtin_patterns`] turns them into
/// patterns for a given [`MatchMode`].
pub const BUILTIN_NAMES: &[&str] = &[
    "node_modules",
    ".next",
    "env",
    "venv",
    ".venv",
    "__pycache__",
    ".env",
    ".git",
    "*.pyc",
];

/// Expands [`BUILTIN_NAMES`] for the given mode.
///
/// In [`MatchMode::WholePath`] a bare name only matches at the top level, so
/// each name also gets a `*/` variant reaching any depth below it.
pub fn builtin_patterns(mode: MatchMode) -> Vec<String> {
    let mut patterns = Vec::with_capacity(BUILTIN_NAMES.len() * 2);
    for name in BUILTIN_NAMES {
        patterns.push(name.to_string());
        if mode == MatchMode::WholePath && !name.starts_with('*') {
            patterns.push(format!("*/{}", name));
        }
    }
    patterns
}

/// Splits ignore-file text into patterns: one per line, trimmed, skipping
/// blank lines and `#` comments. Order is preserved.
pub fn parse_ignore_file(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads and parses an ignore-file. A missing or unreadable file yields no
/// patterns.
pub fn read_ignore_file(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => parse_ignore_file(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::warn!("Ignoring unreadable ignore file {}: {}", path.display(), _e);
            Vec::new()
        }
    }
}

/// Compiled, read-only set of exclusion patterns for one run.
///
/// Matching is case-sensitive unless built with `case_insensitive`, on every
/// platform. There is no negation: a `!pattern` line is an ordinary glob.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    patterns: Vec<String>,
    mode: MatchMode,
    paths: GlobSet,
    names: GlobSet,
}

impl IgnoreRuleSet {
    /// Builds the rule set for `options.root`: ignore-file patterns first,
    /// then the built-ins, then `options.ignore_patterns`.
    ///
    /// Invalid lines in the ignore-file are skipped. Invalid patterns given
    /// through the options are an error.
    pub fn load(options: &ProjcatOptions) -> Result<Self> {
        let ignore_path = options.root.join(&options.ignore_file);
        let from_file = read_ignore_file(&ignore_path);
        #[cfg(feature = "logging")]
        tracing::debug!(
            "Loaded {} patterns from {}",
            from_file.len(),
            ignore_path.display()
        );

        let mut compiler = Compiler::new(options.match_mode, options.case_insensitive);
        for pattern in &from_file {
            if let Err(_e) = compiler.add(pattern) {
                #[cfg(feature = "logging")]
                tracing::warn!(
                    "Skipping pattern '{}' from {}: {}",
                    pattern,
                    ignore_path.display(),
                    _e
                );
            }
        }
        if options.builtin_ignores {
            for pattern in builtin_patterns(options.match_mode) {
                compiler.add(&pattern)?;
            }
        }
        for pattern in &options.ignore_patterns {
            compiler.add(pattern)?;
        }
        compiler.finish()
    }

    /// Compiles `patterns` as given. Any invalid pattern is an error.
    pub fn from_patterns<I, S>(patterns: I, mode: MatchMode, case_insensitive: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiler = Compiler::new(mode, case_insensitive);
        for pattern in patterns {
            compiler.add(pattern.as_ref())?;
        }
        compiler.finish()
    }

    /// The active patterns, in load order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True iff `relative` (a path relative to the project root) matches any
    /// pattern. The root itself is never excluded.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if relative.as_os_str().is_empty() {
            return false;
        }
        if self.paths.is_match(relative) {
            return true;
        }
        relative
            .file_name()
            .is_some_and(|name| self.names.is_match(name))
    }
}

struct Compiler {
    mode: MatchMode,
    case_insensitive: bool,
    patterns: Vec<String>,
    paths: GlobSetBuilder,
    names: GlobSetBuilder,
}

impl Compiler {
    fn new(mode: MatchMode, case_insensitive: bool) -> Self {
        Self {
            mode,
            case_insensitive,
            patterns: Vec::new(),
            paths: GlobSetBuilder::new(),
            names: GlobSetBuilder::new(),
        }
    }

    fn add(&mut self, pattern: &str) -> Result<()> {
        let case_insensitive = self.case_insensitive;
        let compiled = |glob: &str, literal_separator: bool| {
            GlobBuilder::new(glob)
                .literal_separator(literal_separator)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|e| ProjcatError::Pattern(format!("'{}': {}", pattern, e)))
        };
        match self.mode {
            MatchMode::WholePath => {
                self.paths.add(compiled(pattern, false)?);
            }
            MatchMode::Segment => {
                let trimmed = pattern.trim_end_matches('/');
                if trimmed.is_empty() {
                    return Err(ProjcatError::Pattern(format!("'{}': empty pattern", pattern)));
                }
                if trimmed.contains('/') {
                    let anchored = trimmed.trim_start_matches('/');
                    self.paths.add(compiled(anchored, true)?);
                } else {
                    self.names.add(compiled(trimmed, true)?);
                }
            }
        }
        self.patterns.push(pattern.to_string());
        Ok(())
    }

    fn finish(self) -> Result<IgnoreRuleSet> {
        let build = |builder: GlobSetBuilder| {
            builder
                .build()
                .map_err(|e| ProjcatError::Pattern(format!("Failed to build glob set: {}", e)))
        };
        Ok(IgnoreRuleSet {
            patterns: self.patterns,
            mode: self.mode,
            paths: build(self.paths)?,
            names: build(self.names)?,
        })
    }
}
