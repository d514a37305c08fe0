use crate::error::{ProjcatError, Result};
use crate::options::{BinaryDetection, ProjcatOptions, TraversalOrder};
use crate::rules::IgnoreRuleSet;
use crate::tree::{default_root_label, entry_line, root_line};
use crate::types::{
    BINARY_PLACEHOLDER, ContentStatus, ENCODING_PLACEHOLDER, FileRecord, ProjectSnapshot,
    SOURCE_EXTENSIONS,
};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

const BINARY_SNIFF_LEN: usize = 4096;

struct Walker {
    inner: ignore::Walk,
}

impl Walker {
    fn new(root: &Path, options: &ProjcatOptions, rules: &IgnoreRuleSet) -> Self {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(options.follow_links);
        if options.order == TraversalOrder::Sorted {
            let follow_links = options.follow_links;
            // Group the same way entries are rendered: a symlink is a file
            // unless links are followed.
            let is_dir = move |path: &Path| {
                let metadata = if follow_links {
                    fs::metadata(path)
                } else {
                    fs::symlink_metadata(path)
                };
                metadata.is_ok_and(|m| m.is_dir())
            };
            builder.sort_by_file_path(move |a, b| {
                (is_dir(a), a.file_name()).cmp(&(is_dir(b), b.file_name()))
            });
        }
        let rules = rules.clone();
        let root = root.to_path_buf();
        let skip: Vec<PathBuf> = options.skip_paths.iter().map(|p| absolutize(p)).collect();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let path = entry.path();
            if skip.iter().any(|s| s == path) {
                return false;
            }
            let relative = path.strip_prefix(&root).unwrap_or(path);
            !rules.is_excluded(relative)
        });
        Self {
            inner: builder.build(),
        }
    }
}

/// Walks `options.root` once and collects the tree diagram and the source
/// files.
///
/// Excluded directories are pruned before descent. Files that cannot be read
/// or decoded keep their entry with a placeholder; subdirectories that cannot
/// be listed are skipped.
///
/// # Errors
///
/// [`ProjcatError::InvalidInput`] if the root is missing or not a directory,
/// [`ProjcatError::Pattern`] if an extra pattern in the options is invalid.
pub fn snapshot(options: &ProjcatOptions) -> Result<ProjectSnapshot> {
    let root = fs::canonicalize(&options.root)
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| ProjcatError::InvalidInput(options.root.display().to_string()))?;
    #[cfg(feature = "logging")]
    tracing::info!("Processing project: {}", root.display());

    let rules = IgnoreRuleSet::load(options)?;
    #[cfg(feature = "logging")]
    tracing::debug!("{} exclusion patterns active", rules.patterns().len());

    let root_label = options
        .root_label
        .clone()
        .unwrap_or_else(|| default_root_label(&root));
    let mut tree = vec![root_line(&root_label)];
    let mut files = Vec::new();

    for result in Walker::new(&root, options, &rules).inner {
        let entry = match result {
            Ok(entry) => entry,
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::warn!("Skipping unreadable entry: {}", _e);
                continue;
            }
        };
        let depth = entry.depth();
        if depth == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        tree.push(entry_line(depth, &name, is_dir));
        if is_dir {
            continue;
        }
        let Some(language) = source_extension(&name) else {
            continue;
        };
        let path = entry.path();
        let relative = path.strip_prefix(&root).unwrap_or(path).to_path_buf();
        let (content, status) =
            read_file_content(path, options.binary_detection, options.file_size_limit);
        files.push(FileRecord {
            path: relative,
            language: language.to_string(),
            content,
            status,
        });
    }

    #[cfg(feature = "logging")]
    tracing::debug!("Collected {} tree lines, {} files", tree.len(), files.len());
    Ok(ProjectSnapshot {
        root_label,
        tree,
        files,
    })
}

/// The extension of `name` if it is one of [`SOURCE_EXTENSIONS`].
///
/// The extension is the case-sensitive text after the last `.`, so `.py`
/// counts and `app.PY` does not.
pub fn source_extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    SOURCE_EXTENSIONS.contains(&ext).then_some(ext)
}

fn read_file_content(
    path: &Path,
    binary_detection: BinaryDetection,
    size_limit: Option<u64>,
) -> (String, ContentStatus) {
    if let Some(limit) = size_limit {
        match fs::metadata(path) {
            Ok(metadata) if metadata.len() > limit => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    "File too large ({} > {}): {}",
                    metadata.len(),
                    limit,
                    path.display()
                );
                return (
                    format!("# Unable to read file: too large ({} bytes)", metadata.len()),
                    ContentStatus::TooLarge,
                );
            }
            Ok(_) => {}
            Err(e) => return unreadable(path, e),
        }
    }
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return unreadable(path, e),
    };
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    let is_binary = match binary_detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(head).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return (BINARY_PLACEHOLDER.to_string(), ContentStatus::Binary);
    }
    match String::from_utf8(bytes) {
        Ok(text) => (text, ContentStatus::Text),
        Err(_) => {
            #[cfg(feature = "logging")]
            tracing::warn!("Not valid UTF-8, using placeholder: {}", path.display());
            (ENCODING_PLACEHOLDER.to_string(), ContentStatus::Undecodable)
        }
    }
}

fn unreadable(_path: &Path, e: std::io::Error) -> (String, ContentStatus) {
    #[cfg(feature = "logging")]
    tracing::warn!("Cannot read {}: {}", _path.display(), e);
    (
        format!("# Unable to read file: {}", e),
        ContentStatus::Unreadable,
    )
}

/// Canonical form of `path`, resolving through the parent when the path
/// itself does not exist yet.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}
