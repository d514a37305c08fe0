//! Tree diagram lines.
//!
//! Every entry below the root is drawn as `│   ` once per ancestor between
//! it and the root, then `├── ` and its name. Directories carry a trailing
//! `/`.

use std::path::{MAIN_SEPARATOR, Path};

const INDENT: &str = "│   ";
const BRANCH: &str = "├── ";

/// First line of the diagram.
pub(crate) fn root_line(label: &str) -> String {
    format!("{}/", label)
}

/// The root's directory name, or the whole path with trailing separators
/// removed when it has none (`/` becomes an empty label).
pub(crate) fn default_root_label(root: &Path) -> String {
    match root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root
            .display()
            .to_string()
            .trim_end_matches(['/', MAIN_SEPARATOR])
            .to_string(),
    }
}

/// Line for an entry at `depth` (1 for direct children of the root).
pub(crate) fn entry_line(depth: usize, name: &str, is_dir: bool) -> String {
    let mut line = INDENT.repeat(depth.saturating_sub(1));
    line.push_str(BRANCH);
    line.push_str(name);
    if is_dir {
        line.push('/');
    }
    line
}
