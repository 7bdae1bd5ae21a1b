use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::DeclError;
use crate::progress::Progress;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Compiled exclusion list.
///
/// Literal entries match a path and everything below it. Relative entries,
/// literal or glob, are anchored at the base directory; globs starting with
/// `*` match anywhere. Globs match against the absolute path string.
#[derive(Debug, Default)]
pub struct Exclusions {
    literal_paths: Vec<PathBuf>,
    glob_patterns: Vec<Pattern>,
}

impl Exclusions {
    /// Exclusions relative to the current working directory.
    pub fn new(excluded_dirs: &[String], progress: &dyn Progress) -> Self {
        let base = std::env::current_dir().unwrap_or_default();
        Self::with_base(&base, excluded_dirs, progress)
    }

    pub fn with_base(base: &Path, excluded_dirs: &[String], progress: &dyn Progress) -> Self {
        let mut exclusions = Self::default();
        for p in excluded_dirs {
            if is_glob_pattern(p) {
                match Pattern::new(&anchor_glob(base, p)) {
                    Ok(pattern) => exclusions.glob_patterns.push(pattern),
                    Err(e) => progress.warning(&format!("Invalid exclusion pattern '{}': {}", p, e)),
                }
            } else {
                exclusions.literal_paths.push(base.join(p));
            }
        }
        exclusions
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self
            .literal_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.glob_patterns.iter().any(|p| p.matches(&path_str))
    }
}

/// Prefix a relative glob with the escaped base directory.
fn anchor_glob(base: &Path, pattern: &str) -> String {
    if pattern.starts_with('*') || Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let base = Pattern::escape(&base.to_string_lossy());
    format!("{}/{}", base.trim_end_matches('/'), pattern)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// List the parseable files under `source_dir`, sorted by path.
///
/// Excluded directories are pruned from the walk, so nothing below them is
/// ever visited. A missing root is an error; unreadable entries below it are
/// skipped with a warning.
pub fn scan_files(
    source_dir: &Path,
    exclusions: &Exclusions,
    progress: &dyn Progress,
) -> Result<Vec<PathBuf>, DeclError> {
    let root = absolute(source_dir);
    if !root.is_dir() {
        return Err(DeclError::scan(source_dir, "source directory does not exist"));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .into_iter()
        .filter_entry(|entry| !exclusions.is_excluded(entry.path()));
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                progress.warning(&format!("Cannot access path: {}", e));
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_scannable_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn is_scannable_file(path: &Path) -> bool {
    let is_declaration_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts"));
    !is_declaration_file
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("tsx" | "ts" | "jsx" | "js")
        )
}
