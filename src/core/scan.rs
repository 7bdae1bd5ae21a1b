//! Declaration scanner.
//!
//! Walks every source root, parses each file in parallel and merges the
//! annotation declarations into one raw graph. Parsing order never shows in
//! the result: files are merged in sorted path order, declarations in
//! source order within a file.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::ParserFlags;
use crate::core::declarations::{RawDeclaration, RawDeclarations};
use crate::core::file_scanner::{Exclusions, scan_files};
use crate::core::parsers::{annotation::AnnotationCollector, source::parse_file};
use crate::error::DeclError;
use crate::progress::Progress;

/// Scan `source_dirs` for annotation declarations.
///
/// The first file that fails to parse aborts the scan.
pub fn scan_declarations(
    source_dirs: &[PathBuf],
    excluded_dirs: &[String],
    flags: ParserFlags,
    progress: &dyn Progress,
) -> Result<RawDeclarations, DeclError> {
    let exclusions = Exclusions::new(excluded_dirs, progress);

    let mut files = Vec::new();
    for dir in source_dirs {
        files.extend(scan_files(dir, &exclusions, progress)?);
    }
    files.sort();
    files.dedup();

    let per_file: Vec<Vec<RawDeclaration>> = files
        .par_iter()
        .map(|path| declarations_in_file(path, flags))
        .collect::<Result<_, _>>()?;

    let mut raw = RawDeclarations::default();
    for declaration in per_file.into_iter().flatten() {
        let kind = declaration.kind;
        let location = declaration.location.clone();
        if let Some(previous) = raw.insert(declaration) {
            progress.warning(&format!(
                "{} '{}' at {}:{} overrides the one at {}:{}",
                kind.as_str(),
                previous.name,
                location.file_path,
                location.line,
                previous.location.file_path,
                previous.location.line
            ));
        }
    }
    Ok(raw)
}

fn declarations_in_file(path: &Path, flags: ParserFlags) -> Result<Vec<RawDeclaration>, DeclError> {
    let parsed = parse_file(path).map_err(|e| DeclError::scan(path, e))?;
    let file_path = path.to_string_lossy();
    AnnotationCollector::collect(&parsed.comments, &parsed.source_map, &file_path, flags)
        .map_err(|e| DeclError::scan(path, format!("{:#}", e)))
}
