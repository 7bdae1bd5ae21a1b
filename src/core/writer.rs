use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::core::output::Document;
use crate::error::DeclError;
use crate::progress::Progress;

/// Output file of single-source mode, without extension.
pub const DECLARATIONS_FILE_STEM: &str = "declarations-resolved";

/// Output file of multi-source mode, without extension.
pub const EXTENSION_DECLARATIONS_FILE_STEM: &str = "declarations-extensions-resolved";

/// Write `document` to `<output_dir>/<file_stem>.json`.
///
/// Uses 4-space indentation and adds a trailing newline. Creates the output
/// directory if it doesn't exist.
pub fn write_document(
    output_dir: &Path,
    file_stem: &str,
    document: &Document,
    progress: &dyn Progress,
) -> Result<PathBuf, DeclError> {
    let path = output_dir.join(format!("{}.json", file_stem));
    progress.message(&format!("...writing {}", path.display()));

    let write_error = |source: io::Error| DeclError::Write {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(output_dir).map_err(write_error)?;
    let mut content = to_pretty_json(document).map_err(write_error)?;
    content.push(b'\n');
    fs::write(&path, content).map_err(write_error)?;

    Ok(path)
}

fn to_pretty_json(document: &Document) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    Ok(buffer)
}
