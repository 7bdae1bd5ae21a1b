//! Typed-shape extraction.
//!
//! Events can also be declared through types instead of comments:
//!
//! ```ts
//! type OpenClassification = {
//!     owner: 'alice';
//!     fileSize: { classification: 'SystemMetaData'; purpose: 'FeatureInsight'; isMeasurement: true };
//! };
//! telemetry.publicLog2<OpenEvent, OpenClassification>('openFile', data);
//! ```
//!
//! Every directory is its own type-resolution context: type names are looked
//! up across all files of that directory only, so multiple directories are
//! extracted one at a time and merged by key afterwards.
//!
//! ## Module Structure
//!
//! - `collector`: AST visitor for type declarations and typed log calls
//! - `convert`: classification types to JSON shapes

pub mod collector;
pub mod convert;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;
use swc_ecma_visit::VisitWith;

use crate::config::ParserFlags;
use crate::core::declarations::{TypedShape, TypedShapes};
use crate::core::file_scanner::{Exclusions, scan_files};
use crate::core::parsers::source::parse_file;
use crate::error::DeclError;
use crate::progress::Progress;

use collector::TypedShapeCollector;
use convert::TypeTable;

/// Extract typed shapes from one directory.
pub fn extract_typed_shapes(
    source_dir: &Path,
    excluded_dirs: &[String],
    flags: ParserFlags,
    progress: &dyn Progress,
) -> Result<TypedShapes, DeclError> {
    let exclusions = Exclusions::new(excluded_dirs, progress);
    let files = scan_files(source_dir, &exclusions, progress)?;

    let collectors: Vec<TypedShapeCollector> = files
        .par_iter()
        .map(|path| {
            let parsed = parse_file(path).map_err(|e| DeclError::scan(path, e))?;
            let mut collector = TypedShapeCollector::new();
            parsed.module.visit_with(&mut collector);
            Ok(collector)
        })
        .collect::<Result<_, DeclError>>()?;

    let table = TypeTable::new(collectors.iter().flat_map(|c| c.types.iter()));

    let mut shapes = TypedShapes::new();
    for call in collectors.iter().flat_map(|c| c.calls.iter()) {
        match table.shape_of(&call.classification) {
            Some(shape) => {
                shapes.insert(call.event_name.clone(), apply_flags(shape, flags));
            }
            None => progress.warning(&format!(
                "Cannot resolve classification type '{}' for event '{}' in {}",
                call.classification,
                call.event_name,
                source_dir.display()
            )),
        }
    }
    Ok(shapes)
}

/// Extract each directory separately and merge by key; later directories win.
pub fn extract_typed_shapes_all(
    source_dirs: &[PathBuf],
    excluded_dirs: &[String],
    flags: ParserFlags,
    progress: &dyn Progress,
) -> Result<TypedShapes, DeclError> {
    let mut shapes = TypedShapes::new();
    for dir in source_dirs {
        shapes.extend(extract_typed_shapes(dir, excluded_dirs, flags, progress)?);
    }
    Ok(shapes)
}

/// Object-valued members are property definitions.
fn apply_flags(mut shape: TypedShape, flags: ParserFlags) -> TypedShape {
    for value in shape.values_mut() {
        if let Value::Object(fields) = value {
            flags.apply(fields);
        }
    }
    shape
}
