//! Extraction pipelines.
//!
//! Single-source mode:
//! scan → resolve → website patch → transform → typed overlay
//!
//! Multi-source mode, per source in order:
//! scan → resolve → typed extraction → prefix → debug patch → append,
//! then transform once and overlay the merged typed shapes.

use std::path::{Path, PathBuf};

use crate::config::{ParserOptions, SourceSpec};
use crate::core::declarations::{OutputtedDeclarations, TypedShapes};
use crate::core::output::{Document, transform_output};
use crate::core::patch::{EventsPatch, Hooks};
use crate::core::resolve::resolve_declarations;
use crate::core::scan::scan_declarations;
use crate::core::typed::extract_typed_shapes_all;
use crate::core::writer::{
    DECLARATIONS_FILE_STEM, EXTENSION_DECLARATIONS_FILE_STEM, write_document,
};
use crate::error::DeclError;
use crate::progress::Progress;

/// Scan and resolve annotation declarations of one source.
///
/// Reports `...extracting` once per call.
pub fn resolved_declarations(
    source_dirs: &[PathBuf],
    excluded_dirs: &[String],
    options: &ParserOptions,
    progress: &dyn Progress,
) -> Result<OutputtedDeclarations, DeclError> {
    progress.message("...extracting");
    let raw = scan_declarations(source_dirs, excluded_dirs, options.flags(), progress)?;
    Ok(resolve_declarations(&raw)?)
}

pub fn extract_declarations(
    source_dirs: &[PathBuf],
    excluded_dirs: &[String],
    options: &ParserOptions,
    hooks: &Hooks,
    progress: &dyn Progress,
) -> Result<Document, DeclError> {
    let mut declarations = resolved_declarations(source_dirs, excluded_dirs, options, progress)?;
    if options.add_website_events_workaround {
        declarations.events = hooks.website.apply(declarations.events, "")?;
    }

    let typed = extract_typed_shapes_all(source_dirs, excluded_dirs, options.flags(), progress)?;
    Ok(transform_output(&declarations).overlay_typed(typed))
}

pub fn extract_extension_declarations(
    specs: &[SourceSpec],
    hooks: &Hooks,
    progress: &dyn Progress,
) -> Result<Document, DeclError> {
    let mut merged = OutputtedDeclarations::default();
    let mut typed = TypedShapes::new();

    for spec in specs {
        let options = &spec.parser_options;
        let prefix = options.event_prefix.as_str();

        let declarations =
            resolved_declarations(&spec.source_dirs, &spec.excluded_dirs, options, progress)?;
        let spec_typed = extract_typed_shapes_all(
            &spec.source_dirs,
            &spec.excluded_dirs,
            options.flags(),
            progress,
        )?;

        let mut events = declarations.events;
        events.typed = spec_typed;
        let mut events = events.with_prefix(prefix);
        if options.add_debug_events_workaround {
            events = hooks.debug.apply(events, prefix)?;
        }

        typed.extend(std::mem::take(&mut events.typed));
        merged.events.append(events);
        merged
            .common_properties
            .properties
            .extend(declarations.common_properties.properties);
    }

    Ok(transform_output(&merged).overlay_typed(typed))
}

/// Run single-source mode and write `declarations-resolved.json`.
pub fn save_declarations(
    source_dirs: &[PathBuf],
    excluded_dirs: &[String],
    options: &ParserOptions,
    hooks: &Hooks,
    output_dir: &Path,
    progress: &dyn Progress,
) -> Result<PathBuf, DeclError> {
    let document = extract_declarations(source_dirs, excluded_dirs, options, hooks, progress)?;
    write_document(output_dir, DECLARATIONS_FILE_STEM, &document, progress)
}

/// Run multi-source mode and write `declarations-extensions-resolved.json`.
pub fn save_extension_declarations(
    specs: &[SourceSpec],
    hooks: &Hooks,
    output_dir: &Path,
    progress: &dyn Progress,
) -> Result<PathBuf, DeclError> {
    let document = extract_extension_declarations(specs, hooks, progress)?;
    write_document(output_dir, EXTENSION_DECLARATIONS_FILE_STEM, &document, progress)
}
