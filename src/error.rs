//! Error types for the extraction pipeline.
//!
//! Every kind aborts the run it occurs in. There is no partial output and no
//! retry; the caller reports the error and writes nothing.

use std::path::PathBuf;

use thiserror::Error;

/// Any failure of a pipeline run.
#[derive(Debug, Error)]
pub enum DeclError {
    /// The lexical or typed parser failed on a file, or a source root is unusable.
    #[error("failed to scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    /// A declaration references something that was never declared.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A patch hook failed while rewriting resolved events.
    #[error("patch '{patch}' failed: {message}")]
    Patch { patch: String, message: String },

    /// The output document could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeclError {
    pub fn scan(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Scan {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn patch(patch: impl Into<String>, message: impl ToString) -> Self {
        Self::Patch {
            patch: patch.into(),
            message: message.to_string(),
        }
    }
}

/// Broken references found while resolving one raw declaration graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("event '{event}' includes unknown fragment '{fragment}'")]
    UnknownFragment { event: String, fragment: String },

    #[error("event '{event}' references unknown common property '{property}'")]
    UnknownCommonProperty { event: String, property: String },

    /// Fragments may not include other fragments.
    #[error("fragment '{fragment}' includes fragment '{included}', nested fragments are not supported")]
    NestedFragment { fragment: String, included: String },
}
