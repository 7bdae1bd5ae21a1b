//! Telex - telemetry declaration extractor
//!
//! Telex scans TypeScript sources for telemetry declarations, written either
//! as `__GDPR__` comment annotations or as typed `publicLog2` calls, resolves
//! fragment references and writes one reference-free JSON document per run.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction pipeline (scan, resolve, transform, merge, write)
//! - `error`: Error kinds of a pipeline run
//! - `progress`: Progress and warning observer

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod progress;
