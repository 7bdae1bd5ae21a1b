//! Core extraction pipeline.
//!
//! ## Module Structure
//!
//! - `declarations`: raw and resolved data model
//! - `file_scanner`: directory traversal with exclusion pruning
//! - `parsers`: swc source parsing and annotation comment parsing
//! - `scan`: raw declaration graph of a set of directories
//! - `typed`: typed-shape extraction from `publicLog2` calls
//! - `resolve`: fragment inlining and reference checks
//! - `patch`: `Events -> Events` hooks
//! - `output`: document rendering and typed overlay
//! - `writer`: JSON output file
//! - `pipeline`: single-source and multi-source runs

pub mod declarations;
pub mod file_scanner;
pub mod output;
pub mod parsers;
pub mod patch;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod typed;
pub mod writer;
