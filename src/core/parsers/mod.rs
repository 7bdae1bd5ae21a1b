//! Host-language parsers.
//!
//! - `source`: TypeScript/JavaScript parsing with swc (AST plus comments)
//! - `annotation`: declaration comments to raw declarations

pub mod annotation;
pub mod source;
