//! Annotation comment parsing.
//!
//! Recognised markers (checked longest first):
//! - `__GDPR__FRAGMENT__` - reusable property bundles
//! - `__GDPR__COMMON__` - common property definitions
//! - `__GDPR__` - events
//!
//! The text after the marker is a list of JSON object members without the
//! enclosing braces. Trailing commas are accepted and a leading `*` on each
//! line of a block comment is ignored:
//!
//! ```ts
//! /* __GDPR__
//!    "workspaceLoad" : {
//!       "owner": "someone",
//!       "${include}": [ "${WindowInfo}" ],
//!       "${common}": [ "common.os" ],
//!       "userAgent" : { "classification": "SystemMetaData", "purpose": "FeatureInsight" },
//!    }
//! */
//! ```

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde_json::{Map, Value};
use swc_common::SourceMap;

use crate::config::ParserFlags;
use crate::core::declarations::{DeclarationKind, Property, RawDeclaration, SourceLocation};
use crate::core::parsers::source::ExtractedComments;

/// Member listing fragment references.
pub const INCLUDE_DIRECTIVE: &str = "${include}";

/// Member listing common property references.
pub const COMMON_DIRECTIVE: &str = "${common}";

static LEADING_STAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]?").unwrap());

/// Split a comment into its declaration kind and body, if it is an annotation.
pub fn strip_marker(text: &str) -> Option<(DeclarationKind, &str)> {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '*');

    if let Some(rest) = strip_marker_prefix(text, "__GDPR__FRAGMENT__") {
        return Some((DeclarationKind::Fragment, rest));
    }
    if let Some(rest) = strip_marker_prefix(text, "__GDPR__COMMON__") {
        return Some((DeclarationKind::CommonProperty, rest));
    }
    strip_marker_prefix(text, "__GDPR__").map(|rest| (DeclarationKind::Event, rest))
}

/// Match a marker, requiring whitespace or end after it.
fn strip_marker_prefix<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.strip_prefix(marker)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Parse one comment into raw declarations.
///
/// Returns an empty list when the comment carries no marker.
pub fn parse_annotation(
    text: &str,
    location: &SourceLocation,
    flags: ParserFlags,
) -> Result<Vec<RawDeclaration>> {
    let Some((kind, body)) = strip_marker(text) else {
        return Ok(Vec::new());
    };

    let body = LEADING_STAR_REGEX.replace_all(body, "");
    let json = format!("{{{}}}", strip_trailing_commas(&body));
    let members: Map<String, Value> = serde_json::from_str(&json).with_context(|| {
        format!(
            "invalid {} annotation at {}:{}",
            kind.as_str(),
            location.file_path,
            location.line
        )
    })?;

    members
        .into_iter()
        .map(|(name, value)| {
            let Value::Object(definition) = value else {
                bail!(
                    "{} '{}' at {}:{} must be an object",
                    kind.as_str(),
                    name,
                    location.file_path,
                    location.line
                );
            };
            build_declaration(kind, name, definition, location, flags)
        })
        .collect()
}

fn build_declaration(
    kind: DeclarationKind,
    name: String,
    definition: Map<String, Value>,
    location: &SourceLocation,
    flags: ParserFlags,
) -> Result<RawDeclaration> {
    let mut declaration = RawDeclaration::new(kind, name, location.clone());

    if kind == DeclarationKind::CommonProperty {
        let mut fields = definition;
        flags.apply(&mut fields);
        declaration.metadata = fields;
        return Ok(declaration);
    }

    for (key, value) in definition {
        if key == INCLUDE_DIRECTIVE {
            declaration.includes = parse_references(&key, &value)?;
        } else if key == COMMON_DIRECTIVE {
            declaration.common_refs = parse_references(&key, &value)?;
        } else if key.starts_with("${") {
            bail!(
                "unsupported directive '{}' in {} '{}'",
                key,
                kind.as_str(),
                declaration.name
            );
        } else {
            match value {
                Value::Object(mut fields) => {
                    flags.apply(&mut fields);
                    declaration.properties.push(Property::new(key, fields));
                }
                scalar => {
                    declaration.metadata.insert(key, scalar);
                }
            }
        }
    }

    Ok(declaration)
}

fn parse_references(directive: &str, value: &Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        bail!("'{}' must be an array of names", directive);
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(name) => Ok(reference_name(name).to_string()),
            other => bail!("'{}' contains a non-string entry: {}", directive, other),
        })
        .collect()
}

/// `${Name}` and `Name` both refer to `Name`.
pub fn reference_name(reference: &str) -> &str {
    let trimmed = reference.trim();
    trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed)
}

/// Drop commas that directly precede `}` or `]` (or the end of input),
/// leaving string contents untouched.
fn strip_trailing_commas(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, None | Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Collects raw declarations from every comment of one parsed file.
pub struct AnnotationCollector;

impl AnnotationCollector {
    /// Declarations in source order.
    pub fn collect(
        comments: &ExtractedComments,
        source_map: &SourceMap,
        file_path: &str,
        flags: ParserFlags,
    ) -> Result<Vec<RawDeclaration>> {
        let mut declarations = Vec::new();
        for (line, cmt) in comments.with_lines(source_map) {
            let location = SourceLocation {
                file_path: file_path.to_string(),
                line,
            };
            declarations.extend(parse_annotation(&cmt.text, &location, flags)?);
        }
        Ok(declarations)
    }
}
