//! Declaration data model.
//!
//! Two layers:
//! - raw: [`RawDeclaration`] / [`RawDeclarations`], produced by the scanner
//!   and consumed only by the resolver
//! - resolved: [`Event`], [`CommonProperty`] and their containers, which the
//!   merger aggregates and the output transformer renders

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::ParserFlags;

/// Field holding an endpoint classification on a property definition.
pub const END_POINT_FIELD: &str = "endPoint";

/// Field marking a property as a numeric measurement.
pub const IS_MEASUREMENT_FIELD: &str = "isMeasurement";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    Event,
    Fragment,
    CommonProperty,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Event => "event",
            DeclarationKind::Fragment => "fragment",
            DeclarationKind::CommonProperty => "common property",
        }
    }
}

/// Where a raw declaration was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    /// 1-based line of the comment that holds the declaration.
    pub line: usize,
}

/// A named property definition (classification, purpose, comment, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub fields: Map<String, Value>,
}

impl Property {
    pub fn new(name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One parsed annotation entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Scalar members of an event (owner, comment, ...) or the whole
    /// definition of a common property.
    pub metadata: Map<String, Value>,
    /// Properties declared directly on an event or fragment.
    pub properties: Vec<Property>,
    /// Fragment names from `${include}`, in declaration order.
    pub includes: Vec<String>,
    /// Common property names from `${common}`.
    pub common_refs: Vec<String>,
    pub location: SourceLocation,
}

impl RawDeclaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            name: name.into(),
            metadata: Map::new(),
            properties: Vec::new(),
            includes: Vec::new(),
            common_refs: Vec::new(),
            location,
        }
    }
}

/// The raw declaration graph of one source, scoped per kind.
///
/// Maps are keyed by name so iteration order never depends on the order
/// files were parsed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDeclarations {
    pub events: BTreeMap<String, RawDeclaration>,
    pub fragments: BTreeMap<String, RawDeclaration>,
    pub common_properties: BTreeMap<String, RawDeclaration>,
}

impl RawDeclarations {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.fragments.is_empty() && self.common_properties.is_empty()
    }

    /// Insert a declaration into the table for its kind.
    ///
    /// Returns the declaration it replaced, if the name was already taken.
    pub fn insert(&mut self, declaration: RawDeclaration) -> Option<RawDeclaration> {
        let table = match declaration.kind {
            DeclarationKind::Event => &mut self.events,
            DeclarationKind::Fragment => &mut self.fragments,
            DeclarationKind::CommonProperty => &mut self.common_properties,
        };
        table.insert(declaration.name.clone(), declaration)
    }
}

/// A resolved telemetry data point. Holds no references.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub metadata: Map<String, Value>,
    pub properties: Vec<Property>,
}

/// A property shared by every event of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonProperty {
    pub name: String,
    pub fields: Map<String, Value>,
}

/// Event descriptor from the typed authoring path.
pub type TypedShape = Map<String, Value>;

/// Typed shapes keyed by event name.
pub type TypedShapes = BTreeMap<String, TypedShape>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    /// Annotation-derived events in insertion order.
    pub data_points: Vec<Event>,
    /// Typed shapes, overlaid onto the rendered events last.
    pub typed: TypedShapes,
}

impl Events {
    /// Prepend `prefix` to every event name and typed-shape key.
    pub fn with_prefix(self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self;
        }
        let data_points = self
            .data_points
            .into_iter()
            .map(|event| Event {
                name: format!("{}{}", prefix, event.name),
                ..event
            })
            .collect();
        let typed = self
            .typed
            .into_iter()
            .map(|(name, shape)| (format!("{}{}", prefix, name), shape))
            .collect();
        Self { data_points, typed }
    }

    /// Append another container: events are concatenated, typed shapes merged
    /// by key with `other` winning.
    pub fn append(&mut self, other: Events) {
        self.data_points.extend(other.data_points);
        self.typed.extend(other.typed);
    }
}

/// Common properties in insertion order. Names are not deduplicated across
/// sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonProperties {
    pub properties: Vec<CommonProperty>,
}

/// Resolved declarations of one or more sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputtedDeclarations {
    pub events: Events,
    pub common_properties: CommonProperties,
}

impl ParserFlags {
    /// Apply the measurement and endpoint flags to one property definition.
    pub fn apply(&self, fields: &mut Map<String, Value>) {
        if !self.include_is_measurement {
            fields.shift_remove(IS_MEASUREMENT_FIELD);
        }
        if self.apply_endpoints {
            fields
                .entry(END_POINT_FIELD)
                .or_insert_with(|| Value::String("none".to_string()));
        } else {
            fields.shift_remove(END_POINT_FIELD);
        }
    }
}
