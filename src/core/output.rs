//! Output transformer.
//!
//! Renders resolved declarations into the document that gets written:
//!
//! ```json
//! {
//!     "events": { "open": { "owner": "alice", "path": { "classification": "..." } } },
//!     "commonProperties": [ { "name": "common.os", "classification": "..." } ]
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::declarations::{CommonProperty, Event, OutputtedDeclarations, TypedShapes};

/// The canonical output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub events: Map<String, Value>,
    pub common_properties: Vec<Value>,
}

impl Document {
    /// Replace or add events from typed shapes. Typed entries win.
    pub fn overlay_typed(self, typed: TypedShapes) -> Self {
        let typed = typed
            .into_iter()
            .map(|(name, shape)| (name, Value::Object(shape)))
            .collect();
        Self {
            events: overlay(self.events, typed),
            ..self
        }
    }
}

/// Merge two maps; on a key collision the value from `overlay` is kept.
///
/// Keys already in `base` keep their position.
pub fn overlay(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}

pub fn transform_output(declarations: &OutputtedDeclarations) -> Document {
    let mut events = Map::new();
    for event in &declarations.events.data_points {
        events.insert(event.name.clone(), render_event(event));
    }

    let common_properties = declarations
        .common_properties
        .properties
        .iter()
        .map(render_common_property)
        .collect();

    Document {
        events,
        common_properties,
    }
}

fn render_event(event: &Event) -> Value {
    let mut rendered = event.metadata.clone();
    for property in &event.properties {
        rendered.insert(property.name.clone(), Value::Object(property.fields.clone()));
    }
    Value::Object(rendered)
}

fn render_common_property(property: &CommonProperty) -> Value {
    let mut rendered = Map::new();
    rendered.insert("name".to_string(), Value::String(property.name.clone()));
    // The declared name stays first and is never replaced by a `name` field.
    for (key, value) in &property.fields {
        if key != "name" {
            rendered.insert(key.clone(), value.clone());
        }
    }
    Value::Object(rendered)
}
