//! Patch hooks.
//!
//! A patch is a fixed `Events -> Events` step in the pipeline: the website
//! patch runs after resolution in single-source mode, the debug patch runs
//! per source in multi-source mode with that source's prefix.

use std::{
    fs,
    path::{Path, PathBuf},
};

use enum_dispatch::enum_dispatch;
use serde_json::{Map, Value};

use crate::core::declarations::{Event, Events, Property};
use crate::error::DeclError;

/// Trait for a transformation of resolved events.
#[enum_dispatch]
pub trait EventsPatch {
    /// Name used in error messages.
    fn name(&self) -> &str;

    /// Rewrite `events`. `prefix` is the event-name prefix of the active
    /// source (empty in single-source mode).
    fn apply(&self, events: Events, prefix: &str) -> Result<Events, DeclError>;
}

#[enum_dispatch(EventsPatch)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Noop(NoopPatch),
    InjectEvents(InjectEventsPatch),
}

impl Default for Patch {
    fn default() -> Self {
        NoopPatch.into()
    }
}

/// The two hook positions of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    pub website: Patch,
    pub debug: Patch,
}

impl Hooks {
    /// Inject events from the given files; a missing file means no-op.
    pub fn from_files(website: Option<&Path>, debug: Option<&Path>) -> Self {
        let build = |name: &str, path: Option<&Path>| -> Patch {
            match path {
                Some(path) => InjectEventsPatch::new(name, path).into(),
                None => Patch::default(),
            }
        };
        Self {
            website: build("website", website),
            debug: build("debug", debug),
        }
    }
}

// ============================================================
// Noop
// ============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopPatch;

impl EventsPatch for NoopPatch {
    fn name(&self) -> &str {
        "noop"
    }

    fn apply(&self, events: Events, _prefix: &str) -> Result<Events, DeclError> {
        Ok(events)
    }
}

// ============================================================
// InjectEvents
// ============================================================

/// Appends events read from a JSON file.
///
/// The file holds one object keyed by event name; each entry is rendered
/// like an annotation event, object members being properties:
///
/// ```json
/// { "startup": { "owner": "web", "duration": { "classification": "SystemMetaData" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectEventsPatch {
    name: String,
    path: PathBuf,
}

impl InjectEventsPatch {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn load(&self) -> Result<Map<String, Value>, DeclError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DeclError::patch(&self.name, format!("{}: {}", self.path.display(), e))
        })?;
        match serde_json::from_str(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(DeclError::patch(
                &self.name,
                format!("{}: expected a JSON object of events", self.path.display()),
            )),
            Err(e) => Err(DeclError::patch(
                &self.name,
                format!("{}: {}", self.path.display(), e),
            )),
        }
    }
}

impl EventsPatch for InjectEventsPatch {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, mut events: Events, prefix: &str) -> Result<Events, DeclError> {
        for (name, body) in self.load()? {
            let Value::Object(body) = body else {
                return Err(DeclError::patch(
                    &self.name,
                    format!("event '{}' is not an object", name),
                ));
            };
            events.data_points.push(event_from_json(format!("{}{}", prefix, name), body));
        }
        Ok(events)
    }
}

fn event_from_json(name: String, body: Map<String, Value>) -> Event {
    let mut metadata = Map::new();
    let mut properties = Vec::new();
    for (key, value) in body {
        match value {
            Value::Object(fields) => properties.push(Property::new(key, fields)),
            scalar => {
                metadata.insert(key, scalar);
            }
        }
    }
    Event {
        name,
        metadata,
        properties,
    }
}
