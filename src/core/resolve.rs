//! Declaration resolution.
//!
//! Turns the raw graph of one source into reference-free events and common
//! properties. A pure function over its input: the same graph always
//! resolves to the same output, and nothing in the graph is mutated.
//!
//! Rules:
//! - an event's properties are the properties of each included fragment, in
//!   include order, followed by its own
//! - `${common}` references must name a common property of the same graph;
//!   they are checked, then dropped
//! - common properties are copied verbatim
//! - fragments including fragments are rejected

use std::collections::BTreeMap;

use crate::core::declarations::{
    CommonProperties, CommonProperty, Event, Events, OutputtedDeclarations, Property,
    RawDeclaration, RawDeclarations,
};
use crate::error::ResolutionError;

/// Fragment name to its property list.
type FragmentTable<'a> = BTreeMap<&'a str, &'a [Property]>;

pub fn resolve_declarations(
    raw: &RawDeclarations,
) -> Result<OutputtedDeclarations, ResolutionError> {
    let fragments = fragment_table(raw)?;

    let data_points = raw
        .events
        .values()
        .map(|event| resolve_event(event, &fragments, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let properties = raw
        .common_properties
        .values()
        .map(|common| CommonProperty {
            name: common.name.clone(),
            fields: common.metadata.clone(),
        })
        .collect();

    Ok(OutputtedDeclarations {
        events: Events {
            data_points,
            typed: Default::default(),
        },
        common_properties: CommonProperties { properties },
    })
}

fn fragment_table(raw: &RawDeclarations) -> Result<FragmentTable<'_>, ResolutionError> {
    raw.fragments
        .values()
        .map(|fragment| match fragment.includes.first() {
            Some(included) => Err(ResolutionError::NestedFragment {
                fragment: fragment.name.clone(),
                included: included.clone(),
            }),
            None => Ok((fragment.name.as_str(), fragment.properties.as_slice())),
        })
        .collect()
}

fn resolve_event(
    event: &RawDeclaration,
    fragments: &FragmentTable<'_>,
    raw: &RawDeclarations,
) -> Result<Event, ResolutionError> {
    let mut properties = Vec::new();
    for include in &event.includes {
        let fragment =
            fragments
                .get(include.as_str())
                .ok_or_else(|| ResolutionError::UnknownFragment {
                    event: event.name.clone(),
                    fragment: include.clone(),
                })?;
        properties.extend_from_slice(fragment);
    }
    properties.extend_from_slice(&event.properties);

    if let Some(missing) = event
        .common_refs
        .iter()
        .find(|name| !raw.common_properties.contains_key(name.as_str()))
    {
        return Err(ResolutionError::UnknownCommonProperty {
            event: event.name.clone(),
            property: missing.clone(),
        });
    }

    Ok(Event {
        name: event.name.clone(),
        metadata: event.metadata.clone(),
        properties,
    })
}
