//! The validated model of one generation run.
//!
//! [`SchemaSet::build`] is the only way to get a set: it sorts the sources,
//! builds every component and enum, links fields while threading a single
//! wire id counter, and fails on the first error. Renderers never see a
//! partially built set.

use crate::component::{build_component, Component, ComponentOptions, WireId};
use crate::enum_spec::{build_enum, EnumSpec};
use crate::error::{SchemaError, SchemaResult};
use crate::link::link_fields;
use serde::Serialize;
use std::collections::HashSet;

/// Default type tag of wire filter body fields.
pub const DEFAULT_WIRE_FILTER_TYPE: &str = "wire_filter_ptr";

/// The content of one definition file, keyed by its file-derived name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSource {
    pub name: String,
    pub content: String,
}

impl SchemaSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Options for a whole generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub components: ComponentOptions,
    /// Body field type that receives a wire id.
    pub wire_filter_type: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            components: ComponentOptions::default(),
            wire_filter_type: DEFAULT_WIRE_FILTER_TYPE.to_string(),
        }
    }
}

/// All components and enums of one run, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSet {
    pub components: Vec<Component>,
    pub enums: Vec<EnumSpec>,
    /// Number of wire ids handed out.
    pub wire_id_count: u32,
}

impl SchemaSet {
    /// Build and validate every source.
    pub fn build(
        component_sources: &[SchemaSource],
        enum_sources: &[SchemaSource],
        options: &BuildOptions,
    ) -> SchemaResult<Self> {
        let (components, next_wire_id) = build_components(component_sources, options)?;
        let enums = build_enums(enum_sources)?;

        Ok(Self {
            components,
            enums,
            wire_id_count: next_wire_id.0,
        })
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Look up an enum by name.
    pub fn enum_spec(&self, name: &str) -> Option<&EnumSpec> {
        self.enums.iter().find(|e| e.name == name)
    }
}

/// Build and link components in name order.
///
/// Returns the components and the next unused wire id.
pub fn build_components(
    sources: &[SchemaSource],
    options: &BuildOptions,
) -> SchemaResult<(Vec<Component>, WireId)> {
    let sources = sorted_unique(sources, |name| SchemaError::DuplicateComponent { name })?;

    let mut next_wire_id = WireId::FIRST;
    let mut components = Vec::with_capacity(sources.len());

    for source in sources {
        let component = build_component(&source.name, &source.content, &options.components)?;
        let (component, next) = link_fields(component, &options.wire_filter_type, next_wire_id);
        next_wire_id = next;
        components.push(component);
    }

    warn_unknown_dependencies(&components);

    tracing::info!(
        components = components.len(),
        wire_ids = next_wire_id.0,
        "built component schemas"
    );

    Ok((components, next_wire_id))
}

/// Build enums in name order.
pub fn build_enums(sources: &[SchemaSource]) -> SchemaResult<Vec<EnumSpec>> {
    let sources = sorted_unique(sources, |name| SchemaError::DuplicateEnum { name })?;

    let enums = sources
        .into_iter()
        .map(|source| build_enum(&source.name, &source.content))
        .collect::<SchemaResult<Vec<_>>>()?;

    tracing::info!(enums = enums.len(), "built enum schemas");

    Ok(enums)
}

fn sorted_unique(
    sources: &[SchemaSource],
    duplicate: impl Fn(String) -> SchemaError,
) -> SchemaResult<Vec<&SchemaSource>> {
    let mut sorted: Vec<&SchemaSource> = sources.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(pair) = sorted.windows(2).find(|w| w[0].name == w[1].name) {
        return Err(duplicate(pair[0].name.clone()));
    }

    Ok(sorted)
}

fn warn_unknown_dependencies(components: &[Component]) {
    let known: HashSet<&str> = components.iter().map(|c| c.name.as_str()).collect();

    for component in components {
        for dep in &component.dependencies {
            if !known.contains(dep.as_str()) {
                tracing::warn!(
                    component = %component.name,
                    dependency = %dep,
                    "dependency names an unknown component"
                );
            }
        }
    }
}
