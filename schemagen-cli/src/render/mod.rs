//! C++ source rendering.
//!
//! Renderers take a validated [`SchemaSet`] and produce file contents; they
//! never validate anything themselves.

mod component;
mod enums;
mod registry;

pub use component::{render_component_header, render_component_source};
pub use enums::{render_enums_header, render_enums_source};
pub use registry::{render_registry, render_ui_filters};

use schemagen::SchemaSet;
use std::path::PathBuf;

/// Banner at the top of every generated file.
pub const DO_NOT_MODIFY: &str = "/* THIS FILE IS AUTOGENERATED BY schemagen; DO NOT HAND-MODIFY */";

/// Registry header listing every component manager.
pub const REGISTRY_HEADER: &str = "component_managers.h";

/// Wire filter UI dispatch source.
pub const UI_FILTERS_SOURCE: &str = "component_ui_genned.cc";

pub const ENUMS_HEADER: &str = "enums.h";
pub const ENUMS_SOURCE: &str = "enums.cc";

const TAB: &str = "    ";

/// Which output directory a generated file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Component,
    Enum,
}

/// One rendered file, relative to its output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: OutputKind,
    pub relative_path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    fn new(kind: OutputKind, name: impl Into<PathBuf>, content: String) -> Self {
        Self {
            kind,
            relative_path: name.into(),
            content,
        }
    }
}

/// Escape text for use inside a C string literal.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Header and source file names for a component.
pub fn component_file_names(component: &str) -> (String, String) {
    (
        format!("{}_component.h", component),
        format!("{}_component.cc", component),
    )
}

/// Render every component file plus the registry and UI dispatch.
pub fn render_components(set: &SchemaSet) -> Vec<GeneratedFile> {
    let mut files = Vec::with_capacity(set.components.len() * 2 + 2);

    files.push(GeneratedFile::new(
        OutputKind::Component,
        REGISTRY_HEADER,
        render_registry(&set.components),
    ));
    files.push(GeneratedFile::new(
        OutputKind::Component,
        UI_FILTERS_SOURCE,
        render_ui_filters(&set.components),
    ));

    for component in &set.components {
        let (header, source) = component_file_names(&component.name);
        tracing::debug!(component = %component.name, %header, %source, "rendering component");

        files.push(GeneratedFile::new(
            OutputKind::Component,
            header,
            render_component_header(component),
        ));
        files.push(GeneratedFile::new(
            OutputKind::Component,
            source,
            render_component_source(component),
        ));
    }

    files
}

/// Render `enums.h` and `enums.cc`.
pub fn render_enums(set: &SchemaSet) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(OutputKind::Enum, ENUMS_HEADER, render_enums_header(&set.enums)),
        GeneratedFile::new(OutputKind::Enum, ENUMS_SOURCE, render_enums_source(&set.enums)),
    ]
}
