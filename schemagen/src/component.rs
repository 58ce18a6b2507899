//! Component definition files and the model built from them.
//!
//! A component file is a sequence of delimiter-separated records:
//!
//! ```text
//! ui_name,Door
//! body,hw_mesh *,mesh,nullptr
//! body,float,pos,1
//! stub,std::string,std::string,,mesh,.c_str()
//! depends,power,reader
//! ```
//!
//! [`build_component`] turns one file into a [`Component`]; stub linking and
//! wire id assignment happen afterwards in [`crate::link`].

use crate::error::{SchemaError, SchemaResult};
use crate::tokenizer::{tokenize_lines, Line};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Predecessor of the first body field in every component.
pub const FIRST_PREDECESSOR: &str = "entity";

/// Display name used when a file never supplies `ui_name`.
pub const INVALID_DISPLAY_NAME: &str = "Invalid Name";

/// Identifier of a wire filter field, unique across one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WireId(pub u32);

impl WireId {
    /// First identifier handed out in a run.
    pub const FIRST: WireId = WireId(0);

    /// The identifier following this one.
    pub fn next(self) -> WireId {
        WireId(self.0 + 1)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A component's own stored data member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyField {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub default_value: String,
    /// Name of the body field declared just before this one, or `entity`.
    pub predecessor: String,
    pub owning_component: String,
    /// Index into the owning component's `stub_fields`.
    pub linked_stub: Option<usize>,
    pub wire_id: Option<WireId>,
}

/// Accessor/wrapper description matched to body fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubField {
    pub outer_type: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub prefix: String,
    pub name: String,
    pub extra: String,
    pub owning_component: String,
}

/// One component definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: String,
    pub display_name: String,
    pub body_fields: Vec<BodyField>,
    pub stub_fields: Vec<StubField>,
    pub dependencies: Vec<String>,
}

impl Component {
    /// Create an empty component with the sentinel display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: INVALID_DISPLAY_NAME.to_string(),
            body_fields: Vec::new(),
            stub_fields: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Whether `ui_name` was ever supplied.
    pub fn has_display_name(&self) -> bool {
        self.display_name != INVALID_DISPLAY_NAME
    }

    /// The stub linked to `field`, if any.
    pub fn linked_stub(&self, field: &BodyField) -> Option<&StubField> {
        field.linked_stub.and_then(|i| self.stub_fields.get(i))
    }

    /// Body fields that carry a wire id, in declaration order.
    pub fn wire_fields(&self) -> impl Iterator<Item = &BodyField> {
        self.body_fields.iter().filter(|f| f.wire_id.is_some())
    }

    /// Append a body field, chaining its predecessor to the previous one.
    pub fn push_body_field(
        &mut self,
        ty: impl Into<String>,
        name: impl Into<String>,
        default_value: impl Into<String>,
    ) {
        let predecessor = self
            .body_fields
            .last()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| FIRST_PREDECESSOR.to_string());

        self.body_fields.push(BodyField {
            ty: ty.into(),
            name: name.into(),
            default_value: default_value.into(),
            predecessor,
            owning_component: self.name.clone(),
            linked_stub: None,
            wire_id: None,
        });
    }

    /// Append a stub field.
    pub fn push_stub_field(
        &mut self,
        outer_type: impl Into<String>,
        ty: impl Into<String>,
        prefix: impl Into<String>,
        name: impl Into<String>,
        extra: impl Into<String>,
    ) {
        self.stub_fields.push(StubField {
            outer_type: outer_type.into(),
            ty: ty.into(),
            prefix: prefix.into(),
            name: name.into(),
            extra: extra.into(),
            owning_component: self.name.clone(),
        });
    }
}

/// Kinds of records in a component file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Body,
    Stub,
    Depends,
    UiName,
}

impl LineKind {
    /// Parse a line-kind tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "body" => Some(Self::Body),
            "stub" => Some(Self::Stub),
            "depends" => Some(Self::Depends),
            "ui_name" => Some(Self::UiName),
            _ => None,
        }
    }

    /// The tag as written in files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Stub => "stub",
            Self::Depends => "depends",
            Self::UiName => "ui_name",
        }
    }

    /// Minimum number of fields, tag included.
    pub fn min_fields(self) -> usize {
        match self {
            Self::Body => 4,
            Self::Stub => 6,
            Self::Depends => 1,
            Self::UiName => 2,
        }
    }
}

/// What to do with a line whose tag is not a known [`LineKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLinePolicy {
    /// Skip silently.
    Ignore,
    /// Skip and log a warning.
    #[default]
    Warn,
    /// Fail the file.
    Reject,
}

/// What to do when two body fields of one component share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFieldPolicy {
    /// Fail the file.
    #[default]
    Reject,
    /// Keep both; they link to the same stub.
    Alias,
}

/// Options for parsing component files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOptions {
    pub delimiter: char,
    pub unknown_lines: UnknownLinePolicy,
    pub duplicate_fields: DuplicateFieldPolicy,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            unknown_lines: UnknownLinePolicy::default(),
            duplicate_fields: DuplicateFieldPolicy::default(),
        }
    }
}

/// Build a component from the content of its definition file.
///
/// `name` is the file-derived component name. The result is not yet
/// linked; see [`crate::link::link_fields`].
pub fn build_component(
    name: &str,
    content: &str,
    options: &ComponentOptions,
) -> SchemaResult<Component> {
    let mut component = Component::new(name);
    let mut seen_fields = HashSet::new();

    for line in tokenize_lines(content, options.delimiter) {
        if line.is_blank() {
            continue;
        }

        let Some(kind) = LineKind::from_tag(line.kind()) else {
            handle_unknown_line(name, &line, options.unknown_lines)?;
            continue;
        };

        check_field_count(name, &line, kind)?;
        let f = &line.fields;

        match kind {
            LineKind::Body => {
                if !seen_fields.insert(f[2]) {
                    match options.duplicate_fields {
                        DuplicateFieldPolicy::Reject => {
                            return Err(SchemaError::DuplicateBodyField {
                                file: name.to_string(),
                                line_number: line.number,
                                field: f[2].to_string(),
                            });
                        }
                        DuplicateFieldPolicy::Alias => {
                            tracing::warn!(
                                component = %name,
                                field = %f[2],
                                line = line.number,
                                "duplicate body field aliased"
                            );
                        }
                    }
                }
                component.push_body_field(f[1], f[2], f[3]);
            }
            LineKind::Stub => {
                component.push_stub_field(f[1], f[2], f[3], f[4], f[5]);
            }
            LineKind::Depends => {
                if !component.dependencies.is_empty() {
                    tracing::debug!(
                        component = %name,
                        line = line.number,
                        replaced = ?component.dependencies,
                        "depends line replaces earlier dependency list"
                    );
                }
                component.dependencies = f[1..].iter().map(|s| s.to_string()).collect();
            }
            LineKind::UiName => {
                component.display_name = f[1].to_string();
            }
        }
    }

    if !component.has_display_name() {
        tracing::warn!(component = %name, "component has no ui_name");
    }

    tracing::debug!(
        component = %name,
        body_fields = component.body_fields.len(),
        stub_fields = component.stub_fields.len(),
        dependencies = component.dependencies.len(),
        "built component"
    );

    Ok(component)
}

fn check_field_count(file: &str, line: &Line<'_>, kind: LineKind) -> SchemaResult<()> {
    let found = line.fields.len();
    if found < kind.min_fields() {
        return Err(SchemaError::MalformedLine {
            file: file.to_string(),
            line_number: line.number,
            kind: kind.tag().to_string(),
            expected: kind.min_fields(),
            found,
            line: line.text.to_string(),
        });
    }
    if found > kind.min_fields() && !matches!(kind, LineKind::Depends) {
        tracing::trace!(
            component = %file,
            line = line.number,
            extra = found - kind.min_fields(),
            "ignoring trailing fields"
        );
    }
    Ok(())
}

fn handle_unknown_line(file: &str, line: &Line<'_>, policy: UnknownLinePolicy) -> SchemaResult<()> {
    match policy {
        UnknownLinePolicy::Ignore => Ok(()),
        UnknownLinePolicy::Warn => {
            tracing::warn!(
                component = %file,
                line = line.number,
                kind = %line.kind(),
                "skipping line with unknown kind"
            );
            Ok(())
        }
        UnknownLinePolicy::Reject => Err(SchemaError::UnknownLineKind {
            file: file.to_string(),
            line_number: line.number,
            kind: line.kind().to_string(),
            line: line.text.to_string(),
        }),
    }
}
