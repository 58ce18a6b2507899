//! # schemagen
//!
//! Schema parsing and model construction for the entity-component code
//! generator.
//!
//! Two kinds of line-oriented definition files are turned into validated,
//! cross-referenced models ready for rendering:
//!
//! - component files become [`Component`]s (body fields chained by
//!   predecessor, stub fields, dependencies, display name), linked by
//!   [`link_fields`] which also assigns run-wide [`WireId`]s;
//! - enum files become [`EnumSpec`]s with monotonic values and
//!   descriptions.
//!
//! ## Architecture
//!
//! - [`tokenizer`] - Line splitting
//! - [`component`] - Component model and builder
//! - [`link`] - Stub linking and wire id assignment
//! - [`enum_spec`] - Enum model and builder
//! - [`schema_set`] - Whole-run driver over the builders
//! - [`error`] - Error types

pub mod component;
pub mod enum_spec;
pub mod error;
pub mod link;
pub mod schema_set;
pub mod tokenizer;

pub use component::{
    build_component, BodyField, Component, ComponentOptions, DuplicateFieldPolicy, StubField,
    UnknownLinePolicy, WireId,
};
pub use enum_spec::{build_enum, EnumSpec, EnumSymbol};
pub use error::{SchemaError, SchemaResult};
pub use link::link_fields;
pub use schema_set::{BuildOptions, SchemaSet, SchemaSource};
