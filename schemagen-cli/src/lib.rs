//! # schemagen-cli
//!
//! CLI library for generating entity-component and enum C++ sources from
//! definition files.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Definition file discovery
//! - [`generator`] - Build the schema set and render every output
//! - [`render`] - C++ source templates
//! - [`writer`] - File output, dry-run and staleness checks
//! - [`error`] - Error types and handling
//!
//! Parsing and validation live in the [`schemagen`] crate.

pub mod config;
pub mod error;
pub mod generator;
pub mod render;
pub mod scanner;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{CodeGenerator, GeneratedOutput, Selection};
pub use render::{GeneratedFile, OutputKind};
pub use scanner::{SourceFile, SourceScanner};
pub use writer::{FileStatus, FileWriter};
