//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `schemagen.toml` files
//! and merging with command-line arguments. Directory settings are relative
//! to the project root passed on the command line.

use crate::error::{CliResult, ConfigError};
use schemagen::{BuildOptions, ComponentOptions, DuplicateFieldPolicy, UnknownLinePolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "schemagen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Definition file locations.
    pub input: InputConfig,

    /// Generated file locations.
    pub output: OutputConfig,

    /// Component file parsing.
    pub components: ComponentsConfig,
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding one file per component.
    pub component_dir: PathBuf,

    /// Directory holding one file per enum.
    pub enum_dir: PathBuf,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving component sources and the registry.
    pub component_dir: PathBuf,

    /// Directory receiving `enums.h` and `enums.cc`.
    pub enum_dir: PathBuf,
}

/// Component parsing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Field delimiter; must be a single character.
    pub delimiter: String,

    /// Body field type that receives a wire id.
    pub wire_filter_type: String,

    /// Handling of unrecognised line kinds.
    pub unknown_lines: UnknownLinePolicy,

    /// Handling of repeated body field names.
    pub duplicate_fields: DuplicateFieldPolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            component_dir: PathBuf::from("gen/comp"),
            enum_dir: PathBuf::from("gen/enum"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            component_dir: PathBuf::from("src/component"),
            enum_dir: PathBuf::from("src/enums"),
        }
    }
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            wire_filter_type: schemagen::schema_set::DEFAULT_WIRE_FILTER_TYPE.to_string(),
            unknown_lines: UnknownLinePolicy::default(),
            duplicate_fields: DuplicateFieldPolicy::default(),
        }
    }
}

impl Config {
    /// Turn the component settings into builder options.
    pub fn build_options(&self) -> CliResult<BuildOptions> {
        let mut chars = self.components.delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(ConfigError::invalid_value(
                    "components.delimiter",
                    format!(
                        "expected a single character, got {:?}",
                        self.components.delimiter
                    ),
                )
                .into())
            }
        };

        if self.components.wire_filter_type.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "components.wire_filter_type",
                "must not be empty",
            )
            .into());
        }

        Ok(BuildOptions {
            components: ComponentOptions {
                delimiter,
                unknown_lines: self.components.unknown_lines,
                duplicate_fields: self.components.duplicate_fields,
            },
            wire_filter_type: self.components.wire_filter_type.clone(),
        })
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load `schemagen.toml` under `root`.
    /// If no config file exists there, returns default configuration. An
    /// explicitly given path must exist.
    pub fn load(root: &Path, path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::not_found(path.to_path_buf()).into());
                }
                path.to_path_buf()
            }
            None => root.join(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        tracing::debug!(path = %config_path.display(), "loaded config");

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref dir) = args.component_dir {
            config.input.component_dir = dir.clone();
        }

        if let Some(ref dir) = args.enum_dir {
            config.input.enum_dir = dir.clone();
        }

        if let Some(ref dir) = args.component_output {
            config.output.component_dir = dir.clone();
        }

        if let Some(ref dir) = args.enum_output {
            config.output.enum_dir = dir.clone();
        }

        if let Some(ref ty) = args.wire_filter_type {
            config.components.wire_filter_type = ty.clone();
        }

        if args.strict {
            config.components.unknown_lines = UnknownLinePolicy::Reject;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# schemagen configuration file
# Paths are relative to the project root.

[input]
# Directory with one definition file per component
component_dir = "gen/comp"

# Directory with one definition file per enum
enum_dir = "gen/enum"

[output]
# Output directory for component headers, sources and the registry
component_dir = "src/component"

# Output directory for enums.h and enums.cc
enum_dir = "src/enums"

[components]
# Field delimiter in component files (single character)
delimiter = ","

# Body field type that receives a run-wide unique wire id
wire_filter_type = "wire_filter_ptr"

# Lines with an unknown kind tag: ignore, warn or reject
unknown_lines = "warn"

# Repeated body field names in one component: reject or alias
duplicate_fields = "reject"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Component definition directory override.
    pub component_dir: Option<PathBuf>,

    /// Enum definition directory override.
    pub enum_dir: Option<PathBuf>,

    /// Component output directory override.
    pub component_output: Option<PathBuf>,

    /// Enum output directory override.
    pub enum_output: Option<PathBuf>,

    /// Wire filter type override.
    pub wire_filter_type: Option<String>,

    /// Reject unknown line kinds.
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.component_dir, PathBuf::from("gen/comp"));
        assert_eq!(config.input.enum_dir, PathBuf::from("gen/enum"));
        assert_eq!(config.output.component_dir, PathBuf::from("src/component"));
        assert_eq!(config.output.enum_dir, PathBuf::from("src/enums"));
        assert_eq!(config.components.delimiter, ",");
        assert_eq!(config.components.wire_filter_type, "wire_filter_ptr");
        assert_eq!(config.components.unknown_lines, UnknownLinePolicy::Warn);
        assert_eq!(config.components.duplicate_fields, DuplicateFieldPolicy::Reject);
    }

    #[test]
    fn test_merge_cli_args_output() {
        let config = Config::default();
        let args = CliArgs {
            component_output: Some(PathBuf::from("out/comp")),
            strict: true,
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.output.component_dir, PathBuf::from("out/comp"));
        assert_eq!(merged.components.unknown_lines, UnknownLinePolicy::Reject);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let args = CliArgs::default();

        let merged = ConfigManager::merge_cli_args(config.clone(), &args);
        assert_eq!(merged.input.component_dir, config.input.component_dir);
        assert_eq!(merged.output.enum_dir, config.output.enum_dir);
        assert_eq!(merged.components.unknown_lines, config.components.unknown_lines);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[input]
component_dir = "defs/comp"

[output]
enum_dir = "generated/enums"

[components]
delimiter = ";"
wire_filter_type = "filter_handle"
unknown_lines = "reject"
duplicate_fields = "alias"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.component_dir, PathBuf::from("defs/comp"));
        assert_eq!(config.input.enum_dir, PathBuf::from("gen/enum"));
        assert_eq!(config.output.enum_dir, PathBuf::from("generated/enums"));
        assert_eq!(config.components.unknown_lines, UnknownLinePolicy::Reject);
        assert_eq!(config.components.duplicate_fields, DuplicateFieldPolicy::Alias);

        let options = config.build_options().unwrap();
        assert_eq!(options.components.delimiter, ';');
        assert_eq!(options.wire_filter_type, "filter_handle");
    }

    #[test]
    fn test_unknown_policy_value_rejected() {
        let toml = r#"
[components]
unknown_lines = "shout"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        let mut config = Config::default();
        config.components.delimiter = "::".to_string();

        let err = config.build_options().unwrap_err();
        assert!(err.to_string().contains("components.delimiter"));

        config.components.delimiter = String::new();
        assert!(config.build_options().is_err());
    }

    #[test]
    fn test_empty_wire_filter_type_rejected() {
        let mut config = Config::default();
        config.components.wire_filter_type = " ".to_string();
        assert!(config.build_options().is_err());
    }
}
