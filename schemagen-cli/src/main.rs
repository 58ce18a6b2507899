//! # schemagen
//!
//! CLI tool for generating entity-component and enum C++ sources from
//! definition files.
//!
//! ## Usage
//!
//! ```bash
//! # Generate everything under the current project
//! schemagen generate
//!
//! # Only regenerate enums.h / enums.cc
//! schemagen generate --only enums
//!
//! # Dry run to preview changes
//! schemagen generate --dry-run
//!
//! # Fail (exit code 2) when generated files are out of date
//! schemagen check
//!
//! # Print the validated model as JSON
//! schemagen inspect
//!
//! # Initialize configuration
//! schemagen init
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use schemagen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    generator::{CodeGenerator, Selection},
    writer::{self, FileStatus, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(author, version, about = "Generate entity-component and enum C++ sources from definition files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sources from the definition directories
    Generate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Only run one generator
        #[arg(long, value_enum)]
        only: Option<Only>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that generated sources are up-to-date
    Check {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Print the validated model as JSON
    Inspect {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Initialize a new schemagen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by every command that reads definitions.
#[derive(Args)]
struct ProjectArgs {
    /// Project root; configured directories are relative to it
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Component definition directory
    #[arg(long)]
    component_dir: Option<PathBuf>,

    /// Enum definition directory
    #[arg(long)]
    enum_dir: Option<PathBuf>,

    /// Output directory for component sources and the registry
    #[arg(long)]
    component_output: Option<PathBuf>,

    /// Output directory for enums.h and enums.cc
    #[arg(long)]
    enum_output: Option<PathBuf>,

    /// Body field type that receives a wire id
    #[arg(long)]
    wire_filter_type: Option<String>,

    /// Reject unknown line kinds instead of warning
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Only {
    Components,
    Enums,
}

fn selection(only: Option<Only>) -> Selection {
    match only {
        None => Selection::All,
        Some(Only::Components) => Selection::Components,
        Some(Only::Enums) => Selection::Enums,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            project,
            only,
            dry_run,
        } => cmd_generate(project, selection(only), dry_run),

        Commands::Check { project } => cmd_check(project),

        Commands::Inspect { project } => cmd_inspect(project),

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

impl ProjectArgs {
    fn overrides(&self) -> CliArgs {
        CliArgs {
            component_dir: self.component_dir.clone(),
            enum_dir: self.enum_dir.clone(),
            component_output: self.component_output.clone(),
            enum_output: self.enum_output.clone(),
            wire_filter_type: self.wire_filter_type.clone(),
            strict: self.strict,
        }
    }
}

/// Load and merge configuration for a project.
fn load_generator(project: ProjectArgs) -> Result<CodeGenerator, CliError> {
    let config = ConfigManager::load(&project.root, project.config.as_deref())?;
    let config: Config = ConfigManager::merge_cli_args(config, &project.overrides());

    Ok(CodeGenerator::new(project.root, config))
}

/// Generate command implementation.
fn cmd_generate(project: ProjectArgs, selection: Selection, dry_run: bool) -> Result<(), CliError> {
    let generator = load_generator(project)?;

    println!("{}", "Building schemas...".cyan());

    let output = generator.generate(selection)?;

    println!(
        "  {} component(s), {} enum(s), {} wire id(s)",
        output.set.components.len().to_string().green(),
        output.set.enums.len().to_string().green(),
        output.set.wire_id_count.to_string().green()
    );

    // Nothing is written until every file has rendered
    let writer = FileWriter::new(dry_run);
    let results = writer.write_all(generator.resolve(&output))?;

    let mut written = 0;
    for result in &results {
        match result {
            WriteResult::Written { path, bytes } => {
                written += 1;
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Unchanged { path } => {
                println!("{} {}", "unchanged".dimmed(), path.display());
            }
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    if !writer.is_dry_run() {
        println!(
            "  {} of {} file(s) updated",
            written.to_string().green(),
            results.len()
        );
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(project: ProjectArgs) -> Result<(), CliError> {
    let generator = load_generator(project)?;

    println!("{}", "Checking generated sources...".cyan());

    let output = generator.generate(Selection::All)?;

    let mut outdated = 0;
    for (path, content) in generator.resolve(&output) {
        match writer::compare(&path, content)? {
            FileStatus::UpToDate => {}
            FileStatus::Stale => {
                outdated += 1;
                println!("{} {} is out of date", "✗".red(), path.display());
            }
            FileStatus::Missing => {
                outdated += 1;
                println!("{} {} is missing", "✗".red(), path.display());
            }
        }
    }

    if outdated == 0 {
        println!("{} Generated sources are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("  Run 'schemagen generate' to update");
        Err(CliError::Validation(format!(
            "{} generated file(s) out of date",
            outdated
        )))
    }
}

/// Inspect command implementation.
fn cmd_inspect(project: ProjectArgs) -> Result<(), CliError> {
    let generator = load_generator(project)?;
    let set = generator.build(Selection::All)?;

    println!("{}", serde_json::to_string_pretty(&set)?);

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_only_enums() {
        let cli = Cli::try_parse_from(["schemagen", "generate", "--only", "enums", "--dry-run"])
            .unwrap();

        match cli.command {
            Commands::Generate { only, dry_run, .. } => {
                assert_eq!(selection(only), Selection::Enums);
                assert!(dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_generate_defaults_to_all() {
        let cli = Cli::try_parse_from(["schemagen", "generate"]).unwrap();

        match cli.command {
            Commands::Generate { only, project, .. } => {
                assert_eq!(selection(only), Selection::All);
                assert_eq!(project.root, PathBuf::from("."));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_unknown_only_value_rejected() {
        assert!(Cli::try_parse_from(["schemagen", "generate", "--only", "stubs"]).is_err());
    }

    #[test]
    fn test_output_overrides_reach_config() {
        let cli = Cli::try_parse_from([
            "schemagen",
            "check",
            "--component-output",
            "out/comp",
            "--enum-output",
            "out/enums",
            "--strict",
        ])
        .unwrap();

        let Commands::Check { project } = cli.command else {
            panic!("expected check");
        };
        let config = ConfigManager::merge_cli_args(Config::default(), &project.overrides());

        assert_eq!(config.output.component_dir, PathBuf::from("out/comp"));
        assert_eq!(config.output.enum_dir, PathBuf::from("out/enums"));
        assert_eq!(
            config.components.unknown_lines,
            schemagen::UnknownLinePolicy::Reject
        );
    }
}
