//! Generation pipeline: scan definition directories, build the schema set,
//! render every output file.
//!
//! Nothing here touches the output directories; writing (or comparing) is
//! left to the caller so that a failure anywhere leaves disk untouched.

use crate::config::Config;
use crate::error::CliResult;
use crate::render::{self, GeneratedFile, OutputKind};
use crate::scanner::{SourceFile, SourceScanner};
use schemagen::{SchemaSet, SchemaSource};
use std::path::{Path, PathBuf};

/// Which generators to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Components,
    Enums,
}

impl Selection {
    pub fn components(self) -> bool {
        matches!(self, Selection::All | Selection::Components)
    }

    pub fn enums(self) -> bool {
        matches!(self, Selection::All | Selection::Enums)
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// The validated model the files were rendered from.
    pub set: SchemaSet,

    /// Rendered files, relative to their output directory.
    pub files: Vec<GeneratedFile>,
}

/// Drives one generation run for a project root.
pub struct CodeGenerator {
    root: PathBuf,
    config: Config,
}

impl CodeGenerator {
    /// Create a generator; configured directories are resolved against `root`.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the definition files of the selected generators.
    pub fn scan(&self, selection: Selection) -> CliResult<(Vec<SourceFile>, Vec<SourceFile>)> {
        let components = if selection.components() {
            SourceScanner::new(self.root.join(&self.config.input.component_dir))
                .scan_allow_empty()?
        } else {
            Vec::new()
        };

        let enums = if selection.enums() {
            SourceScanner::new(self.root.join(&self.config.input.enum_dir)).scan_allow_empty()?
        } else {
            Vec::new()
        };

        Ok((components, enums))
    }

    /// Scan and build the validated model.
    pub fn build(&self, selection: Selection) -> CliResult<SchemaSet> {
        let options = self.config.build_options()?;
        let (components, enums) = self.scan(selection)?;

        let set = SchemaSet::build(
            &to_sources(&components),
            &to_sources(&enums),
            &options,
        )?;

        tracing::info!(
            components = set.components.len(),
            enums = set.enums.len(),
            wire_ids = set.wire_id_count,
            "built schema set"
        );

        Ok(set)
    }

    /// Scan, build and render.
    pub fn generate(&self, selection: Selection) -> CliResult<GeneratedOutput> {
        let set = self.build(selection)?;

        let mut files = Vec::new();
        if selection.components() {
            files.extend(render::render_components(&set));
        }
        if selection.enums() {
            files.extend(render::render_enums(&set));
        }

        Ok(GeneratedOutput { set, files })
    }

    /// Absolute destination of a rendered file.
    pub fn output_path(&self, file: &GeneratedFile) -> PathBuf {
        let dir = match file.kind {
            OutputKind::Component => &self.config.output.component_dir,
            OutputKind::Enum => &self.config.output.enum_dir,
        };
        self.root.join(dir).join(&file.relative_path)
    }

    /// Pair every rendered file with its destination.
    pub fn resolve<'a>(&self, output: &'a GeneratedOutput) -> Vec<(PathBuf, &'a str)> {
        output
            .files
            .iter()
            .map(|file| (self.output_path(file), file.content.as_str()))
            .collect()
    }
}

fn to_sources(files: &[SourceFile]) -> Vec<SchemaSource> {
    files
        .iter()
        .map(|f| SchemaSource::new(f.name.clone(), f.content.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use schemagen::SchemaError;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let comp = dir.path().join("gen/comp");
        let enums = dir.path().join("gen/enum");
        fs::create_dir_all(&comp).unwrap();
        fs::create_dir_all(&enums).unwrap();

        fs::write(comp.join("light"), "ui_name,Light\nbody,wire_filter_ptr,filter,{}\n").unwrap();
        fs::write(comp.join("door"), "ui_name,Door\nbody,wire_filter_ptr,filter,{}\n").unwrap();
        fs::write(enums.join("mode"), "off\non\n").unwrap();

        dir
    }

    #[test]
    fn test_generate_all() {
        let dir = project();
        let generator = CodeGenerator::new(dir.path(), Config::default());

        let output = generator.generate(Selection::All).unwrap();

        assert_eq!(output.set.components.len(), 2);
        assert_eq!(output.set.enums.len(), 1);
        // registry + ui + 2 per component + 2 enum files
        assert_eq!(output.files.len(), 8);

        // door sorts first so it takes wire id 0
        let door = output.set.component("door").unwrap();
        assert_eq!(door.body_fields[0].wire_id.map(|id| id.0), Some(0));
    }

    #[test]
    fn test_selection_skips_other_directory() {
        let dir = project();
        fs::remove_dir_all(dir.path().join("gen/comp")).unwrap();
        let generator = CodeGenerator::new(dir.path(), Config::default());

        let output = generator.generate(Selection::Enums).unwrap();

        assert!(output.set.components.is_empty());
        assert!(output.files.iter().all(|f| f.kind == OutputKind::Enum));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = project();
        fs::remove_dir_all(dir.path().join("gen/enum")).unwrap();
        let generator = CodeGenerator::new(dir.path(), Config::default());

        assert!(matches!(
            generator.generate(Selection::All),
            Err(CliError::Scan(_))
        ));
    }

    #[test]
    fn test_schema_error_propagates() {
        let dir = project();
        fs::write(dir.path().join("gen/enum/bad"), "a = 5\nb = 1\n").unwrap();
        let generator = CodeGenerator::new(dir.path(), Config::default());

        let err = generator.generate(Selection::All).unwrap_err();
        assert!(matches!(
            err,
            CliError::Schema(SchemaError::NonMonotonic { .. })
        ));
    }

    #[test]
    fn test_output_paths() {
        let dir = project();
        let generator = CodeGenerator::new(dir.path(), Config::default());
        let output = generator.generate(Selection::All).unwrap();

        let paths: Vec<_> = generator.resolve(&output).into_iter().map(|(p, _)| p).collect();

        assert!(paths.contains(&dir.path().join("src/component/door_component.h")));
        assert!(paths.contains(&dir.path().join("src/component/component_managers.h")));
        assert!(paths.contains(&dir.path().join("src/enums/enums.cc")));
    }
}
