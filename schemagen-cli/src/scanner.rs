//! Definition file scanner.
//!
//! Every regular file directly inside a definition directory is one schema,
//! named after the file. Hidden files are skipped. Results are sorted by
//! name so that wire ids come out the same on every run.

use crate::error::{CliResult, ScanError};
use glob::MatchOptions;
use std::path::{Path, PathBuf};

/// A discovered definition file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, used as the schema name.
    pub name: String,

    /// Full path to the file.
    pub path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for one definition directory.
#[derive(Debug)]
pub struct SourceScanner {
    /// Directory to scan.
    root: PathBuf,
}

impl SourceScanner {
    /// Create a new scanner for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scan the directory and return all definition files, sorted by name.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let root = self.root.to_str().ok_or_else(|| ScanError::InvalidFileName {
            path: self.root.clone(),
        })?;
        let pattern = format!("{}/*", glob::Pattern::escape(root));

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let paths = glob::glob_with(&pattern, options)
            .map_err(|e| ScanError::invalid_pattern(pattern.clone(), e.to_string()))?;

        let mut files = Vec::new();

        for entry in paths {
            let path = entry.map_err(ScanError::Walk)?;

            if !path.is_file() {
                continue;
            }

            let name = file_name(&path)?;

            let content = std::fs::read_to_string(&path).map_err(|e| ScanError::Io {
                path: path.clone(),
                source: e,
            })?;

            files.push(SourceFile {
                name,
                path,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_files(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            dir = %self.root.display(),
            files = files.len(),
            "scanned definition directory"
        );

        Ok(files)
    }

    /// Scan without failing on empty results.
    ///
    /// Returns an empty vector if no files are found.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<SourceFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoFiles { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Get the directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn file_name(path: &Path) -> Result<String, ScanError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ScanError::InvalidFileName {
            path: path.to_path_buf(),
        })
}
