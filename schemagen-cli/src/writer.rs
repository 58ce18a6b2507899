//! File writer for generated sources.
//!
//! This module handles writing generated files to disk with support for
//! dry-run mode, and comparing them against what is already on disk for
//! `schemagen check`.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// File content already matched; nothing was written.
    Unchanged {
        /// Path to the file.
        path: PathBuf,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// State of a generated file relative to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    UpToDate,
    Stale,
    Missing,
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing. Files whose
    /// content is already identical are left alone so their mtime survives.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if compare(path, content)? == FileStatus::UpToDate {
            tracing::trace!(path = %path.display(), "unchanged");
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Write a fully rendered batch of files, stopping at the first failure.
    pub fn write_all<'a>(
        &self,
        files: impl IntoIterator<Item = (PathBuf, &'a str)>,
    ) -> CliResult<Vec<WriteResult>> {
        files
            .into_iter()
            .map(|(path, content)| self.write(&path, content))
            .collect()
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Compare rendered content with the file at `path`.
pub fn compare(path: &Path, content: &str) -> CliResult<FileStatus> {
    if !path.is_file() {
        return Ok(FileStatus::Missing);
    }

    let existing = std::fs::read_to_string(path)?;
    if existing == content {
        Ok(FileStatus::UpToDate)
    } else {
        Ok(FileStatus::Stale)
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::Unchanged { path } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the file was actually written.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 unless written).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::Unchanged { .. } | WriteResult::DryRun { .. } => 0,
        }
    }
}
