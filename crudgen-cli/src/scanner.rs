//! Manifest scanner for discovering declaration manifests.
//!
//! This module recursively scans directories for files ending in the
//! configured manifest suffix, respecting `.gitignore` patterns and
//! custom filters. Files are visited in file-name order so that repeated
//! runs see declarations in the same order.

use crate::config::MANIFEST_SUFFIX;
use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered manifest with its content.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering declaration manifests.
#[derive(Debug)]
pub struct ManifestScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// File name suffix of manifests.
    suffix: String,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl ManifestScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: MANIFEST_SUFFIX.to_string(),
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Set the manifest file name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern for files.
    ///
    /// Only files whose path relative to the root matches are included.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Whether `path` names a manifest by its file name.
    pub fn is_manifest(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&self.suffix) && name.len() > self.suffix.len())
    }

    /// Scan the directory and return all discovered manifests.
    pub fn scan(&self) -> CliResult<Vec<ManifestFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || !self.is_manifest(path) {
                continue;
            }

            if let Some(ref pattern) = self.filter {
                let relative = self.relative_path(path);
                if !pattern.matches_path(&relative) {
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            tracing::debug!(path = %path.display(), "found manifest");
            files.push(ManifestFile {
                path: path.to_path_buf(),
                relative_path: self.relative_path(path),
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_manifests(self.root.clone(), self.suffix.clone()).into());
        }

        Ok(files)
    }

    /// Scan without failing on empty results.
    ///
    /// Returns an empty vector if no manifests are found.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<ManifestFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoManifests { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
