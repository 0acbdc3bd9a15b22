//! Error types for the CLI.
//!
//! This module defines all error types used throughout the CLI,
//! providing detailed error messages with context for debugging.

use std::path::PathBuf;

use crudgen_core::ir::TypeParseError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during manifest discovery.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error reading a declaration manifest.
    #[error("Failed to read manifest: {0}")]
    Manifest(#[from] ManifestError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Validation failed (generated sources out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during manifest discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No manifests found in directory.
    #[error("No manifests ending in '{suffix}' found in: {path}")]
    NoManifests { path: PathBuf, suffix: String },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error reading a declaration manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest is not valid TOML or does not match the manifest layout.
    #[error("Invalid manifest {file}: {message}")]
    InvalidToml { file: PathBuf, message: String },

    /// A type reference could not be parsed.
    #[error("Invalid type '{text}' for '{declaration}' in {file} (declaration #{index}): {source}")]
    InvalidType {
        file: PathBuf,
        index: usize,
        declaration: String,
        text: String,
        #[source]
        source: TypeParseError,
    },

    /// A directive names an unknown kind.
    #[error("Unknown directive on '{declaration}' in {file} (declaration #{index}): {message}")]
    UnknownKind {
        file: PathBuf,
        index: usize,
        declaration: String,
        message: String,
    },

    /// A field declaration without an enclosing declaration.
    #[error("Field '{declaration}' in {file} (declaration #{index}) has no enclosing declaration")]
    MissingEnclosing {
        file: PathBuf,
        index: usize,
        declaration: String,
    },

    /// Failed to read the manifest.
    #[error("Failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Multiple manifest errors collected.
    #[error("Multiple manifest errors:\n{}", format_errors(.0))]
    Multiple(Vec<ManifestError>),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing file differs and overwriting is disabled.
    #[error("Refusing to overwrite {path}")]
    Exists { path: PathBuf },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),

    /// Error from notify crate.
    #[error("Watch notification error: {0}")]
    Notify(String),
}

/// Format multiple errors for display.
fn format_errors(errors: &[ManifestError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ManifestError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(file: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            file,
            message: message.into(),
        }
    }

    /// The manifest this error belongs to, if it names one.
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            ManifestError::InvalidToml { file, .. }
            | ManifestError::InvalidType { file, .. }
            | ManifestError::UnknownKind { file, .. }
            | ManifestError::MissingEnclosing { file, .. }
            | ManifestError::Io { file, .. } => Some(file),
            ManifestError::Multiple(_) => None,
        }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no manifests error.
    pub fn no_manifests(path: PathBuf, suffix: impl Into<String>) -> Self {
        Self::NoManifests {
            path,
            suffix: suffix.into(),
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
