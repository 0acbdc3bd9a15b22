//! # crudgen-cli
//!
//! CLI library for generating CRUD scaffolding sources from declaration
//! manifests.
//!
//! This crate provides the host side of the `crudgen` tool: it discovers
//! manifests, turns them into directives for the generation engine, writes
//! emitted artifacts to disk and prints diagnostics.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Manifest discovery and filtering
//! - [`manifest`] - Manifest parsing into generation directives
//! - [`generator`] - One generation or check run over an input directory
//! - [`writer`] - File output, dry-run support and the file emission sink
//! - [`reporter`] - Console diagnostics
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod reporter;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::ProjectGenerator;
pub use manifest::{ManifestCatalog, ManifestParser};
pub use reporter::ConsoleReporter;
pub use scanner::{ManifestFile, ManifestScanner};
pub use watcher::FileWatcher;
pub use writer::{FileSink, FileWriter};
