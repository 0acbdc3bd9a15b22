//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `crudgen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use crudgen_core::render::{IndentStyle, OutputFormat, RenderConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "crudgen.toml";

/// Default suffix of declaration manifests.
pub const MANIFEST_SUFFIX: &str = ".crudgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Manifest discovery.
    pub scan: ScanConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory of emitted sources.
    pub dir: PathBuf,

    /// Rendering format.
    pub format: OutputFormat,

    /// Whether an existing file with different content may be replaced.
    pub overwrite: bool,

    /// Indentation of rendered sources.
    pub indent: IndentStyle,

    /// Whether to render doc comments.
    pub generate_docs: bool,
}

/// Manifest discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File name suffix identifying declaration manifests.
    pub manifest_suffix: String,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            format: OutputFormat::Java,
            overwrite: true,
            indent: IndentStyle::Spaces4,
            generate_docs: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            manifest_suffix: MANIFEST_SUFFIX.to_string(),
            respect_gitignore: true,
        }
    }
}

impl Config {
    /// Rendering options derived from the output section.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new()
            .with_indent(self.output.indent)
            .with_generate_docs(self.output.generate_docs)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.manifest_suffix.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "scan.manifest_suffix",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;
        config.validate()?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(format) = args.format {
            config.output.format = format;
        }

        if let Some(overwrite) = args.overwrite {
            config.output.overwrite = overwrite;
        }

        if let Some(generate_docs) = args.generate_docs {
            config.output.generate_docs = generate_docs;
        }

        if let Some(respect_gitignore) = args.respect_gitignore {
            config.scan.respect_gitignore = respect_gitignore;
        }

        config
    }

    /// Get default configuration.
    pub fn default_config() -> Config {
        Config::default()
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# crudgen configuration file

[output]
# Root directory of generated sources
dir = "./generated"

# Output format: "java" or "json"
format = "java"

# Replace existing files whose content differs.
# When false, such a file is reported as a write conflict for its declaration.
overwrite = true

# Indentation: "spaces2", "spaces4" or "tabs"
indent = "spaces4"

# Render doc comments on generated members
generate_docs = true

[scan]
# Files ending in this suffix are read as declaration manifests
manifest_suffix = ".crudgen.toml"

# Skip files excluded by .gitignore
respect_gitignore = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output format override.
    pub format: Option<OutputFormat>,

    /// Overwrite override.
    pub overwrite: Option<bool>,

    /// Generate docs override.
    pub generate_docs: Option<bool>,

    /// Gitignore override.
    pub respect_gitignore: Option<bool>,
}
