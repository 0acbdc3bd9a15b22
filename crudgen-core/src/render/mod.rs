//! Artifact rendering.
//!
//! Renderers turn a [`GeneratedArtifact`] into source text. The composer
//! never decides spelling; that is the renderer's job.
//!
//! # Components
//!
//! - [`JavaRenderer`] - Java-flavoured source with imports
//! - [`JsonRenderer`] - the artifact model as pretty-printed JSON

pub mod java;
pub mod json;

pub use java::JavaRenderer;
pub use json::JsonRenderer;

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::ir::GeneratedArtifact;

/// Trait for artifact renderers.
///
/// Implement this trait to add an output format.
pub trait ArtifactRenderer: Send + Sync {
    /// Short lowercase identifier, e.g. `"java"`.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Extension of the files this renderer produces.
    fn file_extension(&self) -> &'static str;

    /// Render one artifact.
    fn render(
        &self,
        artifact: &GeneratedArtifact,
        config: &RenderConfig,
    ) -> Result<String, RenderError>;
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Indentation style.
    pub indent: IndentStyle,

    /// Whether to render doc comments.
    pub generate_docs: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            generate_docs: true,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }
}

/// Indentation style for rendered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Two spaces.
    Spaces2,

    /// Four spaces.
    #[default]
    Spaces4,

    /// Tabs.
    Tabs,
}

impl IndentStyle {
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Indentation for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Java,
    Json,
}

impl OutputFormat {
    /// The renderer for this format.
    pub fn renderer(self) -> Box<dyn ArtifactRenderer> {
        match self {
            OutputFormat::Java => Box::new(JavaRenderer::new()),
            OutputFormat::Json => Box::new(JsonRenderer::new()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Java => "java",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(OutputFormat::Java),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}', expected java or json", other)),
        }
    }
}

/// Relative path an artifact is written to: one directory per namespace
/// segment, then `Name.<extension>`.
///
/// Every segment and the artifact name must be a single plain path
/// component, so the result always stays below the output root.
pub fn output_path(
    artifact: &GeneratedArtifact,
    extension: &str,
) -> Result<PathBuf, RenderError> {
    let mut path = PathBuf::new();
    for segment in artifact.namespace().split('.').filter(|s| !s.is_empty()) {
        check_component(artifact, "namespace segment", segment)?;
        path.push(segment);
    }
    check_component(artifact, "name", artifact.name())?;
    path.push(format!("{}.{}", artifact.name(), extension));
    Ok(path)
}

fn check_component(
    artifact: &GeneratedArtifact,
    what: &str,
    text: &str,
) -> Result<(), RenderError> {
    let mut components = Path::new(text).components();
    let plain = !text.contains(['/', '\\', ':'])
        && matches!(components.next(), Some(Component::Normal(part)) if part == text)
        && components.next().is_none();
    if plain {
        Ok(())
    } else {
        Err(RenderError::new(
            artifact.qualified_name(),
            format!("{} '{}' is not a plain path component", what, text),
        ))
    }
}
