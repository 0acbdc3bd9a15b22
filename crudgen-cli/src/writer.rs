//! File writer for outputting generated sources.
//!
//! This module handles writing rendered artifacts to disk, with support
//! for dry-run mode, and provides the file-system [`EmissionSink`] the
//! generation driver emits into.

use crate::error::{CliError, CliResult, WriteError};
use crudgen_core::ir::GeneratedArtifact;
use crudgen_core::render::{output_path, ArtifactRenderer, OutputFormat, RenderConfig};
use crudgen_core::{EmissionSink, EmitError, RenderError};
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
    /// File already held the same content.
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

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,

    /// Whether an existing file with different content may be replaced.
    overwrite: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            overwrite: true,
        }
    }

    /// Set whether existing files may be replaced.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if path.exists() {
            let existing = std::fs::read_to_string(path).ok();
            if existing.as_deref() == Some(content) {
                return Ok(WriteResult::Unchanged {
                    path: path.to_path_buf(),
                });
            }
            if !self.overwrite {
                return Err(WriteError::Exists {
                    path: path.to_path_buf(),
                }
                .into());
            }
        }

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

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
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

    /// Check if the write touched the disk.
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

/// A rendered artifact and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Maps artifacts to files under an output root.
pub struct OutputLayout {
    root: PathBuf,
    renderer: Box<dyn ArtifactRenderer>,
    config: RenderConfig,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, format: OutputFormat, config: RenderConfig) -> Self {
        Self {
            root: root.into(),
            renderer: format.renderer(),
            config,
        }
    }

    /// Render `artifact` and compute its path.
    pub fn render(&self, artifact: &GeneratedArtifact) -> Result<RenderedFile, RenderError> {
        let path = self
            .root
            .join(output_path(artifact, self.renderer.file_extension())?);
        let content = self.renderer.render(artifact, &self.config)?;
        Ok(RenderedFile { path, content })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Emission sink writing rendered artifacts to disk.
pub struct FileSink {
    layout: OutputLayout,
    writer: FileWriter,
    results: Vec<WriteResult>,
}

impl FileSink {
    pub fn new(layout: OutputLayout, writer: FileWriter) -> Self {
        Self {
            layout,
            writer,
            results: Vec::new(),
        }
    }

    /// Results of every successful emission, in order.
    pub fn results(&self) -> &[WriteResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<WriteResult> {
        self.results
    }
}

impl EmissionSink for FileSink {
    fn emit(&mut self, artifact: &GeneratedArtifact) -> Result<(), EmitError> {
        let target = artifact.qualified_name();
        let file = self
            .layout
            .render(artifact)
            .map_err(|err| EmitError::rejected(target.as_str(), err.to_string()))?;

        match self.writer.write(&file.path, &file.content) {
            Ok(result) => {
                tracing::debug!(target_name = %target, path = %result.path().display(), "emitted artifact");
                self.results.push(result);
                Ok(())
            }
            Err(CliError::Write(WriteError::Exists { path })) => {
                Err(EmitError::conflict(target, path.display().to_string()))
            }
            Err(err) => Err(EmitError::io(target, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudgen_core::ir::{
        AnnotatedDeclaration, ArtifactCategory, DirectiveKind, GenerationDirective,
    };
    use crudgen_core::ArtifactComposer;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn mapper() -> GeneratedArtifact {
        let order = Arc::new(AnnotatedDeclaration::class("shop", "Order"));
        ArtifactComposer::new()
            .compose(&GenerationDirective::new(DirectiveKind::Mapper, order))
            .unwrap()
    }

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Order.java");
        let content = "public class Order {}\n";

        let writer = FileWriter::new(false);
        let result = writer.write(&path, content).unwrap();

        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop/mapper/OrderMapper.java");

        let writer = FileWriter::new(false);
        let result = writer.write(&path, "interface OrderMapper {}").unwrap();

        assert!(result.was_written());
        assert!(path.exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Order.java");

        let writer = FileWriter::new(true);
        let result = writer.write(&path, "class Order {}").unwrap();

        assert!(!path.exists());
        assert!(writer.is_dry_run());
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, "class Order {}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_same_content_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Order.java");
        std::fs::write(&path, "class Order {}").unwrap();

        let writer = FileWriter::new(false).with_overwrite(false);
        let result = writer.write(&path, "class Order {}").unwrap();

        assert!(matches!(result, WriteResult::Unchanged { .. }));
        assert_eq!(result.bytes(), 0);
    }

    #[test]
    fn test_differing_content_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Order.java");
        std::fs::write(&path, "hand written").unwrap();

        let writer = FileWriter::new(false).with_overwrite(false);
        let err = writer.write(&path, "class Order {}").unwrap_err();

        assert!(matches!(err, CliError::Write(WriteError::Exists { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hand written");
    }

    #[test]
    fn test_file_sink_writes_under_namespace() {
        let dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(dir.path(), OutputFormat::Java, RenderConfig::default());
        let mut sink = FileSink::new(layout, FileWriter::new(false));

        sink.emit(&mapper()).unwrap();

        let path = dir.path().join("shop").join("OrderMapper.java");
        assert_eq!(sink.results()[0].path(), path.as_path());
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("public interface OrderMapper extends BaseMapper<Order>"));
    }

    #[test]
    fn test_file_sink_reports_conflict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop").join("OrderMapper.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{}").unwrap();

        let layout = OutputLayout::new(dir.path(), OutputFormat::Json, RenderConfig::default());
        let mut sink = FileSink::new(layout, FileWriter::new(false).with_overwrite(false));

        let err = sink.emit(&mapper()).unwrap_err();

        assert!(matches!(err, EmitError::Conflict { .. }));
        assert_eq!(err.target(), "shop.OrderMapper");
        assert!(sink.results().is_empty());
    }

    #[test]
    fn test_file_sink_rejects_namespace_outside_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("generated");
        let outside = dir.path().join("evil");
        let namespace = format!("x.{}", outside.display());
        let artifact = GeneratedArtifact::new(
            namespace.as_str(),
            "OrderMapper",
            ArtifactCategory::Interface,
            vec![],
            vec![],
        );

        let layout = OutputLayout::new(&root, OutputFormat::Java, RenderConfig::default());
        let mut sink = FileSink::new(layout, FileWriter::new(false));

        let err = sink.emit(&artifact).unwrap_err();

        assert!(matches!(err, EmitError::Rejected { .. }));
        assert_eq!(err.target(), format!("{}.OrderMapper", namespace));
        assert!(sink.results().is_empty());
        assert!(!outside.exists());
        assert!(!root.exists());
    }
}
