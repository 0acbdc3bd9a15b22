//! Project-level generation.
//!
//! Ties manifest discovery, the generation driver and the file sink
//! together. Every call starts a fresh driver, so each run has its own
//! emission ledger.

use crate::config::Config;
use crate::error::{CliResult, ManifestError};
use crate::manifest::{ManifestCatalog, ManifestParser};
use crate::scanner::ManifestScanner;
use crate::writer::{FileSink, FileWriter, OutputLayout, WriteResult};
use crudgen_core::driver::MemorySink;
use crudgen_core::{DiagnosticReporter, GenerationDriver, RoundSummary};
use std::path::{Path, PathBuf};

/// Directives loaded from an input directory.
#[derive(Debug, Default)]
pub struct LoadedManifests {
    /// Number of manifest files found.
    pub files: usize,

    /// Directives from the manifests that parsed cleanly.
    pub catalog: ManifestCatalog,

    /// Manifests that were skipped.
    pub errors: Vec<ManifestError>,
}

/// Result of a generation run.
#[derive(Debug)]
pub struct GenerationOutput {
    pub manifests: LoadedManifests,
    pub summary: RoundSummary,
    pub results: Vec<WriteResult>,
}

/// Result of an up-to-date check.
#[derive(Debug)]
pub struct CheckOutput {
    pub manifests: LoadedManifests,
    pub summary: RoundSummary,

    /// Files that would be generated.
    pub expected: Vec<PathBuf>,

    /// Expected files that do not exist.
    pub missing: Vec<PathBuf>,

    /// Expected files whose content differs.
    pub stale: Vec<PathBuf>,
}

impl CheckOutput {
    pub fn is_up_to_date(&self) -> bool {
        self.missing.is_empty() && self.stale.is_empty()
    }
}

/// Runs generation for one input directory.
pub struct ProjectGenerator {
    config: Config,
}

impl ProjectGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover and parse manifests under `input`.
    pub fn load(&self, input: &Path, filter: Option<&str>) -> CliResult<LoadedManifests> {
        let mut scanner = ManifestScanner::new(input)
            .with_suffix(self.config.scan.manifest_suffix.clone())
            .with_gitignore(self.config.scan.respect_gitignore);
        if let Some(pattern) = filter {
            scanner = scanner.with_filter(pattern)?;
        }

        let files = scanner.scan_allow_empty()?;
        let (catalog, errors) = ManifestParser::new().parse_files(&files);

        Ok(LoadedManifests {
            files: files.len(),
            catalog,
            errors,
        })
    }

    fn layout(&self) -> OutputLayout {
        OutputLayout::new(
            self.config.output.dir.clone(),
            self.config.output.format,
            self.config.render_config(),
        )
    }

    /// Generate every artifact the manifests ask for and write them out.
    pub fn generate<R>(
        &self,
        input: &Path,
        filter: Option<&str>,
        dry_run: bool,
        reporter: &mut R,
    ) -> CliResult<GenerationOutput>
    where
        R: DiagnosticReporter + ?Sized,
    {
        let manifests = self.load(input, filter)?;

        let writer = FileWriter::new(dry_run).with_overwrite(self.config.output.overwrite);
        let mut sink = FileSink::new(self.layout(), writer);
        let summary = GenerationDriver::new().run_round(&manifests.catalog, &mut sink, reporter);

        Ok(GenerationOutput {
            manifests,
            summary,
            results: sink.into_results(),
        })
    }

    /// Generate in memory and compare against the files on disk.
    pub fn check<R>(
        &self,
        input: &Path,
        filter: Option<&str>,
        reporter: &mut R,
    ) -> CliResult<CheckOutput>
    where
        R: DiagnosticReporter + ?Sized,
    {
        let manifests = self.load(input, filter)?;

        let mut sink = MemorySink::new();
        let summary = GenerationDriver::new().run_round(&manifests.catalog, &mut sink, reporter);

        let layout = self.layout();
        let mut output = CheckOutput {
            manifests,
            summary,
            expected: Vec::new(),
            missing: Vec::new(),
            stale: Vec::new(),
        };

        for artifact in sink.artifacts() {
            let file = match layout.render(artifact) {
                Ok(file) => file,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to render artifact");
                    continue;
                }
            };

            match std::fs::read_to_string(&file.path) {
                Ok(existing) if existing == file.content => {}
                Ok(_) => output.stale.push(file.path.clone()),
                Err(_) => output.missing.push(file.path.clone()),
            }
            output.expected.push(file.path);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::ConsoleReporter;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[[declaration]]
name = "Order"
namespace = "shop"
directives = [{ kind = "mapper" }, { kind = "repository" }]
"#;

    fn project() -> (TempDir, ProjectGenerator) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("decl")).unwrap();
        std::fs::write(dir.path().join("decl/shop.crudgen.toml"), MANIFEST).unwrap();

        let mut config = Config::default();
        config.output.dir = dir.path().join("out");
        (dir, ProjectGenerator::new(config))
    }

    #[test]
    fn test_generate_then_check() {
        let (dir, generator) = project();
        let input = dir.path().join("decl");
        let mut reporter = ConsoleReporter::quiet();

        let before = generator.check(&input, None, &mut reporter).unwrap();
        assert_eq!(before.missing.len(), 2);
        assert!(!before.is_up_to_date());

        let output = generator.generate(&input, None, false, &mut reporter).unwrap();
        assert_eq!(output.summary.emitted, 2);
        assert_eq!(output.manifests.files, 1);
        assert!(output.results.iter().all(|r| r.was_written()));

        let after = generator.check(&input, None, &mut reporter).unwrap();
        assert!(after.is_up_to_date());
        assert_eq!(after.expected.len(), 2);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_check_detects_stale_file() {
        let (dir, generator) = project();
        let input = dir.path().join("decl");
        let mut reporter = ConsoleReporter::quiet();
        generator.generate(&input, None, false, &mut reporter).unwrap();

        let mapper = dir.path().join("out/shop/OrderMapper.java");
        std::fs::write(&mapper, "// edited\n").unwrap();

        let check = generator.check(&input, None, &mut reporter).unwrap();
        assert_eq!(check.stale, vec![mapper]);
        assert!(check.missing.is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (dir, generator) = project();
        let input = dir.path().join("decl");
        let mut reporter = ConsoleReporter::quiet();

        let output = generator.generate(&input, None, true, &mut reporter).unwrap();

        assert_eq!(output.results.len(), 2);
        assert!(output
            .results
            .iter()
            .all(|r| matches!(r, WriteResult::DryRun { .. })));
        assert!(!dir.path().join("out").exists());
    }
}
