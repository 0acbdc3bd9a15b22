//! Generation driver.
//!
//! The driver pulls directives from a [`DeclarationScanner`], composes each
//! into an artifact, claims its name in the [`EmissionLedger`] and hands the
//! winners to an [`EmissionSink`]. Every failure is local to one declaration:
//! it becomes a [`Diagnostic`] and the round moves on.
//!
//! Per declaration the driver walks these states:
//!
//! ```text
//! PerDeclaration -> Composing -> Claiming -> Emitting -> (next)
//!       |                            |           |
//!   wrong kind: report          lost claim:   sink failure: report
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::composer::ArtifactComposer;
use crate::error::EmitError;
use crate::ir::{AnnotatedDeclaration, DirectiveKind, GeneratedArtifact, GenerationDirective};
use crate::ledger::EmissionLedger;

/// Source of directives for one round.
pub trait DeclarationScanner {
    /// Every directive of `kind`, each paired with its declaration.
    ///
    /// The sequence is finite; its order carries no meaning for the driver.
    fn directives_for(&self, kind: DirectiveKind) -> Vec<GenerationDirective>;
}

/// Destination for finished artifacts.
pub trait EmissionSink {
    /// Persist `artifact`. Called at most once per claimed name.
    fn emit(&mut self, artifact: &GeneratedArtifact) -> Result<(), EmitError>;
}

/// Receiver for diagnostics. Fire-and-forget.
pub trait DiagnosticReporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// The declaration a diagnostic is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLocation {
    /// Qualified path of the declaration, e.g. `shop.Order.tags`.
    pub declaration: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl DiagnosticLocation {
    pub fn of(declaration: &AnnotatedDeclaration) -> Self {
        Self {
            declaration: declaration.path(),
            file: declaration.location.file.clone(),
            index: declaration.location.index,
        }
    }
}

impl fmt::Display for DiagnosticLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declaration)?;
        match (&self.file, self.index) {
            (Some(file), Some(index)) => write!(f, " ({}, declaration #{})", file.display(), index),
            (Some(file), None) => write!(f, " ({})", file.display()),
            _ => Ok(()),
        }
    }
}

/// A message about one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: DiagnosticLocation,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, declaration: &AnnotatedDeclaration) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: DiagnosticLocation::of(declaration),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.location)
    }
}

/// What happened to one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Handed to the sink.
    Emitted(String),
    /// Name already claimed earlier in the run.
    Suppressed(String),
    /// Wrong element kind.
    Rejected,
    /// The sink failed.
    Failed(String),
}

/// Counters for one `run_kind` or `run_round` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub emitted: usize,
    pub suppressed: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl RoundSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Emitted(_) => self.emitted += 1,
            Outcome::Suppressed(_) => self.suppressed += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    /// Add another summary's counters to this one.
    pub fn merge(&mut self, other: RoundSummary) {
        self.emitted += other.emitted;
        self.suppressed += other.suppressed;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }

    /// Whether any declaration was rejected or failed.
    pub fn has_errors(&self) -> bool {
        self.rejected > 0 || self.failed > 0
    }
}

/// Drives generation over scanner output.
///
/// One driver corresponds to one run: it owns the ledger, so every round on
/// the same driver shares duplicate suppression. Start a new driver (or
/// supply a fresh ledger) to regenerate from scratch.
#[derive(Debug, Default)]
pub struct GenerationDriver {
    composer: ArtifactComposer,
    ledger: Arc<EmissionLedger>,
}

impl GenerationDriver {
    /// Create a driver with an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver sharing an existing ledger.
    pub fn with_ledger(ledger: Arc<EmissionLedger>) -> Self {
        Self {
            composer: ArtifactComposer::new(),
            ledger,
        }
    }

    pub fn ledger(&self) -> &Arc<EmissionLedger> {
        &self.ledger
    }

    /// Process a single directive.
    pub fn process<K, R>(
        &self,
        directive: &GenerationDirective,
        sink: &mut K,
        reporter: &mut R,
    ) -> Outcome
    where
        K: EmissionSink + ?Sized,
        R: DiagnosticReporter + ?Sized,
    {
        let declaration = directive.declaration();

        let artifact = match self.composer.compose(directive) {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::warn!(
                    declaration = %declaration.path(),
                    directive = %directive.kind(),
                    error = %err,
                    "rejected declaration"
                );
                reporter.report(Diagnostic::error(err.to_string(), declaration));
                return Outcome::Rejected;
            }
        };

        let target = artifact.qualified_name();
        if !self.ledger.try_claim(&target) {
            tracing::debug!(target_name = %target, "already generated, skipping");
            return Outcome::Suppressed(target);
        }

        match sink.emit(&artifact) {
            Ok(()) => Outcome::Emitted(target),
            Err(err) => {
                tracing::warn!(
                    target_name = %target,
                    declaration = %declaration.path(),
                    error = %err,
                    "failed to emit artifact"
                );
                reporter.report(Diagnostic::error(
                    format!("Failed to write file for element: {}", err),
                    declaration,
                ));
                Outcome::Failed(target)
            }
        }
    }

    /// Process every directive of `kind` the scanner yields.
    pub fn run_kind<S, K, R>(
        &self,
        kind: DirectiveKind,
        scanner: &S,
        sink: &mut K,
        reporter: &mut R,
    ) -> RoundSummary
    where
        S: DeclarationScanner + ?Sized,
        K: EmissionSink + ?Sized,
        R: DiagnosticReporter + ?Sized,
    {
        let mut summary = RoundSummary::default();
        for directive in scanner.directives_for(kind) {
            let outcome = self.process(&directive, sink, reporter);
            summary.record(&outcome);
        }
        tracing::debug!(
            directive = %kind,
            emitted = summary.emitted,
            suppressed = summary.suppressed,
            rejected = summary.rejected,
            failed = summary.failed,
            "processed directive kind"
        );
        summary
    }

    /// Process all directive kinds, in [`DirectiveKind::ALL`] order.
    pub fn run_round<S, K, R>(&self, scanner: &S, sink: &mut K, reporter: &mut R) -> RoundSummary
    where
        S: DeclarationScanner + ?Sized,
        K: EmissionSink + ?Sized,
        R: DiagnosticReporter + ?Sized,
    {
        let mut summary = RoundSummary::default();
        for kind in DirectiveKind::ALL {
            summary.merge(self.run_kind(kind, scanner, sink, reporter));
        }
        tracing::info!(
            emitted = summary.emitted,
            suppressed = summary.suppressed,
            rejected = summary.rejected,
            failed = summary.failed,
            "generation round complete"
        );
        summary
    }
}

/// Scanner over a fixed list of directives.
impl DeclarationScanner for [GenerationDirective] {
    fn directives_for(&self, kind: DirectiveKind) -> Vec<GenerationDirective> {
        self.iter().filter(|d| d.kind() == kind).cloned().collect()
    }
}

impl DeclarationScanner for Vec<GenerationDirective> {
    fn directives_for(&self, kind: DirectiveKind) -> Vec<GenerationDirective> {
        self.as_slice().directives_for(kind)
    }
}

/// Sink keeping artifacts in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<GeneratedArtifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[GeneratedArtifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<GeneratedArtifact> {
        self.artifacts
    }
}

impl EmissionSink for MemorySink {
    fn emit(&mut self, artifact: &GeneratedArtifact) -> Result<(), EmitError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// Reporter keeping diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ElementKind, SourceLocation};

    fn order() -> Arc<AnnotatedDeclaration> {
        Arc::new(AnnotatedDeclaration::class("shop", "Order"))
    }

    /// Sink refusing one target name.
    struct RefusingSink {
        refuse: &'static str,
        inner: MemorySink,
    }

    impl EmissionSink for RefusingSink {
        fn emit(&mut self, artifact: &GeneratedArtifact) -> Result<(), EmitError> {
            if artifact.qualified_name() == self.refuse {
                return Err(EmitError::conflict(self.refuse, "out"));
            }
            self.inner.emit(artifact)
        }
    }

    #[test]
    fn test_run_kind_emits_matching_directives() {
        let directives = vec![
            GenerationDirective::new(DirectiveKind::Mapper, order()),
            GenerationDirective::new(DirectiveKind::Controller, order()),
        ];
        let driver = GenerationDriver::new();
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        let summary = driver.run_kind(DirectiveKind::Mapper, &directives, &mut sink, &mut reporter);

        assert_eq!(summary.emitted, 1);
        assert_eq!(sink.artifacts()[0].qualified_name(), "shop.OrderMapper");
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_duplicate_is_suppressed_silently() {
        let directives = vec![
            GenerationDirective::new(DirectiveKind::Mapper, order()),
            GenerationDirective::new(DirectiveKind::Mapper, order()),
        ];
        let driver = GenerationDriver::new();
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        let summary = driver.run_round(&directives, &mut sink, &mut reporter);

        assert_eq!(
            summary,
            RoundSummary {
                emitted: 1,
                suppressed: 1,
                rejected: 0,
                failed: 0
            }
        );
        assert_eq!(sink.artifacts().len(), 1);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_wrong_kind_reports_and_continues() {
        let field = Arc::new(
            AnnotatedDeclaration::field(order(), "customer", "shop.Customer".parse().unwrap())
                .with_location(SourceLocation {
                    file: Some(PathBuf::from("shop.crudgen.toml")),
                    index: Some(2),
                }),
        );
        let directives = vec![
            GenerationDirective::new(DirectiveKind::Controller, field),
            GenerationDirective::new(DirectiveKind::Controller, order()),
        ];
        let driver = GenerationDriver::new();
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        let summary = driver.run_round(&directives, &mut sink, &mut reporter);

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.emitted, 1);
        assert_eq!(sink.artifacts()[0].qualified_name(), "shop.OrderController");

        let diagnostic = &reporter.diagnostics()[0];
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.location.declaration, "shop.Order.customer");
        assert_eq!(
            diagnostic.location.to_string(),
            "shop.Order.customer (shop.crudgen.toml, declaration #2)"
        );
    }

    #[test]
    fn test_sink_failure_is_not_fatal_and_keeps_claim() {
        let customer = Arc::new(AnnotatedDeclaration::class("shop", "Customer"));
        let directives = vec![
            GenerationDirective::new(DirectiveKind::Mapper, order()),
            GenerationDirective::new(DirectiveKind::Mapper, customer),
        ];
        let driver = GenerationDriver::new();
        let mut sink = RefusingSink {
            refuse: "shop.OrderMapper",
            inner: MemorySink::new(),
        };
        let mut reporter = CollectingReporter::new();

        let summary = driver.run_round(&directives, &mut sink, &mut reporter);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.emitted, 1);
        assert!(driver.ledger().is_claimed("shop.OrderMapper"));
        assert!(reporter.has_errors());
        assert_eq!(reporter.diagnostics()[0].location.declaration, "shop.Order");

        // A later request in the same run is not retried.
        let again = [GenerationDirective::new(DirectiveKind::Mapper, order())];
        let outcome = driver.process(&again[0], &mut sink, &mut reporter);
        assert_eq!(outcome, Outcome::Suppressed("shop.OrderMapper".to_string()));
    }

    #[test]
    fn test_run_round_order() {
        let directives = vec![
            GenerationDirective::new(DirectiveKind::TypeHandler, order()),
            GenerationDirective::new(DirectiveKind::Controller, order()),
            GenerationDirective::new(DirectiveKind::Repository, order()),
            GenerationDirective::new(DirectiveKind::Mapper, order()),
        ];
        let driver = GenerationDriver::new();
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        driver.run_round(&directives, &mut sink, &mut reporter);

        let names: Vec<&str> = sink.artifacts().iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "OrderMapper",
                "OrderRepository",
                "OrderController",
                "OrderTypeHandler"
            ]
        );
    }

    #[test]
    fn test_shared_ledger_spans_drivers() {
        let ledger = Arc::new(EmissionLedger::new());
        let first = GenerationDriver::with_ledger(Arc::clone(&ledger));
        let second = GenerationDriver::with_ledger(Arc::clone(&ledger));
        let directive = GenerationDirective::new(DirectiveKind::Mapper, order());
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        assert!(matches!(
            first.process(&directive, &mut sink, &mut reporter),
            Outcome::Emitted(_)
        ));
        assert!(matches!(
            second.process(&directive, &mut sink, &mut reporter),
            Outcome::Suppressed(_)
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_method_declaration_rejected() {
        let method =
            Arc::new(AnnotatedDeclaration::class("shop", "total").with_kind(ElementKind::Method));
        let driver = GenerationDriver::new();
        let mut sink = MemorySink::new();
        let mut reporter = CollectingReporter::new();

        let outcome = driver.process(
            &GenerationDirective::new(DirectiveKind::TypeHandler, method),
            &mut sink,
            &mut reporter,
        );

        assert_eq!(outcome, Outcome::Rejected);
        assert!(reporter.diagnostics()[0]
            .message
            .contains("only applicable to a class or field"));
    }
}
