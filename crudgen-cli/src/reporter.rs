//! Console diagnostic reporter.

use colored::Colorize;
use crudgen_core::{Diagnostic, DiagnosticReporter, Severity};

/// Prints diagnostics to stderr as they arrive and keeps them for the
/// end-of-run summary.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    diagnostics: Vec<Diagnostic>,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect without printing.
    pub fn quiet() -> Self {
        Self {
            diagnostics: Vec::new(),
            quiet: true,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

/// One-line console form of a diagnostic.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let label = match diagnostic.severity {
        Severity::Error => "error:".red().bold(),
        Severity::Warning => "warning:".yellow().bold(),
        Severity::Note => "note:".cyan(),
    };
    format!(
        "{} {}\n  {} {}",
        label,
        diagnostic.message,
        "-->".dimmed(),
        diagnostic.location
    )
}

impl DiagnosticReporter for ConsoleReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        if !self.quiet {
            eprintln!("{}", format_diagnostic(&diagnostic));
        }
        self.diagnostics.push(diagnostic);
    }
}
