//! # crudgen
//!
//! CLI tool for generating CRUD scaffolding sources from declaration manifests.
//!
//! ## Usage
//!
//! ```bash
//! # Generate sources from manifests under the current directory
//! crudgen generate
//!
//! # Generate to a specific output directory, as JSON
//! crudgen generate --output ./generated --format json
//!
//! # Watch mode for development
//! crudgen generate --watch
//!
//! # Dry run to preview changes
//! crudgen generate --dry-run
//!
//! # Initialize configuration
//! crudgen init
//!
//! # Check that generated sources are up-to-date
//! crudgen check
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use crudgen_core::render::OutputFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crudgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::{CliError, ManifestError},
    generator::{LoadedManifests, ProjectGenerator},
    reporter::ConsoleReporter,
    watcher::FileWatcher,
    writer::WriteResult,
};

#[derive(Parser)]
#[command(name = "crudgen")]
#[command(author, version, about = "Generate CRUD scaffolding sources from declaration manifests", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sources from declaration manifests
    Generate {
        /// Input directory containing declaration manifests
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for generated sources
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (java or json)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Watch for manifest changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter manifests by relative path pattern (glob)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Initialize a new crudgen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "crudgen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check that generated sources are up-to-date
    Check {
        /// Input directory containing declaration manifests
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory holding generated sources
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter manifests by relative path pattern (glob)
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            format,
            watch,
            dry_run,
            config,
            filter,
        } => {
            let config = load_config(config.as_deref(), output, format)?;
            if watch {
                run_watch_mode(&input, config, filter.as_deref(), dry_run)
            } else {
                run_generate(&input, &ProjectGenerator::new(config), filter.as_deref(), dry_run)
            }
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Check {
            input,
            output,
            config,
            filter,
        } => {
            let config = load_config(config.as_deref(), output, None)?;
            cmd_check(&input, config, filter.as_deref())
        }
    }
}

/// Load the configuration file and apply command-line overrides.
fn load_config(
    path: Option<&Path>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<Config, CliError> {
    let config = ConfigManager::load(path)?;
    Ok(ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            output,
            format,
            ..Default::default()
        },
    ))
}

/// Print what happened while loading manifests. Returns false when there is
/// nothing to generate.
fn report_manifests(manifests: &LoadedManifests, suffix: &str) -> bool {
    if manifests.files == 0 {
        println!("{}", format!("No manifests ending in '{}' found.", suffix).yellow());
        return false;
    }
    println!("  Found {} manifest(s)", manifests.files.to_string().green());

    if !manifests.errors.is_empty() {
        println!(
            "{} {} manifest(s) skipped:",
            "Warning:".yellow(),
            manifests.errors.len()
        );
        for error in &manifests.errors {
            println!("  {}", format_manifest_error(error));
        }
    }

    if manifests.catalog.is_empty() {
        println!("{}", "No generation directives found.".yellow());
        return false;
    }
    println!(
        "  Found {} directive(s)",
        manifests.catalog.len().to_string().green()
    );
    true
}

/// Run generation once.
fn run_generate(
    input: &Path,
    generator: &ProjectGenerator,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    println!("{}", "Scanning for declaration manifests...".cyan());

    let mut reporter = ConsoleReporter::new();
    let output = generator.generate(input, filter, dry_run, &mut reporter)?;

    if !report_manifests(&output.manifests, &generator.config().scan.manifest_suffix) {
        return Ok(());
    }

    for result in &output.results {
        match result {
            WriteResult::Written { path, bytes } => {
                println!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
            }
            WriteResult::Unchanged { path } => {
                println!("{} Unchanged {}", "·".dimmed(), path.display());
            }
            WriteResult::DryRun { content, path } => {
                println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    let summary = output.summary;
    println!(
        "  Generated {} artifact(s), {} duplicate(s) skipped",
        summary.emitted.to_string().green(),
        summary.suppressed
    );
    if summary.has_errors() {
        println!(
            "{} {} declaration(s) rejected, {} emission(s) failed",
            "Warning:".yellow(),
            summary.rejected,
            summary.failed
        );
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(
    input: &Path,
    config: Config,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", input.display());
    println!("  Press Ctrl+C to stop\n");

    let watcher = FileWatcher::new(input).with_suffix(config.scan.manifest_suffix.clone());
    let generator = ProjectGenerator::new(config);

    run_generate(input, &generator, filter, dry_run)?;

    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Manifest changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(input, &generator, filter, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Check command implementation.
fn cmd_check(input: &Path, config: Config, filter: Option<&str>) -> Result<(), CliError> {
    println!("{}", "Checking generated sources...".cyan());

    let generator = ProjectGenerator::new(config);
    let mut reporter = ConsoleReporter::new();
    let output = generator.check(input, filter, &mut reporter)?;

    if !report_manifests(&output.manifests, &generator.config().scan.manifest_suffix) {
        return Ok(());
    }

    for path in &output.missing {
        println!("  {} missing {}", "✗".red(), path.display());
    }
    for path in &output.stale {
        println!("  {} stale {}", "✗".red(), path.display());
    }

    if output.is_up_to_date() {
        println!(
            "{} {} generated file(s) are up-to-date",
            "✓".green(),
            output.expected.len()
        );
        Ok(())
    } else {
        println!("{} Generated sources are out of date", "✗".red());
        println!("  Run 'crudgen generate' to update");
        Err(CliError::Validation(format!(
            "{} missing, {} stale",
            output.missing.len(),
            output.stale.len()
        )))
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

/// Format a manifest error for display.
fn format_manifest_error(error: &ManifestError) -> String {
    match error {
        ManifestError::Multiple(errors) => errors
            .iter()
            .map(format_manifest_error)
            .collect::<Vec<_>>()
            .join("\n  "),
        other => other.to_string(),
    }
}
