//! Property-based tests for crudgen-cli.
//!
//! Properties tested:
//! - Manifest discovery completeness
//! - Config override precedence
//! - Dry run safety
//! - At-most-once emission across manifests

use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crudgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::ProjectGenerator,
    reporter::ConsoleReporter,
    scanner::ManifestScanner,
};
use crudgen_core::render::OutputFormat;

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a type name.
fn arb_type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8}"
}

/// Generate a file stem.
fn arb_stem() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

/// Manifest declaring `names` in namespace `shop` with mapper and
/// repository directives.
fn manifest_for(names: &[String]) -> String {
    names
        .iter()
        .map(|name| {
            format!(
                "[[declaration]]\nname = \"{}\"\nnamespace = \"shop\"\ndirectives = [{{ kind = \"mapper\" }}, {{ kind = \"repository\" }}]\n\n",
                name
            )
        })
        .collect()
}

fn create_test_directory(files: &[(String, String)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn files_under(root: &std::path::Path) -> usize {
    if !root.exists() {
        return 0;
    }
    fs::read_dir(root)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            if path.is_dir() {
                files_under(&path)
            } else {
                1
            }
        })
        .sum()
}

// =============================================================================
// Manifest discovery completeness
//
// Every file ending in the manifest suffix is found, and nothing else.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_manifest_discovery_completeness(
        manifests in prop::collection::hash_set(arb_stem(), 1..6),
        others in prop::collection::hash_set(arb_stem(), 0..6),
        nested in any::<bool>(),
    ) {
        let prefix = if nested { "nested/" } else { "" };
        let mut files: Vec<(String, String)> = manifests
            .iter()
            .map(|stem| (format!("{}{}.crudgen.toml", prefix, stem), String::new()))
            .collect();
        files.extend(others.iter().map(|stem| (format!("{}.toml", stem), String::new())));
        let dir = create_test_directory(&files);

        let found: HashSet<String> = ManifestScanner::new(dir.path())
            .scan()
            .unwrap()
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        let expected: HashSet<String> = manifests
            .iter()
            .map(|stem| format!("{}.crudgen.toml", stem))
            .collect();
        prop_assert_eq!(found, expected);
    }
}

// =============================================================================
// Config override precedence
//
// A value given on the command line always wins over the file value.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_config_override_precedence(
        file_dir in "[a-z]{3,8}",
        cli_dir in proptest::option::of("[a-z]{3,8}"),
        file_json in any::<bool>(),
        cli_json in proptest::option::of(any::<bool>()),
        file_overwrite in any::<bool>(),
        cli_overwrite in proptest::option::of(any::<bool>()),
    ) {
        let format = |json: bool| if json { OutputFormat::Json } else { OutputFormat::Java };

        let mut file_config = Config::default();
        file_config.output.dir = PathBuf::from(&file_dir);
        file_config.output.format = format(file_json);
        file_config.output.overwrite = file_overwrite;

        let args = CliArgs {
            output: cli_dir.as_ref().map(PathBuf::from),
            format: cli_json.map(format),
            overwrite: cli_overwrite,
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(file_config, &args);

        prop_assert_eq!(merged.output.dir, PathBuf::from(cli_dir.unwrap_or(file_dir)));
        prop_assert_eq!(merged.output.format, format(cli_json.unwrap_or(file_json)));
        prop_assert_eq!(merged.output.overwrite, cli_overwrite.unwrap_or(file_overwrite));
    }
}

// =============================================================================
// Dry run safety
//
// A dry run reports every artifact but never touches the output directory.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_dry_run_safety(names in prop::collection::hash_set(arb_type_name(), 1..5)) {
        let names: Vec<String> = names.into_iter().collect();
        let input =
            create_test_directory(&[("shop.crudgen.toml".to_string(), manifest_for(&names))]);
        let out = TempDir::new().unwrap();

        let mut config = Config::default();
        config.output.dir = out.path().join("generated");
        let generator = ProjectGenerator::new(config);
        let mut reporter = ConsoleReporter::quiet();

        let output = generator.generate(input.path(), None, true, &mut reporter).unwrap();

        prop_assert_eq!(output.results.len(), names.len() * 2);
        prop_assert!(!out.path().join("generated").exists());
    }
}

// =============================================================================
// At-most-once emission across manifests
//
// Declaring the same entities in several manifests still writes exactly one
// file per distinct artifact.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_at_most_once_across_manifests(
        names in prop::collection::vec(arb_type_name(), 1..6),
        copies in 1usize..4,
    ) {
        let files: Vec<(String, String)> = (0..copies)
            .map(|i| (format!("copy{}.crudgen.toml", i), manifest_for(&names)))
            .collect();
        let input = create_test_directory(&files);
        let out = TempDir::new().unwrap();

        let mut config = Config::default();
        config.output.dir = out.path().to_path_buf();
        let generator = ProjectGenerator::new(config);
        let mut reporter = ConsoleReporter::quiet();

        let output = generator.generate(input.path(), None, false, &mut reporter).unwrap();

        let distinct: HashSet<&String> = names.iter().collect();
        let total = names.len() * copies * 2;
        prop_assert_eq!(output.summary.emitted, distinct.len() * 2);
        prop_assert_eq!(output.summary.suppressed, total - distinct.len() * 2);
        prop_assert_eq!(files_under(out.path()), distinct.len() * 2);
    }
}
