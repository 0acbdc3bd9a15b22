//! End-to-end generation tests.
//!
//! These drive full rounds through the public API with an in-memory
//! scanner, sink and reporter.

use std::collections::HashMap;
use std::sync::Arc;

use crudgen_core::driver::{CollectingReporter, MemorySink};
use crudgen_core::ir::{
    AnnotatedDeclaration, DirectiveKind, ElementKind, GeneratedArtifact, GenerationDirective,
    Modifier, TypeReference,
};
use crudgen_core::{
    DeclarationScanner, EmissionLedger, EmissionSink, EmitError, GenerationDriver, RoundSummary,
};

/// Scanner over declarations grouped by kind, like a host compiler would
/// hand them out.
#[derive(Default)]
struct FixedScanner {
    by_kind: HashMap<DirectiveKind, Vec<GenerationDirective>>,
}

impl FixedScanner {
    fn with(mut self, directive: GenerationDirective) -> Self {
        self.by_kind
            .entry(directive.kind())
            .or_default()
            .push(directive);
        self
    }
}

impl DeclarationScanner for FixedScanner {
    fn directives_for(&self, kind: DirectiveKind) -> Vec<GenerationDirective> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }
}

fn order() -> Arc<AnnotatedDeclaration> {
    Arc::new(AnnotatedDeclaration::class("shop", "Order"))
}

fn list_of_string() -> TypeReference {
    "java.util.List<java.lang.String>".parse().unwrap()
}

fn run(scanner: &FixedScanner) -> (RoundSummary, Vec<GeneratedArtifact>, CollectingReporter) {
    let driver = GenerationDriver::new();
    let mut sink = MemorySink::new();
    let mut reporter = CollectingReporter::new();
    let summary = driver.run_round(scanner, &mut sink, &mut reporter);
    (summary, sink.into_artifacts(), reporter)
}

#[test]
fn test_order_controller_end_to_end() {
    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::Controller, order()).with_value("订单"));

    let (summary, artifacts, reporter) = run(&scanner);

    assert_eq!(summary.emitted, 1);
    assert!(reporter.diagnostics().is_empty());

    let controller = &artifacts[0];
    assert_eq!(controller.qualified_name(), "shop.OrderController");

    let field = controller.field("orderRepository").expect("repository field");
    assert_eq!(field.ty.qualified_name(), "shop.OrderRepository");
    assert!(field.modifiers.contains(&Modifier::Final));

    let operations: Vec<&str> = controller.operations().map(|m| m.name.as_str()).collect();
    assert_eq!(operations.len(), 8);
    assert_eq!(
        operations,
        [
            "queryPageList",
            "add",
            "edit",
            "delete",
            "deleteBatch",
            "queryById",
            "exportExcel",
            "importExcel"
        ]
    );
}

#[test]
fn test_type_handler_requested_twice_is_emitted_once() {
    // A generic value type carrying the directive itself, and a field of the
    // same instantiation elsewhere.
    let tags_type = Arc::new(
        AnnotatedDeclaration::class("shop", "List")
            .with_type(list_of_string()),
    );
    let tags_field = Arc::new(AnnotatedDeclaration::field(order(), "tags", list_of_string()));

    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::TypeHandler, tags_type))
        .with(GenerationDirective::new(DirectiveKind::TypeHandler, tags_field));

    let (summary, artifacts, reporter) = run(&scanner);

    assert_eq!(summary.emitted, 1);
    assert_eq!(summary.suppressed, 1);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].qualified_name(), "shop.ListOfStringTypeHandler");
    assert!(reporter.diagnostics().is_empty());
}

#[test]
fn test_duplicate_does_not_suppress_later_declarations() {
    let customer = Arc::new(AnnotatedDeclaration::class("shop", "Customer"));
    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::Mapper, order()))
        .with(GenerationDirective::new(DirectiveKind::Mapper, order()))
        .with(GenerationDirective::new(DirectiveKind::Mapper, customer));

    let (summary, artifacts, _) = run(&scanner);

    let names: Vec<String> = artifacts.iter().map(|a| a.qualified_name()).collect();
    assert_eq!(names, vec!["shop.OrderMapper", "shop.CustomerMapper"]);
    assert_eq!(summary.suppressed, 1);
}

#[test]
fn test_wrong_element_kind_is_isolated() {
    let interface = Arc::new(
        AnnotatedDeclaration::class("shop", "Priced").with_kind(ElementKind::Interface),
    );
    let customer = Arc::new(AnnotatedDeclaration::class("shop", "Customer"));
    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::Repository, interface))
        .with(GenerationDirective::new(DirectiveKind::Repository, customer));

    let (summary, artifacts, reporter) = run(&scanner);

    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.emitted, 1);
    assert_eq!(artifacts[0].qualified_name(), "shop.CustomerRepository");
    assert_eq!(reporter.diagnostics().len(), 1);
    assert_eq!(reporter.diagnostics()[0].location.declaration, "shop.Priced");
}

#[test]
fn test_full_stack_for_one_entity() {
    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::Controller, order()))
        .with(GenerationDirective::new(DirectiveKind::Repository, order()))
        .with(
            GenerationDirective::new(DirectiveKind::Mapper, order()).with_namespace("shop.mapper"),
        );

    let (summary, artifacts, _) = run(&scanner);

    assert_eq!(summary.emitted, 3);
    let names: Vec<String> = artifacts.iter().map(|a| a.qualified_name()).collect();
    assert_eq!(
        names,
        vec![
            "shop.mapper.OrderMapper",
            "shop.OrderRepository",
            "shop.OrderController"
        ]
    );

    // The repository names its mapper in its own namespace, not wherever the
    // mapper directive placed it.
    let repository = &artifacts[1];
    let (_, service) = repository.supertypes().next().unwrap();
    let mapper = &service.arguments()[0];
    assert_eq!(mapper.qualified_name(), "shop.OrderMapper");
    assert_ne!(mapper.qualified_name(), artifacts[0].qualified_name());
}

/// Sink that fails every emission.
struct BrokenSink;

impl EmissionSink for BrokenSink {
    fn emit(&mut self, artifact: &GeneratedArtifact) -> Result<(), EmitError> {
        Err(EmitError::io(artifact.qualified_name(), "disk full"))
    }
}

#[test]
fn test_sink_failures_are_reported_per_declaration() {
    let customer = Arc::new(AnnotatedDeclaration::class("shop", "Customer"));
    let scanner = FixedScanner::default()
        .with(GenerationDirective::new(DirectiveKind::Mapper, order()))
        .with(GenerationDirective::new(DirectiveKind::Mapper, customer));

    let driver = GenerationDriver::new();
    let mut reporter = CollectingReporter::new();
    let summary = driver.run_round(&scanner, &mut BrokenSink, &mut reporter);

    assert_eq!(summary.failed, 2);
    let locations: Vec<&str> = reporter
        .diagnostics()
        .iter()
        .map(|d| d.location.declaration.as_str())
        .collect();
    assert_eq!(locations, vec!["shop.Order", "shop.Customer"]);
    assert!(reporter.diagnostics()[0].message.contains("disk full"));
}

#[test]
fn test_parallel_rounds_share_one_ledger() {
    let ledger = Arc::new(EmissionLedger::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                let driver = GenerationDriver::with_ledger(ledger);
                let scanner = FixedScanner::default()
                    .with(GenerationDirective::new(DirectiveKind::Controller, order()))
                    .with(GenerationDirective::new(DirectiveKind::Mapper, order()));
                let mut sink = MemorySink::new();
                let mut reporter = CollectingReporter::new();
                driver.run_round(&scanner, &mut sink, &mut reporter)
            })
        })
        .collect();

    let mut total = RoundSummary::default();
    for handle in handles {
        total.merge(handle.join().unwrap());
    }

    assert_eq!(total.emitted, 2);
    assert_eq!(total.suppressed, 6);
    assert_eq!(
        ledger.claimed(),
        vec!["shop.OrderController".to_string(), "shop.OrderMapper".to_string()]
    );
}
