//! # crudgen-core
//!
//! Generation engine for CRUD scaffolding sources.
//!
//! Given a declared type and a directive naming the kind of artifact wanted,
//! the engine deterministically composes the full artifact and hands it to an
//! emission sink, emitting every logical artifact at most once per run.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use crudgen_core::driver::{CollectingReporter, GenerationDriver, MemorySink};
//! use crudgen_core::ir::{AnnotatedDeclaration, DirectiveKind, GenerationDirective};
//!
//! let order = Arc::new(AnnotatedDeclaration::class("shop", "Order"));
//! let directives = vec![
//!     GenerationDirective::new(DirectiveKind::Controller, Arc::clone(&order))
//!         .with_value("Orders"),
//!     GenerationDirective::new(DirectiveKind::Repository, Arc::clone(&order)),
//!     GenerationDirective::new(DirectiveKind::Mapper, order),
//! ];
//!
//! let driver = GenerationDriver::new();
//! let mut sink = MemorySink::new();
//! let mut reporter = CollectingReporter::new();
//! let summary = driver.run_round(&directives, &mut sink, &mut reporter);
//!
//! assert_eq!(summary.emitted, 3);
//! ```
//!
//! ## Directive kinds
//!
//! - `controller` - `<Name>Controller`, eight CRUD operations over `<Name>Repository`
//! - `mapper` - `<Name>Mapper`, a data-access interface
//! - `repository` - `<Name>Repository`, a service layered over the mapper
//! - `type-handler` - `<FlattenedType>TypeHandler`, a JSON column codec
//!
//! ## Output namespace
//!
//! First non-blank of: the directive's `namespace`, its `value` (except for
//! controllers, where the value is a description), the declaring namespace.

pub mod composer;
pub mod driver;
pub mod error;
pub mod ir;
pub mod ledger;
pub mod naming;
pub mod package;
pub mod render;

pub use composer::ArtifactComposer;
pub use driver::{
    DeclarationScanner, Diagnostic, DiagnosticReporter, EmissionSink, GenerationDriver,
    RoundSummary, Severity,
};
pub use error::{ComposeError, EmitError, RenderError};
pub use ledger::EmissionLedger;
