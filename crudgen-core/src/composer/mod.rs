//! Artifact composition.
//!
//! This module turns one [`GenerationDirective`] into one immutable
//! [`GeneratedArtifact`]. Each directive kind has its own template:
//!
//! - [`ControllerTemplate`] - CRUD request-handling class
//! - [`MapperTemplate`] - data-access interface
//! - [`RepositoryTemplate`] - service class over the mapper
//! - [`TypeHandlerTemplate`] - JSON codec adapter
//!
//! The [`ArtifactComposer`] validates the declaration's element kind,
//! resolves the output namespace and dispatches to the template.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use crudgen_core::composer::ArtifactComposer;
//! use crudgen_core::ir::{AnnotatedDeclaration, DirectiveKind, GenerationDirective};
//!
//! let order = Arc::new(AnnotatedDeclaration::class("shop", "Order"));
//! let directive = GenerationDirective::new(DirectiveKind::Mapper, order);
//!
//! let artifact = ArtifactComposer::new().compose(&directive).unwrap();
//! assert_eq!(artifact.qualified_name(), "shop.OrderMapper");
//! ```

pub mod controller;
pub mod mapper;
pub mod repository;
pub mod type_handler;
pub mod well_known;

pub use controller::ControllerTemplate;
pub use mapper::MapperTemplate;
pub use repository::RepositoryTemplate;
pub use type_handler::TypeHandlerTemplate;

use crate::error::ComposeError;
use crate::ir::{AnnotatedDeclaration, DirectiveKind, GeneratedArtifact, GenerationDirective};
use crate::package::resolve_namespace;

/// Template producing the artifact for one directive kind.
pub trait ArtifactTemplate: Send + Sync {
    /// The directive kind this template serves.
    fn kind(&self) -> DirectiveKind;

    /// Simple name of the artifact generated for `declaration`.
    fn target_name(&self, declaration: &AnnotatedDeclaration) -> String;

    /// Build the artifact. `namespace` is already resolved and the element
    /// kind already validated.
    fn compose(&self, namespace: &str, directive: &GenerationDirective) -> GeneratedArtifact;
}

static CONTROLLER: ControllerTemplate = ControllerTemplate;
static MAPPER: MapperTemplate = MapperTemplate;
static REPOSITORY: RepositoryTemplate = RepositoryTemplate;
static TYPE_HANDLER: TypeHandlerTemplate = TypeHandlerTemplate;

/// The template registered for `kind`.
pub fn template_for(kind: DirectiveKind) -> &'static dyn ArtifactTemplate {
    match kind {
        DirectiveKind::Controller => &CONTROLLER,
        DirectiveKind::Mapper => &MAPPER,
        DirectiveKind::Repository => &REPOSITORY,
        DirectiveKind::TypeHandler => &TYPE_HANDLER,
    }
}

/// Composes artifacts from directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactComposer;

impl ArtifactComposer {
    pub fn new() -> Self {
        Self
    }

    /// Check that the directive's declaration is an element its kind accepts.
    pub fn validate(&self, directive: &GenerationDirective) -> Result<(), ComposeError> {
        let declaration = directive.declaration();
        if directive.kind().accepts(declaration.kind) {
            Ok(())
        } else {
            Err(ComposeError::wrong_element_kind(
                declaration.path(),
                declaration.kind,
                directive.kind(),
            ))
        }
    }

    /// Fully-qualified name of the artifact `directive` would produce.
    pub fn target_name(&self, directive: &GenerationDirective) -> String {
        let template = template_for(directive.kind());
        let namespace = resolve_namespace(directive);
        let name = template.target_name(directive.declaration());
        if namespace.is_empty() {
            name
        } else {
            format!("{}.{}", namespace, name)
        }
    }

    /// Compose the artifact for `directive`.
    pub fn compose(
        &self,
        directive: &GenerationDirective,
    ) -> Result<GeneratedArtifact, ComposeError> {
        self.validate(directive)?;
        let namespace = resolve_namespace(directive);
        let artifact = template_for(directive.kind()).compose(&namespace, directive);

        tracing::debug!(
            target_name = %artifact.qualified_name(),
            directive = %directive.kind(),
            declaration = %directive.declaration().path(),
            "composed artifact"
        );

        Ok(artifact)
    }
}
