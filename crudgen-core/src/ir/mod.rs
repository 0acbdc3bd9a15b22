//! Intermediate Representation (IR) module.
//!
//! This module defines the data model shared by every stage of generation:
//! type references, the annotated declarations and directives a scanner
//! supplies, and the artifacts the composer produces.

pub mod artifact;
pub mod declaration;
pub mod directive;
pub mod types;

pub use artifact::{
    AnnotationSpec, AnnotationValue, ArtifactCategory, Expr, FieldSpec, GeneratedArtifact, Member,
    MethodSpec, Modifier, ParameterSpec, Statement, SupertypeRelation,
};
pub use declaration::{AnnotatedDeclaration, ElementKind, SourceLocation};
pub use directive::{DirectiveKind, GenerationDirective};
pub use types::{TypeParseError, TypeReference};
