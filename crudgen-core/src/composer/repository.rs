//! Repository-service template.

use super::mapper::MAPPER_SUFFIX;
use super::well_known as wk;
use super::ArtifactTemplate;
use crate::ir::{
    AnnotatedDeclaration, AnnotationSpec, ArtifactCategory, DirectiveKind, GeneratedArtifact,
    GenerationDirective, Member, SupertypeRelation, TypeReference,
};

pub const REPOSITORY_SUFFIX: &str = "Repository";

/// Template for [`DirectiveKind::Repository`].
///
/// The service layers over the mapper of the same entity, which is expected
/// in the same output namespace as the service itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryTemplate;

impl ArtifactTemplate for RepositoryTemplate {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Repository
    }

    fn target_name(&self, declaration: &AnnotatedDeclaration) -> String {
        format!("{}{}", declaration.name, REPOSITORY_SUFFIX)
    }

    fn compose(&self, namespace: &str, directive: &GenerationDirective) -> GeneratedArtifact {
        let declaration = directive.declaration();
        let mapper = TypeReference::simple(
            namespace,
            format!("{}{}", declaration.name, MAPPER_SUFFIX),
        );

        GeneratedArtifact::new(
            namespace,
            self.target_name(declaration),
            ArtifactCategory::Class,
            vec![AnnotationSpec::marker(wk::service_annotation())],
            vec![Member::Supertype {
                relation: SupertypeRelation::Extends,
                ty: wk::service_impl(mapper, declaration.ty.clone()),
            }],
        )
    }
}
