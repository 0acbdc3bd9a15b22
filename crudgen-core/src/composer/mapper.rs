//! Data-access interface template.

use super::well_known as wk;
use super::ArtifactTemplate;
use crate::ir::{
    AnnotatedDeclaration, AnnotationSpec, ArtifactCategory, DirectiveKind, GeneratedArtifact,
    GenerationDirective, Member, SupertypeRelation,
};

pub const MAPPER_SUFFIX: &str = "Mapper";

/// Template for [`DirectiveKind::Mapper`].
///
/// The interface has no members of its own; every operation is inherited
/// from the base mapper contract over the entity type.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapperTemplate;

impl ArtifactTemplate for MapperTemplate {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Mapper
    }

    fn target_name(&self, declaration: &AnnotatedDeclaration) -> String {
        format!("{}{}", declaration.name, MAPPER_SUFFIX)
    }

    fn compose(&self, namespace: &str, directive: &GenerationDirective) -> GeneratedArtifact {
        let declaration = directive.declaration();
        GeneratedArtifact::new(
            namespace,
            self.target_name(declaration),
            ArtifactCategory::Interface,
            vec![AnnotationSpec::marker(wk::mapper_annotation())],
            vec![Member::Supertype {
                relation: SupertypeRelation::Extends,
                ty: wk::base_mapper(declaration.ty.clone()),
            }],
        )
    }
}
