//! Declaration manifest parser.
//!
//! A manifest is a TOML file listing annotated declarations and the
//! directives attached to them:
//!
//! ```toml
//! [[declaration]]
//! name = "Order"
//! namespace = "shop"
//! directives = [{ kind = "controller", value = "Orders" }]
//!
//! [[declaration]]
//! name = "tags"
//! kind = "field"
//! enclosing = { name = "Order", namespace = "shop" }
//! type = "java.util.List<java.lang.String>"
//! directives = [{ kind = "type-handler" }]
//! ```
//!
//! Parsed manifests are collected into a [`ManifestCatalog`], which hands
//! directives to the generation driver in discovery order.

use std::path::Path;
use std::sync::Arc;

use crudgen_core::ir::{
    AnnotatedDeclaration, DirectiveKind, ElementKind, GenerationDirective, SourceLocation,
    TypeReference,
};
use crudgen_core::DeclarationScanner;
use serde::Deserialize;

use crate::error::ManifestError;
use crate::scanner::ManifestFile;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default, rename = "declaration")]
    declarations: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default = "default_kind")]
    kind: ElementKind,
    #[serde(default, rename = "type")]
    ty: Option<String>,
    #[serde(default)]
    enclosing: Option<RawEnclosing>,
    #[serde(default)]
    directives: Vec<RawDirective>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnclosing {
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(default = "default_kind")]
    kind: ElementKind,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDirective {
    kind: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

fn default_kind() -> ElementKind {
    ElementKind::Class
}

/// Parser for declaration manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestParser;

impl ManifestParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one manifest into its directives.
    pub fn parse_file(
        &self,
        manifest: &ManifestFile,
    ) -> Result<Vec<GenerationDirective>, ManifestError> {
        self.parse_source(&manifest.content, &manifest.path)
    }

    /// Parse manifest text read from `file`.
    ///
    /// Every declaration is checked; if any is invalid the whole manifest is
    /// rejected with all of its errors.
    pub fn parse_source(
        &self,
        content: &str,
        file: &Path,
    ) -> Result<Vec<GenerationDirective>, ManifestError> {
        let raw: RawManifest = toml::from_str(content)
            .map_err(|e| ManifestError::invalid_toml(file.to_path_buf(), e.to_string()))?;

        let mut directives = Vec::new();
        let mut errors = Vec::new();

        for (i, declaration) in raw.declarations.into_iter().enumerate() {
            match self.build_declaration(declaration, file, i + 1) {
                Ok(mut parsed) => directives.append(&mut parsed),
                Err(err) => errors.push(err),
            }
        }

        match errors.len() {
            0 => Ok(directives),
            1 => Err(errors.remove(0)),
            _ => Err(ManifestError::Multiple(errors)),
        }
    }

    /// Parse every manifest, skipping the ones with errors.
    pub fn parse_files(&self, manifests: &[ManifestFile]) -> (ManifestCatalog, Vec<ManifestError>) {
        let mut catalog = ManifestCatalog::default();
        let mut errors = Vec::new();

        for manifest in manifests {
            match self.parse_file(manifest) {
                Ok(directives) => {
                    tracing::debug!(
                        path = %manifest.path.display(),
                        directives = directives.len(),
                        "parsed manifest"
                    );
                    catalog.extend(directives);
                }
                Err(err) => {
                    tracing::warn!(path = %manifest.path.display(), error = %err, "skipping manifest");
                    errors.push(err);
                }
            }
        }

        (catalog, errors)
    }

    fn build_declaration(
        &self,
        raw: RawDeclaration,
        file: &Path,
        index: usize,
    ) -> Result<Vec<GenerationDirective>, ManifestError> {
        let namespace = raw.namespace.clone().unwrap_or_default();
        let label = if namespace.is_empty() {
            raw.name.clone()
        } else {
            format!("{}.{}", namespace, raw.name)
        };

        if raw.name.trim().is_empty() {
            return Err(ManifestError::invalid_toml(
                file.to_path_buf(),
                format!("declaration #{} has an empty name", index),
            ));
        }

        let parse_type = |text: &str| -> Result<TypeReference, ManifestError> {
            text.parse().map_err(|source| ManifestError::InvalidType {
                file: file.to_path_buf(),
                index,
                declaration: label.clone(),
                text: text.to_string(),
                source,
            })
        };

        let enclosing = raw.enclosing.map(|enclosing| {
            Arc::new(
                AnnotatedDeclaration::class(enclosing.namespace, enclosing.name)
                    .with_kind(enclosing.kind),
            )
        });

        let mut declaration = match (raw.kind, enclosing) {
            (ElementKind::Field, Some(enclosing)) => {
                let ty = parse_type(raw.ty.as_deref().unwrap_or_default())?;
                let mut field = AnnotatedDeclaration::field(enclosing, raw.name, ty);
                if let Some(namespace) = raw.namespace {
                    field.namespace = namespace;
                }
                field
            }
            (ElementKind::Field, None) => {
                return Err(ManifestError::MissingEnclosing {
                    file: file.to_path_buf(),
                    index,
                    declaration: label.clone(),
                });
            }
            (kind, enclosing) => {
                let mut declaration =
                    AnnotatedDeclaration::class(namespace, raw.name).with_kind(kind);
                if let Some(ty) = raw.ty.as_deref() {
                    declaration = declaration.with_type(parse_type(ty)?);
                }
                declaration.enclosing = enclosing;
                declaration
            }
        };

        declaration.location = SourceLocation {
            file: Some(file.to_path_buf()),
            index: Some(index),
        };
        let declaration = Arc::new(declaration);

        raw.directives
            .into_iter()
            .map(|directive| -> Result<GenerationDirective, ManifestError> {
                let kind: DirectiveKind =
                    directive
                        .kind
                        .parse()
                        .map_err(|message| ManifestError::UnknownKind {
                            file: file.to_path_buf(),
                            index,
                            declaration: declaration.path(),
                            message,
                        })?;

                let mut parsed = GenerationDirective::new(kind, Arc::clone(&declaration));
                if let Some(namespace) = directive.namespace {
                    parsed = parsed.with_namespace(namespace);
                }
                if let Some(value) = directive.value {
                    parsed = parsed.with_value(value);
                }
                Ok(parsed)
            })
            .collect()
    }
}

/// Directives read from a set of manifests, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct ManifestCatalog {
    directives: Vec<GenerationDirective>,
}

impl ManifestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append directives after the ones already held.
    pub fn extend(&mut self, directives: impl IntoIterator<Item = GenerationDirective>) {
        self.directives.extend(directives);
    }

    pub fn directives(&self) -> &[GenerationDirective] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl DeclarationScanner for ManifestCatalog {
    fn directives_for(&self, kind: DirectiveKind) -> Vec<GenerationDirective> {
        self.directives
            .iter()
            .filter(|directive| directive.kind() == kind)
            .cloned()
            .collect()
    }
}
