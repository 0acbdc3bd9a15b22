//! Generation directive definitions.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::declaration::{AnnotatedDeclaration, ElementKind};

/// The category of artifact a directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveKind {
    /// Data-access interface over the entity.
    Mapper,
    /// Service class layered over the mapper.
    Repository,
    /// CRUD request-handling class.
    Controller,
    /// JSON codec adapter for a (possibly generic) type.
    TypeHandler,
}

impl DirectiveKind {
    /// All kinds, in the order a full round processes them.
    pub const ALL: [DirectiveKind; 4] = [
        DirectiveKind::Mapper,
        DirectiveKind::Repository,
        DirectiveKind::Controller,
        DirectiveKind::TypeHandler,
    ];

    /// Name of the trigger annotation, used in diagnostics.
    pub fn annotation_name(self) -> &'static str {
        match self {
            DirectiveKind::Mapper => "MPMapper",
            DirectiveKind::Repository => "MPRepository",
            DirectiveKind::Controller => "JeecgBootController",
            DirectiveKind::TypeHandler => "MPTypeHandler",
        }
    }

    /// Whether a declaration of `kind` may carry this directive.
    pub fn accepts(self, kind: ElementKind) -> bool {
        match self {
            DirectiveKind::TypeHandler => kind.is_class() || kind.is_field(),
            _ => kind.is_class(),
        }
    }

    /// Human-readable description of the accepted element kinds.
    pub fn expected_elements(self) -> &'static str {
        match self {
            DirectiveKind::TypeHandler => "class or field",
            _ => "class",
        }
    }

    /// Whether the free-text value doubles as an output namespace.
    ///
    /// Controllers use the value as their module description instead.
    pub fn value_is_namespace(self) -> bool {
        !matches!(self, DirectiveKind::Controller)
    }

    /// Stable identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKind::Mapper => "mapper",
            DirectiveKind::Repository => "repository",
            DirectiveKind::Controller => "controller",
            DirectiveKind::TypeHandler => "type-handler",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mapper" => Ok(DirectiveKind::Mapper),
            "repository" | "repository-service" => Ok(DirectiveKind::Repository),
            "controller" => Ok(DirectiveKind::Controller),
            "type-handler" | "type_handler" => Ok(DirectiveKind::TypeHandler),
            other => Err(format!(
                "unknown directive kind '{}', expected one of: mapper, repository, controller, type-handler",
                other
            )),
        }
    }
}

/// A parsed request to generate one artifact for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDirective {
    kind: DirectiveKind,

    /// Explicit output namespace override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,

    /// Free-text override: a namespace fallback or a description, depending on `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    declaration: Arc<AnnotatedDeclaration>,
}

impl GenerationDirective {
    /// Create a directive without overrides.
    pub fn new(kind: DirectiveKind, declaration: Arc<AnnotatedDeclaration>) -> Self {
        Self {
            kind,
            namespace: None,
            value: None,
            declaration,
        }
    }

    /// Set the explicit output namespace override.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the free-text override value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The originating declaration.
    pub fn declaration(&self) -> &AnnotatedDeclaration {
        &self.declaration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_element_kinds() {
        assert!(DirectiveKind::Controller.accepts(ElementKind::Class));
        assert!(!DirectiveKind::Controller.accepts(ElementKind::Field));
        assert!(!DirectiveKind::Mapper.accepts(ElementKind::Interface));
        assert!(DirectiveKind::TypeHandler.accepts(ElementKind::Field));
        assert!(DirectiveKind::TypeHandler.accepts(ElementKind::Record));
        assert!(!DirectiveKind::TypeHandler.accepts(ElementKind::Method));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("mapper".parse(), Ok(DirectiveKind::Mapper));
        assert_eq!("repository-service".parse(), Ok(DirectiveKind::Repository));
        assert_eq!("type_handler".parse(), Ok(DirectiveKind::TypeHandler));
        assert!("service".parse::<DirectiveKind>().is_err());
    }

    #[test]
    fn test_kind_serde_matches_as_str() {
        for kind in DirectiveKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
