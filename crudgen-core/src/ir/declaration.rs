//! Annotated declaration definitions.
//!
//! An [`AnnotatedDeclaration`] is the subject of generation: a class-like
//! type or a field that carries a generation directive. Declarations are
//! produced by a scanner once per round and never mutated afterwards.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::TypeReference;

/// Element kind of an annotated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    Record,
    Field,
    Method,
}

impl ElementKind {
    /// Whether this kind counts as a class for generation purposes.
    ///
    /// Enums and records are classes; interfaces are not.
    pub fn is_class(self) -> bool {
        matches!(self, ElementKind::Class | ElementKind::Enum | ElementKind::Record)
    }

    /// Whether this kind is a field.
    pub fn is_field(self) -> bool {
        matches!(self, ElementKind::Field)
    }

    /// Lowercase name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Record => "record",
            ElementKind::Field => "field",
            ElementKind::Method => "method",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declaration came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the declaration was read from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Position of the declaration within that file (1-indexed), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// A programmer-declared element carrying a generation directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDeclaration {
    /// Simple name of the declaration (type name or field name).
    pub name: String,

    /// Namespace the declaration lives in.
    pub namespace: String,

    /// Element kind.
    pub kind: ElementKind,

    /// The declaration's own type. For a class this is the class itself,
    /// for a field the field's declared type.
    pub ty: TypeReference,

    /// Surrounding declaration, used to resolve the class of a field trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing: Option<Arc<AnnotatedDeclaration>>,

    /// Source position.
    #[serde(default)]
    pub location: SourceLocation,
}

impl AnnotatedDeclaration {
    /// Create a class declaration whose type is `namespace.name`.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        Self {
            ty: TypeReference::simple(namespace.clone(), name.clone()),
            name,
            namespace,
            kind: ElementKind::Class,
            enclosing: None,
            location: SourceLocation::default(),
        }
    }

    /// Create a field declaration of type `ty` inside `enclosing`.
    ///
    /// The field shares the namespace of its enclosing declaration.
    pub fn field(
        enclosing: Arc<AnnotatedDeclaration>,
        name: impl Into<String>,
        ty: TypeReference,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: enclosing.namespace.clone(),
            kind: ElementKind::Field,
            ty,
            enclosing: Some(enclosing),
            location: SourceLocation::default(),
        }
    }

    /// Override the element kind.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the declaration's type.
    pub fn with_type(mut self, ty: TypeReference) -> Self {
        self.ty = ty;
        self
    }

    /// Attach a source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Namespace generated artifacts fall back to.
    ///
    /// Fields resolve to the namespace of their enclosing class.
    pub fn declaring_namespace(&self) -> &str {
        match (&self.kind, &self.enclosing) {
            (ElementKind::Field, Some(enclosing)) => enclosing.declaring_namespace(),
            _ => &self.namespace,
        }
    }

    /// Dotted path naming this declaration, e.g. `shop.Order` or `shop.Order.tags`.
    pub fn path(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{}.{}", enclosing.path(), self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }
}
