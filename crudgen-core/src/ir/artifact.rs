//! Generated artifact definitions.
//!
//! A [`GeneratedArtifact`] is the complete, in-memory description of one
//! generated class or interface. It is built once by the composer and then
//! only read: by the driver, the ledger check and finally the emission sink.
//! Nothing here knows about a concrete target syntax; renderers decide how
//! members, statements and annotations are spelled.

use serde::{Deserialize, Serialize};

use super::types::TypeReference;

/// Whether the artifact is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    Class,
    Interface,
}

/// Member modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Private,
    Static,
    Final,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

/// Value of an annotation argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    /// A string literal.
    Str(String),
    /// A boolean literal.
    Bool(bool),
    /// A class literal.
    Type(TypeReference),
    /// A constant of an enumerated type, e.g. `JdbcType.VARCHAR`.
    Constant { ty: TypeReference, name: String },
    /// An array of values.
    Array(Vec<AnnotationValue>),
}

/// Metadata annotation attached to an artifact, member or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpec {
    pub ty: TypeReference,

    /// Arguments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(String, AnnotationValue)>,
}

impl AnnotationSpec {
    /// An annotation without arguments.
    pub fn marker(ty: TypeReference) -> Self {
        Self {
            ty,
            arguments: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn with(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.push((key.into(), value));
        self
    }

    /// Look up an argument by key.
    pub fn argument(&self, key: &str) -> Option<&AnnotationValue> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Expression inside a generated body or field initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// A local name, parameter or field.
    Ident { name: String },
    /// The supertype receiver.
    Super,
    /// A string literal.
    Str { value: String },
    /// A raw class token, e.g. `Order.class`.
    ClassToken { ty: TypeReference },
    /// A token preserving the full generic shape of `ty`.
    GenericTypeToken { token: TypeReference, ty: TypeReference },
    /// A constant of an enumerated type.
    Constant { ty: TypeReference, name: String },
    /// A method call, optionally on a receiver; static calls use [`Expr::TypeName`].
    Call {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<Expr>>,
        method: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<Expr>,
    },
    /// A type used as a static receiver.
    TypeName { ty: TypeReference },
    /// Instance creation.
    New {
        ty: TypeReference,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str {
            value: value.into(),
        }
    }

    /// Call `method` on `receiver`.
    pub fn call(receiver: Expr, method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(receiver)),
            method: method.into(),
            arguments,
        }
    }

    /// Call a static `method` on `ty`.
    pub fn call_static(ty: TypeReference, method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self::call(Expr::TypeName { ty }, method, arguments)
    }

    /// Call an unqualified `method`.
    pub fn call_local(method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: None,
            method: method.into(),
            arguments,
        }
    }

    /// Visit every type this expression mentions.
    pub fn visit_types<'a>(&'a self, visit: &mut impl FnMut(&'a TypeReference)) {
        match self {
            Expr::Ident { .. } | Expr::Super | Expr::Str { .. } => {}
            Expr::ClassToken { ty } | Expr::Constant { ty, .. } | Expr::TypeName { ty } => {
                ty.walk(visit)
            }
            Expr::GenericTypeToken { token, ty } => {
                token.walk(visit);
                ty.walk(visit);
            }
            Expr::Call {
                receiver,
                arguments,
                ..
            } => {
                if let Some(receiver) = receiver {
                    receiver.visit_types(visit);
                }
                for argument in arguments {
                    argument.visit_types(visit);
                }
            }
            Expr::New { ty, arguments } => {
                ty.walk(visit);
                for argument in arguments {
                    argument.visit_types(visit);
                }
            }
        }
    }
}

/// Statement inside a generated body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// Declare and initialise a local.
    Let {
        name: String,
        ty: TypeReference,
        value: Expr,
    },
    /// Evaluate an expression for its effect.
    Expr { expr: Expr },
    /// Return a value.
    Return { expr: Expr },
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationSpec>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeReference,
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expr>,
}

/// A method (or constructor) with a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,

    /// Constructors have no return type and are named after the artifact.
    #[serde(default)]
    pub constructor: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationSpec>,

    pub modifiers: Vec<Modifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,

    /// Return type; `None` means no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeReference>,

    pub body: Vec<Statement>,
}

impl MethodSpec {
    /// A public method with no parameters, annotations or body.
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: false,
            doc: None,
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            parameters: Vec::new(),
            returns: None,
            body: Vec::new(),
        }
    }

    /// A public constructor.
    pub fn public_constructor() -> Self {
        Self {
            constructor: true,
            ..Self::public("<init>")
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationSpec> {
        self.annotations.iter().find(|a| a.ty.name() == name)
    }
}

/// Whether a supertype is extended or implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupertypeRelation {
    Extends,
    Implements,
}

/// A member of a generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Field(FieldSpec),
    Method(MethodSpec),
    Supertype {
        relation: SupertypeRelation,
        ty: TypeReference,
    },
}

/// One generated, self-contained unit of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    namespace: String,
    name: String,
    category: ArtifactCategory,
    annotations: Vec<AnnotationSpec>,
    members: Vec<Member>,
}

impl GeneratedArtifact {
    /// Build an artifact from its parts. The value is write-once.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        category: ArtifactCategory,
        annotations: Vec<AnnotationSpec>,
        members: Vec<Member>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            category,
            annotations,
            members,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ArtifactCategory {
        self.category
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Fully-qualified target name, the ledger key.
    pub fn qualified_name(&self) -> String {
        self.as_type().qualified_name()
    }

    /// A type reference naming this artifact.
    pub fn as_type(&self) -> TypeReference {
        TypeReference::simple(self.namespace.clone(), self.name.clone())
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationSpec> {
        self.annotations.iter().find(|a| a.ty.name() == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Methods and constructors, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    /// Methods that are not constructors.
    pub fn operations(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods().filter(|m| !m.constructor)
    }

    pub fn supertypes(&self) -> impl Iterator<Item = (SupertypeRelation, &TypeReference)> {
        self.members.iter().filter_map(|m| match m {
            Member::Supertype { relation, ty } => Some((*relation, ty)),
            _ => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods().find(|m| m.name == name)
    }
}
