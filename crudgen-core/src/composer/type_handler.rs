//! JSON type handler template.
//!
//! A type handler stores values of one (possibly generic) type as JSON text
//! in a character column. Its name is the flattened type name plus
//! [`TYPE_HANDLER_SUFFIX`], so `List<String>` gets `ListOfStringTypeHandler`
//! no matter whether the trigger was a class or a field of that type.

use super::well_known as wk;
use super::ArtifactTemplate;
use crate::ir::{
    AnnotatedDeclaration, AnnotationSpec, AnnotationValue, ArtifactCategory, DirectiveKind, Expr,
    FieldSpec, GeneratedArtifact, GenerationDirective, Member, MethodSpec, Modifier,
    ParameterSpec, Statement, SupertypeRelation, TypeReference,
};
use crate::naming::flattened_name;

pub const TYPE_HANDLER_SUFFIX: &str = "TypeHandler";

/// Storage column types every handler binds to.
pub const JDBC_TYPES: [&str; 2] = ["VARCHAR", "LONGVARCHAR"];

/// One step of the codec configuration applied in the handler constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSetting {
    /// Support temporal types.
    RegisterJavaTime,
    /// Write temporal values as text, not numeric timestamps.
    NoNumericTimestamps,
    /// Support optional-value types.
    RegisterJdk8,
    /// Do not fail on empty target objects.
    AllowEmptyBeans,
    /// Tolerate unknown input fields.
    IgnoreUnknownProperties,
    /// Tolerate null for primitive targets.
    AllowNullPrimitives,
    /// Treat empty strings as absent values.
    EmptyStringAsNull,
    /// Accept numeric input for enums.
    AllowNumbersForEnums,
    /// Null list content becomes empty.
    ListContentNullsAsEmpty,
    /// Null list values become empty lists.
    ListNullsAsEmpty,
}

/// The fixed codec policy, in application order.
pub const CODEC_POLICY: [CodecSetting; 10] = [
    CodecSetting::RegisterJavaTime,
    CodecSetting::NoNumericTimestamps,
    CodecSetting::RegisterJdk8,
    CodecSetting::AllowEmptyBeans,
    CodecSetting::IgnoreUnknownProperties,
    CodecSetting::AllowNullPrimitives,
    CodecSetting::EmptyStringAsNull,
    CodecSetting::AllowNumbersForEnums,
    CodecSetting::ListContentNullsAsEmpty,
    CodecSetting::ListNullsAsEmpty,
];

fn mapper() -> Expr {
    Expr::ident("mapper")
}

fn constant(ty: TypeReference, name: &str) -> Expr {
    Expr::Constant {
        ty,
        name: name.to_string(),
    }
}

impl CodecSetting {
    /// The configuration call on the codec field.
    pub fn statement(self) -> Statement {
        let toggle = |method: &str, feature: TypeReference, name: &str| {
            Expr::call(mapper(), method, vec![constant(feature, name)])
        };
        let register = |module: TypeReference| {
            Expr::call(
                mapper(),
                "registerModule",
                vec![Expr::New {
                    ty: module,
                    arguments: vec![],
                }],
            )
        };
        let list_nulls = |setter: &str| {
            Expr::call(
                Expr::call(
                    mapper(),
                    "configOverride",
                    vec![Expr::ClassToken { ty: wk::list() }],
                ),
                "setSetterInfo",
                vec![Expr::call_static(
                    wk::json_setter_value(),
                    setter,
                    vec![constant(wk::nulls(), "AS_EMPTY")],
                )],
            )
        };

        let expr = match self {
            CodecSetting::RegisterJavaTime => register(wk::java_time_module()),
            CodecSetting::NoNumericTimestamps => {
                toggle("disable", wk::serialization_feature(), "WRITE_DATES_AS_TIMESTAMPS")
            }
            CodecSetting::RegisterJdk8 => register(wk::jdk8_module()),
            CodecSetting::AllowEmptyBeans => {
                toggle("disable", wk::serialization_feature(), "FAIL_ON_EMPTY_BEANS")
            }
            CodecSetting::IgnoreUnknownProperties => toggle(
                "disable",
                wk::deserialization_feature(),
                "FAIL_ON_UNKNOWN_PROPERTIES",
            ),
            CodecSetting::AllowNullPrimitives => toggle(
                "disable",
                wk::deserialization_feature(),
                "FAIL_ON_NULL_FOR_PRIMITIVES",
            ),
            CodecSetting::EmptyStringAsNull => toggle(
                "enable",
                wk::deserialization_feature(),
                "ACCEPT_EMPTY_STRING_AS_NULL_OBJECT",
            ),
            CodecSetting::AllowNumbersForEnums => toggle(
                "disable",
                wk::deserialization_feature(),
                "FAIL_ON_NUMBERS_FOR_ENUMS",
            ),
            CodecSetting::ListContentNullsAsEmpty => list_nulls("forContentNulls"),
            CodecSetting::ListNullsAsEmpty => list_nulls("forValueNulls"),
        };
        Statement::Expr { expr }
    }
}

/// Template for [`DirectiveKind::TypeHandler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeHandlerTemplate;

fn constructor() -> MethodSpec {
    let mut body = vec![Statement::Expr {
        expr: Expr::call_local("super", vec![Expr::ident("type")]),
    }];
    body.extend(CODEC_POLICY.iter().map(|setting| setting.statement()));

    MethodSpec {
        parameters: vec![ParameterSpec::new("type", wk::class())],
        body,
        ..MethodSpec::public_constructor()
    }
}

fn codec_annotations() -> Vec<AnnotationSpec> {
    vec![
        AnnotationSpec::marker(wk::sneaky_throws()),
        AnnotationSpec::marker(wk::override_()),
    ]
}

fn parse(handled: &TypeReference) -> MethodSpec {
    // A class token erases type arguments; keep the full shape for generics.
    let token = if handled.is_parameterized() {
        Expr::GenericTypeToken {
            token: wk::type_token(),
            ty: handled.clone(),
        }
    } else {
        Expr::ClassToken {
            ty: handled.clone(),
        }
    };

    MethodSpec {
        annotations: codec_annotations(),
        parameters: vec![ParameterSpec::new("json", wk::string())],
        returns: Some(handled.clone()),
        body: vec![Statement::Return {
            expr: Expr::call(mapper(), "readValue", vec![Expr::ident("json"), token]),
        }],
        ..MethodSpec::public("parse")
    }
}

fn to_json(handled: &TypeReference) -> MethodSpec {
    MethodSpec {
        annotations: codec_annotations(),
        parameters: vec![ParameterSpec::new("obj", handled.clone())],
        returns: Some(wk::string()),
        body: vec![Statement::Return {
            expr: Expr::call(mapper(), "writeValueAsString", vec![Expr::ident("obj")]),
        }],
        ..MethodSpec::public("toJson")
    }
}

impl ArtifactTemplate for TypeHandlerTemplate {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::TypeHandler
    }

    fn target_name(&self, declaration: &AnnotatedDeclaration) -> String {
        format!("{}{}", flattened_name(&declaration.ty), TYPE_HANDLER_SUFFIX)
    }

    fn compose(&self, namespace: &str, directive: &GenerationDirective) -> GeneratedArtifact {
        let declaration = directive.declaration();
        let handled = &declaration.ty;

        let jdbc_types = JDBC_TYPES
            .iter()
            .map(|name| AnnotationValue::Constant {
                ty: wk::jdbc_type(),
                name: name.to_string(),
            })
            .collect();

        let annotations = vec![
            AnnotationSpec::marker(wk::mapped_types())
                .with("value", AnnotationValue::Type(handled.raw())),
            AnnotationSpec::marker(wk::mapped_jdbc_types())
                .with("value", AnnotationValue::Array(jdbc_types)),
        ];

        let members = vec![
            Member::Supertype {
                relation: SupertypeRelation::Extends,
                ty: wk::abstract_json_type_handler(handled.clone()),
            },
            Member::Field(FieldSpec {
                name: "mapper".to_string(),
                ty: wk::object_mapper(),
                modifiers: vec![Modifier::Private, Modifier::Final],
                initializer: Some(Expr::New {
                    ty: wk::object_mapper(),
                    arguments: vec![],
                }),
            }),
            Member::Method(constructor()),
            Member::Method(parse(handled)),
            Member::Method(to_json(handled)),
        ];

        GeneratedArtifact::new(
            namespace,
            self.target_name(declaration),
            ArtifactCategory::Class,
            annotations,
            members,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn order() -> Arc<AnnotatedDeclaration> {
        Arc::new(AnnotatedDeclaration::class("shop", "Order"))
    }

    fn tags_handler() -> GeneratedArtifact {
        let tags = AnnotatedDeclaration::field(
            order(),
            "tags",
            "java.util.List<java.lang.String>".parse().unwrap(),
        );
        let directive = GenerationDirective::new(DirectiveKind::TypeHandler, Arc::new(tags));
        TypeHandlerTemplate.compose("shop", &directive)
    }

    #[test]
    fn test_generic_handler_name() {
        assert_eq!(tags_handler().qualified_name(), "shop.ListOfStringTypeHandler");
    }

    #[test]
    fn test_mapped_types_use_raw_type() {
        let artifact = tags_handler();
        let mapped = artifact.annotation("MappedTypes").unwrap();
        assert_eq!(
            mapped.argument("value"),
            Some(&AnnotationValue::Type(TypeReference::simple("java.util", "List")))
        );

        let jdbc = artifact.annotation("MappedJdbcTypes").unwrap();
        match jdbc.argument("value") {
            Some(AnnotationValue::Array(values)) => assert_eq!(values.len(), 2),
            other => panic!("unexpected jdbc types: {:?}", other),
        }
    }

    #[test]
    fn test_parse_preserves_generic_shape() {
        let artifact = tags_handler();
        let parse = artifact.method("parse").unwrap();
        match &parse.body[0] {
            Statement::Return {
                expr: Expr::Call { arguments, .. },
            } => match &arguments[1] {
                Expr::GenericTypeToken { ty, .. } => {
                    assert_eq!(ty.to_string(), "java.util.List<java.lang.String>")
                }
                other => panic!("expected a generic type token, got {:?}", other),
            },
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_parse_plain_type_uses_class_token() {
        let directive = GenerationDirective::new(DirectiveKind::TypeHandler, order());
        let artifact = TypeHandlerTemplate.compose("shop", &directive);
        assert_eq!(artifact.name(), "OrderTypeHandler");

        let parse = artifact.method("parse").unwrap();
        assert_eq!(
            parse.body[0],
            Statement::Return {
                expr: Expr::call(
                    Expr::ident("mapper"),
                    "readValue",
                    vec![
                        Expr::ident("json"),
                        Expr::ClassToken {
                            ty: TypeReference::simple("shop", "Order")
                        },
                    ],
                ),
            }
        );
    }

    #[test]
    fn test_members() {
        let artifact = tags_handler();
        let field = artifact.field("mapper").unwrap();
        assert_eq!(field.modifiers, vec![Modifier::Private, Modifier::Final]);

        let constructor = artifact.methods().find(|m| m.constructor).unwrap();
        assert_eq!(constructor.body.len(), 1 + CODEC_POLICY.len());

        let names: Vec<&str> = artifact.operations().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["parse", "toJson"]);
    }
}
