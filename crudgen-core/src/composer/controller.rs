//! CRUD controller template.
//!
//! The controller owns one repository-service field and exposes eight
//! operations, each a thin delegation to that repository or to the base
//! controller's spreadsheet helpers.

use super::repository::REPOSITORY_SUFFIX;
use super::well_known as wk;
use super::ArtifactTemplate;
use crate::ir::{
    AnnotatedDeclaration, AnnotationSpec, AnnotationValue, ArtifactCategory, DirectiveKind, Expr,
    FieldSpec, GeneratedArtifact, GenerationDirective, Member, MethodSpec, Modifier,
    ParameterSpec, Statement, SupertypeRelation, TypeReference,
};
use crate::naming::bean_name;
use crate::package::is_blank;

pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Template for [`DirectiveKind::Controller`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerTemplate;

/// Values shared by every operation of one controller.
struct Context {
    entity: TypeReference,
    repository: String,
    description: String,
}

impl Context {
    fn repo(&self) -> Expr {
        Expr::ident(self.repository.clone())
    }

    /// Audit and summary annotations, e.g. `Orders-添加`.
    fn audited(&self, label: &str) -> Vec<AnnotationSpec> {
        let text = format!("{}-{}", self.description, label);
        vec![
            AnnotationSpec::marker(wk::auto_log())
                .with("value", AnnotationValue::Str(text.clone())),
            AnnotationSpec::marker(wk::operation()).with("summary", AnnotationValue::Str(text)),
        ]
    }

    fn ok(&self, value: Expr) -> Statement {
        Statement::Return {
            expr: Expr::call_static(wk::result_raw(), "OK", vec![value]),
        }
    }
}

fn mapping(ty: TypeReference, path: &str) -> AnnotationSpec {
    AnnotationSpec::marker(ty).with("value", AnnotationValue::Str(path.to_string()))
}

fn required_param(name: &str) -> ParameterSpec {
    ParameterSpec::new(name, wk::string()).annotated(
        AnnotationSpec::marker(wk::request_param())
            .with("name", AnnotationValue::Str(name.to_string()))
            .with("required", AnnotationValue::Bool(true)),
    )
}

fn paging_param(name: &str, default: &str) -> ParameterSpec {
    ParameterSpec::new(name, wk::integer()).annotated(
        AnnotationSpec::marker(wk::request_param())
            .with("name", AnnotationValue::Str(name.to_string()))
            .with("defaultValue", AnnotationValue::Str(default.to_string())),
    )
}

fn body_param(entity: &TypeReference) -> ParameterSpec {
    ParameterSpec::new("entity", entity.clone())
        .annotated(AnnotationSpec::marker(wk::request_body()))
}

fn operation(name: &str, doc: &str, annotations: Vec<AnnotationSpec>) -> MethodSpec {
    MethodSpec {
        doc: Some(doc.to_string()),
        annotations,
        ..MethodSpec::public(name)
    }
}

fn query_page_list(ctx: &Context) -> MethodSpec {
    let entity = &ctx.entity;
    let mut annotations = ctx.audited("分页列表查询");
    annotations.push(mapping(wk::get_mapping(), "/list"));

    MethodSpec {
        parameters: vec![
            ParameterSpec::new("entity", entity.clone()),
            paging_param("pageNo", "1"),
            paging_param("pageSize", "10"),
            ParameterSpec::new("request", wk::http_request()),
        ],
        returns: Some(wk::result(wk::ipage(entity.clone()))),
        body: vec![
            Statement::Let {
                name: "queryWrapper".to_string(),
                ty: wk::query_wrapper(entity.clone()),
                value: Expr::call_static(
                    wk::query_generator(),
                    "initQueryWrapper",
                    vec![
                        Expr::ident("entity"),
                        Expr::call(Expr::ident("request"), "getParameterMap", vec![]),
                    ],
                ),
            },
            Statement::Let {
                name: "page".to_string(),
                ty: wk::page(entity.clone()),
                value: Expr::New {
                    ty: wk::page(entity.clone()),
                    arguments: vec![Expr::ident("pageNo"), Expr::ident("pageSize")],
                },
            },
            Statement::Let {
                name: "pageList".to_string(),
                ty: wk::ipage(entity.clone()),
                value: Expr::call(
                    ctx.repo(),
                    "page",
                    vec![Expr::ident("page"), Expr::ident("queryWrapper")],
                ),
            },
            ctx.ok(Expr::ident("pageList")),
        ],
        ..operation("queryPageList", "分页列表查询", annotations)
    }
}

fn add(ctx: &Context) -> MethodSpec {
    let mut annotations = ctx.audited("添加");
    annotations.push(mapping(wk::post_mapping(), "/add"));

    MethodSpec {
        parameters: vec![body_param(&ctx.entity)],
        returns: Some(wk::result(wk::string())),
        body: vec![
            Statement::Expr {
                expr: Expr::call(ctx.repo(), "save", vec![Expr::ident("entity")]),
            },
            ctx.ok(Expr::str("添加成功！")),
        ],
        ..operation("add", "添加", annotations)
    }
}

fn edit(ctx: &Context) -> MethodSpec {
    let method = |name: &str| AnnotationValue::Constant {
        ty: wk::request_method(),
        name: name.to_string(),
    };
    let mut annotations = ctx.audited("编辑");
    annotations.push(
        mapping(wk::request_mapping(), "/edit")
            .with("method", AnnotationValue::Array(vec![method("PUT"), method("POST")])),
    );

    MethodSpec {
        parameters: vec![body_param(&ctx.entity)],
        returns: Some(wk::result(wk::string())),
        body: vec![
            Statement::Expr {
                expr: Expr::call(ctx.repo(), "updateById", vec![Expr::ident("entity")]),
            },
            ctx.ok(Expr::str("编辑成功!")),
        ],
        ..operation("edit", "编辑", annotations)
    }
}

fn delete(ctx: &Context) -> MethodSpec {
    let mut annotations = ctx.audited("通过id删除");
    annotations.push(mapping(wk::delete_mapping(), "/delete"));

    MethodSpec {
        parameters: vec![required_param("id")],
        returns: Some(wk::result(wk::string())),
        body: vec![
            Statement::Expr {
                expr: Expr::call(ctx.repo(), "removeById", vec![Expr::ident("id")]),
            },
            ctx.ok(Expr::str("删除成功!")),
        ],
        ..operation("delete", "通过id删除", annotations)
    }
}

fn delete_batch(ctx: &Context) -> MethodSpec {
    let mut annotations = ctx.audited("批量删除");
    annotations.push(mapping(wk::delete_mapping(), "/deleteBatch"));

    let ids = Expr::call_static(
        wk::arrays(),
        "asList",
        vec![Expr::call(Expr::ident("ids"), "split", vec![Expr::str(",")])],
    );

    MethodSpec {
        parameters: vec![required_param("ids")],
        returns: Some(wk::result(wk::string())),
        body: vec![
            Statement::Expr {
                expr: Expr::call(ctx.repo(), "removeByIds", vec![ids]),
            },
            ctx.ok(Expr::str("批量删除成功!")),
        ],
        ..operation("deleteBatch", "批量删除", annotations)
    }
}

fn query_by_id(ctx: &Context) -> MethodSpec {
    let mut annotations = ctx.audited("通过id查询");
    annotations.push(mapping(wk::get_mapping(), "/queryById"));

    MethodSpec {
        parameters: vec![required_param("id")],
        returns: Some(wk::result(ctx.entity.clone())),
        body: vec![
            Statement::Let {
                name: "entity".to_string(),
                ty: ctx.entity.clone(),
                value: Expr::call(ctx.repo(), "getById", vec![Expr::ident("id")]),
            },
            ctx.ok(Expr::ident("entity")),
        ],
        ..operation("queryById", "通过id查询", annotations)
    }
}

fn export_excel(ctx: &Context) -> MethodSpec {
    MethodSpec {
        parameters: vec![
            ParameterSpec::new("request", wk::http_request()),
            ParameterSpec::new("entity", ctx.entity.clone()),
        ],
        returns: Some(wk::model_and_view()),
        body: vec![Statement::Return {
            expr: Expr::call(
                Expr::Super,
                "exportXls",
                vec![
                    Expr::ident("request"),
                    Expr::ident("entity"),
                    Expr::ClassToken {
                        ty: ctx.entity.raw(),
                    },
                    Expr::str("ok"),
                ],
            ),
        }],
        ..operation(
            "exportExcel",
            "导出excel",
            vec![mapping(wk::request_mapping(), "/exportXls")],
        )
    }
}

fn import_excel(ctx: &Context) -> MethodSpec {
    MethodSpec {
        parameters: vec![
            ParameterSpec::new("request", wk::http_request()),
            ParameterSpec::new("response", wk::http_response()),
        ],
        returns: Some(wk::result(wk::wildcard())),
        body: vec![Statement::Return {
            expr: Expr::call(
                Expr::Super,
                "importExcel",
                vec![
                    Expr::ident("request"),
                    Expr::ident("response"),
                    Expr::ClassToken {
                        ty: ctx.entity.raw(),
                    },
                ],
            ),
        }],
        ..operation(
            "importExcel",
            "通过excel导入数据",
            vec![mapping(wk::post_mapping(), "/importExcel")],
        )
    }
}

impl ArtifactTemplate for ControllerTemplate {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Controller
    }

    fn target_name(&self, declaration: &AnnotatedDeclaration) -> String {
        format!("{}{}", declaration.name, CONTROLLER_SUFFIX)
    }

    fn compose(&self, namespace: &str, directive: &GenerationDirective) -> GeneratedArtifact {
        let declaration = directive.declaration();
        let entity = declaration.ty.clone();

        let repository_type = TypeReference::simple(
            namespace,
            format!("{}{}", declaration.name, REPOSITORY_SUFFIX),
        );
        let description = match directive.value() {
            Some(value) if !is_blank(Some(value)) => value.to_string(),
            _ => declaration.name.clone(),
        };
        let ctx = Context {
            entity: entity.clone(),
            repository: bean_name(repository_type.name()),
            description,
        };

        let annotations = vec![
            AnnotationSpec::marker(wk::tag())
                .with("name", AnnotationValue::Str(ctx.description.clone())),
            AnnotationSpec::marker(wk::rest_controller()),
            AnnotationSpec::marker(wk::request_mapping())
                .with("value", AnnotationValue::Str(String::new())),
            AnnotationSpec::marker(wk::required_args_constructor()),
        ];

        let mut members = vec![
            Member::Supertype {
                relation: SupertypeRelation::Extends,
                ty: wk::base_controller(entity.clone(), repository_type.clone()),
            },
            Member::Field(FieldSpec {
                name: "logger".to_string(),
                ty: wk::logger(),
                modifiers: vec![Modifier::Private, Modifier::Static, Modifier::Final],
                initializer: Some(Expr::call_static(
                    wk::logger_factory(),
                    "getLogger",
                    vec![Expr::ClassToken { ty: entity.raw() }],
                )),
            }),
            Member::Field(FieldSpec {
                name: ctx.repository.clone(),
                ty: repository_type,
                modifiers: vec![Modifier::Private, Modifier::Final],
                initializer: None,
            }),
        ];

        members.extend(
            [
                query_page_list(&ctx),
                add(&ctx),
                edit(&ctx),
                delete(&ctx),
                delete_batch(&ctx),
                query_by_id(&ctx),
                export_excel(&ctx),
                import_excel(&ctx),
            ]
            .into_iter()
            .map(Member::Method),
        );

        GeneratedArtifact::new(
            namespace,
            self.target_name(declaration),
            ArtifactCategory::Class,
            annotations,
            members,
        )
    }
}
