//! Java source renderer.
//!
//! Produces one compilation unit per artifact. Types are imported and
//! spelled by simple name unless they live in `java.lang` or in the
//! artifact's own namespace (no import needed), or their simple name is
//! already taken by an earlier type (spelled fully qualified).

use std::collections::{BTreeSet, HashMap};

use super::{ArtifactRenderer, RenderConfig};
use crate::error::RenderError;
use crate::ir::{
    AnnotationSpec, AnnotationValue, ArtifactCategory, Expr, FieldSpec, GeneratedArtifact, Member,
    MethodSpec, Modifier, ParameterSpec, Statement, SupertypeRelation, TypeReference,
};

const IMPLICIT_NAMESPACE: &str = "java.lang";

/// Java-flavoured source renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaRenderer;

impl JavaRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for JavaRenderer {
    fn id(&self) -> &'static str {
        "java"
    }

    fn name(&self) -> &'static str {
        "Java Source"
    }

    fn file_extension(&self) -> &'static str {
        "java"
    }

    fn render(
        &self,
        artifact: &GeneratedArtifact,
        config: &RenderConfig,
    ) -> Result<String, RenderError> {
        Ok(Unit::new(artifact, config).render())
    }
}

/// Outer simple name and its qualified form; `JsonSetter.Value` is imported
/// through `JsonSetter`.
fn outer_name(ty: &TypeReference) -> (&str, String) {
    let outer = ty.name().split('.').next().unwrap_or(ty.name());
    (outer, format!("{}.{}", ty.namespace(), outer))
}

fn annotation_types<'a>(annotation: &'a AnnotationSpec, out: &mut Vec<&'a TypeReference>) {
    fn value_types<'a>(value: &'a AnnotationValue, out: &mut Vec<&'a TypeReference>) {
        match value {
            AnnotationValue::Str(_) | AnnotationValue::Bool(_) => {}
            AnnotationValue::Type(ty) | AnnotationValue::Constant { ty, .. } => {
                ty.walk(&mut |t| out.push(t))
            }
            AnnotationValue::Array(values) => {
                for value in values {
                    value_types(value, out);
                }
            }
        }
    }

    annotation.ty.walk(&mut |t| out.push(t));
    for (_, value) in &annotation.arguments {
        value_types(value, out);
    }
}

fn expr_types<'a>(expr: &'a Expr, out: &mut Vec<&'a TypeReference>) {
    expr.visit_types(&mut |t| out.push(t));
}

/// Every type the artifact mentions, in source order.
fn referenced_types(artifact: &GeneratedArtifact) -> Vec<&TypeReference> {
    let mut types = Vec::new();
    for annotation in artifact.annotations() {
        annotation_types(annotation, &mut types);
    }
    for member in artifact.members() {
        match member {
            Member::Supertype { ty, .. } => ty.walk(&mut |t| types.push(t)),
            Member::Field(field) => {
                field.ty.walk(&mut |t| types.push(t));
                if let Some(init) = &field.initializer {
                    expr_types(init, &mut types);
                }
            }
            Member::Method(method) => {
                for annotation in &method.annotations {
                    annotation_types(annotation, &mut types);
                }
                for parameter in &method.parameters {
                    for annotation in &parameter.annotations {
                        annotation_types(annotation, &mut types);
                    }
                    parameter.ty.walk(&mut |t| types.push(t));
                }
                if let Some(returns) = &method.returns {
                    returns.walk(&mut |t| types.push(t));
                }
                for statement in &method.body {
                    match statement {
                        Statement::Let { ty, value, .. } => {
                            ty.walk(&mut |t| types.push(t));
                            expr_types(value, &mut types);
                        }
                        Statement::Expr { expr } | Statement::Return { expr } => {
                            expr_types(expr, &mut types)
                        }
                    }
                }
            }
        }
    }
    types
}

/// One compilation unit being rendered.
struct Unit<'a> {
    artifact: &'a GeneratedArtifact,
    config: &'a RenderConfig,
    /// Simple name -> qualified name it is bound to.
    bound: HashMap<String, String>,
    imports: BTreeSet<String>,
}

impl<'a> Unit<'a> {
    fn new(artifact: &'a GeneratedArtifact, config: &'a RenderConfig) -> Self {
        let mut unit = Self {
            artifact,
            config,
            bound: HashMap::new(),
            imports: BTreeSet::new(),
        };
        unit.bound
            .insert(artifact.name().to_string(), artifact.qualified_name());

        for ty in referenced_types(artifact) {
            if ty.namespace().is_empty() {
                continue;
            }
            let (outer, qualified) = outer_name(ty);
            if unit.bound.contains_key(outer) {
                continue;
            }
            unit.bound.insert(outer.to_string(), qualified.clone());
            if ty.namespace() != IMPLICIT_NAMESPACE && ty.namespace() != artifact.namespace() {
                unit.imports.insert(qualified);
            }
        }
        unit
    }

    fn indent(&self, depth: usize) -> String {
        self.config.indent.indent(depth)
    }

    fn raw_type(&self, ty: &TypeReference) -> String {
        if ty.namespace().is_empty() {
            return ty.name().to_string();
        }
        let (outer, qualified) = outer_name(ty);
        match self.bound.get(outer) {
            Some(bound) if *bound == qualified => ty.name().to_string(),
            _ => ty.qualified_name(),
        }
    }

    fn type_name(&self, ty: &TypeReference) -> String {
        let mut name = self.raw_type(ty);
        if ty.is_parameterized() {
            let arguments: Vec<String> = ty.arguments().iter().map(|a| self.type_name(a)).collect();
            name.push('<');
            name.push_str(&arguments.join(", "));
            name.push('>');
        }
        name
    }

    fn value(&self, value: &AnnotationValue) -> String {
        match value {
            AnnotationValue::Str(s) => quote(s),
            AnnotationValue::Bool(b) => b.to_string(),
            AnnotationValue::Type(ty) => format!("{}.class", self.raw_type(ty)),
            AnnotationValue::Constant { ty, name } => format!("{}.{}", self.raw_type(ty), name),
            AnnotationValue::Array(values) => {
                let values: Vec<String> = values.iter().map(|v| self.value(v)).collect();
                format!("{{{}}}", values.join(", "))
            }
        }
    }

    fn annotation(&self, annotation: &AnnotationSpec) -> String {
        let name = format!("@{}", self.raw_type(&annotation.ty));
        match annotation.arguments.as_slice() {
            [] => name,
            [(key, value)] if key == "value" => format!("{}({})", name, self.value(value)),
            arguments => {
                let arguments: Vec<String> = arguments
                    .iter()
                    .map(|(key, value)| format!("{} = {}", key, self.value(value)))
                    .collect();
                format!("{}({})", name, arguments.join(", "))
            }
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Ident { name } => name.clone(),
            Expr::Super => "super".to_string(),
            Expr::Str { value } => quote(value),
            Expr::ClassToken { ty } => format!("{}.class", self.raw_type(ty)),
            Expr::GenericTypeToken { token, ty } => {
                format!("new {}<{}>() {{}}", self.raw_type(token), self.type_name(ty))
            }
            Expr::Constant { ty, name } => format!("{}.{}", self.raw_type(ty), name),
            Expr::TypeName { ty } => self.raw_type(ty),
            Expr::Call {
                receiver,
                method,
                arguments,
            } => {
                let call = format!("{}({})", method, self.arguments(arguments));
                match receiver {
                    Some(receiver) => format!("{}.{}", self.expr(receiver), call),
                    None => call,
                }
            }
            Expr::New { ty, arguments } => {
                let ty = if ty.is_parameterized() {
                    format!("{}<>", self.raw_type(ty))
                } else {
                    self.raw_type(ty)
                };
                format!("new {}({})", ty, self.arguments(arguments))
            }
        }
    }

    fn arguments(&self, arguments: &[Expr]) -> String {
        arguments
            .iter()
            .map(|a| self.expr(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::Let { name, ty, value } => {
                format!("{} {} = {};", self.type_name(ty), name, self.expr(value))
            }
            Statement::Expr { expr } => format!("{};", self.expr(expr)),
            Statement::Return { expr } => format!("return {};", self.expr(expr)),
        }
    }

    fn parameter(&self, parameter: &ParameterSpec) -> String {
        let mut parts: Vec<String> = parameter
            .annotations
            .iter()
            .map(|a| self.annotation(a))
            .collect();
        parts.push(self.type_name(&parameter.ty));
        parts.push(parameter.name.clone());
        parts.join(" ")
    }

    fn field(&self, field: &FieldSpec, out: &mut String) {
        let mut line = self.indent(1);
        line.push_str(&modifiers(&field.modifiers));
        line.push_str(&self.type_name(&field.ty));
        line.push(' ');
        line.push_str(&field.name);
        if let Some(init) = &field.initializer {
            line.push_str(" = ");
            line.push_str(&self.expr(init));
        }
        line.push_str(";\n");
        out.push_str(&line);
    }

    fn method(&self, method: &MethodSpec, out: &mut String) {
        let indent = self.indent(1);

        if let Some(doc) = method.doc.as_deref().filter(|_| self.config.generate_docs) {
            out.push_str(&format!("{}/**\n", indent));
            for line in doc.lines() {
                out.push_str(&format!("{} * {}\n", indent, line).replace(" * \n", " *\n"));
            }
            out.push_str(&format!("{} */\n", indent));
        }
        for annotation in &method.annotations {
            out.push_str(&format!("{}{}\n", indent, self.annotation(annotation)));
        }

        let signature = if method.constructor {
            self.artifact.name().to_string()
        } else {
            let returns = method
                .returns
                .as_ref()
                .map_or_else(|| "void".to_string(), |ty| self.type_name(ty));
            format!("{} {}", returns, method.name)
        };
        let parameters: Vec<String> = method.parameters.iter().map(|p| self.parameter(p)).collect();
        out.push_str(&format!(
            "{}{}{}({}) {{\n",
            indent,
            modifiers(&method.modifiers),
            signature,
            parameters.join(", ")
        ));

        for statement in &method.body {
            out.push_str(&format!("{}{}\n", self.indent(2), self.statement(statement)));
        }
        out.push_str(&format!("{}}}\n", indent));
    }

    fn header(&self) -> String {
        let keyword = match self.artifact.category() {
            ArtifactCategory::Class => "class",
            ArtifactCategory::Interface => "interface",
        };

        let supertypes = |relation: SupertypeRelation| -> Vec<String> {
            self.artifact
                .supertypes()
                .filter(|(r, _)| *r == relation)
                .map(|(_, ty)| self.type_name(ty))
                .collect()
        };

        let mut header = format!("public {} {}", keyword, self.artifact.name());
        let extends = supertypes(SupertypeRelation::Extends);
        if !extends.is_empty() {
            header.push_str(" extends ");
            header.push_str(&extends.join(", "));
        }
        if self.artifact.category() == ArtifactCategory::Class {
            let implements = supertypes(SupertypeRelation::Implements);
            if !implements.is_empty() {
                header.push_str(" implements ");
                header.push_str(&implements.join(", "));
            }
        }
        header.push_str(" {\n");
        header
    }

    fn render(&self) -> String {
        let mut out = String::new();

        if !self.artifact.namespace().is_empty() {
            out.push_str(&format!("package {};\n\n", self.artifact.namespace()));
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                out.push_str(&format!("import {};\n", import));
            }
            out.push('\n');
        }

        for annotation in self.artifact.annotations() {
            out.push_str(&self.annotation(annotation));
            out.push('\n');
        }
        out.push_str(&self.header());

        let fields: Vec<&FieldSpec> = self.artifact.fields().collect();
        for field in &fields {
            self.field(field, &mut out);
        }
        for (i, method) in self.artifact.methods().enumerate() {
            if i > 0 || !fields.is_empty() {
                out.push('\n');
            }
            self.method(method, &mut out);
        }

        out.push_str("}\n");
        out
    }
}

fn modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .map(|m| format!("{} ", m.as_str()))
        .collect()
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
