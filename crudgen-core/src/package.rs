//! Output namespace resolution.

use crate::ir::GenerationDirective;

/// Whether an optional override counts as absent.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Pick the first non-blank candidate, in order.
fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates.into_iter().find(|c| !is_blank(*c)).flatten()
}

/// Resolve the namespace a directive's artifact is placed in.
///
/// Precedence, first non-blank wins:
/// 1. the directive's explicit namespace override,
/// 2. its free-text value, for kinds where the value doubles as a namespace,
/// 3. the declaring namespace of the originating declaration (for fields,
///    of the enclosing class).
///
/// Total: always yields a namespace. Overrides are returned as written.
pub fn resolve_namespace(directive: &GenerationDirective) -> String {
    let value = if directive.kind().value_is_namespace() {
        directive.value()
    } else {
        None
    };

    first_non_blank([directive.namespace(), value])
        .unwrap_or_else(|| directive.declaration().declaring_namespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AnnotatedDeclaration, DirectiveKind};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn order() -> Arc<AnnotatedDeclaration> {
        Arc::new(AnnotatedDeclaration::class("shop", "Order"))
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n")));
        assert!(!is_blank(Some("shop")));
    }

    #[test]
    fn test_defaults_to_declaring_namespace() {
        let directive = GenerationDirective::new(DirectiveKind::Mapper, order());
        assert_eq!(resolve_namespace(&directive), "shop");
    }

    #[test]
    fn test_explicit_namespace_wins() {
        let directive = GenerationDirective::new(DirectiveKind::Mapper, order())
            .with_namespace("shop.mapper")
            .with_value("shop.other");
        assert_eq!(resolve_namespace(&directive), "shop.mapper");
    }

    #[test]
    fn test_value_is_namespace_fallback() {
        let directive = GenerationDirective::new(DirectiveKind::Repository, order())
            .with_namespace("   ")
            .with_value("shop.service");
        assert_eq!(resolve_namespace(&directive), "shop.service");
    }

    #[test]
    fn test_controller_value_is_not_a_namespace() {
        let directive =
            GenerationDirective::new(DirectiveKind::Controller, order()).with_value("Orders");
        assert_eq!(resolve_namespace(&directive), "shop");
    }

    #[test]
    fn test_field_uses_enclosing_namespace() {
        let field = AnnotatedDeclaration::field(
            order(),
            "tags",
            "java.util.List<java.lang.String>".parse().unwrap(),
        );
        let directive = GenerationDirective::new(DirectiveKind::TypeHandler, Arc::new(field));
        assert_eq!(resolve_namespace(&directive), "shop");
    }

    fn arb_override() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            "[ \t]{0,3}".prop_map(Some),
            "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}".prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn prop_precedence(namespace in arb_override(), value in arb_override()) {
            let mut directive = GenerationDirective::new(DirectiveKind::TypeHandler, order());
            if let Some(ns) = &namespace {
                directive = directive.with_namespace(ns.clone());
            }
            if let Some(v) = &value {
                directive = directive.with_value(v.clone());
            }

            let expected = if !is_blank(namespace.as_deref()) {
                namespace.clone().unwrap()
            } else if !is_blank(value.as_deref()) {
                value.clone().unwrap()
            } else {
                "shop".to_string()
            };

            prop_assert_eq!(resolve_namespace(&directive), expected);
        }
    }
}
