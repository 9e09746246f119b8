//! Display labels and render rules for summarizable syntax kinds.
//!
//! Kind identifiers come from the tree-sitter grammars. Several grammars share
//! identifiers (`function_declaration`, `class_declaration`, ...), so one entry
//! covers every language that uses it.

/// How the renderer locates the text of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRule {
    /// Functions and methods: name plus optional parameters and return type.
    Callable,
    /// Classes, structs, interfaces: optional modifiers before the name.
    TypeLike,
    /// Markup elements: tag name through the start tag.
    Element,
    /// Style rules: the full selector list.
    StyleRule,
    /// Call sites: the callee, rendered as `name()`.
    Invocation,
    /// Anything else: plain name lookup.
    Named,
}

/// A single row of the kind table.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxKindLabel {
    pub kind: &'static str,
    pub label: &'static str,
    pub rule: RenderRule,
}

const fn entry(kind: &'static str, label: &'static str, rule: RenderRule) -> SyntaxKindLabel {
    SyntaxKindLabel { kind, label, rule }
}

pub const KIND_LABELS: &[SyntaxKindLabel] = &[
    // callables
    entry("function_declaration", "Function", RenderRule::Callable),
    entry("function_definition", "Function", RenderRule::Callable),
    entry("function_item", "Function", RenderRule::Callable),
    entry("method_declaration", "Method", RenderRule::Callable),
    entry("method_definition", "Method", RenderRule::Callable),
    entry("method", "Method", RenderRule::Callable),
    entry("singleton_method", "Method", RenderRule::Callable),
    entry("constructor_declaration", "Constructor", RenderRule::Callable),
    // type-likes
    entry("class_declaration", "Class", RenderRule::TypeLike),
    entry("abstract_class_declaration", "Class", RenderRule::TypeLike),
    entry("class_definition", "Class", RenderRule::TypeLike),
    entry("class", "Class", RenderRule::TypeLike),
    entry("class_specifier", "Class", RenderRule::TypeLike),
    entry("struct_item", "Struct", RenderRule::TypeLike),
    entry("struct_specifier", "Struct", RenderRule::TypeLike),
    entry("struct_declaration", "Struct", RenderRule::TypeLike),
    entry("interface_declaration", "Interface", RenderRule::TypeLike),
    entry("trait_item", "Trait", RenderRule::TypeLike),
    entry("trait_declaration", "Trait", RenderRule::TypeLike),
    entry("enum_item", "Enum", RenderRule::TypeLike),
    entry("enum_declaration", "Enum", RenderRule::TypeLike),
    entry("module", "Module", RenderRule::TypeLike),
    entry("type_declaration", "Type", RenderRule::TypeLike),
    entry("type_alias_declaration", "Type", RenderRule::TypeLike),
    // markup and style
    entry("element", "HTML Tag", RenderRule::Element),
    entry("rule_set", "CSS Selector", RenderRule::StyleRule),
    // call sites
    entry("call_expression", "Call", RenderRule::Invocation),
    entry("call", "Call", RenderRule::Invocation),
    entry("method_invocation", "Call", RenderRule::Invocation),
    entry("invocation_expression", "Call", RenderRule::Invocation),
    entry("function_call_expression", "Call", RenderRule::Invocation),
];

/// Label used when an element has to be rendered from a text preview.
pub const ELEMENT_PREVIEW_LABEL: &str = "Element";

fn lookup(kind: &str) -> Option<&'static SyntaxKindLabel> {
    KIND_LABELS.iter().find(|e| e.kind == kind)
}

/// Display label for a kind; unknown kinds fall back to the raw identifier.
pub fn label_for(kind: &str) -> &str {
    lookup(kind).map_or(kind, |e| e.label)
}

pub fn rule_for(kind: &str) -> RenderRule {
    lookup(kind).map_or(RenderRule::Named, |e| e.rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_many_to_one() {
        assert_eq!(label_for("function_declaration"), "Function");
        assert_eq!(label_for("function_item"), "Function");
        assert_eq!(label_for("class_definition"), "Class");
        assert_eq!(label_for("class_specifier"), "Class");
    }

    #[test]
    fn test_unknown_kind_uses_identifier() {
        assert_eq!(label_for("lambda_expression"), "lambda_expression");
        assert_eq!(rule_for("lambda_expression"), RenderRule::Named);
    }

    #[test]
    fn test_rules() {
        assert_eq!(rule_for("method_definition"), RenderRule::Callable);
        assert_eq!(rule_for("struct_item"), RenderRule::TypeLike);
        assert_eq!(rule_for("element"), RenderRule::Element);
        assert_eq!(rule_for("rule_set"), RenderRule::StyleRule);
        assert_eq!(rule_for("call"), RenderRule::Invocation);
    }

    #[test]
    fn test_no_duplicate_kinds() {
        let mut seen = HashSet::new();
        for e in KIND_LABELS {
            assert!(seen.insert(e.kind), "duplicate kind {}", e.kind);
        }
    }
}
