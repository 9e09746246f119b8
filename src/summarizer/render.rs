//! Turns extracted nodes into `"<Label>: <name>"` lines.

use super::labels::{self, ELEMENT_PREVIEW_LABEL, RenderRule};
use super::syntax::SyntaxNode;

const MAX_PREVIEW_CHARS: usize = 50;
const MAX_SIGNATURE_CHARS: usize = 120;
const MAX_DECLARATOR_DEPTH: usize = 6;

/// Kinds that are themselves a name when reached through a `declarator` chain.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "qualified_identifier",
    "destructor_name",
    "operator_name",
];

/// Wrapper kinds that carry the name of their parent declaration (Go's
/// `type Foo struct{}` keeps `Foo` on the inner `type_spec`).
const SPEC_KINDS: &[&str] = &["type_spec", "type_alias"];

const MODIFIER_KINDS: &[&str] = &[
    "modifiers",
    "modifier",
    "visibility_modifier",
    "abstract_modifier",
    "final_modifier",
    "readonly_modifier",
];

/// Renders one node, or `None` when no name can be located for it.
pub fn render_node<N: SyntaxNode>(node: N, source: &str, signatures: bool) -> Option<String> {
    let kind = node.kind();
    let label = labels::label_for(kind);
    match labels::rule_for(kind) {
        RenderRule::Callable => render_callable(node, source, label, signatures),
        RenderRule::TypeLike => render_type_like(node, source, label),
        RenderRule::Element => render_element(node, source, label),
        RenderRule::StyleRule => render_style_rule(node, source, label),
        RenderRule::Invocation => render_invocation(node, source, label),
        RenderRule::Named => find_name(node, source).map(|name| format!("{label}: {name}")),
    }
}

fn render_callable<N: SyntaxNode>(
    node: N,
    source: &str,
    label: &str,
    signatures: bool,
) -> Option<String> {
    let name = find_name(node, source)?;
    let mut line = format!("{label}: {name}");
    if signatures {
        line.push_str(&signature_suffix(node, source));
    }
    Some(line)
}

fn render_type_like<N: SyntaxNode>(node: N, source: &str, label: &str) -> Option<String> {
    let name = find_name(node, source)?;
    let modifiers: Vec<&str> = node
        .named_children()
        .into_iter()
        .filter(|c| MODIFIER_KINDS.contains(&c.kind()))
        .filter_map(|c| c.text(source))
        .flat_map(str::split_whitespace)
        .filter(|word| !word.starts_with('@'))
        .collect();
    if modifiers.is_empty() {
        Some(format!("{label}: {name}"))
    } else {
        Some(format!("{label}: {} {name}", modifiers.join(" ")))
    }
}

fn render_element<N: SyntaxNode>(node: N, source: &str, label: &str) -> Option<String> {
    let tag = node
        .child_by_field("start_tag")
        .or_else(|| node.child_of_kind("start_tag"))
        .or_else(|| node.child_of_kind("self_closing_tag"));

    if let Some(tag) = tag {
        let tag_name = tag
            .child_by_field("tag_name")
            .or_else(|| tag.child_of_kind("tag_name"))
            .and_then(|n| n.text(source))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(tag_name) = tag_name {
            let attributes = tag
                .named_children()
                .into_iter()
                .filter(|c| c.kind() == "attribute")
                .count();
            return Some(match attributes {
                0 => format!("{label}: {tag_name}"),
                n => format!("{label}: {tag_name} ({n} {})", plural(n, "attribute")),
            });
        }
    }

    let preview = element_preview(node.text(source)?)?;
    Some(format!("{ELEMENT_PREVIEW_LABEL}: <{preview}>"))
}

/// Newline-stripped, truncated slice of an element's source.
fn element_preview(text: &str) -> Option<String> {
    let flat: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let inner = flat.trim().trim_start_matches('<');
    let preview: String = inner.chars().take(MAX_PREVIEW_CHARS).collect();
    let preview = preview.trim_end().trim_end_matches('>').to_string();
    (!preview.is_empty()).then_some(preview)
}

fn render_style_rule<N: SyntaxNode>(node: N, source: &str, label: &str) -> Option<String> {
    let selectors = node
        .child_by_field("selectors")
        .or_else(|| node.child_of_kind("selectors"))?;

    let parts: Vec<String> = selectors
        .named_children()
        .into_iter()
        .filter_map(|s| s.text(source))
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect();
    let selector_text = if parts.is_empty() {
        collapse_whitespace(selectors.text(source)?)
    } else {
        parts.join(", ")
    };
    if selector_text.is_empty() {
        return None;
    }

    let declarations = node
        .child_of_kind("block")
        .map(|block| {
            block
                .named_children()
                .into_iter()
                .filter(|c| c.kind() == "declaration")
                .count()
        })
        .unwrap_or(0);
    Some(format!(
        "{label}: {selector_text} ({declarations} {})",
        plural(declarations, "declaration")
    ))
}

fn render_invocation<N: SyntaxNode>(node: N, source: &str, label: &str) -> Option<String> {
    let callee = ["function", "method", "name"]
        .iter()
        .find_map(|field| node.child_by_field(field))
        .and_then(|n| n.text(source))
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())?;
    Some(format!("{label}: {callee}()"))
}

/// Finds a node's name: the `name` field, then a `declarator` chain, then the
/// wrapped `type_spec` children (a grouped `type ( .. )` names all of them).
pub fn find_name<N: SyntaxNode>(node: N, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field("name") {
        return non_empty_text(name, source);
    }

    let mut current = node;
    for _ in 0..MAX_DECLARATOR_DEPTH {
        let Some(declarator) = current.child_by_field("declarator") else {
            break;
        };
        if IDENTIFIER_KINDS.contains(&declarator.kind()) {
            return non_empty_text(declarator, source);
        }
        if let Some(name) = declarator.child_by_field("name") {
            return non_empty_text(name, source);
        }
        current = declarator;
    }

    let names: Vec<String> = node
        .named_children()
        .into_iter()
        .filter(|c| SPEC_KINDS.contains(&c.kind()))
        .filter_map(|spec| spec.child_by_field("name"))
        .filter_map(|name| non_empty_text(name, source))
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

/// `"(params)"` and `" -> ret"` when the node has them.
fn signature_suffix<N: SyntaxNode>(node: N, source: &str) -> String {
    let mut suffix = String::new();

    if let Some(params) = field_along_declarators(node, "parameters").and_then(|p| p.text(source))
    {
        let params = collapse_whitespace(params);
        let params = if params.starts_with('(') {
            params
        } else {
            format!("({params})")
        };
        suffix.push_str(&truncate_chars(&params, MAX_SIGNATURE_CHARS));
    }

    let ret = field_along_declarators(node, "return_type")
        .or_else(|| node.child_by_field("result"))
        .and_then(|r| r.text(source))
        .map(|r| {
            collapse_whitespace(r)
                .trim_start_matches("->")
                .trim_start_matches(':')
                .trim()
                .to_string()
        })
        .filter(|r| !r.is_empty());
    if let Some(ret) = ret {
        suffix.push_str(" -> ");
        suffix.push_str(&truncate_chars(&ret, MAX_SIGNATURE_CHARS));
    }

    suffix
}

/// Looks for `field` on the node, then down its `declarator` chain (C++ keeps
/// parameters on the inner `function_declarator`).
fn field_along_declarators<N: SyntaxNode>(node: N, field: &str) -> Option<N> {
    let mut current = node;
    for _ in 0..MAX_DECLARATOR_DEPTH {
        if let Some(found) = current.child_by_field(field) {
            return Some(found);
        }
        current = current.child_by_field("declarator")?;
    }
    None
}

fn non_empty_text<N: SyntaxNode>(node: N, source: &str) -> Option<String> {
    let text = collapse_whitespace(node.text(source)?);
    (!text.is_empty()).then_some(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
