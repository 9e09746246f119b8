//! Regex-based summaries for files without a usable grammar.
//!
//! Known limitation: the stylesheet scan does not balance nested braces, so
//! nested SCSS blocks are reported by their innermost rule only, and the
//! parent's own declarations are not counted.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment regex"));

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("valid rule regex"));

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<template[^>]*>(.*)</template>").expect("valid template regex")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<script([^>]*)>(.*?)</script>").expect("valid script regex")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<style[^>]*>(.*?)</style>").expect("valid style regex")
});

static OPEN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][\w-]*").expect("valid tag regex"));

static COMPONENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bname\s*:\s*["']([^"']+)["']"#).expect("valid name regex")
});

/// `name(...) {`. A leading `function` keyword is captured separately so
/// plain function declarations can be told apart from object methods.
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(function)\s+)?([A-Za-z_$][\w$]*)\s*\([^()]*\)\s*\{")
        .expect("valid method regex")
});

static TYPED_LANG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\blang\s*=\s*["']tsx?["']"#).expect("valid lang regex")
});

/// Identifiers that look like `name(...) {` but are control flow.
const CONTROL_FLOW_KEYWORDS: &[&str] = &["if", "for", "while", "catch", "switch", "function"];

const ANONYMOUS_COMPONENT: &str = "Anonymous";

/// One `selector { declarations }` block found by the regex scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: usize,
}

/// Scans a stylesheet for flat rule blocks, in source order.
pub fn scan_style_rules(source: &str) -> Vec<StyleRule> {
    let stripped = COMMENT_RE.replace_all(source, "");
    RULE_RE
        .captures_iter(&stripped)
        .filter_map(|caps| {
            // Inside a nested block the capture also holds the parent's
            // declarations; the selector is what follows the last `;`.
            let raw = caps[1].rsplit(';').next().unwrap_or_default();
            let selector = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            let selector = selector.trim();
            if selector.is_empty() {
                return None;
            }
            let declarations = caps[2]
                .split(';')
                .filter(|d| d.contains(':'))
                .count();
            Some(StyleRule {
                selector: selector.to_string(),
                declarations,
            })
        })
        .collect()
}

pub fn summarize_stylesheet(source: &str, max: usize) -> Vec<String> {
    scan_style_rules(source)
        .into_iter()
        .take(max)
        .map(|rule| {
            let noun = if rule.declarations == 1 {
                "declaration"
            } else {
                "declarations"
            };
            format!("CSS Rule: {} ({} {noun})", rule.selector, rule.declarations)
        })
        .collect()
}

/// `<script>` block of a component file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptBlock<'s> {
    pub text: &'s str,
    pub typed: bool,
}

/// A `name(...) {` block in a component script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptMethod {
    pub name: String,
    /// Byte offset of the name within the script block.
    pub offset: usize,
}

/// Facts pulled out of a single-file component.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ComponentFacts<'s> {
    pub template_elements: Option<usize>,
    pub name: Option<String>,
    /// Object-style methods only. `function foo() {}` declarations are left
    /// to the script grammar.
    pub methods: Vec<ScriptMethod>,
    pub style_rules: Option<usize>,
    pub script: Option<ScriptBlock<'s>>,
}

impl<'s> ComponentFacts<'s> {
    pub fn scan(source: &'s str) -> Self {
        let mut facts = ComponentFacts::default();

        if let Some(caps) = TEMPLATE_RE.captures(source) {
            facts.template_elements = Some(OPEN_TAG_RE.find_iter(&caps[1]).count());
        }

        if let Some(caps) = SCRIPT_RE.captures(source) {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            facts.name = Some(
                COMPONENT_NAME_RE
                    .captures(body)
                    .map_or(ANONYMOUS_COMPONENT.to_string(), |c| c[1].to_string()),
            );
            facts.methods = METHOD_RE
                .captures_iter(body)
                .filter(|c| c.get(1).is_none())
                .filter_map(|c| c.get(2))
                .filter(|m| !CONTROL_FLOW_KEYWORDS.contains(&m.as_str()))
                .map(|m| ScriptMethod {
                    name: m.as_str().to_string(),
                    offset: m.start(),
                })
                .collect();
            facts.script = Some(ScriptBlock {
                text: body,
                typed: TYPED_LANG_RE.is_match(attrs),
            });
        }

        if let Some(caps) = STYLE_RE.captures(source) {
            facts.style_rules = Some(scan_style_rules(&caps[1]).len());
        }

        facts
    }

    /// Template and component-name lines.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(n) = self.template_elements {
            let noun = if n == 1 { "element" } else { "elements" };
            lines.push(format!("Vue Template: {n} {noun}"));
        }
        if let Some(name) = &self.name {
            lines.push(format!("Vue Component: {name}"));
        }
        lines
    }

    /// Method lines keyed by their offset in the script block.
    pub fn method_lines(&self) -> Vec<(usize, String)> {
        self.methods
            .iter()
            .map(|m| (m.offset, format!("Vue Method: {}", m.name)))
            .collect()
    }

    pub fn footer_lines(&self) -> Vec<String> {
        self.style_rules
            .map(|n| {
                let noun = if n == 1 { "rule" } else { "rules" };
                format!("Vue Styles: {n} {noun}")
            })
            .into_iter()
            .collect()
    }

    /// One line per fact, template first.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = self.header_lines();
        lines.extend(self.method_lines().into_iter().map(|(_, line)| line));
        lines.extend(self.footer_lines());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: &str = r#"<template>
  <div class="widget">
    <button @click="onClick">Go</button>
  </div>
</template>

<script>
export default {
  name: "Widget",
  methods: {
    onClick() {
      if (this.ready) {
        this.go();
      }
    },
    reset(value) {
      for (let i = 0; i < 3; i++) {}
    }
  }
}
</script>

<style scoped>
.widget { color: red; }
.widget button { padding: 2px; margin: 0; }
</style>
"#;

    #[test]
    fn test_stylesheet_rule_with_declaration_count() {
        assert_eq!(
            summarize_stylesheet(".btn { color: red; padding: 2px; }", 20),
            vec!["CSS Rule: .btn (2 declarations)"]
        );
    }

    #[test]
    fn test_stylesheet_comments_and_media() {
        let source = "/* header { x: y } */\n@media screen {\n  .a { color: blue }\n}\nb{}";
        let rules = scan_style_rules(source);
        assert_eq!(
            rules,
            vec![
                StyleRule {
                    selector: ".a".to_string(),
                    declarations: 1
                },
                StyleRule {
                    selector: "b".to_string(),
                    declarations: 0
                },
            ]
        );
    }

    #[test]
    fn test_nested_stylesheet_reports_inner_selector() {
        assert_eq!(
            summarize_stylesheet(".a { color: red; .b { x: y } }", 20),
            vec!["CSS Rule: .b (1 declaration)"]
        );
        let less = ".nav {\n  margin: 0;\n  padding: 0;\n  &:hover { color: blue; }\n}";
        assert_eq!(
            summarize_stylesheet(less, 20),
            vec!["CSS Rule: &:hover (1 declaration)"]
        );
    }

    #[test]
    fn test_stylesheet_cap() {
        let source = ".a{}".repeat(30);
        assert_eq!(summarize_stylesheet(&source, 20).len(), 20);
        assert!(summarize_stylesheet("", 20).is_empty());
    }

    #[test]
    fn test_component_facts() {
        let facts = ComponentFacts::scan(WIDGET);
        assert_eq!(facts.template_elements, Some(2));
        assert_eq!(facts.name.as_deref(), Some("Widget"));
        let names: Vec<&str> = facts.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["onClick", "reset"]);
        assert_eq!(facts.style_rules, Some(2));
        assert!(!facts.script.unwrap().typed);
    }

    #[test]
    fn test_component_summary_lines() {
        let lines = ComponentFacts::scan(WIDGET).summary_lines();
        assert_eq!(
            lines,
            vec![
                "Vue Template: 2 elements",
                "Vue Component: Widget",
                "Vue Method: onClick",
                "Vue Method: reset",
                "Vue Styles: 2 rules",
            ]
        );
    }

    #[test]
    fn test_function_declarations_are_not_methods() {
        let script = "<script>\nfunction helper(x) { return x; }\nconst f = function (y) { return y; };\nexport default { methods: { onClick() {} } }\n</script>";
        let facts = ComponentFacts::scan(script);
        assert_eq!(facts.methods.len(), 1);
        assert_eq!(facts.methods[0].name, "onClick");
        let body = facts.script.unwrap().text;
        assert!(body[facts.methods[0].offset..].starts_with("onClick"));
    }

    #[test]
    fn test_component_without_name_is_anonymous() {
        let facts = ComponentFacts::scan("<script lang=\"ts\">export default {}</script>");
        assert_eq!(facts.name.as_deref(), Some("Anonymous"));
        assert!(facts.script.unwrap().typed);
        assert!(facts.template_elements.is_none());
    }

    #[test]
    fn test_component_without_regions_is_empty() {
        let facts = ComponentFacts::scan("just some text");
        assert!(facts.summary_lines().is_empty());
        assert!(facts.script.is_none());
    }
}
