use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use tree_sitter::{Language, Parser};
use tracing::warn;

use super::core::SummarizeError;
use super::syntax::ParsedFile;

/// A tree-sitter grammar plus whether it loaded in this runtime.
#[derive(Clone)]
pub struct Grammar {
    pub language: Language,
    pub available: bool,
}

impl Grammar {
    /// Wraps a grammar, probing once whether a parser accepts it.
    pub fn load(name: &str, language: Language) -> Self {
        let available = match Parser::new().set_language(&language) {
            Ok(()) => true,
            Err(e) => {
                warn!("{name} grammar failed to load: {e}");
                false
            }
        };
        Self {
            language,
            available,
        }
    }
}

/// Regex-driven handlers for languages without a usable grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// `selector { declarations }` blocks.
    Stylesheet,
    /// Single-file components mixing template, script and style.
    Component,
}

#[derive(Clone)]
pub enum Backend {
    Grammar(Grammar),
    Fallback(FallbackKind),
}

/// Which registry extensions parse the `<script>` block of a component file.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedScript {
    pub plain: &'static str,
    pub typed: &'static str,
    /// Kinds collected from the script block. Methods are left to the regex pass.
    pub kinds: &'static [&'static str],
}

#[derive(Clone)]
pub struct LanguageConfig {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub backend: Backend,
    pub kinds: &'static [&'static str],
    pub call_kinds: &'static [&'static str],
    pub embedded_script: Option<EmbeddedScript>,
}

impl LanguageConfig {
    /// Summarizable kinds, optionally extended with call sites.
    pub fn kinds_of_interest(&self, include_calls: bool) -> Vec<&'static str> {
        let mut kinds = self.kinds.to_vec();
        if include_calls {
            kinds.extend_from_slice(self.call_kinds);
        }
        kinds
    }

    /// Parses `source` with this language's grammar.
    ///
    /// Fallback languages and unavailable grammars produce a file with no tree.
    pub fn parse<'s>(&'s self, source: &'s str) -> Result<ParsedFile<'s>, SummarizeError> {
        match &self.backend {
            Backend::Grammar(g) if g.available => {
                ParsedFile::parse(source, self, &g.language).map_err(SummarizeError::from)
            }
            _ => Ok(ParsedFile::without_tree(source, self)),
        }
    }

    pub fn backend_description(&self) -> &'static str {
        match &self.backend {
            Backend::Grammar(g) if g.available => "grammar",
            Backend::Grammar(_) => "grammar unavailable",
            Backend::Fallback(FallbackKind::Stylesheet) => "stylesheet fallback",
            Backend::Fallback(FallbackKind::Component) => "component fallback",
        }
    }
}

/// Extension-keyed lookup over every supported language.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
    by_extension: HashMap<&'static str, usize>,
}

impl LanguageRegistry {
    /// Builds the registry with all built-in languages.
    pub fn build() -> Self {
        Self::from_languages(vec![
            javascript_config(),
            typescript_config(),
            tsx_config(),
            python_config(),
            java_config(),
            html_config(),
            css_config(),
            stylesheet_fallback_config(),
            ruby_config(),
            php_config(),
            go_config(),
            csharp_config(),
            rust_config(),
            cpp_config(),
            vue_config(),
        ])
    }

    pub fn from_languages(languages: Vec<LanguageConfig>) -> Self {
        let mut by_extension = HashMap::new();
        for (i, config) in languages.iter().enumerate() {
            for ext in config.extensions {
                by_extension.insert(*ext, i);
            }
        }
        Self {
            languages,
            by_extension,
        }
    }

    /// Looks up a language by extension, e.g. `.tsx`. Case and the leading
    /// dot are normalized.
    pub fn lookup(&self, extension: &str) -> Option<&LanguageConfig> {
        let ext = normalize_extension(extension);
        self.by_extension.get(ext.as_str()).map(|&i| &self.languages[i])
    }

    pub fn lookup_path(&self, path: &Path) -> Option<&LanguageConfig> {
        let ext = path.extension()?.to_str()?;
        self.lookup(ext)
    }

    pub fn languages(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// All registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<_> = self.by_extension.keys().copied().collect();
        exts.sort_unstable();
        exts
    }
}

static REGISTRY: LazyLock<LanguageRegistry> = LazyLock::new(LanguageRegistry::build);

/// The process-wide registry, built on first use and read-only afterwards.
pub fn registry() -> &'static LanguageRegistry {
    &REGISTRY
}

pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

fn grammar(name: &'static str, language: Language) -> Backend {
    Backend::Grammar(Grammar::load(name, language))
}

const JS_KINDS: &[&str] = &[
    "function_declaration",
    "class_declaration",
    "method_definition",
];

const TS_KINDS: &[&str] = &[
    "function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "method_definition",
];

fn javascript_config() -> LanguageConfig {
    LanguageConfig {
        name: "JavaScript",
        extensions: &[".js", ".jsx", ".mjs", ".cjs"],
        backend: grammar("JavaScript", tree_sitter_javascript::LANGUAGE.into()),
        kinds: JS_KINDS,
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn typescript_config() -> LanguageConfig {
    LanguageConfig {
        name: "TypeScript",
        extensions: &[".ts", ".mts", ".cts"],
        backend: grammar(
            "TypeScript",
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        ),
        kinds: TS_KINDS,
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn tsx_config() -> LanguageConfig {
    LanguageConfig {
        name: "TSX",
        extensions: &[".tsx"],
        backend: grammar("TSX", tree_sitter_typescript::LANGUAGE_TSX.into()),
        kinds: TS_KINDS,
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn python_config() -> LanguageConfig {
    LanguageConfig {
        name: "Python",
        extensions: &[".py", ".pyw", ".pyi"],
        backend: grammar("Python", tree_sitter_python::LANGUAGE.into()),
        kinds: &["function_definition", "class_definition"],
        call_kinds: &["call"],
        embedded_script: None,
    }
}

fn java_config() -> LanguageConfig {
    LanguageConfig {
        name: "Java",
        extensions: &[".java"],
        backend: grammar("Java", tree_sitter_java::LANGUAGE.into()),
        kinds: &[
            "class_declaration",
            "interface_declaration",
            "enum_declaration",
            "method_declaration",
            "constructor_declaration",
        ],
        call_kinds: &["method_invocation"],
        embedded_script: None,
    }
}

fn html_config() -> LanguageConfig {
    LanguageConfig {
        name: "HTML",
        extensions: &[".html", ".htm"],
        backend: grammar("HTML", tree_sitter_html::LANGUAGE.into()),
        kinds: &["element"],
        call_kinds: &[],
        embedded_script: None,
    }
}

fn css_config() -> LanguageConfig {
    LanguageConfig {
        name: "CSS",
        extensions: &[".css"],
        backend: grammar("CSS", tree_sitter_css::LANGUAGE.into()),
        kinds: &["rule_set"],
        call_kinds: &[],
        embedded_script: None,
    }
}

fn stylesheet_fallback_config() -> LanguageConfig {
    LanguageConfig {
        name: "SCSS/Less",
        extensions: &[".scss", ".less"],
        backend: Backend::Fallback(FallbackKind::Stylesheet),
        kinds: &[],
        call_kinds: &[],
        embedded_script: None,
    }
}

fn ruby_config() -> LanguageConfig {
    LanguageConfig {
        name: "Ruby",
        extensions: &[".rb"],
        backend: grammar("Ruby", tree_sitter_ruby::LANGUAGE.into()),
        kinds: &["class", "module", "method", "singleton_method"],
        call_kinds: &["call"],
        embedded_script: None,
    }
}

fn php_config() -> LanguageConfig {
    LanguageConfig {
        name: "PHP",
        extensions: &[".php"],
        backend: grammar("PHP", tree_sitter_php::LANGUAGE_PHP.into()),
        kinds: &[
            "function_definition",
            "class_declaration",
            "interface_declaration",
            "trait_declaration",
            "method_declaration",
        ],
        call_kinds: &["function_call_expression"],
        embedded_script: None,
    }
}

fn go_config() -> LanguageConfig {
    LanguageConfig {
        name: "Go",
        extensions: &[".go"],
        backend: grammar("Go", tree_sitter_go::LANGUAGE.into()),
        kinds: &[
            "function_declaration",
            "method_declaration",
            "type_declaration",
        ],
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn csharp_config() -> LanguageConfig {
    LanguageConfig {
        name: "C#",
        extensions: &[".cs"],
        backend: grammar("C#", tree_sitter_c_sharp::LANGUAGE.into()),
        kinds: &[
            "class_declaration",
            "interface_declaration",
            "struct_declaration",
            "enum_declaration",
            "method_declaration",
            "constructor_declaration",
        ],
        call_kinds: &["invocation_expression"],
        embedded_script: None,
    }
}

fn rust_config() -> LanguageConfig {
    LanguageConfig {
        name: "Rust",
        extensions: &[".rs"],
        backend: grammar("Rust", tree_sitter_rust::LANGUAGE.into()),
        kinds: &["function_item", "struct_item", "enum_item", "trait_item"],
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn cpp_config() -> LanguageConfig {
    LanguageConfig {
        name: "C++",
        // C headers parse well enough with the C++ grammar.
        extensions: &[".cpp", ".cc", ".cxx", ".hpp", ".hh", ".h"],
        backend: grammar("C++", tree_sitter_cpp::LANGUAGE.into()),
        kinds: &["function_definition", "class_specifier", "struct_specifier"],
        call_kinds: &["call_expression"],
        embedded_script: None,
    }
}

fn vue_config() -> LanguageConfig {
    LanguageConfig {
        name: "Vue",
        extensions: &[".vue"],
        backend: Backend::Fallback(FallbackKind::Component),
        kinds: &[],
        call_kinds: &[],
        embedded_script: Some(EmbeddedScript {
            plain: ".js",
            typed: ".ts",
            kinds: &["function_declaration", "class_declaration"],
        }),
    }
}
