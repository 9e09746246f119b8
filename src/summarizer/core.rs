use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::extract::{MAX_SUMMARIES_PER_FILE, extract_nodes};
use super::fallback::{self, ComponentFacts, ScriptBlock};
use super::languages::{Backend, FallbackKind, LanguageConfig, registry};
use super::render::render_node;
use super::syntax::SyntaxNode;

/// Errors that can occur while summarizing a single file.
///
/// None of these escape a batch: [`summarize_file`] turns them into an
/// absent result.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("unsupported extension: {extension:?}")]
    Unsupported { extension: String },

    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("grammar failed to load: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub max_summaries: usize,
    /// Append parameter lists and return types to callables.
    pub signatures: bool,
    /// Also summarize call sites.
    pub include_calls: bool,
    /// Summarize a batch on the rayon pool.
    pub parallel: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_summaries: MAX_SUMMARIES_PER_FILE,
            signatures: true,
            include_calls: false,
            parallel: false,
        }
    }
}

/// Result for one input path. `summaries` is `None` when the file was
/// skipped (unsupported or unreadable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub summaries: Option<Vec<String>>,
}

/// Line emitted for a recognized language whose grammar did not load.
pub fn unavailable_notice(language: &LanguageConfig) -> String {
    format!("Notice: {} parsing support is coming soon", language.name)
}

/// Summarizes source text of a known language.
pub fn summarize_source(
    source: &str,
    language: &LanguageConfig,
    opts: &SummaryOptions,
) -> Result<Vec<String>, SummarizeError> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    match &language.backend {
        Backend::Grammar(g) if !g.available => Ok(vec![unavailable_notice(language)]),
        Backend::Grammar(_) => {
            let kinds = language.kinds_of_interest(opts.include_calls);
            summarize_structure(source, language, &kinds, opts)
        }
        Backend::Fallback(FallbackKind::Stylesheet) => {
            Ok(fallback::summarize_stylesheet(source, opts.max_summaries))
        }
        Backend::Fallback(FallbackKind::Component) => summarize_component(source, language, opts),
    }
}

fn summarize_structure(
    source: &str,
    language: &LanguageConfig,
    kinds: &[&str],
    opts: &SummaryOptions,
) -> Result<Vec<String>, SummarizeError> {
    Ok(structure_lines(source, language, kinds, opts)?
        .into_iter()
        .map(|(_, line)| line)
        .collect())
}

/// Rendered lines paired with the start byte of their node.
fn structure_lines(
    source: &str,
    language: &LanguageConfig,
    kinds: &[&str],
    opts: &SummaryOptions,
) -> Result<Vec<(usize, String)>, SummarizeError> {
    let parsed = language.parse(source)?;
    let Some(root) = parsed.root() else {
        debug!("{} parser produced no tree", language.name);
        return Ok(Vec::new());
    };

    Ok(extract_nodes(root, kinds, opts.max_summaries)
        .into_iter()
        .filter_map(|node| {
            render_node(node, source, opts.signatures).map(|line| (node.start_byte(), line))
        })
        .collect())
}

fn summarize_component(
    source: &str,
    language: &LanguageConfig,
    opts: &SummaryOptions,
) -> Result<Vec<String>, SummarizeError> {
    let facts = ComponentFacts::scan(source);
    let mut script_lines = facts.method_lines();

    if let (Some(script), Some(embedded)) = (facts.script, language.embedded_script) {
        let ext = if script.typed {
            embedded.typed
        } else {
            embedded.plain
        };
        if let Some(script_language) = registry().lookup(ext) {
            script_lines.extend(summarize_script_block(
                script,
                script_language,
                embedded.kinds,
                opts,
            )?);
        }
    }
    // Regex methods and grammar nodes share script-block offsets.
    script_lines.sort_by_key(|(offset, _)| *offset);

    let mut lines = facts.header_lines();
    lines.extend(script_lines.into_iter().map(|(_, line)| line));
    lines.extend(facts.footer_lines());
    lines.truncate(opts.max_summaries);
    Ok(lines)
}

fn summarize_script_block(
    script: ScriptBlock<'_>,
    language: &LanguageConfig,
    kinds: &[&str],
    opts: &SummaryOptions,
) -> Result<Vec<(usize, String)>, SummarizeError> {
    match &language.backend {
        Backend::Grammar(g) if g.available && !script.text.trim().is_empty() => {
            structure_lines(script.text, language, kinds, opts)
        }
        _ => Ok(Vec::new()),
    }
}

/// Reads and summarizes one file, reporting why it could not be.
pub fn try_summarize_file(path: &Path, opts: &SummaryOptions) -> Result<Vec<String>, SummarizeError> {
    let language = registry()
        .lookup_path(path)
        .ok_or_else(|| SummarizeError::Unsupported {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default(),
        })?;
    let source = fs::read_to_string(path)?;
    summarize_source(&source, language, opts)
}

/// Summarizes one file. `None` means nothing was learned from it.
pub fn summarize_file(path: &Path, opts: &SummaryOptions) -> Option<Vec<String>> {
    match try_summarize_file(path, opts) {
        Ok(lines) => Some(lines),
        Err(e @ SummarizeError::Unsupported { .. }) => {
            debug!("skipping {}: {e}", path.display());
            None
        }
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            None
        }
    }
}

/// Summarizes every path, preserving input order.
pub fn summarize_files(paths: &[PathBuf], opts: &SummaryOptions) -> Vec<FileSummary> {
    let summarize = |path: &PathBuf| FileSummary {
        path: path.clone(),
        summaries: summarize_file(path, opts),
    };
    if opts.parallel {
        paths.par_iter().map(summarize).collect()
    } else {
        paths.iter().map(summarize).collect()
    }
}

/// Formats present, non-empty results as prompt-ready insight blocks.
pub fn render_insights(root: &Path, summaries: &[FileSummary]) -> String {
    summaries
        .iter()
        .filter_map(|s| {
            let lines = s.summaries.as_ref().filter(|l| !l.is_empty())?;
            let rel = s.path.strip_prefix(root).unwrap_or(&s.path);
            let mut block = format!("📄 {}", rel.to_string_lossy().replace('\\', "/"));
            for line in lines {
                block.push_str("\n- ");
                block.push_str(line);
            }
            Some(block)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::languages::Grammar;
    use std::fs;
    use tempfile::tempdir;

    fn summarize(ext: &str, source: &str) -> Vec<String> {
        let language = registry().lookup(ext).unwrap();
        summarize_source(source, language, &SummaryOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_source_is_empty_not_absent() {
        assert!(summarize(".py", "").is_empty());
        assert!(summarize(".vue", "  \n").is_empty());
    }

    #[test]
    fn test_cap_applies() {
        let source: String = (0..30).map(|i| format!("function f{i}() {{}}\n")).collect();
        let lines = summarize(".js", &source);
        assert_eq!(lines.len(), MAX_SUMMARIES_PER_FILE);
        assert_eq!(lines[0], "Function: f0()");
        assert_eq!(lines[19], "Function: f19()");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let lines = summarize(".py", "def run():\n    pass\n\ndef run():\n    pass\n");
        assert_eq!(lines, vec!["Function: run()", "Function: run()"]);
    }

    #[test]
    fn test_idempotent() {
        let source = "class A:\n    def b(self):\n        pass\n";
        assert_eq!(summarize(".py", source), summarize(".py", source));
    }

    #[test]
    fn test_unavailable_grammar_notice() {
        let mut language = registry().lookup(".ts").unwrap().clone();
        language.backend = Backend::Grammar(Grammar {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            available: false,
        });
        let lines =
            summarize_source("function f() {}", &language, &SummaryOptions::default()).unwrap();
        assert_eq!(lines, vec!["Notice: TypeScript parsing support is coming soon"]);
    }

    #[test]
    fn test_include_calls_option() {
        let language = registry().lookup(".js").unwrap();
        let opts = SummaryOptions {
            include_calls: true,
            ..SummaryOptions::default()
        };
        let lines = summarize_source("function a() { b(); }", language, &opts).unwrap();
        assert_eq!(lines, vec!["Function: a()", "Call: b()"]);
    }

    #[test]
    fn test_component_script_block_is_parsed() {
        let source = "<script>\nexport default { name: 'Card' }\nfunction helper(x) { return x; }\n</script>";
        let lines = summarize(".vue", source);
        assert_eq!(lines, vec!["Vue Component: Card", "Function: helper(x)"]);
    }

    #[test]
    fn test_component_script_lines_follow_source_order() {
        let source = "<template><p>hi</p></template>\n<script>\nfunction helper(x) { return x; }\nexport default { name: 'W', methods: { onClick() {} } }\nclass Store {}\n</script>\n<style>.p { color: red; }</style>";
        let lines = summarize(".vue", source);
        assert_eq!(
            lines,
            vec![
                "Vue Template: 1 element",
                "Vue Component: W",
                "Function: helper(x)",
                "Vue Method: onClick",
                "Class: Store",
                "Vue Styles: 1 rule",
            ]
        );
    }

    #[test]
    fn test_summarize_file_outcomes() {
        let dir = tempdir().unwrap();
        let opts = SummaryOptions::default();

        let ok = dir.path().join("a.py");
        fs::write(&ok, "def a():\n    pass\n").unwrap();
        assert_eq!(summarize_file(&ok, &opts), Some(vec!["Function: a()".to_string()]));

        let unsupported = dir.path().join("logo.png");
        fs::write(&unsupported, [0u8, 159, 146, 150]).unwrap();
        assert!(summarize_file(&unsupported, &opts).is_none());
        assert!(matches!(
            try_summarize_file(&unsupported, &opts),
            Err(SummarizeError::Unsupported { .. })
        ));

        let binary = dir.path().join("blob.js");
        fs::write(&binary, [0u8, 159, 146, 150]).unwrap();
        assert!(matches!(
            try_summarize_file(&binary, &opts),
            Err(SummarizeError::Read(_))
        ));
        assert!(summarize_file(&binary, &opts).is_none());

        assert!(summarize_file(&dir.path().join("missing.rs"), &opts).is_none());
    }

    #[test]
    fn test_batch_preserves_order_in_parallel() {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..12 {
            let path = dir.path().join(format!("m{i}.py"));
            fs::write(&path, format!("def f{i}():\n    pass\n")).unwrap();
            paths.push(path);
        }
        let sequential = summarize_files(&paths, &SummaryOptions::default());
        let parallel = summarize_files(
            &paths,
            &SummaryOptions {
                parallel: true,
                ..SummaryOptions::default()
            },
        );
        assert_eq!(sequential, parallel);
        assert_eq!(
            parallel[7].summaries,
            Some(vec!["Function: f7()".to_string()])
        );
    }

    #[test]
    fn test_render_insights_skips_absent_and_empty() {
        let root = Path::new("/repo");
        let summaries = vec![
            FileSummary {
                path: PathBuf::from("/repo/src/app.js"),
                summaries: Some(vec!["Function: main()".into(), "Class: App".into()]),
            },
            FileSummary {
                path: PathBuf::from("/repo/empty.py"),
                summaries: Some(vec![]),
            },
            FileSummary {
                path: PathBuf::from("/repo/logo.png"),
                summaries: None,
            },
            FileSummary {
                path: PathBuf::from("/repo/style.css"),
                summaries: Some(vec!["CSS Selector: body (1 declaration)".into()]),
            },
        ];
        assert_eq!(
            render_insights(root, &summaries),
            "📄 src/app.js\n- Function: main()\n- Class: App\n\n📄 style.css\n- CSS Selector: body (1 declaration)"
        );
    }
}
