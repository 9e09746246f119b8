//! Multi-language code summarization.
//!
//! Files are routed by extension through the [`languages`] registry to a
//! tree-sitter grammar or a regex fallback. Grammar-backed files go through
//! [`extract`] (which nodes) and [`render`] (which text); the result is a short,
//! source-ordered list of lines such as `Function: greet(name)`.

pub mod core;
pub mod extract;
pub mod fallback;
pub mod labels;
pub mod languages;
pub mod render;
pub mod syntax;

pub use self::core::{
    FileSummary, SummarizeError, SummaryOptions, render_insights, summarize_file,
    summarize_files, summarize_source, try_summarize_file,
};
pub use extract::MAX_SUMMARIES_PER_FILE;
pub use languages::{LanguageConfig, LanguageRegistry, registry};
