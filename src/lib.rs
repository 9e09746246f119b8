//! # codebrief: Code Summaries for LLM Prompts
//!
//! Walks a project, parses each source file with tree-sitter (or a regex
//! fallback where no grammar is wired in), and reduces it to a handful of
//! human-readable lines such as `Class: UserService` or
//! `Function: fetch(url) -> Response`.
//!
//! ## Architecture
//!
//! - **[`config`]**: Configuration loading, validation, and defaults
//! - **[`discovery`]**: Directory walking, exclusion, and prompt-file prioritization
//! - **[`summarizer`]**: Grammar registry, node extraction, summary rendering, fallbacks

pub mod config;
pub mod discovery;
pub mod summarizer;
