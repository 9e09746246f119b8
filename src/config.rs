/// Configuration module for codebrief.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::summarizer::{MAX_SUMMARIES_PER_FILE, SummaryOptions};

/// File name looked up in the scanned root when no `--config` is given.
pub const CONFIG_FILENAME: &str = "codebrief.json";

// ── Default value functions ──────────────────────────────────────────

fn default_max_summaries() -> usize {
    MAX_SUMMARIES_PER_FILE
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    [
        ".js", ".ts", ".jsx", ".tsx", ".py", ".java", ".html", ".css", ".rb", ".php", ".go",
        ".cs", ".rs", ".cpp", ".vue", ".scss", ".less",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    [
        "node_modules",
        "dist",
        "build",
        "target",
        ".git",
        "test",
        "tests",
        "__tests__",
        "vendor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/*.min.js".to_string(), "**/*.min.css".to_string()]
}

fn default_max_file_size() -> u64 {
    1_048_576
}

fn default_other_files_limit() -> usize {
    25
}

// ── Config struct ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_max_summaries")]
    pub max_summaries_per_file: usize,

    #[serde(default = "default_true")]
    pub signatures: bool,

    #[serde(default)]
    pub include_calls: bool,

    #[serde(default)]
    pub parallel: bool,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default = "default_other_files_limit")]
    pub other_files_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_summaries_per_file: default_max_summaries(),
            signatures: default_true(),
            include_calls: false,
            parallel: false,
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size: default_max_file_size(),
            other_files_limit: default_other_files_limit(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file or invalid JSON yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {}: {e}", path.display());
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.max_summaries_per_file > 0,
            "max_summaries_per_file must be positive"
        );
        anyhow::ensure!(self.max_file_size > 0, "max_file_size must be positive");
        anyhow::ensure!(
            !self.extensions.is_empty(),
            "at least one extension must be specified"
        );
        for ext in &self.extensions {
            anyhow::ensure!(
                ext.starts_with('.') && ext.len() > 1,
                "extension {ext:?} must start with '.'"
            );
        }
        Ok(())
    }

    /// Whether a file extension (with leading dot, any case) is a candidate.
    #[must_use]
    pub fn wants_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    #[must_use]
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            max_summaries: self.max_summaries_per_file,
            signatures: self.signatures,
            include_calls: self.include_calls,
            parallel: self.parallel,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
