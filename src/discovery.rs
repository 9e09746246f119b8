//! Finding the files worth summarizing under a project root.
//!
//! This module picks *which* files are looked at; the summarizer decides what
//! each one says.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Config;

static IMPORTANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)package\.json|main\.|index\.|app\.|src/|config\.|router\.|server\.")
        .expect("valid importance regex")
});

/// Files at most this many components below the root count as important.
const SHALLOW_DEPTH: usize = 2;

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build exclude patterns")
}

/// Root-relative path with forward slashes.
pub fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Walks `root` and returns candidate source files in a stable order.
pub fn discover_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(root.is_dir(), "not a directory: {}", root.display());

    let excludes = build_globset(&config.exclude_patterns)?;
    let exclude_dirs = config.exclude_dirs.clone();

    // Walk builder respects .gitignore by default
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry.depth() > 0
                && exclude_dirs
                    .iter()
                    .any(|d| entry.file_name().to_string_lossy() == d.as_str()))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("walk error: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        if !config.wants_extension(&ext) {
            continue;
        }

        let rel = relative_path(path, root);
        if excludes.is_match(&rel) {
            debug!("excluded by pattern: {rel}");
            continue;
        }

        match entry.metadata() {
            Ok(meta) if meta.len() > config.max_file_size => {
                debug!("too large ({} bytes): {rel}", meta.len());
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("cannot stat {rel}: {e}");
                continue;
            }
        }

        files.push(path.to_path_buf());
    }

    info!("discovered {} files under {}", files.len(), root.display());
    Ok(files)
}

/// Whether a file should always make it into the prompt.
pub fn is_important(path: &Path, root: &Path) -> bool {
    let rel = relative_path(path, root);
    IMPORTANT_RE.is_match(&rel) || rel.split('/').count() <= SHALLOW_DEPTH
}

/// Important files in input order, then at most `other_limit` of the rest.
pub fn prioritize(files: Vec<PathBuf>, root: &Path, other_limit: usize) -> Vec<PathBuf> {
    let (mut important, others): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|f| is_important(f, root));
    important.extend(others.into_iter().take(other_limit));
    important
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Log sink shared with a test subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn touch(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn rels(files: &[PathBuf], root: &Path) -> Vec<String> {
        files.iter().map(|f| relative_path(f, root)).collect()
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "b.py", "x = 1");
        touch(root, "a.js", "let a;");
        touch(root, "README.md", "# hi");
        touch(root, "src/lib.rs", "fn main() {}");
        touch(root, "node_modules/dep/index.js", "module.exports = 1;");
        touch(root, "web/app.min.js", "var a;");
        touch(root, "web/Style.CSS", "a{}");

        let files = discover_files(root, &Config::default()).unwrap();
        assert_eq!(
            rels(&files, root),
            vec!["a.js", "b.py", "src/lib.rs", "web/Style.CSS"]
        );
    }

    #[test]
    fn test_discover_skips_large_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "big.js", &"x".repeat(64));
        touch(dir.path(), "small.js", "x");
        let config = Config {
            max_file_size: 10,
            ..Config::default()
        };
        let files = discover_files(dir.path(), &config).unwrap();
        assert_eq!(rels(&files, dir.path()), vec!["small.js"]);
    }

    #[test]
    fn test_discover_logs_total_at_info() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.js", "let a;");
        touch(dir.path(), "b.rs", "fn b() {}");

        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let files = tracing::subscriber::with_default(subscriber, || {
            discover_files(dir.path(), &Config::default()).unwrap()
        });

        assert_eq!(files.len(), 2);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INFO"), "{output}");
        assert!(output.contains("discovered 2 files"), "{output}");
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let dir = tempdir().unwrap();
        assert!(discover_files(&dir.path().join("nope"), &Config::default()).is_err());
    }

    #[test]
    fn test_invalid_exclude_pattern_is_error() {
        let dir = tempdir().unwrap();
        let config = Config {
            exclude_patterns: vec!["[".to_string()],
            ..Config::default()
        };
        assert!(discover_files(dir.path(), &config).is_err());
    }

    #[test]
    fn test_is_important() {
        let root = Path::new("/p");
        assert!(is_important(Path::new("/p/package.json"), root));
        assert!(is_important(Path::new("/p/lib/deep/Router.ts"), root));
        assert!(is_important(Path::new("/p/a/b/src/x.rs"), root));
        assert!(is_important(Path::new("/p/lib/util.js"), root));
        assert!(!is_important(Path::new("/p/lib/deep/util.js"), root));
    }

    #[test]
    fn test_prioritize_keeps_important_then_limits_others() {
        let root = Path::new("/p");
        let files: Vec<PathBuf> = [
            "/p/a/b/one.js",
            "/p/index.js",
            "/p/a/b/two.js",
            "/p/a/b/three.js",
            "/p/a/b/server.go",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        let picked = prioritize(files, root, 2);
        assert_eq!(
            rels(&picked, root),
            vec!["index.js", "a/b/server.go", "a/b/one.js", "a/b/two.js"]
        );
    }

    #[test]
    fn test_prioritize_zero_limit() {
        let root = Path::new("/p");
        let files = vec![PathBuf::from("/p/x/y/z.py")];
        assert!(prioritize(files, root, 0).is_empty());
    }
}
