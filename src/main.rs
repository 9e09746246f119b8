use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use codebrief::config::{CONFIG_FILENAME, Config};
use codebrief::discovery::{discover_files, prioritize};
use codebrief::summarizer::{registry, render_insights, summarize_files};

/// Structural code summaries for LLM prompts.
#[derive(Parser)]
#[command(name = "codebrief", version, about = "Structural code summaries for LLM prompts")]
struct Cli {
    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the source files of a project
    Scan {
        /// Project path (default: current directory)
        path: Option<PathBuf>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Summarize every discovered file, not just the prioritized ones
        #[arg(short, long)]
        all: bool,
        /// Maximum summary lines per file
        #[arg(short = 'n', long)]
        max: Option<usize>,
        /// Include call sites
        #[arg(long)]
        calls: bool,
        /// Summarize files in parallel
        #[arg(short, long)]
        parallel: bool,
        /// Config file (default: <path>/codebrief.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List supported languages and how each is parsed
    Languages,
    /// Write a default config file
    Init {
        /// Project path (default: current directory)
        path: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn project_root(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("."))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            path,
            json,
            all,
            max,
            calls,
            parallel,
            config,
        } => {
            let root = project_root(path);
            let config_path = config.unwrap_or_else(|| root.join(CONFIG_FILENAME));
            let mut cfg = Config::load(&config_path)?;
            if let Some(max) = max {
                cfg.max_summaries_per_file = max;
            }
            cfg.include_calls |= calls;
            cfg.parallel |= parallel;
            cfg.validate().context("invalid configuration")?;
            scan(&root, &cfg, json, all)
        }
        Commands::Languages => {
            list_languages();
            Ok(())
        }
        Commands::Init { path } => {
            let root = project_root(path);
            let config_path = root.join(CONFIG_FILENAME);
            anyhow::ensure!(
                !config_path.exists(),
                "{} already exists",
                config_path.display()
            );
            Config::default().save(&config_path)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        }
    }
}

fn scan(root: &Path, cfg: &Config, json: bool, all: bool) -> Result<()> {
    let mut files = discover_files(root, cfg)?;
    let discovered = files.len();
    if !all {
        files = prioritize(files, root, cfg.other_files_limit);
    }
    info!("summarizing {} of {discovered} files", files.len());

    let summaries = summarize_files(&files, &cfg.summary_options());

    if json {
        let out = serde_json::to_string_pretty(&summaries).context("failed to serialize")?;
        println!("{out}");
    } else {
        let insights = render_insights(root, &summaries);
        if !insights.is_empty() {
            println!("{insights}");
        }
    }
    Ok(())
}

fn list_languages() {
    for language in registry().languages() {
        println!(
            "{:<12} {:<28} {}",
            language.name,
            language.extensions.join(" "),
            language.backend_description()
        );
        if !language.kinds.is_empty() {
            println!("{:<12} {}", "", language.kinds.join(", "));
        }
    }
}
