use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;

use lit::config::{self, Config, EditorConfig};
use lit::input::{FsSuggester, IgnoreRules, LineEditor, ReadOutcome, SuggestionSource};

#[derive(Parser)]
#[command(name = "lit", version = env!("LIT_VERSION"), about = "Terminal coding assistant")]
struct Cli {
    /// Write debug-level entries to the session log
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Chat,
    /// Create the default configuration file at ~/.config/lit/config.toml
    Init,
    /// Print the @path suggestions for a partial path
    Suggest {
        /// Partial path, as typed after `@`
        #[arg(default_value = "")]
        partial: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Init => {
            let path = config::create_default()?;
            println!("Default configuration created at {}", path.display());
            println!("Edit the file to change the prompt, ignore rules and key timings.");
            Ok(())
        }
        Commands::Suggest { partial } => {
            let cfg = config::load()?;
            init_logging(&cfg, cli.verbose)?;
            let suggester = build_suggester(&cfg.editor);
            tracing::debug!(
                "suggesting for {partial:?} with {} ignore rules",
                suggester.rules().patterns().len()
            );
            for suggestion in suggester.suggest(&partial) {
                println!("{suggestion}");
            }
            Ok(())
        }
        Commands::Chat => {
            let cfg = config::load()?;
            init_logging(&cfg, cli.verbose)?;
            run_chat(&cfg)
        }
    }
}

/// Log to ~/.config/lit/lit.log; the terminal belongs to the line editor.
fn init_logging(cfg: &Config, verbose: bool) -> Result<()> {
    config::ensure_dirs()?;
    let path = config::log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        cfg.tracing_level().unwrap_or(tracing::Level::INFO)
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

/// Ignore rules are read once here and shared for the whole session.
fn build_suggester(editor: &EditorConfig) -> FsSuggester {
    let rules = IgnoreRules::load(Path::new(&editor.ignore_file));
    FsSuggester::new(".", rules).with_limit(editor.max_suggestions)
}

/// Read lines until the user quits. Each submitted line goes to the
/// conversation; with no provider attached it is echoed back.
fn run_chat(cfg: &Config) -> Result<()> {
    let mut editor = LineEditor::stdio(build_suggester(&cfg.editor), &cfg.editor);
    tracing::info!("session started");

    loop {
        match editor.read_line()? {
            ReadOutcome::Line(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                tracing::info!("user message: {} chars", text.chars().count());
                println!("{}: {text}", "lit".yellow());
            }
            ReadOutcome::Terminated => break,
        }
    }

    tracing::info!("session ended");
    Ok(())
}
