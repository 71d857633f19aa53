use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::input::{EXIT_WINDOW, MAX_SUGGESTIONS};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Log level for the session log file (error, warn, info, debug, trace).
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    /// Label shown before the input, rendered as `"<prompt>: "`. Default: "You"
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Ignore-rules file consulted for `@` path suggestions, relative to the
    /// working directory. Default: ".gitignore"
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Maximum number of path suggestions per lookup. Default: 8
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Window for the second Ctrl-C that quits, in milliseconds. Default: 2000
    #[serde(default = "default_exit_window_ms")]
    pub exit_window_ms: u64,

    /// Show the suggestion list below the input line. Default: true
    #[serde(default = "default_true")]
    pub show_suggestions: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            prompt: default_prompt(),
            ignore_file: default_ignore_file(),
            max_suggestions: default_max_suggestions(),
            exit_window_ms: default_exit_window_ms(),
            show_suggestions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_prompt() -> String {
    "You".to_string()
}

fn default_ignore_file() -> String {
    ".gitignore".to_string()
}

fn default_max_suggestions() -> usize {
    MAX_SUGGESTIONS
}

fn default_exit_window_ms() -> u64 {
    EXIT_WINDOW.as_millis() as u64
}

impl EditorConfig {
    pub fn exit_window(&self) -> Duration {
        Duration::from_millis(self.exit_window_ms)
    }
}

impl Config {
    /// Parse config TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.editor.max_suggestions == 0 {
            bail!("editor.max_suggestions must be at least 1");
        }
        Ok(config)
    }

    /// `log_level` as a tracing level, `None` when unset or unrecognized.
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        let level = self.log_level.as_deref()?;
        match level.parse() {
            Ok(level) => Some(level),
            Err(_) => {
                tracing::warn!("ignoring unknown log_level {level:?}");
                None
            }
        }
    }
}

/// Written by `lit init`.
pub const DEFAULT_CONFIG: &str = r#"# lit configuration

# Session log verbosity: error, warn, info, debug, trace
# log_level = "info"

[editor]
# Label shown before the input line
prompt = "You"

# Ignore rules used to filter @path suggestions
ignore_file = ".gitignore"

# Maximum suggestions per Tab lookup
max_suggestions = 8

# Press Ctrl-C twice within this many milliseconds on an empty line to quit
exit_window_ms = 2000

# List suggestions below the input line while cycling
show_suggestions = true
"#;

/// Returns the base lit config directory: ~/.config/lit/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".config").join("lit"))
}

/// Returns the path to the config file
pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Returns the path to the session log file
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("lit.log"))
}

/// Ensure the config directory exists
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.config/lit/")?;
    Ok(())
}

/// Load config from ~/.config/lit/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    let path = config_path()?;
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Config::from_toml(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

/// Write [`DEFAULT_CONFIG`] unless a config file already exists. Returns its path.
pub fn create_default() -> Result<PathBuf> {
    ensure_dirs()?;
    let path = config_path()?;
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
