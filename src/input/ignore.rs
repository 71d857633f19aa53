//! Ignore rules for path suggestions.
//!
//! A deliberately small subset of `.gitignore` syntax: directory prefixes
//! (`build/`), base-name globs (`*.log`) and exact names or suffixes (`lit`).
//! Negation, anchoring and `**` are not supported.

use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

/// Patterns used when no rules file exists.
pub const DEFAULT_PATTERNS: &[&str] = &[
    ".git/",
    "node_modules/",
    "*.log",
    ".DS_Store",
    "dist/",
    "build/",
    "*.exe",
    "lit",
];

#[derive(Debug, Clone)]
enum Rule {
    /// `dir/`: matches the directory itself and anything under it.
    DirPrefix(String),
    /// Shell glob applied to the path's base name.
    Glob(GlobMatcher),
    /// Exact path, or a trailing `/<name>` component.
    Name(String),
}

impl Rule {
    fn parse(pattern: &str) -> Option<Self> {
        if pattern.ends_with('/') {
            return Some(Self::DirPrefix(pattern.to_string()));
        }
        if pattern.contains('*') {
            return match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => Some(Self::Glob(glob.compile_matcher())),
                Err(e) => {
                    tracing::warn!("skipping ignore pattern {pattern:?}: {e}");
                    None
                }
            };
        }
        Some(Self::Name(pattern.to_string()))
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::DirPrefix(prefix) => {
                path.starts_with(prefix.as_str()) || path == prefix.trim_end_matches('/')
            }
            Self::Glob(matcher) => {
                let base = path.rsplit('/').next().unwrap_or(path);
                matcher.is_match(base)
            }
            Self::Name(name) => {
                path == name
                    || path
                        .strip_suffix(name.as_str())
                        .is_some_and(|head| head.ends_with('/'))
            }
        }
    }
}

/// Immutable rule set, built once and shared with the suggestion provider.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// Build from raw patterns, skipping blank and `#` comment lines.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut rules = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            if let Some(rule) = Rule::parse(pattern) {
                kept.push(pattern.to_string());
                rules.push(rule);
            }
        }
        Self {
            patterns: kept,
            rules,
        }
    }

    pub fn defaults() -> Self {
        Self::from_patterns(DEFAULT_PATTERNS)
    }

    /// Load rules from `path`, falling back to [`DEFAULT_PATTERNS`] if it can't be read.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let rules = Self::from_patterns(content.lines());
                tracing::debug!(
                    "loaded {} ignore rules from {}",
                    rules.patterns.len(),
                    path.display()
                );
                rules
            }
            Err(e) => {
                tracing::debug!(
                    "no ignore rules at {} ({e}), using defaults",
                    path.display()
                );
                Self::defaults()
            }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether any rule matches `path` (relative, `/`-separated).
    pub fn is_ignored(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::defaults()
    }
}
