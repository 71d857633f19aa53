//! Path suggestions for `@` references.

use std::fs;
use std::path::PathBuf;

use super::ignore::IgnoreRules;

/// Default cap on suggestions returned for one lookup.
pub const MAX_SUGGESTIONS: usize = 8;

/// Something that can turn a partial path into completion candidates.
pub trait SuggestionSource {
    /// Candidates for `partial`, best first. Never fails: no match is an empty list.
    fn suggest(&self, partial: &str) -> Vec<String>;
}

/// Lists directory entries on disk, filtered through [`IgnoreRules`].
#[derive(Debug, Clone)]
pub struct FsSuggester {
    root: PathBuf,
    rules: IgnoreRules,
    limit: usize,
}

impl FsSuggester {
    /// `root` is the directory relative partials are resolved against.
    pub fn new(root: impl Into<PathBuf>, rules: IgnoreRules) -> Self {
        Self {
            root: root.into(),
            rules,
            limit: MAX_SUGGESTIONS,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }
}

/// Split `src/ma` into the typed directory part (`src/`) and the name prefix (`ma`).
fn split_partial(partial: &str) -> (&str, &str) {
    match partial.rfind('/') {
        Some(idx) => partial.split_at(idx + 1),
        None => ("", partial),
    }
}

/// Path as the ignore rules expect it: no leading `./`.
fn normalize_for_rules(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

impl SuggestionSource for FsSuggester {
    fn suggest(&self, partial: &str) -> Vec<String> {
        let (dir, prefix) = split_partial(partial);
        let listing = if dir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(dir)
        };

        let entries = match fs::read_dir(&listing) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("no suggestions for {partial:?}: {}: {e}", listing.display());
                return Vec::new();
            }
        };

        // A trailing separator means "show this directory"; the empty prefix
        // lets every entry through.
        let prefix = prefix.to_lowercase();
        let mut suggestions = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = format!("{dir}{name}");
            if self.rules.is_ignored(normalize_for_rules(&path)) {
                continue;
            }
            if !name.to_lowercase().starts_with(&prefix) {
                continue;
            }
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            suggestions.push(if is_dir { format!("{path}/") } else { path });
            if suggestions.len() >= self.limit {
                break;
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(files: &[&str], dirs: &[&str]) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for dir in dirs {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        for file in files {
            fs::write(root.path().join(file), "").unwrap();
        }
        root
    }

    #[test]
    fn split_partial_cases() {
        assert_eq!(split_partial("src/ma"), ("src/", "ma"));
        assert_eq!(split_partial("src/"), ("src/", ""));
        assert_eq!(split_partial("ma"), ("", "ma"));
        assert_eq!(split_partial("/etc/ho"), ("/etc/", "ho"));
    }

    #[test]
    fn directory_listing_filters_ignored_entries() {
        let root = fixture(&["src/main.x", "src/tmp.log"], &["src"]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::from_patterns(["*.log"]));
        assert_eq!(suggester.suggest("src/"), vec!["src/main.x".to_string()]);
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let root = fixture(&["README.md", "Cargo.toml", "rules.txt"], &[]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::from_patterns::<_, &str>([]));
        let mut got = suggester.suggest("r");
        got.sort();
        assert_eq!(got, vec!["README.md".to_string(), "rules.txt".to_string()]);
    }

    #[test]
    fn directories_get_trailing_separator() {
        let root = fixture(&[], &["docs"]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::from_patterns::<_, &str>([]));
        assert_eq!(suggester.suggest("do"), vec!["docs/".to_string()]);
    }

    #[test]
    fn typed_dot_prefix_is_preserved() {
        let root = fixture(&[], &["src", "build"]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::defaults());
        // build/ is ignored even when reached through ./
        assert_eq!(suggester.suggest("./"), vec!["./src/".to_string()]);
    }

    #[test]
    fn default_rules_hide_own_binary() {
        let root = fixture(&["lit", "lib.rs"], &[]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::defaults());
        assert_eq!(suggester.suggest("li"), vec!["lib.rs".to_string()]);
    }

    #[test]
    fn injected_rules_are_kept() {
        let suggester = FsSuggester::new(".", IgnoreRules::from_patterns(["target/", "*.swp"]));
        assert_eq!(suggester.rules().patterns(), ["target/", "*.swp"]);
    }

    #[test]
    fn results_are_capped() {
        let names: Vec<String> = (0..12).map(|i| format!("file{i}.txt")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let root = fixture(&refs, &[]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::defaults());
        assert_eq!(suggester.suggest("file").len(), MAX_SUGGESTIONS);
        assert_eq!(suggester.with_limit(3).suggest("").len(), 3);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let root = fixture(&[], &[]);
        let suggester = FsSuggester::new(root.path(), IgnoreRules::defaults());
        assert!(suggester.suggest("nope/").is_empty());
        assert!(suggester.suggest("nope/x").is_empty());
    }
}
