//! `@`-reference completion state.
//!
//! Tab looks back from the cursor for an `@` that isn't separated from it by
//! whitespace. The text after that `@` up to the next whitespace is the
//! partial path. The first Tab replaces it with the first suggestion; further
//! Tabs on the same anchor cycle through the list as long as the span still
//! holds one of the suggestions.

use std::ops::Range;

use super::line::LineBuffer;
use super::suggest::SuggestionSource;

/// Suggestions currently applied to an `@` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCompletion {
    /// Offset of the `@` anchoring the span.
    anchor: usize,
    /// Text after the anchor when the suggestions were computed.
    partial: String,
    /// Never empty.
    suggestions: Vec<String>,
    selected: usize,
}

impl ActiveCompletion {
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn partial(&self) -> &str {
        &self.partial
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> usize {
        self.selected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Completion {
    #[default]
    Idle,
    Active(ActiveCompletion),
}

/// Nearest `@` before the cursor with no whitespace in between.
pub fn find_anchor(line: &LineBuffer) -> Option<usize> {
    let chars = line.chars();
    for idx in (0..line.cursor()).rev() {
        match chars[idx] {
            '@' => return Some(idx),
            c if c.is_whitespace() => return None,
            _ => {}
        }
    }
    None
}

/// The editable span after `anchor`: up to the first whitespace or end of line.
fn span_after(line: &LineBuffer, anchor: usize) -> Range<usize> {
    let chars = line.chars();
    let start = anchor + 1;
    let end = chars[start.min(chars.len())..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(chars.len(), |offset| start + offset);
    start..end
}

impl Completion {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveCompletion> {
        match self {
            Self::Active(active) => Some(active),
            Self::Idle => None,
        }
    }

    /// Handle Tab. Returns `true` if the buffer changed.
    pub fn trigger(&mut self, line: &mut LineBuffer, source: &dyn SuggestionSource) -> bool {
        let Some(anchor) = find_anchor(line) else {
            *self = Self::Idle;
            return false;
        };
        let span = span_after(line, anchor);
        let current = line.slice(span.clone());

        if let Self::Active(active) = self
            && active.anchor == anchor
            && active.suggestions.len() > 1
            && let Some(idx) = active.suggestions.iter().position(|s| *s == current)
        {
            active.selected = (idx + 1) % active.suggestions.len();
            line.replace(span, &active.suggestions[active.selected]);
            tracing::debug!(
                "cycled completion at {anchor} to {:?}",
                active.suggestions[active.selected]
            );
            return true;
        }

        let suggestions = source.suggest(&current);
        let Some(first) = suggestions.first() else {
            tracing::debug!("no completions for {current:?}");
            *self = Self::Idle;
            return false;
        };
        line.replace(span, first);
        tracing::debug!(
            "{} completions for {current:?} at {anchor}",
            suggestions.len()
        );
        *self = Self::Active(ActiveCompletion {
            anchor,
            partial: current,
            suggestions,
            selected: 0,
        });
        true
    }

    /// Escape. Returns `true` if suggestions were showing.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Self::Idle;
        was_active
    }

    /// Call before an edit that starts at char offset `at`.
    ///
    /// Edits at or before the anchor shift or delete it, and edits past the
    /// span no longer concern it; both end the completion.
    pub fn before_edit(&mut self, at: usize, line: &LineBuffer) {
        let Self::Active(active) = self else {
            return;
        };
        let span = span_after(line, active.anchor);
        if at <= active.anchor || at > span.end {
            *self = Self::Idle;
        }
    }

    /// Call before inserting `ch` at char offset `at`.
    ///
    /// Whitespace ends the `@` span, leaving the cursor outside it.
    pub fn before_insert(&mut self, at: usize, ch: char, line: &LineBuffer) {
        if ch.is_whitespace() {
            *self = Self::Idle;
        } else {
            self.before_edit(at, line);
        }
    }

    /// Call after the cursor moved without editing.
    pub fn after_cursor_move(&mut self, cursor: usize) {
        if let Self::Active(active) = self
            && cursor <= active.anchor
        {
            *self = Self::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;
    use crate::input::ignore::IgnoreRules;
    use crate::input::suggest::FsSuggester;

    /// Canned suggestions keyed by partial.
    struct Fixed(HashMap<&'static str, Vec<&'static str>>);

    impl SuggestionSource for Fixed {
        fn suggest(&self, partial: &str) -> Vec<String> {
            self.0
                .get(partial)
                .map(|list| list.iter().map(ToString::to_string).collect())
                .unwrap_or_default()
        }
    }

    fn line(text: &str) -> LineBuffer {
        let mut line = LineBuffer::new();
        for ch in text.chars() {
            line.insert(ch);
        }
        line
    }

    fn three_ways() -> Fixed {
        Fixed(HashMap::from([("ma", vec!["main.rs", "map.rs", "mask.rs"])]))
    }

    // --- find_anchor ---

    #[test]
    fn anchor_found_before_cursor() {
        assert_eq!(find_anchor(&line("see @src/ma")), Some(4));
    }

    #[test]
    fn anchor_blocked_by_whitespace() {
        assert_eq!(find_anchor(&line("@src ma")), None);
        assert_eq!(find_anchor(&line("no anchor")), None);
    }

    // --- trigger ---

    #[test]
    fn tab_without_anchor_is_noop() {
        let mut buf = line("hello");
        let mut completion = Completion::default();
        assert!(!completion.trigger(&mut buf, &three_ways()));
        assert_eq!(buf.to_string(), "hello");
        assert!(!completion.is_active());
    }

    #[test]
    fn first_tab_applies_first_suggestion() {
        let mut buf = line("open @ma");
        let mut completion = Completion::default();
        assert!(completion.trigger(&mut buf, &three_ways()));
        assert_eq!(buf.to_string(), "open @main.rs");
        assert_eq!(buf.cursor(), buf.len());
        let active = completion.active().unwrap();
        assert_eq!(active.anchor(), 5);
        assert_eq!(active.partial(), "ma");
        assert_eq!(active.selected(), 0);
    }

    #[test]
    fn repeated_tab_cycles_and_wraps() {
        let source = three_ways();
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            completion.trigger(&mut buf, &source);
            seen.push(buf.to_string());
        }
        assert_eq!(seen, ["@main.rs", "@map.rs", "@mask.rs", "@main.rs"]);
    }

    #[test]
    fn text_after_span_is_preserved() {
        let mut buf = line("@ma and more");
        for _ in 0.." and more".len() {
            buf.move_left();
        }
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        assert_eq!(buf.to_string(), "@main.rs and more");
        assert_eq!(buf.cursor(), 8);
        completion.trigger(&mut buf, &three_ways());
        assert_eq!(buf.to_string(), "@map.rs and more");
    }

    #[test]
    fn edited_span_is_a_fresh_trigger() {
        let source = Fixed(HashMap::from([
            ("ma", vec!["main.rs", "map.rs"]),
            ("main.rsx", vec!["main.rsx.bak"]),
        ]));
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &source);
        completion.before_edit(buf.cursor(), &buf);
        buf.insert('x');
        assert!(completion.is_active());
        completion.trigger(&mut buf, &source);
        assert_eq!(buf.to_string(), "@main.rsx.bak");
    }

    #[test]
    fn no_suggestions_goes_idle_and_keeps_text() {
        let mut buf = line("@zz");
        let mut completion = Completion::default();
        assert!(!completion.trigger(&mut buf, &three_ways()));
        assert_eq!(buf.to_string(), "@zz");
        assert!(!completion.is_active());
    }

    // --- invalidation ---

    #[test]
    fn deleting_anchor_goes_idle() {
        let mut buf = line("x @ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        // delete everything up to and including '@'
        completion.before_edit(2, &buf);
        assert!(!completion.is_active());
    }

    #[test]
    fn edit_before_anchor_goes_idle() {
        let mut buf = line("x @ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        completion.before_edit(0, &buf);
        assert!(!completion.is_active());
    }

    #[test]
    fn cursor_before_anchor_goes_idle() {
        let mut buf = line("x @ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        completion.after_cursor_move(3);
        assert!(completion.is_active());
        completion.after_cursor_move(2);
        assert!(!completion.is_active());
    }

    #[test]
    fn space_after_span_goes_idle() {
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        completion.before_insert(buf.cursor(), ' ', &buf);
        buf.insert(' ');
        assert!(!completion.is_active());
    }

    #[test]
    fn letter_at_span_end_stays_active() {
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        completion.before_insert(buf.cursor(), 'x', &buf);
        assert!(completion.is_active());
    }

    #[test]
    fn tab_away_from_anchor_goes_idle() {
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        buf.insert(' ');
        assert!(!completion.trigger(&mut buf, &three_ways()));
        assert!(!completion.is_active());
        assert_eq!(buf.to_string(), "@main.rs ");
    }

    #[test]
    fn cancel_keeps_buffer() {
        let mut buf = line("@ma");
        let mut completion = Completion::default();
        completion.trigger(&mut buf, &three_ways());
        assert!(completion.cancel());
        assert!(!completion.cancel());
        assert_eq!(buf.to_string(), "@main.rs");
    }

    // --- against the file system ---

    #[test]
    fn directory_partial_lists_unignored_entries() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("src")).unwrap();
        fs::write(root.path().join("src/main.x"), "").unwrap();
        fs::write(root.path().join("src/tmp.log"), "").unwrap();
        let source = FsSuggester::new(root.path(), IgnoreRules::from_patterns(["*.log"]));

        let mut buf = line("hello @src/");
        let mut completion = Completion::default();
        assert!(completion.trigger(&mut buf, &source));
        assert_eq!(buf.to_string(), "hello @src/main.x");
        assert_eq!(completion.active().unwrap().suggestions(), ["src/main.x"]);
    }

    #[test]
    fn cycles_real_directory_entries() {
        let root = tempfile::tempdir().unwrap();
        for name in ["alpha.txt", "alto.txt", "also.txt", "beta.txt"] {
            fs::write(root.path().join(name), "").unwrap();
        }
        let source = FsSuggester::new(root.path(), IgnoreRules::defaults());
        let expected = source.suggest("al");
        assert_eq!(expected.len(), 3);

        let mut buf = line("@al");
        let mut completion = Completion::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            completion.trigger(&mut buf, &source);
            seen.push(buf.to_string()[1..].to_string());
        }
        assert_eq!(seen[..3], expected[..]);
        assert_eq!(seen[3], expected[0]);
    }
}
