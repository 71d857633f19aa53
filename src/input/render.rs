//! Repaints the input line.
//!
//! Every redraw clears the whole terminal line and writes prompt + buffer
//! again, then places the cursor by column. Character width is assumed to be
//! one column per char.

use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use super::completion::Completion;
use super::line::LineBuffer;

#[derive(Debug, Clone)]
pub struct Renderer {
    label: String,
    /// Visible width of `"<label>: "`.
    prompt_width: usize,
    show_suggestions: bool,
    /// A suggestion list is on screen one line below the input.
    list_drawn: bool,
    /// Fixed terminal width; `None` asks the terminal on every redraw.
    width: Option<u16>,
}

/// Used when the terminal size can't be queried.
const FALLBACK_WIDTH: u16 = 80;

/// The slice of a suggestion list that fits on one terminal row.
#[derive(Debug, PartialEq, Eq)]
struct ListRow {
    /// `(index into suggestions, text to print)`.
    entries: Vec<(usize, String)>,
    hidden: usize,
}

/// Greedily pack entries into `limit` columns, starting at `start`.
fn pack(suggestions: &[String], start: usize, limit: usize) -> Vec<(usize, String)> {
    let mut entries = Vec::new();
    let mut used = 0;
    for (idx, suggestion) in suggestions.iter().enumerate().skip(start) {
        let sep = if entries.is_empty() { 0 } else { 2 };
        let len = suggestion.chars().count();
        if used + sep + len <= limit {
            used += sep + len;
            entries.push((idx, suggestion.clone()));
        } else {
            if entries.is_empty() {
                let mut cut: String = suggestion.chars().take(limit.saturating_sub(1)).collect();
                cut.push('\u{2026}');
                entries.push((idx, cut));
            }
            break;
        }
    }
    entries
}

/// Fit the list into one row of `width` columns, keeping `selected` visible.
///
/// The last column stays empty so the terminal never auto-wraps the row.
fn fit_list(suggestions: &[String], selected: usize, width: usize) -> ListRow {
    // Room for the ` +N` hidden-count marker.
    let reserve = format!(" +{}", suggestions.len()).len();
    let limit = width.saturating_sub(1 + reserve).max(1);
    let mut entries = pack(suggestions, 0, limit);
    if !entries.iter().any(|(idx, _)| *idx == selected) {
        entries = pack(suggestions, selected, limit);
    }
    ListRow {
        hidden: suggestions.len() - entries.len(),
        entries,
    }
}

impl Renderer {
    pub fn new(label: &str, show_suggestions: bool) -> Self {
        Self {
            label: label.to_string(),
            prompt_width: label.chars().count() + 2,
            show_suggestions,
            list_drawn: false,
            width: None,
        }
    }

    /// Lay out against a fixed width instead of the live terminal size.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    fn terminal_width(&self) -> usize {
        let width = self.width.unwrap_or_else(|| {
            crossterm::terminal::size().map_or(FALLBACK_WIDTH, |(cols, _)| cols)
        });
        usize::from(width)
    }

    pub fn prompt_width(&self) -> usize {
        self.prompt_width
    }

    fn queue_prompt(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            SetForegroundColor(Color::Blue),
            Print(&self.label),
            ResetColor,
            Print(": ")
        )
    }

    /// Write the prompt at the start of a fresh read.
    pub fn start(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.list_drawn = false;
        self.queue_prompt(out)?;
        out.flush()
    }

    /// Repaint the current physical line.
    ///
    /// Continuation lines carry no prompt and the cursor column is relative
    /// to the line start.
    pub fn redraw(
        &mut self,
        out: &mut impl Write,
        line: &LineBuffer,
        in_continuation: bool,
        completion: &Completion,
    ) -> io::Result<()> {
        queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        if !in_continuation {
            self.queue_prompt(out)?;
        }
        queue!(out, Print(line))?;

        match completion.active() {
            Some(active) if self.show_suggestions && active.suggestions().len() > 1 => {
                let row = fit_list(active.suggestions(), active.selected(), self.terminal_width());
                queue!(out, Print("\r\n"), Clear(ClearType::CurrentLine))?;
                for (pos, (idx, suggestion)) in row.entries.iter().enumerate() {
                    if pos > 0 {
                        queue!(out, Print("  "))?;
                    }
                    if *idx == active.selected() {
                        queue!(
                            out,
                            SetAttribute(Attribute::Reverse),
                            Print(suggestion),
                            SetAttribute(Attribute::Reset)
                        )?;
                    } else {
                        queue!(out, Print(suggestion))?;
                    }
                }
                if row.hidden > 0 {
                    queue!(out, Print(format!(" +{}", row.hidden)))?;
                }
                queue!(out, MoveUp(1))?;
                self.list_drawn = true;
            }
            _ => self.queue_erase_list(out)?,
        }

        let base = if in_continuation { 0 } else { self.prompt_width };
        let column = u16::try_from(base + line.cursor()).unwrap_or(u16::MAX);
        queue!(out, Show, MoveToColumn(column))?;
        out.flush()
    }

    fn queue_erase_list(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.list_drawn {
            queue!(out, Print("\r\n"), Clear(ClearType::CurrentLine), MoveUp(1))?;
            self.list_drawn = false;
        }
        Ok(())
    }

    /// Leave the current line: erase any suggestion list and move to a new line.
    pub fn finish_line(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.queue_erase_list(out)?;
        queue!(out, Print("\r\n"))?;
        out.flush()
    }
}
