//! Backslash line continuation.

/// Result of pressing Enter on the current physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// The line ended in `\`; keep reading.
    Continue,
    /// The logical line is complete.
    Done(String),
}

/// Physical lines collected while a continuation is open.
///
/// Invariant: `in_continuation()` is true exactly when lines are pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Continuation {
    pending: Vec<String>,
}

impl Continuation {
    pub fn in_continuation(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Handle Enter with `line` as the current physical line.
    ///
    /// A trailing backslash (ignoring trailing whitespace) is stripped and the
    /// rest is held back. Otherwise all held lines and `line` are joined with
    /// single spaces and the continuation closes.
    pub fn submit(&mut self, line: &str) -> Submit {
        let trimmed = line.trim_end();
        if let Some(head) = trimmed.strip_suffix('\\') {
            self.pending.push(head.to_string());
            tracing::debug!("continuation opened, {} lines pending", self.pending.len());
            return Submit::Continue;
        }

        if self.pending.is_empty() {
            return Submit::Done(line.to_string());
        }
        let mut joined = std::mem::take(&mut self.pending).join(" ");
        joined.push(' ');
        joined.push_str(line);
        Submit::Done(joined)
    }

    /// Drop everything held back. Returns `true` if a continuation was open.
    pub fn reset(&mut self) -> bool {
        let was_open = self.in_continuation();
        self.pending.clear();
        was_open
    }
}
