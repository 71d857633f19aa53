//! The read loop tying the input components together.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use super::completion::Completion;
use super::continuation::{Continuation, Submit};
use super::exit::ExitIntent;
use super::key::{Key, KeyDecoder};
use super::line::{LineBuffer, word_boundary_left};
use super::render::Renderer;
use super::suggest::SuggestionSource;
use super::terminal::{CrosstermRawMode, RawMode, RawModeGuard};
use crate::config::EditorConfig;

/// Bytes requested per `read`. Anything longer is picked up by the next read.
const READ_CHUNK: usize = 64;

/// What one `read_line` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete logical line (continuations already joined).
    Line(String),
    /// The user asked to stop: double Ctrl-C, Ctrl-D, or input closed.
    Terminated,
}

enum Flow {
    Continue,
    Submit(String),
    Terminate,
}

/// Interactive line editor over a byte input, a terminal output and a raw-mode switch.
pub struct LineEditor<S, R, W, M> {
    raw: M,
    core: EditorCore<S, R, W>,
}

/// Everything except the raw-mode switch, so the guard can borrow that alone.
struct EditorCore<S, R, W> {
    source: S,
    input: R,
    output: W,
    decoder: KeyDecoder,
    /// Keys decoded past the Enter that ended the previous read.
    queued: VecDeque<Key>,
    renderer: Renderer,
    continuation: Continuation,
    exit: ExitIntent,
    clock: Box<dyn Fn() -> Instant>,
}

impl<S: SuggestionSource> LineEditor<S, io::Stdin, io::Stdout, CrosstermRawMode> {
    /// Editor on the process terminal.
    pub fn stdio(source: S, config: &EditorConfig) -> Self {
        Self::new(source, io::stdin(), io::stdout(), CrosstermRawMode, config)
    }
}

impl<S, R, W, M> LineEditor<S, R, W, M>
where
    S: SuggestionSource,
    R: Read,
    W: Write,
    M: RawMode,
{
    pub fn new(source: S, input: R, output: W, raw: M, config: &EditorConfig) -> Self {
        Self {
            raw,
            core: EditorCore {
                source,
                input,
                output,
                decoder: KeyDecoder::new(),
                queued: VecDeque::new(),
                renderer: Renderer::new(&config.prompt, config.show_suggestions),
                continuation: Continuation::default(),
                exit: ExitIntent::new(config.exit_window()),
                clock: Box::new(Instant::now),
            },
        }
    }

    /// Replace the time source used for the double Ctrl-C window.
    pub fn with_clock(mut self, clock: impl Fn() -> Instant + 'static) -> Self {
        self.core.clock = Box::new(clock);
        self
    }

    /// Read one logical line.
    ///
    /// The terminal is in raw mode only for the duration of this call. The
    /// only error is failing to enter raw mode or to write to the terminal;
    /// a failed or empty read ends the session with [`ReadOutcome::Terminated`].
    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        let _guard =
            RawModeGuard::acquire(&mut self.raw).context("failed to enter raw terminal mode")?;
        self.core.run().context("failed to write to terminal")
    }
}

impl<S, R, W> EditorCore<S, R, W>
where
    S: SuggestionSource,
    R: Read,
    W: Write,
{
    fn run(&mut self) -> io::Result<ReadOutcome> {
        let mut line = LineBuffer::new();
        let mut completion = Completion::Idle;

        if self.continuation.in_continuation() {
            self.redraw(&line, &completion)?;
        } else {
            self.renderer.start(&mut self.output)?;
        }

        loop {
            let key = self.next_key();
            match self.dispatch(key, &mut line, &mut completion)? {
                Flow::Continue => {}
                Flow::Submit(text) => {
                    tracing::debug!("submitted {} chars", text.chars().count());
                    return Ok(ReadOutcome::Line(text));
                }
                Flow::Terminate => return Ok(ReadOutcome::Terminated),
            }
        }
    }

    /// Next decoded key, blocking on input when none are queued.
    fn next_key(&mut self) -> Key {
        loop {
            if let Some(key) = self.queued.pop_front() {
                return key;
            }
            let mut buf = [0u8; READ_CHUNK];
            match self.input.read(&mut buf) {
                Ok(0) => return Key::EndOfInput,
                Ok(n) => self.queued.extend(self.decoder.feed(&buf[..n])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("input read failed, ending session: {e}");
                    return Key::EndOfInput;
                }
            }
        }
    }

    fn redraw(&mut self, line: &LineBuffer, completion: &Completion) -> io::Result<()> {
        self.renderer.redraw(
            &mut self.output,
            line,
            self.continuation.in_continuation(),
            completion,
        )
    }

    /// Route one key. Continuation and exit handling come first since both can
    /// end the read; everything else edits the line or the completion.
    fn dispatch(
        &mut self,
        key: Key,
        line: &mut LineBuffer,
        completion: &mut Completion,
    ) -> io::Result<Flow> {
        if key != Key::Interrupt {
            self.exit.disarm();
        }

        match key {
            Key::Enter => {
                completion.cancel();
                match self.continuation.submit(&line.to_string()) {
                    Submit::Continue => {
                        line.clear();
                        self.renderer.finish_line(&mut self.output)?;
                        self.redraw(line, completion)?;
                    }
                    Submit::Done(text) => {
                        self.renderer.finish_line(&mut self.output)?;
                        return Ok(Flow::Submit(text));
                    }
                }
            }
            Key::Interrupt => {
                if !line.is_empty() || self.continuation.in_continuation() {
                    tracing::debug!("interrupt cleared the line");
                    line.clear();
                    self.continuation.reset();
                    completion.cancel();
                    self.exit.disarm();
                    self.redraw(line, completion)?;
                } else if self.exit.interrupt((self.clock)()) {
                    tracing::debug!("interrupt confirmed quit");
                    self.renderer.finish_line(&mut self.output)?;
                    return Ok(Flow::Terminate);
                }
            }
            Key::EndOfInput => {
                self.continuation.reset();
                self.renderer.finish_line(&mut self.output)?;
                return Ok(Flow::Terminate);
            }
            Key::Tab => {
                completion.trigger(line, &self.source);
                self.redraw(line, completion)?;
            }
            Key::Escape => {
                if completion.cancel() {
                    self.redraw(line, completion)?;
                }
            }
            Key::Printable(ch) => {
                completion.before_insert(line.cursor(), ch, line);
                line.insert(ch);
                self.redraw(line, completion)?;
            }
            Key::Backspace => {
                if line.cursor() > 0 {
                    completion.before_edit(line.cursor() - 1, line);
                    line.delete_before();
                    self.redraw(line, completion)?;
                }
            }
            Key::CtrlW => {
                let start = word_boundary_left(line.chars(), line.cursor());
                if start < line.cursor() {
                    completion.before_edit(start, line);
                    line.delete_word_before();
                    self.redraw(line, completion)?;
                }
            }
            Key::CtrlU => {
                if line.cursor() > 0 {
                    completion.before_edit(0, line);
                    line.clear_to_start();
                    self.redraw(line, completion)?;
                }
            }
            Key::CtrlA | Key::Home => self.moved(line.move_to_start(), line, completion)?,
            Key::CtrlE | Key::End => self.moved(line.move_to_end(), line, completion)?,
            Key::ArrowLeft => self.moved(line.move_left(), line, completion)?,
            Key::ArrowRight => self.moved(line.move_right(), line, completion)?,
            Key::ArrowUp | Key::ArrowDown => {}
        }
        Ok(Flow::Continue)
    }

    fn moved(
        &mut self,
        moved: bool,
        line: &LineBuffer,
        completion: &mut Completion,
    ) -> io::Result<()> {
        if !moved {
            return Ok(());
        }
        completion.after_cursor_move(line.cursor());
        self.redraw(line, completion)
    }
}
