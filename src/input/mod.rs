//! Interactive line input: raw key decoding, editing, `@` path completion,
//! backslash continuation and the double Ctrl-C exit gesture.

mod completion;
mod continuation;
mod editor;
mod exit;
mod ignore;
mod key;
mod line;
mod render;
mod suggest;
mod terminal;

pub use completion::{ActiveCompletion, Completion};
pub use continuation::{Continuation, Submit};
pub use editor::{LineEditor, ReadOutcome};
pub use exit::{EXIT_WINDOW, ExitIntent};
pub use ignore::{DEFAULT_PATTERNS, IgnoreRules};
pub use key::{Key, KeyDecoder};
pub use line::LineBuffer;
pub use render::Renderer;
pub use suggest::{FsSuggester, MAX_SUGGESTIONS, SuggestionSource};
pub use terminal::{CrosstermRawMode, RawMode, RawModeGuard};
