//! Raw byte decoding for terminal key presses.
//!
//! The editor reads stdin in raw mode, so everything arrives as bytes: plain
//! UTF-8 text, single control codes, and `ESC`-prefixed sequences for arrows
//! and Home/End. [`KeyDecoder`] turns each read chunk into [`Key`]s and never
//! leaks raw bytes past this module.

// ── Keys ─────────────────────────────────────────────────────────────

/// A logical key event produced from raw terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Printable(char),
    Enter,
    Backspace,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    CtrlA,
    CtrlE,
    CtrlU,
    CtrlW,
    /// Ctrl-C. Raw mode disables signal generation, so it arrives as a byte.
    Interrupt,
    /// Ctrl-D, or the input stream closed.
    EndOfInput,
}

const ESC: u8 = 0x1b;

// ── Decoder ──────────────────────────────────────────────────────────

/// Stateful decoder fed with whatever each `read` returned.
///
/// Only an incomplete UTF-8 scalar at the very end of a chunk is carried over
/// to the next call. Escape sequences are decoded from the bytes present; a
/// sequence cut short by the read boundary degrades to [`Key::Escape`].
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one read chunk into keys, in input order.
    ///
    /// Unknown control bytes and invalid UTF-8 are dropped without producing a key.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Key> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut keys = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let rest = &bytes[i..];
            let consumed = match rest[0] {
                ESC => {
                    let (key, len) = decode_escape(rest);
                    keys.push(key);
                    len
                }
                b'\r' => {
                    keys.push(Key::Enter);
                    if rest.get(1) == Some(&b'\n') { 2 } else { 1 }
                }
                b'\n' => {
                    keys.push(Key::Enter);
                    1
                }
                0x7f | 0x08 => {
                    keys.push(Key::Backspace);
                    1
                }
                b'\t' => {
                    keys.push(Key::Tab);
                    1
                }
                0x01 => {
                    keys.push(Key::CtrlA);
                    1
                }
                0x03 => {
                    keys.push(Key::Interrupt);
                    1
                }
                0x04 => {
                    keys.push(Key::EndOfInput);
                    1
                }
                0x05 => {
                    keys.push(Key::CtrlE);
                    1
                }
                0x15 => {
                    keys.push(Key::CtrlU);
                    1
                }
                0x17 => {
                    keys.push(Key::CtrlW);
                    1
                }
                b if b < 0x20 => 1,
                lead => {
                    let width = utf8_width(lead);
                    if width == 0 {
                        1
                    } else if rest.len() < width {
                        if rest[1..].iter().all(|b| b & 0xc0 == 0x80) {
                            self.pending.extend_from_slice(rest);
                            break;
                        }
                        1
                    } else {
                        match std::str::from_utf8(&rest[..width]) {
                            Ok(s) => {
                                if let Some(ch) = s.chars().next().filter(|c| is_printable(*c)) {
                                    keys.push(Key::Printable(ch));
                                }
                                width
                            }
                            Err(_) => 1,
                        }
                    }
                }
            };
            i += consumed;
        }
        keys
    }
}

/// Decode an `ESC`-led sequence. Returns the key and how many bytes it used.
fn decode_escape(bytes: &[u8]) -> (Key, usize) {
    match bytes.get(1) {
        Some(b'[') => decode_csi(bytes),
        Some(b'O') => match bytes.get(2).and_then(|b| final_key(*b)) {
            Some(key) => (key, 3),
            None => (Key::Escape, 2),
        },
        _ => (Key::Escape, 1),
    }
}

/// `ESC [ <letter>` and `ESC [ <digits> ~`.
fn decode_csi(bytes: &[u8]) -> (Key, usize) {
    let Some(&third) = bytes.get(2) else {
        return (Key::Escape, bytes.len());
    };
    if let Some(key) = final_key(third) {
        return (key, 3);
    }

    // Parameter and intermediate bytes (0x20..=0x3f), then a final byte in
    // 0x40..=0x7e. Anything else ends the sequence early and is decoded on
    // its own.
    let body = &bytes[2..];
    let params = body
        .iter()
        .position(|b| !(0x20..=0x3f).contains(b))
        .unwrap_or(body.len());
    let Some(&last) = body.get(params) else {
        return (Key::Escape, bytes.len());
    };
    if !(0x40..=0x7e).contains(&last) {
        return (Key::Escape, 2 + params);
    }
    let key = match (&body[..params], last) {
        (b"1" | b"7", b'~') => Key::Home,
        (b"4" | b"8", b'~') => Key::End,
        _ => Key::Escape,
    };
    (key, 2 + params + 1)
}

fn final_key(b: u8) -> Option<Key> {
    match b {
        b'A' => Some(Key::ArrowUp),
        b'B' => Some(Key::ArrowDown),
        b'C' => Some(Key::ArrowRight),
        b'D' => Some(Key::ArrowLeft),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

/// Encoded length implied by a UTF-8 lead byte, or 0 if it can't start a scalar.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x20..=0x7e => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

fn is_printable(ch: char) -> bool {
    !ch.is_control() && (ch == ' ' || !ch.is_whitespace())
}
