//! Raw terminal mode, held for exactly one read.

use std::io;

/// Switches the controlling terminal between raw and cooked mode.
pub trait RawMode {
    fn enable(&mut self) -> io::Result<()>;
    fn disable(&mut self) -> io::Result<()>;
}

/// The process terminal, via crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermRawMode;

impl RawMode for CrosstermRawMode {
    fn enable(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Raw mode for as long as the guard lives.
///
/// Dropping the guard restores cooked mode on every exit path, including `?`
/// returns and unwinding panics.
pub struct RawModeGuard<'a, T: RawMode + ?Sized> {
    mode: &'a mut T,
}

impl<'a, T: RawMode + ?Sized> RawModeGuard<'a, T> {
    /// Enter raw mode. On failure nothing needs restoring, so no guard is returned.
    pub fn acquire(mode: &'a mut T) -> io::Result<Self> {
        mode.enable()?;
        Ok(Self { mode })
    }
}

impl<T: RawMode + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.mode.disable() {
            tracing::warn!("failed to restore terminal mode: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io;

    use super::RawMode;

    /// Counts mode switches instead of touching a terminal.
    #[derive(Debug, Default)]
    pub struct CountingRawMode {
        pub enabled: usize,
        pub disabled: usize,
        pub fail_enable: bool,
    }

    impl CountingRawMode {
        pub fn is_raw(&self) -> bool {
            self.enabled > self.disabled
        }
    }

    impl RawMode for CountingRawMode {
        fn enable(&mut self) -> io::Result<()> {
            if self.fail_enable {
                return Err(io::Error::other("not a terminal"));
            }
            self.enabled += 1;
            Ok(())
        }

        fn disable(&mut self) -> io::Result<()> {
            self.disabled += 1;
            Ok(())
        }
    }
}
