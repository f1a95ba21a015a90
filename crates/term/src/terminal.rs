//! Terminal mode control: raw mode in, cooked mode out.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossterm::{cursor, event, style::ResetColor, terminal, QueueableCommand};

/// The terminal operations the loop needs, so headless runs can swap in a fake.
///
/// `Send + Sync` so the terminal can also be restored from a panic hook.
pub trait TerminalMode: Send + Sync {
    /// Switch to raw (non-canonical, non-echoing) mode and prepare the screen.
    fn enter(&self) -> io::Result<()>;

    /// Undo everything `enter` did, cursor visibility included.
    fn restore(&self) -> io::Result<()>;

    /// Current `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// The real terminal, driven through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self
    }

    fn write_all(buf: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(buf)?;
        stdout.flush()
    }

    /// Screen setup written after raw mode is on.
    fn enter_sequence() -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(64);
        buf.queue(terminal::EnterAlternateScreen)?;
        buf.queue(terminal::Clear(terminal::ClearType::All))?;
        buf.queue(cursor::Hide)?;
        buf.queue(terminal::DisableLineWrap)?;
        buf.queue(event::EnableMouseCapture)?;
        Ok(buf)
    }

    /// Reverse of [`Self::enter_sequence`], in reverse order.
    fn restore_sequence() -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(64);
        buf.queue(event::DisableMouseCapture)?;
        buf.queue(ResetColor)?;
        buf.queue(terminal::EnableLineWrap)?;
        buf.queue(cursor::Show)?;
        buf.queue(terminal::LeaveAlternateScreen)?;
        Ok(buf)
    }
}

impl TerminalMode for CrosstermTerminal {
    fn enter(&self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let written = Self::enter_sequence().and_then(|buf| Self::write_all(&buf));
        if let Err(err) = written {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        // Leave raw mode even if the screen could not be written to.
        let written = Self::restore_sequence().and_then(|buf| Self::write_all(&buf));
        terminal::disable_raw_mode()?;
        written
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

/// Holds the terminal in raw mode for as long as it lives.
///
/// Restoration happens in `Drop`, so early returns and unwinding panics give
/// the terminal back too. Use [`RawModeGuard::release`] on the normal path to
/// see restore errors. With `panic = "abort"` nothing is dropped; pair the
/// guard with a [`PanicRestore`] for that case.
pub struct RawModeGuard {
    restorer: Restorer,
}

impl RawModeGuard {
    pub fn acquire(term: Arc<dyn TerminalMode>) -> io::Result<Self> {
        term.enter()?;
        Ok(Self {
            restorer: Restorer {
                term,
                active: Arc::new(AtomicBool::new(true)),
            },
        })
    }

    /// A handle that restores this guard's terminal, at most once overall.
    pub fn restorer(&self) -> Restorer {
        self.restorer.clone()
    }

    /// Restore now. `Ok` if someone else already did.
    pub fn release(self) -> io::Result<()> {
        self.restorer.restore().unwrap_or(Ok(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restorer.restore();
    }
}

/// Shared restore-once handle for a [`RawModeGuard`].
#[derive(Clone)]
pub struct Restorer {
    term: Arc<dyn TerminalMode>,
    active: Arc<AtomicBool>,
}

impl Restorer {
    /// `None` if the terminal was already restored.
    pub fn restore(&self) -> Option<io::Result<()>> {
        if self.active.swap(false, Ordering::AcqRel) {
            Some(self.term.restore())
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Restores the terminal from the panic hook of the installing thread.
///
/// Runs before the previous hook, so the panic message lands on the normal
/// screen, and also works when panics abort. The previous hook is put back on
/// drop; after a panic the hook stays in place and only chains.
pub struct PanicRestore {
    uninstall: Option<Box<dyn FnOnce()>>,
}

impl PanicRestore {
    pub fn install(restorer: Restorer) -> Self {
        let owner = thread::current().id();
        let previous = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            if thread::current().id() == owner {
                let _ = restorer.restore();
            }
            chained(info);
        }));

        let uninstall = move || {
            drop(panic::take_hook());
            match Arc::try_unwrap(previous) {
                Ok(previous) => panic::set_hook(previous),
                Err(previous) => panic::set_hook(Box::new(move |info| previous(info))),
            }
        };
        Self {
            uninstall: Some(Box::new(uninstall)),
        }
    }
}

impl Drop for PanicRestore {
    fn drop(&mut self) {
        // The hook cannot be swapped while unwinding.
        if thread::panicking() {
            return;
        }
        if let Some(uninstall) = self.uninstall.take() {
            uninstall();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[derive(Default)]
    struct Recording {
        entered: AtomicU32,
        restored: AtomicU32,
        fail_enter: bool,
    }

    impl Recording {
        fn restored(&self) -> u32 {
            self.restored.load(Ordering::SeqCst)
        }
    }

    impl TerminalMode for Recording {
        fn enter(&self) -> io::Result<()> {
            if self.fail_enter {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"));
            }
            self.entered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn restore(&self) -> io::Result<()> {
            self.restored.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn size(&self) -> io::Result<(u16, u16)> {
            Ok((80, 24))
        }
    }

    fn recording() -> Arc<Recording> {
        Arc::new(Recording::default())
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    #[cfg(unix)]
    #[test]
    fn mouse_capture_is_enabled_on_enter_and_disabled_on_restore() {
        let enter = CrosstermTerminal::enter_sequence().unwrap();
        let restore = CrosstermTerminal::restore_sequence().unwrap();
        // Basic press/release reporting plus SGR encoding.
        assert!(contains(&enter, "\x1b[?1000h"));
        assert!(contains(&enter, "\x1b[?1006h"));
        assert!(contains(&restore, "\x1b[?1000l"));
        assert!(contains(&restore, "\x1b[?1006l"));
        assert!(!contains(&restore, "\x1b[?1000h"));
        // Capture goes off before the alternate screen is left.
        assert!(restore.starts_with(b"\x1b[?1006l"));
        assert!(contains(&restore, "\x1b[?1049l"));
    }

    #[test]
    fn guard_restores_on_drop() {
        let term = recording();
        {
            let _guard = RawModeGuard::acquire(term.clone()).unwrap();
            assert_eq!(term.entered.load(Ordering::SeqCst), 1);
            assert_eq!(term.restored(), 0);
        }
        assert_eq!(term.restored(), 1);
    }

    #[test]
    fn guard_release_restores_exactly_once() {
        let term = recording();
        let guard = RawModeGuard::acquire(term.clone()).unwrap();
        guard.release().unwrap();
        assert_eq!(term.restored(), 1);
    }

    #[test]
    fn restorer_and_guard_share_one_restore() {
        let term = recording();
        let guard = RawModeGuard::acquire(term.clone()).unwrap();
        let restorer = guard.restorer();
        assert!(restorer.is_active());
        assert!(matches!(restorer.restore(), Some(Ok(()))));
        assert!(restorer.restore().is_none());
        guard.release().unwrap();
        assert_eq!(term.restored(), 1);
    }

    #[test]
    fn guard_restores_during_unwind() {
        let term = recording();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RawModeGuard::acquire(term.clone()).unwrap();
            panic!("game crashed");
        }));
        assert!(result.is_err());
        assert_eq!(term.restored(), 1);
    }

    #[test]
    fn panic_hook_restores_without_drop() {
        let term = recording();
        let guard = RawModeGuard::acquire(term.clone()).unwrap();
        let hook = PanicRestore::install(guard.restorer());
        // Nothing is dropped under panic = "abort"; only the hook can restore.
        std::mem::forget(guard);

        let result = std::panic::catch_unwind(|| panic!("game crashed"));
        assert!(result.is_err());
        assert_eq!(term.restored(), 1);
        drop(hook);
    }

    #[test]
    fn failed_enter_yields_no_guard() {
        let term = Arc::new(Recording {
            fail_enter: true,
            ..Recording::default()
        });
        assert!(RawModeGuard::acquire(term.clone()).is_err());
        assert_eq!(term.restored(), 0);
    }
}
