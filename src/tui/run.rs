//! TUI entry point and terminal setup.

use std::io::{self, Write};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::store::TaskStore;
use crate::tui::app::App;

/// Leaves raw mode and the alternate screen when dropped, so a failed setup
/// step or a panic in the event loop still hands back a usable terminal.
struct TerminalGuard<W: Write> {
    out: W,
    active: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn new(out: W) -> Self {
        Self { out, active: true }
    }

    /// Restore the terminal once; later calls are no-ops.
    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let raw = disable_raw_mode();
        execute!(self.out, LeaveAlternateScreen, DisableMouseCapture)?;
        raw
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("event=terminal_restore status=failed error={}", e);
        }
    }
}

/// Initialise the terminal, run the task UI until the user quits, then
/// restore the terminal even when the event loop failed.
pub fn run_tui(store: TaskStore) -> io::Result<()> {
    enable_raw_mode()?;
    let mut guard = TerminalGuard::new(io::stdout());

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let result = app.run(&mut terminal);

    guard.restore()?;
    terminal.show_cursor()?;

    info!("event=ui_exit ok={}", result.is_ok());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";

    fn written(buf: &SharedBuf) -> String {
        String::from_utf8_lossy(&buf.0.borrow()).into_owned()
    }

    #[test]
    fn test_guard_restores_terminal_on_panic() {
        let buf = SharedBuf::default();
        let out = buf.clone();
        let result = catch_unwind(AssertUnwindSafe(move || {
            let _guard = TerminalGuard::new(out);
            panic!("event loop failed");
        }));
        assert!(result.is_err());
        assert!(written(&buf).contains(LEAVE_ALT_SCREEN));
    }

    #[test]
    fn test_guard_restores_only_once() {
        let buf = SharedBuf::default();
        let mut guard = TerminalGuard::new(buf.clone());
        guard.restore().unwrap();
        let after_first = written(&buf);
        assert!(after_first.contains(LEAVE_ALT_SCREEN));

        drop(guard);
        assert_eq!(written(&buf), after_first);
    }
}
