//! Console state captured at startup and restored at teardown

use std::sync::atomic::{AtomicBool, Ordering};

use super::classify::ConsoleClassifier;
use super::handle::{StandardStream, StreamHandle};
use super::options::ConsoleOptions;
use super::platform::{ConsoleAdapter, ConsoleMode};

/// Which standard streams are consoles, and the output console's mode
///
/// Restoring the original mode is the only teardown action; it happens at
/// most once.
#[derive(Debug)]
pub struct ConsoleState {
    handles: [StreamHandle; 3],
    console: [bool; 3],
    output_console: Option<StreamHandle>,
    original_mode: Option<ConsoleMode>,
    restored: AtomicBool,
}

impl ConsoleState {
    /// Classify the standard streams and prepare the output console
    pub fn capture<A: ConsoleAdapter + ?Sized>(
        adapter: &A,
        classifier: &ConsoleClassifier,
        options: &ConsoleOptions,
    ) -> Self {
        let handles = StandardStream::ALL.map(|stream| adapter.standard_handle(stream));
        let console = handles.map(|handle| classifier.is_console(adapter, handle));

        // Error wins over Output when both are consoles; they share one screen.
        let output_console = StandardStream::ALL
            .iter()
            .filter(|stream| stream.is_output() && console[stream.index()])
            .map(|stream| handles[stream.index()])
            .last();

        let mut original_mode = None;
        if let Some(handle) = output_console {
            if let Some(mode) = adapter.console_mode(handle) {
                original_mode = Some(mode);
                if options.enable_escape_sequences {
                    if let Some(escapes) = adapter.escape_mode(mode) {
                        let applied = adapter.set_console_mode(handle, escapes);
                        crate::debug!(
                            "console {} mode {:#x} -> {:#x} (applied={})",
                            handle,
                            mode.0,
                            escapes.0,
                            applied
                        );
                    }
                }
            }
        }

        Self {
            handles,
            console,
            output_console,
            original_mode,
            restored: AtomicBool::new(false),
        }
    }

    pub fn handle(&self, stream: StandardStream) -> StreamHandle {
        self.handles[stream.index()]
    }

    pub fn is_console(&self, stream: StandardStream) -> bool {
        self.console[stream.index()]
    }

    /// Handle console text is written to
    pub fn output_console(&self) -> Option<StreamHandle> {
        self.output_console
    }

    pub fn original_mode(&self) -> Option<ConsoleMode> {
        self.original_mode
    }

    /// Put the output console back into its original mode
    ///
    /// Only the first call acts. Returns whether this call restored a mode.
    pub fn restore<A: ConsoleAdapter + ?Sized>(&self, adapter: &A) -> bool {
        if self.restored.swap(true, Ordering::AcqRel) {
            return false;
        }
        match (self.output_console, self.original_mode) {
            (Some(handle), Some(mode)) => {
                crate::debug!("restoring console {} mode {:#x}", handle, mode.0);
                adapter.set_console_mode(handle, mode)
            }
            _ => false,
        }
    }

    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::{MockCall, MockConsole, INITIAL_MODE};

    #[test]
    fn test_capture_with_consoles_enables_escapes() {
        let console = MockConsole::all_consoles();
        let state = ConsoleState::capture(&console, &ConsoleClassifier::new(), &ConsoleOptions::default());

        assert!(StandardStream::ALL.iter().all(|s| state.is_console(*s)));
        assert_eq!(state.output_console(), Some(MockConsole::STDERR));
        assert_eq!(state.original_mode(), Some(INITIAL_MODE));
        assert_eq!(console.mode(MockConsole::STDERR), Some(ConsoleMode(0x0007)));
    }

    #[test]
    fn test_stdout_only_console() {
        let console = MockConsole::redirected();
        console.set_console(MockConsole::STDOUT, true);
        let state = ConsoleState::capture(&console, &ConsoleClassifier::new(), &ConsoleOptions::default());

        assert!(!state.is_console(StandardStream::Input));
        assert!(state.is_console(StandardStream::Output));
        assert_eq!(state.output_console(), Some(MockConsole::STDOUT));
    }

    #[test]
    fn test_restore_happens_once() {
        let console = MockConsole::all_consoles();
        let state = ConsoleState::capture(&console, &ConsoleClassifier::new(), &ConsoleOptions::default());
        console.clear_calls();

        assert!(state.restore(&console));
        assert!(!state.restore(&console));
        assert!(state.is_restored());
        assert_eq!(
            console.calls(),
            vec![MockCall::SetMode {
                handle: MockConsole::STDERR,
                mode: INITIAL_MODE
            }]
        );
    }

    #[test]
    fn test_escapes_disabled_leaves_mode_alone() {
        let console = MockConsole::all_consoles();
        let options = ConsoleOptions {
            enable_escape_sequences: false,
            ..ConsoleOptions::default()
        };
        ConsoleState::capture(&console, &ConsoleClassifier::new(), &options);
        assert!(console.calls().is_empty());
        assert_eq!(console.mode(MockConsole::STDERR), Some(INITIAL_MODE));
    }

    #[test]
    fn test_redirected_has_nothing_to_restore() {
        let console = MockConsole::redirected();
        let state = ConsoleState::capture(&console, &ConsoleClassifier::new(), &ConsoleOptions::default());
        assert_eq!(state.output_console(), None);
        assert!(!state.restore(&console));
    }
}
