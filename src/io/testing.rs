//! Scripted console adapter for tests
//!
//! [`MockConsole`] stands in for the OS: tests decide which handles are
//! consoles, queue input bytes and read errors, cap how much text a console
//! write accepts, and inspect every call the adaptation layer made.
//!
//! ```
//! use kickstart_io::testing::{MockCall, MockConsole};
//! use kickstart_io::Utf8Streams;
//!
//! let console = MockConsole::redirected();
//! console.set_console(MockConsole::STDOUT, true);
//! let streams = Utf8Streams::new(&console);
//!
//! streams.output(MockConsole::STDOUT, "π").unwrap();
//! assert_eq!(console.output(MockConsole::STDOUT), "π".as_bytes());
//! assert!(matches!(console.calls().last(), Some(MockCall::WriteConsole { .. })));
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::codec::{self, NativeUnit};
use super::handle::{StandardStream, StreamHandle};
use super::platform::{ConsoleAdapter, ConsoleMode};

/// Mode every mock console starts in
pub const INITIAL_MODE: ConsoleMode = ConsoleMode(0x0083);

/// One operation the adapter was asked to perform
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
    /// Console write; `text` is the native text converted back to UTF-8
    WriteConsole { handle: StreamHandle, text: Vec<u8> },
    WriteBytes { handle: StreamHandle, bytes: Vec<u8> },
    ReadByte { handle: StreamHandle },
    SetMode { handle: StreamHandle, mode: ConsoleMode },
}

#[derive(Clone, Copy, Debug)]
enum Scripted {
    Byte(u8),
    Error,
}

#[derive(Debug, Default)]
pub struct MockConsole {
    consoles: Mutex<FxHashSet<StreamHandle>>,
    modes: Mutex<FxHashMap<StreamHandle, ConsoleMode>>,
    input: Mutex<FxHashMap<StreamHandle, VecDeque<Scripted>>>,
    output: Mutex<FxHashMap<StreamHandle, Vec<u8>>>,
    calls: Mutex<Vec<MockCall>>,
    console_write_limit: Mutex<Option<usize>>,
    mode_queries: AtomicUsize,
}

impl MockConsole {
    pub const STDIN: StreamHandle = StreamHandle::from_raw(0);
    pub const STDOUT: StreamHandle = StreamHandle::from_raw(1);
    pub const STDERR: StreamHandle = StreamHandle::from_raw(2);

    /// Every standard stream redirected to a file or pipe
    pub fn redirected() -> Self {
        Self::default()
    }

    /// Every standard stream attached to a console
    pub fn all_consoles() -> Self {
        let mock = Self::default();
        for handle in [Self::STDIN, Self::STDOUT, Self::STDERR] {
            mock.set_console(handle, true);
        }
        mock
    }

    pub fn set_console(&self, handle: StreamHandle, console: bool) {
        if console {
            self.consoles.lock().insert(handle);
            self.modes.lock().entry(handle).or_insert(INITIAL_MODE);
        } else {
            self.consoles.lock().remove(&handle);
        }
    }

    /// Queue bytes to be returned by `read_byte`
    pub fn push_input(&self, handle: StreamHandle, bytes: &[u8]) {
        let mut input = self.input.lock();
        let queue = input.entry(handle).or_default();
        queue.extend(bytes.iter().copied().map(Scripted::Byte));
    }

    /// Queue a read failure after the input pushed so far
    pub fn push_read_error(&self, handle: StreamHandle) {
        self.input.lock().entry(handle).or_default().push_back(Scripted::Error);
    }

    /// Make console writes report at most `units` units written
    pub fn limit_console_writes(&self, units: Option<usize>) {
        *self.console_write_limit.lock() = units;
    }

    /// Everything written to `handle`, by either primitive
    pub fn output(&self, handle: StreamHandle) -> Vec<u8> {
        self.output.lock().get(&handle).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn mode(&self, handle: StreamHandle) -> Option<ConsoleMode> {
        self.modes.lock().get(&handle).copied()
    }

    /// How many times the console mode was queried
    pub fn mode_queries(&self) -> usize {
        self.mode_queries.load(Ordering::Relaxed)
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().push(call);
    }
}

impl ConsoleAdapter for MockConsole {
    fn standard_handle(&self, stream: StandardStream) -> StreamHandle {
        match stream {
            StandardStream::Input => Self::STDIN,
            StandardStream::Output => Self::STDOUT,
            StandardStream::Error => Self::STDERR,
        }
    }

    fn console_mode(&self, handle: StreamHandle) -> Option<ConsoleMode> {
        self.mode_queries.fetch_add(1, Ordering::Relaxed);
        if !self.consoles.lock().contains(&handle) {
            return None;
        }
        self.mode(handle)
    }

    fn escape_mode(&self, original: ConsoleMode) -> Option<ConsoleMode> {
        Some(ConsoleMode((original.0 | 0x0004) & !0x0080))
    }

    fn set_console_mode(&self, handle: StreamHandle, mode: ConsoleMode) -> bool {
        self.record(MockCall::SetMode { handle, mode });
        self.modes.lock().insert(handle, mode);
        true
    }

    fn write_console(&self, handle: StreamHandle, text: &[NativeUnit]) -> io::Result<usize> {
        let accepted = match *self.console_write_limit.lock() {
            Some(limit) => limit.min(text.len()),
            None => text.len(),
        };
        let utf8 = codec::to_utf8(text).map_err(io::Error::from)?;
        self.record(MockCall::WriteConsole {
            handle,
            text: utf8.clone(),
        });
        if accepted == text.len() {
            self.output.lock().entry(handle).or_default().extend_from_slice(&utf8);
        }
        Ok(accepted)
    }

    fn read_byte(&self, handle: StreamHandle) -> io::Result<Option<u8>> {
        self.record(MockCall::ReadByte { handle });
        let next = self.input.lock().get_mut(&handle).and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Byte(b)) => Ok(Some(b)),
            Some(Scripted::Error) => Err(io::Error::other("scripted read failure")),
            None => Ok(None),
        }
    }

    fn write_bytes(&self, handle: StreamHandle, bytes: &[u8]) -> io::Result<usize> {
        self.record(MockCall::WriteBytes {
            handle,
            bytes: bytes.to_vec(),
        });
        self.output.lock().entry(handle).or_default().extend_from_slice(bytes);
        Ok(bytes.len())
    }
}
