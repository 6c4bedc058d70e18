//! UTF-8 standard streams: the entry points user code calls
//!
//! A [`Utf8Streams`] owns everything the adaptation layer needs: the OS
//! adapter, the console state captured at construction, the per-handle
//! classification cache, the route table and the per-handle error flags.
//! Programs either own one explicitly or use the process-wide instance from
//! [`Utf8Streams::init`].
//!
//! ```no_run
//! use kickstart_io::Utf8Streams;
//!
//! let streams = Utf8Streams::init().unwrap();
//! streams.output(streams.stdout(), "Every π is welcome here.\n").unwrap();
//! if let Some(name) = streams.input("Your name, please: ").unwrap() {
//!     streams.output(streams.stdout(), &format!("Hi, {name}!\n")).unwrap();
//! }
//! ```

use std::io;
use std::sync::OnceLock;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::bom::bom_spans;
use super::classify::ConsoleClassifier;
use super::console;
use super::dispatch::{RouteTable, StreamRoute};
use super::error::{Error, Result};
use super::handle::{StandardStream, StreamHandle};
use super::line::{self, ByteSource};
use super::options::ConsoleOptions;
use super::platform::{ConsoleAdapter, SystemConsole};
use super::state::ConsoleState;
use super::stream::{Lines, Utf8Writer};

pub struct Utf8Streams<A: ConsoleAdapter> {
    adapter: A,
    options: ConsoleOptions,
    classifier: ConsoleClassifier,
    state: ConsoleState,
    routes: RouteTable,
    // Failed streams, with a read error not yet reported to the caller.
    failed: Mutex<FxHashMap<StreamHandle, Option<io::Error>>>,
}

impl<A: ConsoleAdapter> Utf8Streams<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_options(adapter, ConsoleOptions::default())
    }

    /// Capture the console state and fix the routes of the standard streams
    pub fn with_options(adapter: A, options: ConsoleOptions) -> Self {
        let classifier = ConsoleClassifier::new();
        let state = ConsoleState::capture(&adapter, &classifier, &options);
        let routes = RouteTable::from_state(&state);
        crate::debug!(
            "console streams: stdin={} stdout={} stderr={}",
            state.is_console(StandardStream::Input),
            state.is_console(StandardStream::Output),
            state.is_console(StandardStream::Error)
        );
        Self {
            adapter,
            options,
            classifier,
            state,
            routes,
            failed: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn handle(&self, stream: StandardStream) -> StreamHandle {
        self.state.handle(stream)
    }

    pub fn stdin(&self) -> StreamHandle {
        self.handle(StandardStream::Input)
    }

    pub fn stdout(&self) -> StreamHandle {
        self.handle(StandardStream::Output)
    }

    pub fn stderr(&self) -> StreamHandle {
        self.handle(StandardStream::Error)
    }

    /// Whether `handle` is a console; cached after the first answer
    pub fn is_console(&self, handle: StreamHandle) -> bool {
        self.classifier.is_console(&self.adapter, handle)
    }

    pub fn route_for(&self, handle: StreamHandle) -> StreamRoute {
        self.routes.route_for(handle)
    }

    /// Write UTF-8 bytes to `handle`
    ///
    /// Every BOM in `bytes` goes to the primitive as a span of its own.
    /// Returns the number of bytes fully transmitted, stopping at the first
    /// span that was not; a console span that fails counts as 0 bytes.
    pub fn write(&self, handle: StreamHandle, bytes: &[u8]) -> Result<usize> {
        if bytes.is_empty() {
            return Ok(0);
        }

        let route = self.route_for(handle);
        let mut total = 0;
        for span in bom_spans(bytes) {
            let n = self.write_span(route, handle, span)?;
            total += n;
            if n < span.len() {
                break;
            }
        }
        Ok(total)
    }

    fn write_span(&self, route: StreamRoute, handle: StreamHandle, span: &[u8]) -> Result<usize> {
        match route {
            StreamRoute::Console => {
                if self.options.check_console_streams {
                    assert!(
                        self.is_console(handle),
                        "console primitive reached for non-console stream {handle}"
                    );
                }
                match self.state.output_console() {
                    Some(output) => console::write_console(&self.adapter, output, span),
                    // Only stdin is a console: there is no screen to convert for.
                    None => console::write_raw(&self.adapter, handle, span),
                }
            }
            StreamRoute::RawPassthrough => console::write_raw(&self.adapter, handle, span),
        }
    }

    /// Write all of `bytes` or fail with [`Error::WriteFailed`]
    pub fn write_all(&self, handle: StreamHandle, bytes: &[u8]) -> Result<()> {
        let written = self.write(handle, bytes)?;
        if written != bytes.len() {
            return Err(Error::WriteFailed {
                handle,
                written,
                requested: bytes.len(),
            });
        }
        Ok(())
    }

    pub fn output(&self, handle: StreamHandle, text: &str) -> Result<()> {
        self.write_all(handle, text.as_bytes())
    }

    /// Write a message to standard error
    pub fn output_error_message(&self, text: &str) -> Result<()> {
        self.output(self.stderr(), text)
    }

    /// Read one byte; a failure marks the stream as being in error
    pub fn read_byte(&self, handle: StreamHandle) -> Result<Option<u8>> {
        let result = match self.route_for(handle) {
            StreamRoute::Console => console::read_console_byte(&self.adapter, handle),
            StreamRoute::RawPassthrough => console::read_raw(&self.adapter, handle),
        };
        if result.is_err() {
            self.failed.lock().entry(handle).or_insert(None);
        }
        result
    }

    /// Read a line from `handle`, `None` at end of input
    ///
    /// See [`line::input_or_eof`] for the exact rules. When a read fails
    /// after part of a line arrived, the partial line is returned and the
    /// error is kept for [`take_error`](Self::take_error).
    ///
    /// Calling this on a stream whose earlier read failed is a contract
    /// violation reported as [`Error::StreamInErrorState`];
    /// [`clear_error`](Self::clear_error) resets the stream.
    pub fn input_or_eof(&self, handle: StreamHandle) -> Result<Option<String>> {
        if self.has_error(handle) {
            return Err(Error::StreamInErrorState(handle));
        }
        let mut source = HandleSource {
            streams: self,
            handle,
            error: None,
        };
        match line::input_or_eof(&mut source) {
            Err(Error::Io(e)) => Err(Error::Io(source.error.take().unwrap_or(e))),
            Ok(line) => {
                if let Some(e) = source.error {
                    self.failed.lock().insert(handle, Some(e));
                }
                Ok(line)
            }
            Err(e) => Err(e),
        }
    }

    /// Show `prompt` on standard output, then read a line from standard input
    pub fn input(&self, prompt: &str) -> Result<Option<String>> {
        self.output(self.stdout(), prompt)?;
        self.input_or_eof(self.stdin())
    }

    pub fn has_error(&self, handle: StreamHandle) -> bool {
        self.failed.lock().contains_key(&handle)
    }

    /// Read error held back by a line read that returned a partial line
    ///
    /// Returned once; the stream stays in the error state.
    pub fn take_error(&self, handle: StreamHandle) -> Option<io::Error> {
        self.failed.lock().get_mut(&handle).and_then(Option::take)
    }

    pub fn clear_error(&self, handle: StreamHandle) {
        self.failed.lock().remove(&handle);
    }

    /// Buffered writer that only hands complete code points to `handle`
    pub fn writer(&self, handle: StreamHandle) -> Utf8Writer<'_, A> {
        Utf8Writer::with_buffer_size(self, handle, self.options.write_buffer_size)
    }

    /// Iterator over the lines of `handle`
    pub fn lines(&self, handle: StreamHandle) -> Lines<'_, A> {
        Lines::new(self, handle)
    }

    /// Put the output console back into the mode it had at construction
    ///
    /// Idempotent; dropping the streams does the same.
    pub fn restore_console_mode(&self) -> bool {
        self.state.restore(&self.adapter)
    }
}

impl<A: ConsoleAdapter> Drop for Utf8Streams<A> {
    fn drop(&mut self) {
        self.state.restore(&self.adapter);
    }
}

impl<A: ConsoleAdapter> std::fmt::Debug for Utf8Streams<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8Streams")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

struct HandleSource<'a, A: ConsoleAdapter> {
    streams: &'a Utf8Streams<A>,
    handle: StreamHandle,
    error: Option<io::Error>,
}

impl<A: ConsoleAdapter> ByteSource for HandleSource<'_, A> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.streams.read_byte(self.handle) {
            Ok(byte) => Ok(byte),
            Err(Error::Io(e)) => {
                let kind = e.kind();
                self.error = Some(e);
                Err(kind.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

static GLOBAL: OnceLock<Utf8Streams<SystemConsole>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = parking_lot::const_mutex(());

impl Utf8Streams<SystemConsole> {
    /// Streams over the OS console of this build target
    pub fn system(options: ConsoleOptions) -> Result<Self> {
        Ok(Self::with_options(SystemConsole::new()?, options))
    }

    /// The process-wide instance, created on first call
    ///
    /// Later calls return the same instance. Options come from the
    /// environment ([`ConsoleOptions::from_env`]). A static is never dropped,
    /// so call [`restore_console_mode`](Self::restore_console_mode) before
    /// exiting, or run the program through
    /// [`with_errors_displayed`](crate::with_errors_displayed).
    pub fn init() -> Result<&'static Self> {
        if let Some(streams) = GLOBAL.get() {
            return Ok(streams);
        }
        let _guard = INIT_LOCK.lock();
        if let Some(streams) = GLOBAL.get() {
            return Ok(streams);
        }
        let streams = Self::system(ConsoleOptions::from_env())?;
        Ok(GLOBAL.get_or_init(|| streams))
    }

    /// The process-wide instance, if [`init`](Self::init) has run
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }
}
