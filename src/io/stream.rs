//! Buffered UTF-8 output and line iteration over stream handles
//!
//! [`Utf8Writer`] collects output and hands it to the streams in chunks that
//! always end on a code point boundary, so no multi-byte character is split
//! between two console conversions. [`Lines`] iterates over the lines of an
//! input handle until end of input.

use std::io::{self, Write};

use super::codec::complete_prefix_len;
use super::error::{CodecDirection, Error, Result};
use super::handle::StreamHandle;
use super::platform::ConsoleAdapter;
use super::streams::Utf8Streams;

/// Default buffer size for [`Utf8Writer`] (8KB)
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Chunked UTF-8-safe writer for one stream handle
///
/// # Examples
/// ```
/// use kickstart_io::testing::MockConsole;
/// use kickstart_io::Utf8Streams;
/// use std::io::Write;
///
/// let console = MockConsole::all_consoles();
/// let streams = Utf8Streams::new(&console);
/// let mut out = streams.writer(MockConsole::STDOUT);
/// write!(out, "{} + {} = {}", 1, 2, 3).unwrap();
/// out.finish().unwrap();
/// ```
pub struct Utf8Writer<'a, A: ConsoleAdapter> {
    streams: &'a Utf8Streams<A>,
    handle: StreamHandle,
    buffer: Vec<u8>,
    buffer_size: usize,
    flushed: usize,
}

impl<'a, A: ConsoleAdapter> Utf8Writer<'a, A> {
    /// Create a writer with the default buffer size
    pub fn new(streams: &'a Utf8Streams<A>, handle: StreamHandle) -> Self {
        Self::with_buffer_size(streams, handle, DEFAULT_BUFFER_SIZE)
    }

    /// Create a writer with a custom buffer size
    pub fn with_buffer_size(streams: &'a Utf8Streams<A>, handle: StreamHandle, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(4);
        Self {
            streams,
            handle,
            buffer: Vec::with_capacity(buffer_size),
            buffer_size,
            flushed: 0,
        }
    }

    pub fn handle(&self) -> StreamHandle {
        self.handle
    }

    /// Bytes waiting in the buffer
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes handed to the stream so far
    pub fn flushed(&self) -> usize {
        self.flushed
    }

    /// Write a chunk of data
    pub fn write_chunk(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() >= self.buffer_size {
            self.flush_complete()?;
        }
        Ok(())
    }

    /// Send every complete code point in the buffer
    ///
    /// Text goes out in pieces of at most `buffer_size` bytes, each ending on
    /// a code point boundary. A trailing incomplete sequence stays buffered
    /// until the rest of it arrives.
    pub fn flush_complete(&mut self) -> Result<()> {
        let complete = complete_prefix_len(&self.buffer);
        let mut sent = 0;
        let mut result = Ok(());
        while sent < complete {
            let end = complete.min(sent + self.buffer_size);
            let mut len = complete_prefix_len(&self.buffer[sent..end]);
            if len == 0 {
                // Ill-formed lead byte; let the codec reject it.
                len = end - sent;
            }
            result = self.streams.write_all(self.handle, &self.buffer[sent..sent + len]);
            if result.is_err() {
                break;
            }
            sent += len;
        }
        self.buffer.drain(..sent);
        self.flushed += sent;
        result
    }

    /// Flush everything; a dangling incomplete sequence is an error
    ///
    /// The error's `valid_up_to` is the number of bytes already written.
    pub fn finish(mut self) -> Result<()> {
        self.flush_complete()?;
        if !self.buffer.is_empty() {
            self.buffer.clear();
            return Err(Error::Codec {
                direction: CodecDirection::ToNative,
                valid_up_to: self.flushed,
            });
        }
        Ok(())
    }
}

impl<A: ConsoleAdapter> Write for Utf8Writer<'_, A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(self.flush_complete()?)
    }
}

impl<A: ConsoleAdapter> Drop for Utf8Writer<'_, A> {
    fn drop(&mut self) {
        let _ = self.flush_complete();
    }
}

/// Lines of an input handle, ending at end of input or after an error
///
/// A read error that cut a line short is yielded after that partial line,
/// then iteration ends; the stream stays in its error state.
pub struct Lines<'a, A: ConsoleAdapter> {
    streams: &'a Utf8Streams<A>,
    handle: StreamHandle,
    done: bool,
}

impl<'a, A: ConsoleAdapter> Lines<'a, A> {
    pub fn new(streams: &'a Utf8Streams<A>, handle: StreamHandle) -> Self {
        Self {
            streams,
            handle,
            done: false,
        }
    }

    /// Fold every remaining line into an accumulator
    pub fn fold_lines<T, F>(mut self, init: T, mut fold_fn: F) -> Result<T>
    where
        F: FnMut(T, String) -> Result<T>,
    {
        let mut acc = init;
        for line in self.by_ref() {
            acc = fold_fn(acc, line?)?;
        }
        Ok(acc)
    }
}

impl<A: ConsoleAdapter> Iterator for Lines<'_, A> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        if self.done {
            return None;
        }
        if self.streams.has_error(self.handle) {
            self.done = true;
            return self.streams.take_error(self.handle).map(|e| Err(Error::Io(e)));
        }
        match self.streams.input_or_eof(self.handle) {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
