//! OS console capability behind one interface
//!
//! Each supported target has one [`ConsoleAdapter`] implementation, chosen at
//! build time as [`SystemConsole`]. Targets without one still build, but
//! constructing the adapter fails with [`Error::UnsupportedPlatform`]: there
//! is no degraded fallback.
//!
//! [`Error::UnsupportedPlatform`]: super::error::Error::UnsupportedPlatform

use std::io;

use super::codec::NativeUnit;
use super::handle::{StandardStream, StreamHandle};

#[cfg(unix)]
mod posix;
#[cfg(unix)]
pub use posix::PosixConsole as SystemConsole;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::WindowsConsole as SystemConsole;

#[cfg(not(any(unix, windows)))]
mod unsupported;
#[cfg(not(any(unix, windows)))]
pub use unsupported::UnsupportedConsole as SystemConsole;

/// Console display mode flags as the OS reports them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConsoleMode(pub u32);

/// Low-level operations the adaptation layer consumes from the OS
pub trait ConsoleAdapter: Send + Sync {
    /// OS handle of a standard stream
    fn standard_handle(&self, stream: StandardStream) -> StreamHandle;

    /// Current display mode, or `None` when `handle` is not a console
    ///
    /// Any OS failure also yields `None`; callers fall back to byte
    /// passthrough.
    fn console_mode(&self, handle: StreamHandle) -> Option<ConsoleMode>;

    /// Mode to switch an output console to so it interprets escape sequences
    fn escape_mode(&self, _original: ConsoleMode) -> Option<ConsoleMode> {
        None
    }

    fn set_console_mode(&self, handle: StreamHandle, mode: ConsoleMode) -> bool;

    /// Write native text to a console, returning the units it accepted
    fn write_console(&self, handle: StreamHandle, text: &[NativeUnit]) -> io::Result<usize>;

    /// One byte from the stream, `None` at end of file
    fn read_byte(&self, handle: StreamHandle) -> io::Result<Option<u8>>;

    /// Raw bytes to the stream, returning how many were written
    fn write_bytes(&self, handle: StreamHandle, bytes: &[u8]) -> io::Result<usize>;
}

impl<A: ConsoleAdapter + ?Sized> ConsoleAdapter for &A {
    fn standard_handle(&self, stream: StandardStream) -> StreamHandle {
        (**self).standard_handle(stream)
    }

    fn console_mode(&self, handle: StreamHandle) -> Option<ConsoleMode> {
        (**self).console_mode(handle)
    }

    fn escape_mode(&self, original: ConsoleMode) -> Option<ConsoleMode> {
        (**self).escape_mode(original)
    }

    fn set_console_mode(&self, handle: StreamHandle, mode: ConsoleMode) -> bool {
        (**self).set_console_mode(handle, mode)
    }

    fn write_console(&self, handle: StreamHandle, text: &[NativeUnit]) -> io::Result<usize> {
        (**self).write_console(handle, text)
    }

    fn read_byte(&self, handle: StreamHandle) -> io::Result<Option<u8>> {
        (**self).read_byte(handle)
    }

    fn write_bytes(&self, handle: StreamHandle, bytes: &[u8]) -> io::Result<usize> {
        (**self).write_bytes(handle, bytes)
    }
}
