//! Targets without console support: the adapter cannot be constructed

use std::io;

use super::{ConsoleAdapter, ConsoleMode};
use crate::io::codec::NativeUnit;
use crate::io::error::{Error, Result};
use crate::io::handle::{StandardStream, StreamHandle};

#[derive(Clone, Copy, Debug)]
enum Never {}

#[derive(Clone, Copy, Debug)]
pub struct UnsupportedConsole(Never);

impl UnsupportedConsole {
    pub fn new() -> Result<Self> {
        Err(Error::UnsupportedPlatform)
    }
}

impl ConsoleAdapter for UnsupportedConsole {
    fn standard_handle(&self, _stream: StandardStream) -> StreamHandle {
        match self.0 {}
    }

    fn console_mode(&self, _handle: StreamHandle) -> Option<ConsoleMode> {
        match self.0 {}
    }

    fn set_console_mode(&self, _handle: StreamHandle, _mode: ConsoleMode) -> bool {
        match self.0 {}
    }

    fn write_console(&self, _handle: StreamHandle, _text: &[NativeUnit]) -> io::Result<usize> {
        match self.0 {}
    }

    fn read_byte(&self, _handle: StreamHandle) -> io::Result<Option<u8>> {
        match self.0 {}
    }

    fn write_bytes(&self, _handle: StreamHandle, _bytes: &[u8]) -> io::Result<usize> {
        match self.0 {}
    }
}
