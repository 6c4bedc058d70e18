//! Windows adapter: console output goes through `WriteConsoleW` as UTF-16

use std::ffi::c_void;
use std::fs::File;
use std::io::{self, Read, Write};
use std::mem::ManuallyDrop;
use std::os::windows::io::FromRawHandle;

use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    GetConsoleMode, GetStdHandle, SetConsoleMode, WriteConsoleW, ENABLE_EXTENDED_FLAGS,
    ENABLE_VIRTUAL_TERMINAL_PROCESSING, STD_ERROR_HANDLE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
};

use super::{ConsoleAdapter, ConsoleMode};
use crate::io::error::Result;
use crate::io::handle::{StandardStream, StreamHandle};

#[derive(Clone, Copy, Debug, Default)]
pub struct WindowsConsole;

impl WindowsConsole {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

fn os_handle(handle: StreamHandle) -> HANDLE {
    handle.raw() as HANDLE
}

fn is_valid(handle: StreamHandle) -> bool {
    let h = os_handle(handle);
    h != 0 && h != INVALID_HANDLE_VALUE
}

/// Borrow `handle` as a `File` without taking ownership
fn borrowed_file(handle: StreamHandle) -> io::Result<ManuallyDrop<File>> {
    if !is_valid(handle) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid stream handle"));
    }
    // SAFETY: the handle is open for the caller's lifetime and ManuallyDrop
    // keeps the File from closing it.
    Ok(ManuallyDrop::new(unsafe {
        File::from_raw_handle(handle.raw() as *mut c_void)
    }))
}

impl ConsoleAdapter for WindowsConsole {
    fn standard_handle(&self, stream: StandardStream) -> StreamHandle {
        let id = match stream {
            StandardStream::Input => STD_INPUT_HANDLE,
            StandardStream::Output => STD_OUTPUT_HANDLE,
            StandardStream::Error => STD_ERROR_HANDLE,
        };
        // SAFETY: plain query of the process' standard handle table.
        StreamHandle::from_raw(unsafe { GetStdHandle(id) })
    }

    fn console_mode(&self, handle: StreamHandle) -> Option<ConsoleMode> {
        if !is_valid(handle) {
            return None;
        }
        let mut mode = 0u32;
        // SAFETY: `mode` outlives the call.
        let ok = unsafe { GetConsoleMode(os_handle(handle), &mut mode) } != 0;
        ok.then_some(ConsoleMode(mode))
    }

    fn escape_mode(&self, original: ConsoleMode) -> Option<ConsoleMode> {
        Some(ConsoleMode(
            (original.0 | ENABLE_VIRTUAL_TERMINAL_PROCESSING) & !ENABLE_EXTENDED_FLAGS,
        ))
    }

    fn set_console_mode(&self, handle: StreamHandle, mode: ConsoleMode) -> bool {
        // SAFETY: no pointers involved.
        unsafe { SetConsoleMode(os_handle(handle), mode.0) != 0 }
    }

    fn write_console(&self, handle: StreamHandle, text: &[u16]) -> io::Result<usize> {
        let mut written = 0u32;
        // SAFETY: `text` is live for the call and its length fits in u32,
        // which the codec's length contract guarantees.
        let ok = unsafe {
            WriteConsoleW(
                os_handle(handle),
                text.as_ptr() as *const c_void,
                text.len() as u32,
                &mut written,
                std::ptr::null(),
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(written as usize)
    }

    fn read_byte(&self, handle: StreamHandle) -> io::Result<Option<u8>> {
        let mut file = borrowed_file(handle)?;
        let mut byte = [0u8; 1];
        loop {
            match file.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_bytes(&self, handle: StreamHandle, bytes: &[u8]) -> io::Result<usize> {
        let mut file = borrowed_file(handle)?;
        let mut written = 0;
        while written < bytes.len() {
            match file.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if written == 0 => return Err(e),
                Err(_) => break,
            }
        }
        Ok(written)
    }
}
