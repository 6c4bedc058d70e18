//! POSIX adapter: terminals are detected with `isatty`, text is already UTF-8

use std::io;

use libc::c_void;

use super::{ConsoleAdapter, ConsoleMode};
use crate::io::error::Result;
use crate::io::handle::{StandardStream, StreamHandle};

#[derive(Clone, Copy, Debug, Default)]
pub struct PosixConsole;

impl PosixConsole {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

fn write_fully(handle: StreamHandle, bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < bytes.len() {
        let rest = &bytes[written..];
        // SAFETY: `rest` is a live slice and the length passed matches it.
        let n = unsafe { libc::write(handle.raw(), rest.as_ptr() as *const c_void, rest.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            if written > 0 {
                break;
            }
            return Err(err);
        }
        if n == 0 {
            break;
        }
        written += n as usize;
    }
    Ok(written)
}

impl ConsoleAdapter for PosixConsole {
    fn standard_handle(&self, stream: StandardStream) -> StreamHandle {
        let fd = match stream {
            StandardStream::Input => libc::STDIN_FILENO,
            StandardStream::Output => libc::STDOUT_FILENO,
            StandardStream::Error => libc::STDERR_FILENO,
        };
        StreamHandle::from_raw(fd)
    }

    fn console_mode(&self, handle: StreamHandle) -> Option<ConsoleMode> {
        // SAFETY: isatty only inspects the descriptor; invalid ones return 0.
        let tty = unsafe { libc::isatty(handle.raw()) } == 1;
        tty.then(ConsoleMode::default)
    }

    fn set_console_mode(&self, _handle: StreamHandle, _mode: ConsoleMode) -> bool {
        true
    }

    fn write_console(&self, handle: StreamHandle, text: &[u8]) -> io::Result<usize> {
        write_fully(handle, text)
    }

    fn read_byte(&self, handle: StreamHandle) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // SAFETY: reads at most one byte into a local.
            let n = unsafe { libc::read(handle.raw(), &mut byte as *mut u8 as *mut c_void, 1) };
            match n {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }

    fn write_bytes(&self, handle: StreamHandle, bytes: &[u8]) -> io::Result<usize> {
        write_fully(handle, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn test_regular_file_is_not_console() {
        let file = tempfile::tempfile().unwrap();
        let console = PosixConsole::new().unwrap();
        assert_eq!(console.console_mode(StreamHandle::of(&file)), None);
    }

    #[test]
    fn test_invalid_descriptor_is_not_console() {
        let console = PosixConsole::new().unwrap();
        assert_eq!(console.console_mode(StreamHandle::from_raw(-1)), None);
    }

    #[test]
    fn test_raw_bytes_round_trip_through_file() {
        let mut file = tempfile::tempfile().unwrap();
        let console = PosixConsole::new().unwrap();
        let handle = StreamHandle::of(&file);

        assert_eq!(console.write_bytes(handle, "π\n".as_bytes()).unwrap(), 3);
        file.seek(SeekFrom::Start(0)).unwrap();

        let bytes: Vec<u8> = std::iter::from_fn(|| console.read_byte(handle).unwrap()).collect();
        assert_eq!(bytes, "π\n".as_bytes());
        assert_eq!(console.read_byte(handle).unwrap(), None);

        file.write_all(b"!").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut all = String::new();
        file.read_to_string(&mut all).unwrap();
        assert_eq!(all, "π\n!");
    }

    #[test]
    fn test_read_from_closed_descriptor_fails() {
        let console = PosixConsole::new().unwrap();
        assert!(console.read_byte(StreamHandle::from_raw(-1)).is_err());
    }
}
