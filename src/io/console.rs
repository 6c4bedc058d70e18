//! Low-level read/write primitives behind each stream route
//!
//! The console primitive converts UTF-8 to native text and reports a write
//! as all-or-nothing: working out how many bytes a partial console write
//! covered would mean converting back, so a short write is reported as 0.

use super::codec::{to_native, MAX_CONVERSION_UNITS};
use super::error::Result;
use super::handle::StreamHandle;
use super::platform::ConsoleAdapter;

/// Write UTF-8 `bytes` to the console behind `output`
///
/// Returns `bytes.len()` when the console accepted all of the converted
/// text and 0 otherwise; a 0 for a non-empty request means failure.
///
/// # Panics
///
/// When `bytes` is longer than [`MAX_CONVERSION_UNITS`].
pub fn write_console<A: ConsoleAdapter + ?Sized>(
    adapter: &A,
    output: StreamHandle,
    bytes: &[u8],
) -> Result<usize> {
    if bytes.is_empty() {
        return Ok(0);
    }
    assert!(
        bytes.len() <= MAX_CONVERSION_UNITS,
        "console write of {} bytes exceeds the 32-bit count limit",
        bytes.len()
    );

    let native = to_native(bytes)?;
    let written = adapter.write_console(output, &native)?;
    if written < native.len() {
        crate::debug!(
            "short console write on {}: {} of {} units",
            output,
            written,
            native.len()
        );
        return Ok(0);
    }
    Ok(bytes.len())
}

/// Read one byte from a console stream
///
/// Consoles deliver input through the same byte primitive as any other
/// stream; no wide-character decoding happens here.
pub fn read_console_byte<A: ConsoleAdapter + ?Sized>(
    adapter: &A,
    handle: StreamHandle,
) -> Result<Option<u8>> {
    read_raw(adapter, handle)
}

/// Write bytes unchanged, returning how many the OS accepted
pub fn write_raw<A: ConsoleAdapter + ?Sized>(
    adapter: &A,
    handle: StreamHandle,
    bytes: &[u8],
) -> Result<usize> {
    if bytes.is_empty() {
        return Ok(0);
    }
    Ok(adapter.write_bytes(handle, bytes)?)
}

pub fn read_raw<A: ConsoleAdapter + ?Sized>(
    adapter: &A,
    handle: StreamHandle,
) -> Result<Option<u8>> {
    Ok(adapter.read_byte(handle)?)
}
