//! Line input with an explicit end-of-input value

use std::io::{self, Read};

use super::error::{CodecDirection, Error, Result};

/// Anything that yields one byte at a time
pub trait ByteSource {
    /// Next byte, `None` at end of input
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Read one line, without its `\n`
///
/// - End of input before any byte: `Ok(None)`, distinct from an empty line.
/// - A final line without `\n` is returned as is.
/// - A read error after at least one byte keeps the partial line.
/// - A read error before any byte is returned as [`Error::Io`]. It is not
///   folded into `Ok(None)`, so `Err` can come back before any input at all;
///   callers that only care about "no more lines" treat both alike.
pub fn input_or_eof<S: ByteSource + ?Sized>(source: &mut S) -> Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        match source.read_byte() {
            Ok(Some(b'\n')) => break,
            Ok(Some(byte)) => line.push(byte),
            Ok(None) if line.is_empty() => return Ok(None),
            Ok(None) => break,
            Err(e) if line.is_empty() => return Err(Error::Io(e)),
            Err(_e) => {
                crate::debug!("read failed after {} bytes, keeping partial line: {}", line.len(), _e);
                break;
            }
        }
    }

    String::from_utf8(line).map(Some).map_err(|e| Error::Codec {
        direction: CodecDirection::Input,
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// [`ByteSource`] over any reader
///
/// Reads one byte per call; wrap slow readers in a `BufReader` first.
#[derive(Debug)]
pub struct ByteReader<R> {
    reader: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ByteReader<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
