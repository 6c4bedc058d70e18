//! Error type for the console adaptation layer
//!
//! Errors fall into two groups:
//!
//! | Variant                | Fatal | Meaning                                      |
//! |------------------------|-------|----------------------------------------------|
//! | `Io`                   | no    | OS-level read/write failure                  |
//! | `WriteFailed`          | no    | a stream accepted fewer bytes than requested |
//! | `Codec`                | yes   | ill-formed text handed to a converter        |
//! | `StreamInErrorState`   | yes   | line input requested on a broken stream      |
//! | `UnsupportedPlatform`  | yes   | no console adapter exists for this target    |
//! | `CleanExit`            | no    | program ends early with a message for the user |
//!
//! End of input is not an error; it is `Ok(None)` from the line readers.
//! Length overflows are contract violations and panic instead.

use std::io;

use super::handle::StreamHandle;

/// Direction of a failed text conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecDirection {
    /// UTF-8 to the native wide encoding
    ToNative,
    /// Native wide encoding back to UTF-8
    ToUtf8,
    /// Bytes read from a stream, checked as UTF-8
    Input,
}

impl std::fmt::Display for CodecDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ToNative => "utf-8 to native",
            Self::ToUtf8 => "native to utf-8",
            Self::Input => "input",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("text conversion failed ({direction}): ill-formed data at unit {valid_up_to}")]
    Codec {
        direction: CodecDirection,
        valid_up_to: usize,
    },

    #[error("write to stream {handle} failed: {written} of {requested} bytes written")]
    WriteFailed {
        handle: StreamHandle,
        written: usize,
        requested: usize,
    },

    #[error("stream {0} is in an error state")]
    StreamInErrorState(StreamHandle),

    #[error("console adaptation is not supported on this platform")]
    UnsupportedPlatform,

    /// Ends a program with a plain message instead of an error report
    #[error("{0}")]
    CleanExit(String),
}

impl Error {
    /// See [`with_errors_displayed`](crate::with_errors_displayed)
    pub fn clean_exit(message: impl Into<String>) -> Self {
        Self::CleanExit(message.into())
    }

    pub fn is_clean_exit(&self) -> bool {
        matches!(self, Self::CleanExit(_))
    }

    /// Whether the error belongs to the no-recovery class
    ///
    /// Soft errors (`Io`, `WriteFailed`) leave the decision to retry or abort
    /// with the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Codec { .. } | Self::StreamInErrorState(_) | Self::UnsupportedPlatform
        )
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(inner) => inner,
            Error::Codec { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::WriteFailed { .. } => io::Error::new(io::ErrorKind::WriteZero, err),
            Error::UnsupportedPlatform => io::Error::new(io::ErrorKind::Unsupported, err),
            Error::StreamInErrorState(_) | Error::CleanExit(_) => io::Error::other(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let codec = Error::Codec {
            direction: CodecDirection::ToNative,
            valid_up_to: 0,
        };
        assert!(codec.is_fatal());
        assert!(Error::UnsupportedPlatform.is_fatal());
        assert!(Error::StreamInErrorState(StreamHandle::from_raw(0)).is_fatal());

        let short = Error::WriteFailed {
            handle: StreamHandle::from_raw(1),
            written: 0,
            requested: 5,
        };
        assert!(!short.is_fatal());
        assert!(!Error::Io(io::Error::other("boom")).is_fatal());

        let bye = Error::clean_exit("bye");
        assert!(!bye.is_fatal());
        assert!(bye.is_clean_exit());
        assert_eq!(bye.to_string(), "bye");
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: io::Error = Error::Codec {
            direction: CodecDirection::Input,
            valid_up_to: 3,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let inner = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err: io::Error = Error::Io(inner).into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
