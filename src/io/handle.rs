//! OS stream handles and the three standard streams

use std::fmt;

/// Raw OS handle value: a file descriptor on Unix, a `HANDLE` elsewhere.
#[cfg(unix)]
pub type RawHandleValue = std::os::unix::io::RawFd;

#[cfg(not(unix))]
pub type RawHandleValue = isize;

/// Opaque reference to an OS-level input or output stream
///
/// Identity is the OS handle value. The handle is never owned: closing it is
/// the business of whoever opened it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamHandle(RawHandleValue);

impl StreamHandle {
    pub const fn from_raw(value: RawHandleValue) -> Self {
        Self(value)
    }

    pub const fn raw(self) -> RawHandleValue {
        self.0
    }

    /// Handle of an open file, borrowed for as long as the file stays open
    #[cfg(unix)]
    pub fn of<F: std::os::unix::io::AsRawFd>(file: &F) -> Self {
        Self(file.as_raw_fd())
    }

    #[cfg(windows)]
    pub fn of<F: std::os::windows::io::AsRawHandle>(file: &F) -> Self {
        Self(file.as_raw_handle() as isize)
    }
}

impl fmt::Display for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three standard streams
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardStream {
    Input,
    Output,
    Error,
}

impl StandardStream {
    pub const ALL: [StandardStream; 3] = [Self::Input, Self::Output, Self::Error];

    /// Conventional stream number (0, 1, 2)
    pub const fn index(self) -> usize {
        match self {
            Self::Input => 0,
            Self::Output => 1,
            Self::Error => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "stdin",
            Self::Output => "stdout",
            Self::Error => "stderr",
        }
    }

    pub const fn is_output(self) -> bool {
        !matches!(self, Self::Input)
    }
}
