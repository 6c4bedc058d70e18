//! # kickstart-io
//!
//! UTF-8 standard streams for introductory programs.
//!
//! Text written through [`Utf8Streams`] reaches an interactive console
//! correctly whatever the platform's console encoding, while redirected
//! streams and files get the bytes unchanged. Line input distinguishes an
//! empty line from end of input.

// Compiles to nothing unless the `logging` feature is on.
macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
        #[cfg(not(feature = "logging"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
pub(crate) use debug;

pub mod io;
pub use io::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_loads() {
        // Verify core types are accessible
        let _ = StreamRoute::RawPassthrough;
        let _ = StandardStream::Output;
        let opts = ConsoleOptions::default();
        assert!(opts.enable_escape_sequences);
        assert_eq!(UTF8_BOM.len(), 3);
    }
}
