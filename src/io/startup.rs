//! Program startup support: run a program body and display its failure

use std::error::Error as StdError;
use std::fmt::Display;
use std::io;
use std::process::ExitCode;

use super::error::Error;
use super::platform::ConsoleAdapter;
use super::streams::Utf8Streams;

/// Error type a program body may fail with
///
/// A clean exit is shown as is; anything else is reported with a `!` prefix.
pub trait ProgramFailure: Display {
    fn is_clean_exit(&self) -> bool {
        false
    }
}

impl ProgramFailure for Error {
    fn is_clean_exit(&self) -> bool {
        Error::is_clean_exit(self)
    }
}

impl ProgramFailure for io::Error {
    fn is_clean_exit(&self) -> bool {
        self.get_ref()
            .and_then(|inner| inner.downcast_ref::<Error>())
            .is_some_and(Error::is_clean_exit)
    }
}

impl ProgramFailure for Box<dyn StdError> {
    fn is_clean_exit(&self) -> bool {
        self.downcast_ref::<Error>().is_some_and(Error::is_clean_exit)
    }
}

impl ProgramFailure for Box<dyn StdError + Send + Sync> {
    fn is_clean_exit(&self) -> bool {
        self.downcast_ref::<Error>().is_some_and(Error::is_clean_exit)
    }
}

impl ProgramFailure for String {}
impl ProgramFailure for &str {}

/// Message shown on standard error for a failed program body
pub fn failure_message<E: ProgramFailure + ?Sized>(err: &E) -> String {
    if err.is_clean_exit() {
        format!("{err}\n")
    } else {
        format!("!{err}\n")
    }
}

/// Run `body`; on failure show the error on standard error
///
/// [`Error::CleanExit`] messages are shown unchanged, every other failure
/// gets a `!` prefix. The console mode is restored before returning, so this
/// is the place to end a program that used [`Utf8Streams::init`].
///
/// # Examples
/// ```no_run
/// use kickstart_io::{with_errors_displayed, Utf8Streams};
/// use std::process::ExitCode;
///
/// fn main() -> ExitCode {
///     let streams = Utf8Streams::init().unwrap();
///     with_errors_displayed(streams, |io| io.output(io.stdout(), "Hello, world!\n"))
/// }
/// ```
pub fn with_errors_displayed<A, F, E>(streams: &Utf8Streams<A>, body: F) -> ExitCode
where
    A: ConsoleAdapter,
    F: FnOnce(&Utf8Streams<A>) -> Result<(), E>,
    E: ProgramFailure,
{
    let code = match body(streams) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Nowhere left to report a failure to report the failure.
            let _ = streams.output_error_message(&failure_message(&err));
            ExitCode::FAILURE
        }
    };
    streams.restore_console_mode();
    code
}

/// Install a `tracing` subscriber filtered by `KICKSTART_LOG` (default `warn`)
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("KICKSTART_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
