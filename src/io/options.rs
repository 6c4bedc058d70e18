//! Configuration for the console adaptation layer
//!
//! Options can be built in code, read from JSON, or taken from the
//! environment:
//!
//! | Variable                  | Effect                                   |
//! |---------------------------|------------------------------------------|
//! | `KICKSTART_NO_ESCAPES`    | leave the console mode untouched         |
//! | `KICKSTART_CHECK_CONSOLE` | assert console writes target a console   |

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::stream::DEFAULT_BUFFER_SIZE;

pub const ENV_NO_ESCAPES: &str = "KICKSTART_NO_ESCAPES";
pub const ENV_CHECK_CONSOLE: &str = "KICKSTART_CHECK_CONSOLE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOptions {
    /// Switch the output console to a mode that interprets escape sequences
    pub enable_escape_sequences: bool,
    /// Assert that the console primitive is only reached for console handles
    pub check_console_streams: bool,
    /// Buffer size of [`Utf8Writer`](super::stream::Utf8Writer)
    pub write_buffer_size: usize,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            enable_escape_sequences: true,
            check_console_streams: cfg!(debug_assertions),
            write_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => Some(true),
    }
}

impl ConsoleOptions {
    /// Defaults, overridden by the `KICKSTART_*` environment variables
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(no_escapes) = env_flag(ENV_NO_ESCAPES) {
            opts.enable_escape_sequences = !no_escapes;
        }
        if let Some(check) = env_flag(ENV_CHECK_CONSOLE) {
            opts.check_console_streams = check;
        }
        opts
    }

    /// Parse options from JSON; missing fields keep their defaults
    ///
    /// # Examples
    /// ```
    /// use kickstart_io::ConsoleOptions;
    ///
    /// let opts = ConsoleOptions::from_json(r#"{ "enable_escape_sequences": false }"#).unwrap();
    /// assert!(!opts.enable_escape_sequences);
    /// assert_eq!(opts.write_buffer_size, ConsoleOptions::default().write_buffer_size);
    /// ```
    pub fn from_json(json: &str) -> io::Result<Self> {
        serde_json::from_str(json).map_err(io::Error::other)
    }

    pub fn to_json_pretty(&self) -> io::Result<String> {
        serde_json::to_string_pretty(self).map_err(io::Error::other)
    }

    /// Read options from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(io::BufReader::new(file)).map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let opts = ConsoleOptions {
            enable_escape_sequences: false,
            check_console_streams: true,
            write_buffer_size: 128,
        };
        let json = opts.to_json_pretty().unwrap();
        assert!(json.contains('\n'));
        assert_eq!(ConsoleOptions::from_json(&json).unwrap(), opts);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ConsoleOptions::from_json("{}").unwrap(), ConsoleOptions::default());
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(ConsoleOptions::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, r#"{ "write_buffer_size": 16 }"#).unwrap();

        let opts = ConsoleOptions::load(&path).unwrap();
        assert_eq!(opts.write_buffer_size, 16);
        assert!(opts.enable_escape_sequences);
    }
}
