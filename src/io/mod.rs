pub mod bom;
pub mod classify;
pub mod codec;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod line;
pub mod options;
pub mod platform;
pub mod startup;
pub mod state;
pub mod stream;
pub mod streams;
pub mod testing;

pub use bom::*;
pub use classify::*;
pub use codec::{to_native, to_utf8, IdentityCodec, NativeCodec, NativeUnit, TextCodec, Utf16Codec};
pub use dispatch::*;
pub use error::*;
pub use handle::*;
pub use line::{input_or_eof, ByteReader, ByteSource};
pub use options::*;
pub use platform::{ConsoleAdapter, ConsoleMode, SystemConsole};
pub use startup::*;
pub use state::*;
pub use stream::*;
pub use streams::*;
