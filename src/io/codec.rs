//! Conversion between UTF-8 and the platform's native wide text
//!
//! Windows consoles take UTF-16 through `WriteConsoleW`; everywhere else the
//! native text already is UTF-8 and conversion is the identity. Both codecs
//! are compiled on every platform, [`NativeCodec`] picks the one the console
//! adapter of the build target expects.

use super::error::{CodecDirection, Error, Result};

/// Largest input a single conversion accepts, in units
///
/// Conversions are counted in 32-bit signed integers by the console API.
pub const MAX_CONVERSION_UNITS: usize = i32::MAX as usize;

/// Bidirectional UTF-8 / native text conversion
///
/// Both directions are total over well-formed input and return empty output
/// for empty input. Ill-formed input is a fatal [`Error::Codec`].
///
/// # Panics
///
/// Inputs longer than [`MAX_CONVERSION_UNITS`] violate the calling contract.
pub trait TextCodec {
    /// Code unit of the native encoding
    type Unit: Copy;

    fn to_native(utf8: &[u8]) -> Result<Vec<Self::Unit>>;

    fn to_utf8(native: &[Self::Unit]) -> Result<Vec<u8>>;
}

/// UTF-8 ⇄ UTF-16
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf16Codec;

/// UTF-8 ⇄ UTF-8, validation only
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityCodec;

#[cfg(windows)]
pub type NativeCodec = Utf16Codec;

#[cfg(not(windows))]
pub type NativeCodec = IdentityCodec;

/// Unit type of the native text handed to the console
pub type NativeUnit = <NativeCodec as TextCodec>::Unit;

fn check_length(len: usize) {
    assert!(
        len <= MAX_CONVERSION_UNITS,
        "conversion input of {len} units exceeds the 32-bit count limit"
    );
}

fn validate_utf8(utf8: &[u8], direction: CodecDirection) -> Result<&str> {
    std::str::from_utf8(utf8).map_err(|e| Error::Codec {
        direction,
        valid_up_to: e.valid_up_to(),
    })
}

impl TextCodec for Utf16Codec {
    type Unit = u16;

    fn to_native(utf8: &[u8]) -> Result<Vec<u16>> {
        if utf8.is_empty() {
            return Ok(Vec::new());
        }
        check_length(utf8.len());

        let text = validate_utf8(utf8, CodecDirection::ToNative)?;
        Ok(text.encode_utf16().collect())
    }

    fn to_utf8(native: &[u16]) -> Result<Vec<u8>> {
        if native.is_empty() {
            return Ok(Vec::new());
        }
        check_length(native.len());

        let mut out = String::with_capacity(native.len());
        let mut position = 0;
        for decoded in char::decode_utf16(native.iter().copied()) {
            let c = decoded.map_err(|_| Error::Codec {
                direction: CodecDirection::ToUtf8,
                valid_up_to: position,
            })?;
            position += c.len_utf16();
            out.push(c);
        }
        Ok(out.into_bytes())
    }
}

impl TextCodec for IdentityCodec {
    type Unit = u8;

    fn to_native(utf8: &[u8]) -> Result<Vec<u8>> {
        if utf8.is_empty() {
            return Ok(Vec::new());
        }
        check_length(utf8.len());

        validate_utf8(utf8, CodecDirection::ToNative)?;
        Ok(utf8.to_vec())
    }

    fn to_utf8(native: &[u8]) -> Result<Vec<u8>> {
        if native.is_empty() {
            return Ok(Vec::new());
        }
        check_length(native.len());

        validate_utf8(native, CodecDirection::ToUtf8)?;
        Ok(native.to_vec())
    }
}

/// Convert UTF-8 to the native console encoding
pub fn to_native(utf8: &[u8]) -> Result<Vec<NativeUnit>> {
    NativeCodec::to_native(utf8)
}

/// Convert native console text back to UTF-8
pub fn to_utf8(native: &[NativeUnit]) -> Result<Vec<u8>> {
    NativeCodec::to_utf8(native)
}

/// Length of the longest prefix of `bytes` that ends on a code point boundary
///
/// Only a trailing, still incomplete multi-byte sequence is excluded; other
/// ill-formed bytes are left for the codec to reject.
pub fn complete_prefix_len(bytes: &[u8]) -> usize {
    // A sequence is at most 4 bytes, so only the last 3 can start an
    // unfinished one.
    let start = bytes.len().saturating_sub(3);
    for i in (start..bytes.len()).rev() {
        let b = bytes[i];
        if b & 0xC0 == 0x80 {
            continue;
        }
        let needed = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return bytes.len(),
        };
        return if bytes.len() - i < needed { i } else { bytes.len() };
    }
    bytes.len()
}
