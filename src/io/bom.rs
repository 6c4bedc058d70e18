//! UTF-8 byte-order mark detection and span splitting
//!
//! Console output converts text to the native wide encoding chunk by chunk.
//! A BOM glued to the first printable characters of a chunk must not reach
//! that conversion as part of the text, so the write path sends every BOM as
//! a span of its own.

/// The three-byte UTF-8 byte-order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Whether `bytes` begins with a UTF-8 BOM
pub fn starts_with_bom(bytes: &[u8]) -> bool {
    bytes.starts_with(&UTF8_BOM)
}

/// `bytes` without a leading BOM; unchanged when there is none
///
/// # Examples
/// ```
/// use kickstart_io::strip_bom;
///
/// assert_eq!(strip_bom(b"\xEF\xBB\xBFHello"), b"Hello");
/// assert_eq!(strip_bom(b"Hello"), b"Hello");
/// ```
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes)
}

/// Whether a span produced by [`bom_spans`] is a BOM span
pub fn is_bom(span: &[u8]) -> bool {
    span == UTF8_BOM
}

/// Split `bytes` into BOM and non-BOM spans
///
/// Every BOM occurrence becomes a span of its own. Empty spans are never
/// produced, so empty input yields nothing.
///
/// # Examples
/// ```
/// use kickstart_io::bom_spans;
///
/// let spans: Vec<&[u8]> = bom_spans(b"\xEF\xBB\xBFHello").collect();
/// assert_eq!(spans, vec![&b"\xEF\xBB\xBF"[..], &b"Hello"[..]]);
/// ```
pub fn bom_spans(bytes: &[u8]) -> BomSpans<'_> {
    BomSpans { rest: bytes }
}

/// Iterator returned by [`bom_spans`]
#[derive(Clone, Debug)]
pub struct BomSpans<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for BomSpans<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }

        let end = if starts_with_bom(self.rest) {
            UTF8_BOM.len()
        } else {
            find_bom(self.rest).unwrap_or(self.rest.len())
        };

        let (span, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(span)
    }
}

fn find_bom(bytes: &[u8]) -> Option<usize> {
    bytes.windows(UTF8_BOM.len()).position(|w| w == UTF8_BOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(bytes: &[u8]) -> Vec<Vec<u8>> {
        bom_spans(bytes).map(<[u8]>::to_vec).collect()
    }

    #[test]
    fn test_leading_bom_is_separate_span() {
        assert_eq!(spans(b"\xEF\xBB\xBFHello"), vec![UTF8_BOM.to_vec(), b"Hello".to_vec()]);
    }

    #[test]
    fn test_embedded_and_repeated_boms() {
        let input = b"ab\xEF\xBB\xBF\xEF\xBB\xBFcd\xEF\xBB\xBF";
        assert_eq!(
            spans(input),
            vec![
                b"ab".to_vec(),
                UTF8_BOM.to_vec(),
                UTF8_BOM.to_vec(),
                b"cd".to_vec(),
                UTF8_BOM.to_vec(),
            ]
        );
    }

    #[test]
    fn test_no_bom_and_empty() {
        assert_eq!(spans("π is pi".as_bytes()), vec!["π is pi".as_bytes().to_vec()]);
        assert!(spans(b"").is_empty());
    }

    #[test]
    fn test_truncated_bom_is_text() {
        assert_eq!(spans(b"\xEF\xBB"), vec![b"\xEF\xBB".to_vec()]);
        assert!(!starts_with_bom(b"\xEF\xBB"));
        assert_eq!(strip_bom(b"\xEF\xBB"), b"\xEF\xBB");
    }

    #[test]
    fn test_strip_only_leading() {
        assert_eq!(strip_bom(b"\xEF\xBB\xBF\xEF\xBB\xBFx"), b"\xEF\xBB\xBFx");
        assert!(is_bom(&UTF8_BOM));
        assert!(!is_bom(b"abc"));
    }
}
