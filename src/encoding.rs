//! Encoding detection and decoding using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use simdutf8::basic::from_utf8;
use std::borrow::Cow;

use crate::detection::Detection;
use crate::error::{ErrorKind, Result};

/// Encoding used when the content carries no usable signal.
pub const DEFAULT_ENCODING: &Encoding = UTF_8;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Detect the most probable encoding of a complete file buffer.
///
/// A byte order mark wins outright. A buffer without any non-UTF-8 signal
/// (empty, plain ASCII, valid UTF-8) resolves to [`DEFAULT_ENCODING`].
/// Everything else goes through chardetng, whose guess is always a legacy
/// encoding able to decode the buffer.
pub fn detect_encoding(data: &[u8]) -> Detection<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        tracing::debug!(encoding = encoding.name(), "encoding decided by byte order mark");
        return Detection::new(encoding);
    }

    if is_utf8(data) {
        return Detection::new(DEFAULT_ENCODING);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    tracing::debug!(encoding = encoding.name(), "encoding detected");
    Detection::new(encoding)
}

/// Resolve a charset label such as `utf8`, `latin1` or `Shift_JIS`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ErrorKind::decode(label, "unknown encoding label"))
}

/// Decode a whole buffer with the given encoding.
///
/// Only a byte order mark belonging to `encoding` itself is removed. Malformed
/// byte sequences are an error rather than being replaced.
pub fn decode<'a>(data: &'a [u8], encoding: &'static Encoding) -> Result<Cow<'a, str>> {
    let body = match Encoding::for_bom(data) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &data[bom_len..],
        _ => data,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ErrorKind::decode(encoding.name(), "malformed byte sequence"))
}
