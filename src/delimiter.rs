//! Delimiter detection from the first line of decoded content.

use crate::detection::Detection;

/// Candidate delimiters, in tie-break order.
pub const DELIMITERS: &[u8] = &[
    b',',  // Comma
    b';',  // Semicolon (common in European locales)
    b'\t', // Tab (TSV files)
    b'|',  // Pipe
];

/// Delimiter used when the first line gives nothing to go on.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Warning raised when none of the candidates occur in the first line.
pub const NO_DELIMITER_WARNING: &str = "No delimiter detected, using comma as default";

/// Return the first line of `content`, without its `\n` terminator.
fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or_default()
}

/// Infer the field delimiter from the first line of `content`.
///
/// The candidate with the strictly highest occurrence count wins, so ties
/// resolve to the earliest entry of [`DELIMITERS`]. A blank first line
/// yields the default without scanning; a first line without any candidate
/// yields the default plus [`NO_DELIMITER_WARNING`].
pub fn detect_delimiter(content: &str) -> Detection<u8> {
    let line = first_line(content);

    if line.trim().is_empty() {
        return Detection::new(DEFAULT_DELIMITER);
    }

    let mut max_count = 0;
    let mut best = DEFAULT_DELIMITER;

    for &delimiter in DELIMITERS {
        let count = bytecount::count(line.as_bytes(), delimiter);
        if count > max_count {
            max_count = count;
            best = delimiter;
        }
    }

    if max_count == 0 {
        tracing::warn!("{NO_DELIMITER_WARNING}");
        return Detection::with_warning(DEFAULT_DELIMITER, NO_DELIMITER_WARNING);
    }

    tracing::debug!(delimiter = ?(best as char), count = max_count, "delimiter detected");
    Detection::new(best)
}
