use crate::value::CellValue;

/// One data row, keyed by header name.
///
/// Entries are kept in header order and there is exactly one per header, so
/// duplicate header names are preserved as separate entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, CellValue)>,
}

impl Record {
    /// Build a record from `(header, value)` pairs in header order.
    pub fn new(entries: Vec<(String, CellValue)>) -> Self {
        Self { entries }
    }

    /// Pair `headers` with `values` positionally.
    ///
    /// Missing trailing values become [`CellValue::Empty`]; surplus values
    /// are dropped.
    pub fn from_values(headers: &[String], values: impl IntoIterator<Item = CellValue>) -> Self {
        let mut values = values.into_iter();
        let entries = headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect();
        Self { entries }
    }

    /// Value stored under `header`. With duplicate headers the first wins.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    /// Header names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }

    /// Values in header order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// `(header, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(h, v)| (h.as_str(), v))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the ingestion pipeline produces for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Column names, in source order.
    pub headers: Vec<String>,
    /// Data rows, each keyed by `headers`.
    pub rows: Vec<Record>,
    /// Canonical name of the encoding used to decode the file.
    pub encoding: &'static str,
    /// Field delimiter used to split the content.
    pub delimiter: u8,
    /// Non-fatal diagnostics raised while ingesting.
    pub warnings: Vec<String>,
}

impl ParseResult {
    /// The delimiter as a `char`.
    #[inline]
    pub fn delimiter_char(&self) -> char {
        self.delimiter as char
    }

    /// Number of data rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first record whose keys differ from `headers`.
    pub fn first_inconsistent_row(&self) -> Option<usize> {
        self.rows.iter().position(|r| {
            r.len() != self.headers.len() || !r.keys().eq(self.headers.iter().map(String::as_str))
        })
    }
}
