//! The CSV ingestion pipeline: read, detect encoding, decode, detect the
//! delimiter, parse and reconcile headers.

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;

use crate::delimiter::detect_delimiter;
use crate::encoding::{decode, detect_encoding, encoding_for_label};
use crate::error::{ErrorKind, IngestError, Result};
use crate::options::ParseOptions;
use crate::table::{ParseResult, Record};
use crate::value::CellValue;

/// Warning raised when a file has a header line but no data rows.
pub const NO_DATA_WARNING: &str = "CSV file contains headers but no data rows";

/// Turns CSV files into [`ParseResult`]s.
///
/// # Example
///
/// ```no_run
/// use csv2xlsx::Ingestor;
///
/// let mut ingestor = Ingestor::new();
/// ingestor.options_mut().delimiter(b';');
///
/// let result = ingestor.parse_path("data.csv").unwrap();
/// println!("Encoding: {}", result.encoding);
/// println!("Headers: {:?}", result.headers);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    options: ParseOptions,
}

impl Ingestor {
    /// Create an ingestor that auto-detects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an ingestor with explicit overrides.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// The overrides in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Mutable access to the overrides, for builder-style configuration.
    pub fn options_mut(&mut self) -> &mut ParseOptions {
        &mut self.options
    }

    /// Ingest the CSV file at `path`.
    ///
    /// Every failure is reported as an [`IngestError`] naming `path`.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> std::result::Result<ParseResult, IngestError> {
        let path = path.as_ref();
        self.ingest_path(path).map_err(|kind| IngestError::new(path, kind))
    }

    fn ingest_path(&self, path: &Path) -> Result<ParseResult> {
        if !path.exists() {
            return Err(ErrorKind::FileNotFound(path.to_path_buf()));
        }

        let data = fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read CSV file");
        self.parse_bytes(&data)
    }

    /// Ingest an in-memory CSV buffer.
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParseResult> {
        let mut warnings = Vec::new();

        let encoding = self.resolve_encoding(data, &mut warnings)?;
        let text = decode(data, encoding)?;

        if text.trim().is_empty() {
            return Err(ErrorKind::EmptyInput);
        }

        let delimiter = match self.options.delimiter {
            Some(delimiter) => delimiter,
            None => {
                let detection = detect_delimiter(&text);
                warnings.extend(detection.warnings);
                detection.value
            }
        };

        let ParsedFields {
            header_line,
            header,
            rows: fields,
        } = parse_fields(&text, delimiter)?;
        let headers = reconcile_headers(&text, delimiter, header_line, header);

        let mut surplus_rows = 0;
        let rows: Vec<Record> = fields
            .into_iter()
            .map(|row| {
                if row.len() > headers.len() {
                    surplus_rows += 1;
                }
                let values = row.iter().map(|field| {
                    if self.options.infer_types {
                        CellValue::infer(field)
                    } else {
                        CellValue::text(field)
                    }
                });
                Record::from_values(&headers, values)
            })
            .collect();

        if surplus_rows > 0 {
            let warning = format!(
                "{surplus_rows} row(s) have more fields than the {} headers; extra fields were dropped",
                headers.len()
            );
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        if rows.is_empty() {
            tracing::warn!("{NO_DATA_WARNING}");
            warnings.push(NO_DATA_WARNING.to_string());
        }

        tracing::debug!(
            encoding = encoding.name(),
            delimiter = ?(delimiter as char),
            columns = headers.len(),
            rows = rows.len(),
            "parsed CSV content"
        );

        Ok(ParseResult {
            headers,
            rows,
            encoding: encoding.name(),
            delimiter,
            warnings,
        })
    }

    fn resolve_encoding(&self, data: &[u8], warnings: &mut Vec<String>) -> Result<&'static Encoding> {
        match self.options.encoding.as_deref() {
            Some(label) => encoding_for_label(label),
            None => {
                let detection = detect_encoding(data);
                warnings.extend(detection.warnings);
                Ok(detection.value)
            }
        }
    }
}

/// Ingest the CSV file at `path` with the given overrides.
pub fn parse_csv<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> std::result::Result<ParseResult, IngestError> {
    Ingestor::with_options(options.clone()).parse_path(path)
}

/// Returns true if `path` exists and has a `.csv` extension (any case).
pub fn is_csv_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    path.exists()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Trimmed fields of a CSV text, split into header and data records.
#[derive(Debug)]
struct ParsedFields {
    /// 1-based line on which the header record starts.
    header_line: u64,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Split `text` into trimmed fields.
///
/// The first non-blank record becomes the header and the remaining
/// non-blank records become rows. A record is blank when every field is
/// empty after trimming.
fn parse_fields(text: &str, delimiter: u8) -> Result<ParsedFields> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut header: Option<(u64, Vec<String>)> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let fields: Vec<String> = record.iter().map(str::to_owned).collect();
        if header.is_none() {
            let line = record.position().map_or(1, csv::Position::line);
            header = Some((line, fields));
        } else {
            rows.push(fields);
        }
    }

    let (header_line, header) = header.unwrap_or((1, Vec::new()));
    Ok(ParsedFields {
        header_line,
        header,
        rows,
    })
}

/// Pick the header list.
///
/// The raw text of `header_line`, the line the parsed header record starts
/// on, split on the delimiter is preferred whenever it has as many entries
/// as the parsed header record, since it keeps the literal text of every
/// name. Otherwise the parsed header record is used, as it is for non-ASCII
/// delimiter bytes, which cannot be matched against decoded text.
fn reconcile_headers(text: &str, delimiter: u8, header_line: u64, structural: Vec<String>) -> Vec<String> {
    if !delimiter.is_ascii() {
        return structural;
    }

    let index = usize::try_from(header_line.saturating_sub(1)).unwrap_or(usize::MAX);
    let Some(line) = text.split('\n').nth(index) else {
        return structural;
    };

    let raw: Vec<String> = line
        .split(delimiter as char)
        .map(|h| h.trim().to_owned())
        .collect();

    if raw.len() == structural.len() {
        raw
    } else {
        structural
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiter::NO_DELIMITER_WARNING;

    fn parse(data: &str) -> ParseResult {
        Ingestor::new().parse_bytes(data.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let result = parse("Name,Age\nJohn,25\nJane,30\n");

        assert_eq!(result.headers, vec!["Name", "Age"]);
        assert_eq!(result.encoding, "UTF-8");
        assert_eq!(result.delimiter, b',');
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("Name"), Some(&CellValue::from("John")));
        assert_eq!(result.rows[1].get("Age"), Some(&CellValue::Integer(30)));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_semicolon_with_trim() {
        let result = parse(" Product ; Price \n Apple ; 1.5 \n");

        assert_eq!(result.delimiter, b';');
        assert_eq!(result.headers, vec!["Product", "Price"]);
        assert_eq!(result.rows[0].get("Product"), Some(&CellValue::from("Apple")));
        assert_eq!(result.rows[0].get("Price"), Some(&CellValue::Float(1.5)));
    }

    #[test]
    fn test_quoted_fields() {
        let result = parse("name,note\n\"Smith, J\",\"line one\nline two\"\nLee,\"say \"\"hi\"\"\"\n");

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("name"), Some(&CellValue::from("Smith, J")));
        assert_eq!(
            result.rows[0].get("note"),
            Some(&CellValue::from("line one\nline two"))
        );
        assert_eq!(result.rows[1].get("note"), Some(&CellValue::from("say \"hi\"")));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let result = parse("a,b\n\n1,2\n   \n,\n3,4\n\n");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1].get("a"), Some(&CellValue::Integer(3)));
    }

    #[test]
    fn test_blank_first_line() {
        let result = parse("\nName,Age\nJohn,25");

        assert_eq!(result.delimiter, b',');
        assert_eq!(result.headers, vec!["Name", "Age"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("Age"), Some(&CellValue::Integer(25)));
    }

    #[test]
    fn test_blank_first_line_single_column() {
        let result = parse("\nName\nJohn\n");
        assert_eq!(result.headers, vec!["Name"]);
        assert_eq!(result.rows[0].get("Name"), Some(&CellValue::from("John")));
    }

    #[test]
    fn test_headers_only_warns() {
        let result = parse("Name,Age\n");

        assert!(result.rows.is_empty());
        assert_eq!(result.headers, vec!["Name", "Age"]);
        assert_eq!(result.warnings, vec![NO_DATA_WARNING.to_string()]);
    }

    #[test]
    fn test_no_delimiter_warns() {
        let result = parse("Name Age\nJohn 25");

        assert_eq!(result.delimiter, b',');
        assert_eq!(result.headers, vec!["Name Age"]);
        assert!(result.warnings.contains(&NO_DELIMITER_WARNING.to_string()));
    }

    #[test]
    fn test_dotted_header_is_flat() {
        let result = parse("user.name,age\nAlice,30");

        assert_eq!(result.headers, vec!["user.name", "age"]);
        assert_eq!(result.rows[0].get("user.name"), Some(&CellValue::from("Alice")));
    }

    #[test]
    fn test_raw_headers_preferred_when_lengths_match() {
        // The raw split keeps the quote characters of the first line
        let result = parse("\"id\",name\n1,x\n");
        assert_eq!(result.headers, vec!["\"id\"", "name"]);
        assert_eq!(result.rows[0].get("\"id\""), Some(&CellValue::Integer(1)));
    }

    #[test]
    fn test_structural_headers_when_lengths_differ() {
        let result = parse("\"last, first\",age\n\"Doe, J\",40\n");
        assert_eq!(result.headers, vec!["last, first", "age"]);
        assert_eq!(result.rows[0].get("age"), Some(&CellValue::Integer(40)));
    }

    #[test]
    fn test_short_and_long_rows() {
        let result = parse("a,b,c\n1\n1,2,3,4\n");

        assert_eq!(result.rows[0].get("b"), Some(&CellValue::Empty));
        assert_eq!(result.rows[0].get("c"), Some(&CellValue::Empty));
        assert_eq!(result.rows[1].len(), 3);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("extra fields were dropped"));
    }

    #[test]
    fn test_forced_delimiter() {
        let mut ingestor = Ingestor::new();
        ingestor.options_mut().delimiter(b'|');

        let result = ingestor.parse_bytes(b"a,b|c\n1,2|3\n").unwrap();
        assert_eq!(result.headers, vec!["a,b", "c"]);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut ingestor = Ingestor::new();
        ingestor.options_mut().delimiter(0xA7);

        let err = ingestor.parse_bytes("a§b\n1§2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ErrorKind::ParseFailure(_)));
    }

    #[test]
    fn test_infer_types_disabled() {
        let mut ingestor = Ingestor::new();
        ingestor.options_mut().infer_types(false);

        let result = ingestor.parse_bytes(b"n,flag\n007,true\n25,\n").unwrap();
        assert_eq!(result.rows[0].get("n"), Some(&CellValue::from("007")));
        assert_eq!(result.rows[0].get("flag"), Some(&CellValue::from("true")));
        assert_eq!(result.rows[1].get("n"), Some(&CellValue::from("25")));
        assert_eq!(result.rows[1].get("flag"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_whitespace_only_is_empty_input() {
        let err = Ingestor::new().parse_bytes(b"  \n \r\n\t").unwrap_err();
        assert!(matches!(err, ErrorKind::EmptyInput));
    }

    #[test]
    fn test_crlf_headers() {
        let result = parse("Name,Age\r\nJohn,25\r\n");
        assert_eq!(result.headers, vec!["Name", "Age"]);
        assert_eq!(result.rows[0].get("Age"), Some(&CellValue::Integer(25)));
    }

    #[test]
    fn test_reconcile_headers() {
        let structural = vec!["a".to_string(), "b".to_string()];
        assert_eq!(reconcile_headers(" a.b ; c \n", b';', 1, structural.clone()), vec!["a.b", "c"]);
        assert_eq!(reconcile_headers("x\n", b';', 1, structural.clone()), structural);
        assert_eq!(reconcile_headers("\n\n a.b ; c", b';', 3, structural.clone()), vec!["a.b", "c"]);
        assert_eq!(reconcile_headers("a,b\n", b',', 7, structural.clone()), structural);
        assert_eq!(reconcile_headers("x§y\n", 0xA7, 1, structural.clone()), structural);
    }

    #[test]
    fn test_delimiter_only_line_before_header() {
        let result = parse(",,\na,b,c\n1,2,3\n");

        assert_eq!(result.headers, vec!["a", "b", "c"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("a"), Some(&CellValue::Integer(1)));
    }

    #[test]
    fn test_quoted_empty_line_before_header() {
        let result = parse("\"\",\"\"\r\nx.y,z\r\n1,2\r\n");

        assert_eq!(result.headers, vec!["x.y", "z"]);
        assert_eq!(result.rows[0].get("z"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn test_header_after_multiline_blank_record() {
        // The blank record spans two lines, so the header starts on line 3
        let result = parse("\"\n\",\nname,age\nAda,36\n");

        assert_eq!(result.headers, vec!["name", "age"]);
        assert_eq!(result.rows[0].get("age"), Some(&CellValue::Integer(36)));
    }
}
