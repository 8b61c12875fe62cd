//! csv2xlsx: convert CSV files into styled XLSX workbooks.
//!
//! The interesting part is ingestion. Each file is read in full, its
//! encoding detected (byte order mark, UTF-8 validation, then chardetng),
//! its delimiter inferred from the first line, and the content parsed into
//! ordered headers plus one record per data row, with cell types inferred.
//! The result is then written as a single-sheet workbook.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv2xlsx::{Ingestor, XlsxSink};
//! use std::path::Path;
//!
//! let source = Path::new("data.csv");
//! let result = Ingestor::new().parse_path(source).unwrap();
//!
//! println!("Encoding: {}", result.encoding);
//! println!("Delimiter: {:?}", result.delimiter_char());
//! println!("Headers: {:?}", result.headers);
//!
//! let output = XlsxSink::new().write(&result, source).unwrap();
//! println!("Wrote {}", output.display());
//! ```
//!
//! # Batch conversion
//!
//! ```no_run
//! use csv2xlsx::{NoProgress, ParseOptions, SinkOptions, convert_batch};
//!
//! let files = ["a.csv", "b.csv", "notes.txt"];
//! let report = convert_batch(&files, &ParseOptions::new(), &SinkOptions::new(), &mut NoProgress);
//! println!("{}", report.summary());
//! for failure in &report.failed {
//!     eprintln!("{}: {}", failure.path.display(), failure.message);
//! }
//! ```
//!
//! Non-fatal anomalies (no delimiter in the first line, a header without
//! data rows) are emitted as `tracing` warnings and also collected in
//! [`ParseResult::warnings`].

mod convert;
mod delimiter;
mod detection;
mod encoding;
mod error;
mod ingest;
mod options;
mod sink;
mod table;
mod value;

pub use convert::{
    BatchFailure, BatchProgress, BatchReport, NoProgress, convert_batch, convert_batch_parallel,
    convert_file,
};
pub use delimiter::{DEFAULT_DELIMITER, DELIMITERS, NO_DELIMITER_WARNING, detect_delimiter};
pub use detection::Detection;
pub use encoding::{DEFAULT_ENCODING, decode, detect_encoding, encoding_for_label, is_utf8};
pub use error::{ConvertError, ErrorKind, IngestError, SinkError};
pub use ingest::{Ingestor, NO_DATA_WARNING, is_csv_file, parse_csv};
pub use options::{DEFAULT_SHEET_NAME, HEADER_FILL_RGB, ParseOptions, SinkOptions};
pub use sink::{MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, XlsxSink, column_widths};
pub use table::{ParseResult, Record};
pub use value::{CellValue, MAX_EXACT_INTEGER};
