use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure categories raised while ingesting a CSV file.
///
/// These never leave the pipeline on their own; [`IngestError`] carries one
/// together with the path of the file being ingested.
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// The source file does not exist.
    #[error("CSV file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The decoded content is empty or whitespace-only.
    #[error("CSV file is empty")]
    EmptyInput,

    /// The bytes could not be decoded with the resolved encoding.
    #[error("could not decode content as {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },

    /// Record splitting or assembly failed.
    #[error("CSV parsing error: {0}")]
    ParseFailure(#[from] csv::Error),

    /// IO error while reading the file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ErrorKind {
    pub(crate) fn decode(encoding: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorKind::DecodeFailure {
            encoding: encoding.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for the internal pipeline steps.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// The single error shape returned by the ingestion pipeline.
#[derive(Error, Debug)]
#[error("failed to parse CSV file '{}': {kind}", path.display())]
pub struct IngestError {
    path: PathBuf,
    #[source]
    kind: ErrorKind,
}

impl IngestError {
    pub(crate) fn new(path: impl AsRef<Path>, kind: ErrorKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Path of the file that could not be ingested.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying failure category.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consume the error and return the underlying failure.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

/// Error type for writing spreadsheets.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The parse result does not describe a consistent table.
    #[error("malformed parse result: {0}")]
    Malformed(String),

    /// The spreadsheet writer failed.
    #[error("failed to generate Excel file: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Error type for single-file conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The path is missing or does not carry a `.csv` extension.
    #[error("not a valid CSV file: {}", .0.display())]
    NotCsv(PathBuf),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
