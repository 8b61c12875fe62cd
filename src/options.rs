use std::path::{Path, PathBuf};

/// Overrides for a single ingestion run.
///
/// Anything left unset is detected from the file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Forced field delimiter (skips delimiter detection).
    pub delimiter: Option<u8>,
    /// Forced charset label (skips encoding detection).
    pub encoding: Option<String>,
    /// Coerce numeric and boolean cells. Defaults to true.
    pub infer_types: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Options with everything auto-detected.
    pub const fn new() -> Self {
        Self {
            delimiter: None,
            encoding: None,
            infer_types: true,
        }
    }

    /// Force a specific delimiter.
    ///
    /// The delimiter must be an ASCII byte. Content is split after decoding
    /// to UTF-8, where a non-ASCII byte only occurs inside a multi-byte
    /// character, so such a delimiter fails ingestion with
    /// [`ErrorKind::ParseFailure`](crate::ErrorKind::ParseFailure).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Force a specific encoding, given as a label such as `utf-8` or `gbk`.
    pub fn encoding(&mut self, label: impl Into<String>) -> &mut Self {
        self.encoding = Some(label.into());
        self
    }

    /// Enable or disable cell type inference.
    pub fn infer_types(&mut self, yes: bool) -> &mut Self {
        self.infer_types = yes;
        self
    }
}

/// Default fill colour of the header row.
pub const HEADER_FILL_RGB: u32 = 0xE0E0E0;

/// Default worksheet name.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Spreadsheet output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOptions {
    /// Explicit output path. Defaults to the source path with an `xlsx` extension.
    pub output_path: Option<PathBuf>,
    /// Worksheet name.
    pub sheet_name: String,
    /// Bold, shaded header row.
    pub header_style: bool,
    /// Size each column to its widest cell.
    pub autofit_columns: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            header_style: true,
            autofit_columns: true,
        }
    }
}

impl SinkOptions {
    /// Default output settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write to `path` instead of next to the source file.
    pub fn output_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the worksheet name.
    pub fn sheet_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.sheet_name = name.into();
        self
    }

    /// Enable or disable header row styling.
    pub fn header_style(&mut self, yes: bool) -> &mut Self {
        self.header_style = yes;
        self
    }

    /// Enable or disable column auto-fit.
    pub fn autofit_columns(&mut self, yes: bool) -> &mut Self {
        self.autofit_columns = yes;
        self
    }

    /// Where the workbook for `source` will be written.
    pub fn resolve_output_path(&self, source: &Path) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => source.with_extension("xlsx"),
        }
    }
}
