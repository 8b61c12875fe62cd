//! Writing parse results to XLSX workbooks.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, ColNum, Format, FormatPattern, RowNum, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

use crate::error::SinkError;
use crate::options::{HEADER_FILL_RGB, SinkOptions};
use crate::table::ParseResult;
use crate::value::CellValue;

/// Narrowest auto-fitted column width, in characters.
pub const MIN_COLUMN_WIDTH: usize = 10;

/// Widest auto-fitted column width, in characters.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Padding added to the widest cell of a column.
const COLUMN_PADDING: usize = 2;

/// Rows available in a worksheet, including the header row.
const MAX_ROWS: usize = 1_048_576;

/// Columns available in a worksheet.
const MAX_COLUMNS: usize = 16_384;

/// Writes [`ParseResult`]s as single-sheet workbooks.
#[derive(Debug, Clone, Default)]
pub struct XlsxSink {
    options: SinkOptions,
}

impl XlsxSink {
    /// Create a sink with default output settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink with explicit output settings.
    pub fn with_options(options: SinkOptions) -> Self {
        Self { options }
    }

    /// The output settings in effect.
    pub fn options(&self) -> &SinkOptions {
        &self.options
    }

    /// Mutable access to the output settings.
    pub fn options_mut(&mut self) -> &mut SinkOptions {
        &mut self.options
    }

    /// Write `result` and return the path of the created workbook.
    ///
    /// `source` is only used to derive the default output path.
    pub fn write(&self, result: &ParseResult, source: &Path) -> Result<PathBuf, SinkError> {
        validate(result)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.options.sheet_name)?;

        self.write_header(worksheet, &result.headers)?;

        for (idx, record) in result.rows.iter().enumerate() {
            let row = (idx + 1) as RowNum;
            for (col, value) in record.values().enumerate() {
                write_cell(worksheet, row, col as ColNum, value)?;
            }
        }

        if self.options.autofit_columns {
            for (col, width) in column_widths(result).into_iter().enumerate() {
                worksheet.set_column_width(col as ColNum, width as f64)?;
            }
        }

        let output = self.options.resolve_output_path(source);
        workbook.save(&output)?;

        tracing::info!(
            path = %output.display(),
            rows = result.rows.len(),
            columns = result.headers.len(),
            "wrote workbook"
        );
        Ok(output)
    }

    fn write_header(&self, worksheet: &mut Worksheet, headers: &[String]) -> Result<(), SinkError> {
        let format = self.options.header_style.then(header_format);

        for (col, header) in headers.iter().enumerate() {
            match &format {
                Some(format) => worksheet.write_string_with_format(0, col as ColNum, header, format)?,
                None => worksheet.write_string(0, col as ColNum, header)?,
            };
        }
        Ok(())
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL_RGB))
}

fn write_cell(worksheet: &mut Worksheet, row: RowNum, col: ColNum, value: &CellValue) -> Result<(), SinkError> {
    match value {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) => worksheet.write_string(row, col, s)?,
        CellValue::Integer(n) => worksheet.write_number(row, col, *n as f64)?,
        CellValue::Float(x) => worksheet.write_number(row, col, *x)?,
        CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b)?,
    };
    Ok(())
}

fn validate(result: &ParseResult) -> Result<(), SinkError> {
    if result.headers.len() > MAX_COLUMNS {
        return Err(SinkError::Malformed(format!(
            "{} columns exceed the worksheet limit of {MAX_COLUMNS}",
            result.headers.len()
        )));
    }

    if result.rows.len() + 1 > MAX_ROWS {
        return Err(SinkError::Malformed(format!(
            "{} rows exceed the worksheet limit of {}",
            result.rows.len(),
            MAX_ROWS - 1
        )));
    }

    if let Some(idx) = result.first_inconsistent_row() {
        return Err(SinkError::Malformed(format!(
            "row {} does not match the {} headers",
            idx + 1,
            result.headers.len()
        )));
    }

    Ok(())
}

/// Auto-fit width of every column: widest rendered cell plus padding,
/// clamped to [`MIN_COLUMN_WIDTH`]..=[`MAX_COLUMN_WIDTH`].
pub fn column_widths(result: &ParseResult) -> Vec<usize> {
    let mut widths: Vec<usize> = result.headers.iter().map(|h| h.width()).collect();

    for record in &result.rows {
        for (col, value) in record.values().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(value.to_string().width());
            }
        }
    }

    widths
        .into_iter()
        .map(|w| (w + COLUMN_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Record;

    fn result_with(headers: &[&str], rows: Vec<Vec<CellValue>>) -> ParseResult {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|values| Record::from_values(&headers, values))
            .collect();
        ParseResult {
            headers,
            rows,
            encoding: "UTF-8",
            delimiter: b',',
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_column_widths_clamped() {
        let result = result_with(
            &["id", "description"],
            vec![vec![CellValue::Integer(1), CellValue::from("x".repeat(80))]],
        );
        assert_eq!(column_widths(&result), vec![MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn test_column_widths_fit_content() {
        let result = result_with(&["name"], vec![vec![CellValue::from("Bartholomew Jr")]]);
        assert_eq!(column_widths(&result), vec![16]);
    }

    #[test]
    fn test_column_widths_count_wide_chars() {
        // Each CJK character occupies two columns
        let result = result_with(&["名前"], vec![vec![CellValue::from("東京都千代田区")]]);
        assert_eq!(column_widths(&result), vec![16]);
    }

    #[test]
    fn test_validate_rejects_mismatched_record() {
        let mut result = result_with(&["a", "b"], vec![]);
        result.rows.push(Record::new(vec![("a".into(), CellValue::Empty)]));

        let err = validate(&result).unwrap_err();
        assert!(matches!(err, SinkError::Malformed(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_validate_rejects_too_many_columns() {
        let headers: Vec<String> = (0..=MAX_COLUMNS).map(|i| format!("c{i}")).collect();
        let result = ParseResult {
            headers,
            rows: Vec::new(),
            encoding: "UTF-8",
            delimiter: b',',
            warnings: Vec::new(),
        };
        assert!(matches!(validate(&result), Err(SinkError::Malformed(_))));
    }
}
