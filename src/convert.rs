//! Single-file and batch conversion from CSV to XLSX.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::ConvertError;
use crate::ingest::{Ingestor, is_csv_file};
use crate::options::{ParseOptions, SinkOptions};
use crate::sink::XlsxSink;

/// Convert one CSV file and return the path of the written workbook.
pub fn convert_file<P: AsRef<Path>>(
    path: P,
    parse_options: &ParseOptions,
    sink_options: &SinkOptions,
) -> Result<PathBuf, ConvertError> {
    let path = path.as_ref();
    if !is_csv_file(path) {
        return Err(ConvertError::NotCsv(path.to_path_buf()));
    }

    let result = Ingestor::with_options(parse_options.clone()).parse_path(path)?;
    let output = XlsxSink::with_options(sink_options.clone()).write(&result, path)?;
    Ok(output)
}

/// A file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The source file.
    pub path: PathBuf,
    /// Why it failed.
    pub message: String,
}

/// Outcome of a batch conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Workbooks written, in input order.
    pub successful: Vec<PathBuf>,
    /// Files that failed, in input order.
    pub failed: Vec<BatchFailure>,
    /// Inputs that were not CSV files and were never attempted.
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    /// Number of converted files.
    pub fn success_count(&self) -> usize {
        self.successful.len()
    }

    /// Number of failed files.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of files attempted.
    pub fn attempted(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    /// True if at least one file was attempted and none failed.
    pub fn is_complete_success(&self) -> bool {
        self.attempted() > 0 && self.failed.is_empty()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Successfully converted {} CSV files to Excel", self.success_count())
        } else {
            format!(
                "Batch conversion completed: {} successful, {} failed",
                self.success_count(),
                self.failure_count()
            )
        }
    }

    fn record(&mut self, path: &Path, outcome: Result<PathBuf, ConvertError>) {
        match outcome {
            Ok(output) => self.successful.push(output),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "conversion failed");
                self.failed.push(BatchFailure {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Progress callback for batch conversions.
pub trait BatchProgress {
    /// Called before converting the `index`-th (0-based) of `total` files.
    fn on_file(&mut self, _index: usize, _total: usize, _path: &Path) {}
}

/// Progress reporter that does nothing.
#[derive(Debug, Default)]
pub struct NoProgress;

impl BatchProgress for NoProgress {}

impl<F: FnMut(usize, usize, &Path)> BatchProgress for F {
    fn on_file(&mut self, index: usize, total: usize, path: &Path) {
        self(index, total, path)
    }
}

/// Split `paths` into CSV files to convert and paths to skip.
fn partition_inputs<P: AsRef<Path>>(paths: &[P]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths
        .iter()
        .map(|p| p.as_ref().to_path_buf())
        .partition(|p| is_csv_file(p))
}

/// Sink settings for a batch: every workbook goes next to its source.
fn batch_sink_options(sink_options: &SinkOptions) -> SinkOptions {
    let mut options = sink_options.clone();
    if options.output_path.take().is_some() {
        tracing::debug!("ignoring explicit output path for batch conversion");
    }
    options
}

/// Convert many files one after another.
///
/// Each workbook is written next to its source. Non-CSV inputs are listed
/// in [`BatchReport::skipped`]. A failing file is recorded in the report
/// and does not stop the remaining files.
pub fn convert_batch<P: AsRef<Path>>(
    paths: &[P],
    parse_options: &ParseOptions,
    sink_options: &SinkOptions,
    progress: &mut dyn BatchProgress,
) -> BatchReport {
    let (files, skipped) = partition_inputs(paths);
    let mut report = BatchReport {
        skipped,
        ..BatchReport::default()
    };

    let sink_options = batch_sink_options(sink_options);
    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        progress.on_file(index, total, file);
        tracing::debug!(
            "Converting {} ({}/{})",
            file.file_name().unwrap_or(file.as_os_str()).to_string_lossy(),
            index + 1,
            total
        );
        report.record(file, convert_file(file, parse_options, &sink_options));
    }

    report
}

/// Convert many files on a pool of `jobs` worker threads.
///
/// Reports exactly like [`convert_batch`], in input order.
pub fn convert_batch_parallel<P: AsRef<Path>>(
    paths: &[P],
    parse_options: &ParseOptions,
    sink_options: &SinkOptions,
    jobs: usize,
) -> BatchReport {
    let (files, skipped) = partition_inputs(paths);
    let mut report = BatchReport {
        skipped,
        ..BatchReport::default()
    };

    let sink_options = batch_sink_options(sink_options);
    let convert_all = || -> Vec<Result<PathBuf, ConvertError>> {
        files
            .par_iter()
            .map(|file| convert_file(file, parse_options, &sink_options))
            .collect()
    };

    let outcomes = match rayon::ThreadPoolBuilder::new().num_threads(jobs.max(1)).build() {
        Ok(pool) => pool.install(convert_all),
        Err(e) => {
            tracing::warn!(error = %e, "could not build worker pool, using the global pool");
            convert_all()
        }
    };

    for (file, outcome) in files.iter().zip(outcomes) {
        report.record(file, outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_summary() {
        let mut report = BatchReport::default();
        report.successful.push(PathBuf::from("a.xlsx"));
        report.successful.push(PathBuf::from("b.xlsx"));
        assert_eq!(report.summary(), "Successfully converted 2 CSV files to Excel");
        assert!(report.is_complete_success());

        report.failed.push(BatchFailure {
            path: PathBuf::from("c.csv"),
            message: "Parse error".into(),
        });
        assert_eq!(report.summary(), "Batch conversion completed: 2 successful, 1 failed");
        assert!(!report.is_complete_success());
        assert_eq!(report.attempted(), 3);
    }

    #[test]
    fn test_batch_ignores_output_path() {
        let mut options = SinkOptions::new();
        options.output_path("out.xlsx").sheet_name("Data");

        let batch = batch_sink_options(&options);
        assert_eq!(batch.output_path, None);
        assert_eq!(batch.sheet_name, "Data");
    }

    #[test]
    fn test_empty_report_is_not_success() {
        assert!(!BatchReport::default().is_complete_success());
    }

    #[test]
    fn test_partition_inputs() {
        let dir = TempDir::new().unwrap();
        let csv1 = dir.path().join("test1.csv");
        let csv2 = dir.path().join("TEST2.CSV");
        let txt = dir.path().join("test.txt");
        let xlsx = dir.path().join("test.xlsx");
        for p in [&csv1, &csv2, &txt, &xlsx] {
            fs::write(p, "test").unwrap();
        }
        let missing = dir.path().join("missing.csv");

        let (files, skipped) = partition_inputs(&[&csv1, &txt, &csv2, &xlsx, &missing]);
        assert_eq!(files, vec![csv1, csv2]);
        assert_eq!(skipped, vec![txt, xlsx, missing]);
    }

    #[test]
    fn test_convert_file_rejects_non_csv() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "a,b\n1,2\n").unwrap();

        let err = convert_file(&txt, &ParseOptions::new(), &SinkOptions::new()).unwrap_err();
        assert!(matches!(err, ConvertError::NotCsv(_)));
    }

    #[test]
    fn test_progress_closure() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "x,y\n1,2\n").unwrap();
        fs::write(&b, "x,y\n3,4\n").unwrap();

        let mut seen = Vec::new();
        let mut progress = |index: usize, total: usize, _path: &Path| seen.push((index, total));
        let report = convert_batch(&[&a, &b], &ParseOptions::new(), &SinkOptions::new(), &mut progress);

        assert_eq!(report.success_count(), 2);
        assert_eq!(seen, vec![(0, 2), (1, 2)]);
    }
}
