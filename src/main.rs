//! csv2xlsx CLI - convert CSV files to Excel workbooks

use clap::Parser;
use csv2xlsx::{
    BatchReport, ParseOptions, SinkOptions, convert_batch, convert_batch_parallel, convert_file,
    is_csv_file,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert CSV files to XLSX.
///
/// Encoding and delimiter are detected per file unless forced. With one
/// file the workbook can be written anywhere; with several files each
/// workbook is written next to its source.
#[derive(Parser, Debug)]
#[command(name = "csv2xlsx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file(s) to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Force specific delimiter (single character)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Force specific encoding (e.g. utf-8, gbk, windows-1252)
    #[arg(short = 'e', long)]
    encoding: Option<String>,

    /// Output path (single file only)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Worksheet name
    #[arg(short = 's', long, default_value = "Sheet1")]
    sheet_name: String,

    /// Do not style the header row
    #[arg(long)]
    no_header_style: bool,

    /// Do not auto-fit column widths
    #[arg(long)]
    no_autofit: bool,

    /// Keep every cell as text
    #[arg(long)]
    no_type_inference: bool,

    /// Worker threads for batch conversion (1 = sequential)
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    let parse_options = match parse_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.files.len() > 1 {
        if args.output.is_some() {
            eprintln!("Error: --output can only be used with a single input file");
            return ExitCode::FAILURE;
        }
        return run_batch(&args, &parse_options);
    }

    run_single(&args.files[0], &args, &parse_options)
}

fn init_tracing(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match args.verbose {
        0 => "csv2xlsx=info",
        1 => "csv2xlsx=debug",
        _ => "csv2xlsx=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match args.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn parse_options(args: &Args) -> Result<ParseOptions, String> {
    let mut options = ParseOptions::new();

    if let Some(delim) = args.delimiter {
        if !delim.is_ascii() {
            return Err(format!("delimiter must be a single ASCII character, got {delim:?}"));
        }
        options.delimiter(delim as u8);
    }

    if let Some(ref label) = args.encoding {
        options.encoding(label.clone());
    }

    options.infer_types(!args.no_type_inference);
    Ok(options)
}

fn sink_options(args: &Args) -> SinkOptions {
    let mut options = SinkOptions::new();
    options
        .sheet_name(args.sheet_name.clone())
        .header_style(!args.no_header_style)
        .autofit_columns(!args.no_autofit);

    if let Some(ref output) = args.output {
        options.output_path(output.clone());
    }
    options
}

fn run_single(file: &Path, args: &Args, parse_options: &ParseOptions) -> ExitCode {
    if !is_csv_file(file) {
        eprintln!("Please select a valid CSV file: {}", file.display());
        return ExitCode::FAILURE;
    }

    match convert_file(file, parse_options, &sink_options(args)) {
        Ok(output) => {
            println!("CSV converted to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error processing {}: {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_batch(args: &Args, parse_options: &ParseOptions) -> ExitCode {
    if !args.files.iter().any(is_csv_file) {
        eprintln!("No valid CSV files selected.");
        return ExitCode::FAILURE;
    }

    let report = if args.jobs > 1 {
        convert_batch_parallel(&args.files, parse_options, &sink_options(args), args.jobs)
    } else {
        let mut progress = |index: usize, total: usize, path: &Path| {
            eprintln!(
                "[{}/{}] {}",
                index + 1,
                total,
                path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
            );
        };
        convert_batch(&args.files, parse_options, &sink_options(args), &mut progress)
    };

    print_report(&report);

    if report.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(report: &BatchReport) {
    for path in &report.skipped {
        eprintln!("Skipped (not a CSV file): {}", path.display());
    }
    for output in &report.successful {
        println!("  {}", output.display());
    }
    for failure in &report.failed {
        eprintln!("Error processing {}: {}", failure.path.display(), failure.message);
    }
    println!("{}", report.summary());
}
