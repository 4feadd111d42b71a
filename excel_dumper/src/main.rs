use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use excel_dumper::{dump, DumpConfig, DumpOutcome, ExtractOptions, OutputFormat};
use std::io::Write;
use std::path::PathBuf;
use std::process;

/// Extract every non-empty worksheet row of an Excel file (.xlsx, .xls,
/// .xlsm, .xlsb) into one CSV file, or one JSON file with --json.
///
/// The output is named "dumper_<file>_<timestamp>.csv" (or ".json"), where
/// the timestamp is the workbook's last modified time. An existing file is
/// never overwritten; "(1)", "(2)", ... is appended instead.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Excel file to process (default: newest Excel file in the input directory)
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Directory to search for Excel files (default: current directory)
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory for the output file, created if missing (default: current directory)
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Skip hidden worksheets
    #[arg(long)]
    no_hide: bool,

    /// Include Excel row numbers in the output
    #[arg(long, visible_alias = "rownumbers")]
    row_numbers: bool,

    /// Show formulas instead of calculated values (.xlsx/.xlsm only)
    #[arg(long)]
    formulas: bool,

    /// Write JSON instead of CSV
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> DumpConfig {
        DumpConfig {
            file: self.file,
            input_dir: self.input,
            output_dir: self.output,
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Csv
            },
            options: ExtractOptions {
                include_hidden: !self.no_hide,
                include_row_numbers: self.row_numbers,
                include_formulas: self.formulas,
            },
        }
    }
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn run(args: Args) -> Result<()> {
    // Map flags onto the run configuration
    let config = args.into_config();
    let outcome = dump(&config).context("Excel dump failed")?;

    match outcome {
        DumpOutcome::NoData { source } => {
            println!("No data found to export from {}.", source.display());
        }
        DumpOutcome::Written(summary) => {
            println!("Data successfully exported to: {}", summary.path.display());
            println!("Total rows exported: {}", summary.rows);
        }
    }
    Ok(())
}

fn main() {
    // --help and --version exit 0; any usage error exits 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    setup_logging();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
