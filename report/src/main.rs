//! Recce Report CLI - Convert recce audit CSV exports to Excel reports
//!
//! # Main Commands
//!
//! ```bash
//! recce-report                          # Convert InputFiles/*.csv into Output/
//! recce-report run -i exports -o out    # Same, with explicit folders
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! recce-report parse input.csv          # Just parse CSV to JSON
//! recce-report transform input.csv      # Show derived report rows as JSON
//! recce-report columns                  # List report columns
//! ```

use clap::{Parser, Subcommand};
use recce_report::{
    parse_csv_file_auto, run_batch, transform_file, ProblemSummary, ReportConfig,
    LOG_BROADCASTER, OUTPUT_COLUMNS,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "recce-report")]
#[command(about = "Convert recce audit CSV exports into formatted Excel reports")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every CSV file of the input folder (default command)
    Run {
        /// Input folder (default: $RECCE_INPUT_DIR or InputFiles)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output folder (default: $RECCE_OUTPUT_DIR or Output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Derive report rows from a CSV file and output JSON
    Transform {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the report columns
    Columns,
}

fn main() -> ExitCode {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Run {
        input: None,
        output: None,
    });

    let result = match command {
        Commands::Run { input, output } => return cmd_run(input, output),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Transform { input, output } => cmd_transform(&input, output.as_deref()),
        Commands::Columns => cmd_columns(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(input: Option<PathBuf>, output: Option<PathBuf>) -> ExitCode {
    let mut config = ReportConfig::from_env();
    if let Some(dir) = input {
        config = config.with_input_dir(dir);
    }
    if let Some(dir) = output {
        config = config.with_output_dir(dir);
    }

    let mut logs = LOG_BROADCASTER.subscribe();
    let result = run_batch(&config);

    let summary = ProblemSummary::drain(&mut logs);
    for line in summary.render() {
        eprintln!("{}", line);
    }

    match result {
        Ok(report) if report.has_failures() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_transform(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let table = transform_file(input)?;

    eprintln!("⚙️  Derived {} report rows", table.len());
    eprintln!("   Shops: {}", table.total.run_count);
    eprintln!("   Total Sqft: {:.2}", table.total.total_sqft);

    let json = serde_json::to_string_pretty(&table)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    for (i, name) in OUTPUT_COLUMNS.iter().enumerate() {
        println!("[{:2}] {}", i + 1, name);
    }
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
