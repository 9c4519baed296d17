// src/main.rs
mod parser;
mod pdf;
mod render;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use storage::OutputManager;
use utils::AppError;

/// Command Line Interface for the Soundvision report extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Specific report file inside the data directory (optional)
    input: Option<String>,

    /// Directory scanned for *.pdf reports when no input file is given
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Also render the paginated PDF report (the workbook and summary JSON
    /// are always written)
    #[arg(short, long)]
    report: bool,

    /// Legacy fixed-schema mode: expect exactly one KARA source block and
    /// fail when it is absent
    #[arg(long)]
    kara_only: bool,

    /// Debug mode - save raw and annotated text files for each document
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize output management
    let storage = OutputManager::new(&args.output_dir)?;

    // 4. Collect the reports to process
    let inputs = collect_inputs(&args)?;
    if inputs.is_empty() {
        tracing::info!("No PDF files found in {}", args.data_dir);
        return Ok(());
    }
    tracing::info!("Found {} report(s) to process", inputs.len());

    // 5. Process each report; one malformed document must not halt the batch
    let mut success_count = 0;
    let mut failure_count = 0;

    for input in &inputs {
        tracing::info!("Processing report: {}", input.display());
        match process_report(input, &storage, &args) {
            Ok(()) => success_count += 1,
            Err(e) => {
                tracing::error!("Failed to process {}: {}", input.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any data from {} report(s)",
            failure_count
        )));
    }

    Ok(())
}

/// Resolves the list of input files: the explicit positional file when
/// given, otherwise every *.pdf in the data directory in sorted order.
fn collect_inputs(args: &Args) -> Result<Vec<PathBuf>, AppError> {
    if let Some(name) = &args.input {
        let path = PathBuf::from(&args.data_dir).join(name);
        if !path.exists() {
            return Err(AppError::Config(format!("{} not found", path.display())));
        }
        return Ok(vec![path]);
    }

    let data_dir = Path::new(&args.data_dir);
    if !data_dir.is_dir() {
        return Err(AppError::Config(format!(
            "Data directory {} does not exist",
            data_dir.display()
        )));
    }

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();

    Ok(inputs)
}

/// Runs the full pipeline for one report: text extraction, parsing,
/// rendering, summary metadata.
fn process_report(input: &Path, storage: &OutputManager, args: &Args) -> Result<(), AppError> {
    let text = pdf::text::extract_text(input)?;

    if args.debug {
        save_debug_artifacts(&text, input, storage)?;
    }

    let doc = if args.kara_only {
        parser::parse_kara_document(&text)?
    } else {
        parser::parse_document(&text)
    };
    tracing::info!(
        "Parsed {} group(s), {} source(s) from {}",
        doc.groups.len(),
        doc.record_count(),
        input.display()
    );

    render::excel::write_excel(&doc, &storage.excel_path(input))?;
    if args.report {
        render::report::write_report(&doc, &storage.report_path(input))?;
    }
    storage.save_summary(input, &doc)?;

    Ok(())
}

/// Saves the raw extracted text and an annotated copy with every recognized
/// header marked, for diagnosing documents that parse to less than expected.
fn save_debug_artifacts(
    text: &str,
    input: &Path,
    storage: &OutputManager,
) -> Result<(), AppError> {
    let raw_path = storage.debug_text_path(input, "raw");
    std::fs::write(&raw_path, text)?;
    tracing::info!("Saved raw text to {}", raw_path.display());

    let debug_patterns = [
        (r"(?m)^\s*\d+\.\s*Source:.*$", "source"),
        (r"(?m)^\s*\d+\.\s*Group:.*$", "group"),
        (r"(?m)^#\d+\s.*$", "row"),
    ];
    let annotated_path = storage.debug_text_path(input, "annotated");
    if let Some(path_str) = annotated_path.to_str() {
        utils::text_debug::create_debug_text(text, path_str, &debug_patterns)?;
    } else {
        tracing::warn!("Skipping annotated dump: non-UTF-8 output path");
    }

    Ok(())
}
