// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("PDF text extraction failed: {0}")]
    Extraction(#[from] pdf_extract::OutputError), // Automatically convert extractor errors
}

#[derive(Error, Debug)]
pub enum ParseError {
    // The only structural failure: the legacy fixed-schema mode has a
    // single mandatory block and nothing else to report. The general
    // multi-source parser never raises; it degrades to empty output.
    #[error("Could not locate KARA source block in document")]
    KaraBlockMissing,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Report composition failed: {0}")]
    Report(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
