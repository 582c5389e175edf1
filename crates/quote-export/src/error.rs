//! # Export Errors
//!
//! Errors raised while turning a view into bytes.
//!
//! Delivery problems (missing or read-only target directory, blocked viewing
//! context) are NOT errors: the adapters log them and return a no-op result.

use thiserror::Error;

/// Export error type.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The PDF backend refused the document.
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    /// The XLSX writer failed.
    #[error("Spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The print template failed to compile or render.
    #[error("Template error: {0}")]
    Template(String),

    /// A CSV export could not be read back.
    #[error("Malformed sheet: {0}")]
    MalformedSheet(String),

    /// Buffer I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<handlebars::TemplateError> for ExportError {
    fn from(err: handlebars::TemplateError) -> Self {
        ExportError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for ExportError {
    fn from(err: handlebars::RenderError) -> Self {
        ExportError::Template(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
