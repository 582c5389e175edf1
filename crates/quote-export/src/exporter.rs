//! # Exporter Trait and Delivery
//!
//! ## Flow
//! ```text
//! ┌──────────────┐ render()  ┌──────────┐ deliver()  ┌──────────────────────────┐
//! │QuotationView │ ────────► │ Vec<u8>  │ ─────────► │ <dir>/<number>.<ext>     │
//! └──────────────┘           └──────────┘            │ missing dir → warn, None │
//!                                                    └──────────────────────────┘
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use quote_core::QuotationView;
use tracing::{info, warn};

use crate::error::ExportResult;
use crate::pdf::PdfExporter;
use crate::print::HtmlExporter;
use crate::sheet::{CsvExporter, XlsxExporter};

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Xlsx,
        ExportFormat::Csv,
        ExportFormat::Html,
    ];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "html" | "print" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format '{other}' (pdf, xlsx, csv, html)")),
        }
    }
}

/// Renders a view into one output format.
///
/// Implementations read the view only; they never recompute amounts.
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, view: &QuotationView) -> ExportResult<Vec<u8>>;
}

/// Returns the exporter for a format.
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Pdf => Box::new(PdfExporter::new()),
        ExportFormat::Xlsx => Box::new(XlsxExporter::new()),
        ExportFormat::Csv => Box::new(CsvExporter::new()),
        ExportFormat::Html => Box::new(HtmlExporter::new()),
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// Directory that receives exported files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    dir: PathBuf,
}

impl ExportTarget {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<quotation_number>.<ext>`
    pub fn file_path(&self, quotation_number: &str, format: ExportFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(quotation_number), format.extension()))
    }
}

/// Renders and writes one file.
///
/// Rendering errors are returned. A target that cannot be written is logged
/// and reported as `Ok(None)`.
pub fn deliver(
    exporter: &dyn Exporter,
    view: &QuotationView,
    target: &ExportTarget,
) -> ExportResult<Option<PathBuf>> {
    let bytes = exporter.render(view)?;
    let format = exporter.format();

    if !target.dir.is_dir() {
        warn!(
            dir = %target.dir.display(),
            format = %format,
            "Export target directory is not available, skipping"
        );
        return Ok(None);
    }

    let path = target.file_path(&view.quotation_number, format);
    match fs::write(&path, &bytes) {
        Ok(()) => {
            info!(
                quotation_number = %view.quotation_number,
                path = %path.display(),
                bytes = bytes.len(),
                "Exported quotation"
            );
            Ok(Some(path))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not write export, skipping");
            Ok(None)
        }
    }
}

fn file_stem(quotation_number: &str) -> String {
    let stem: String = quotation_number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if stem.is_empty() {
        "quotation".to_string()
    } else {
        stem
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!("print".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert!("docx".parse::<ExportFormat>().is_err());

        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
            assert_eq!(exporter_for(format).format(), format);
        }
    }

    #[test]
    fn test_file_path() {
        let target = ExportTarget::directory("/tmp/out");
        assert_eq!(
            target.file_path("QT-20250101-000123", ExportFormat::Pdf),
            PathBuf::from("/tmp/out/QT-20250101-000123.pdf")
        );
        assert_eq!(
            target.file_path("a/b c", ExportFormat::Csv),
            PathBuf::from("/tmp/out/a_b_c.csv")
        );
        assert_eq!(
            target.file_path("  ", ExportFormat::Html),
            PathBuf::from("/tmp/out/quotation.html")
        );
    }
}
