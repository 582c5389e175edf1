//! # Print Adapter
//!
//! Renders a standalone HTML page (stylesheet embedded, no external assets)
//! that opens the browser print dialog shortly after loading.
//!
//! ```text
//! QuotationView ──handlebars──► HTML ──ViewingContext::open──► print dialog
//!                                              │
//!                                      blocked ▼
//!                                   warn!, Ok(false), nothing else happens
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::json;
use tracing::{debug, info, warn};

use quote_core::QuotationView;

use crate::error::ExportResult;
use crate::exporter::{ExportFormat, Exporter};

const TEMPLATE_NAME: &str = "quotation";
const TEMPLATE: &str = include_str!("../templates/quotation.hbs");
const STYLESHEET: &str = include_str!("../templates/print.css");

/// Delay before `window.print()` so the page can lay out.
pub const PRINT_DELAY_MS: u64 = 500;

/// Renders the print page. Values are HTML-escaped.
pub fn render_html(view: &QuotationView) -> ExportResult<String> {
    let mut registry = Handlebars::new();
    registry.register_template_string(TEMPLATE_NAME, TEMPLATE)?;

    let data = json!({
        "view": view,
        "client_heading": view.client_heading(),
        "style": STYLESHEET,
        "print_delay_ms": PRINT_DELAY_MS,
    });

    Ok(registry.render(TEMPLATE_NAME, &data)?)
}

/// `.html` print page.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        HtmlExporter
    }
}

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn render(&self, view: &QuotationView) -> ExportResult<Vec<u8>> {
        debug!(quotation_number = %view.quotation_number, "Rendering print page");
        Ok(render_html(view)?.into_bytes())
    }
}

// =============================================================================
// Viewing Context
// =============================================================================

/// Somewhere a print page can be shown: a browser window, a file handed to
/// the OS viewer, a test double.
pub trait ViewingContext {
    /// Opens a new context showing `html`. An error means the context could
    /// not be opened (popup blocked, no viewer).
    fn open(&mut self, title: &str, html: &str) -> io::Result<()>;
}

/// Writes the print page into a directory for the user to open.
#[derive(Debug, Clone)]
pub struct FileViewer {
    dir: PathBuf,
    last_opened: Option<PathBuf>,
}

impl FileViewer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_opened: None,
        }
    }

    /// Path of the page written by the last successful `open`.
    pub fn last_opened(&self) -> Option<&Path> {
        self.last_opened.as_deref()
    }
}

impl ViewingContext for FileViewer {
    fn open(&mut self, title: &str, html: &str) -> io::Result<()> {
        let name: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let path = self.dir.join(format!("{name}-print.html"));
        fs::write(&path, html)?;
        self.last_opened = Some(path);
        Ok(())
    }
}

/// Renders the view and opens it for printing.
///
/// Returns `Ok(false)` when the viewing context refuses to open.
pub fn print_quotation(view: &QuotationView, context: &mut dyn ViewingContext) -> ExportResult<bool> {
    let html = render_html(view)?;

    match context.open(&view.quotation_number, &html) {
        Ok(()) => {
            info!(quotation_number = %view.quotation_number, "Opened print view");
            Ok(true)
        }
        Err(e) => {
            warn!(
                quotation_number = %view.quotation_number,
                error = %e,
                "Print view blocked, nothing printed"
            );
            Ok(false)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
