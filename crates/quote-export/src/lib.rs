//! # quote-export: Output Adapters for Mabric Quote
//!
//! Three adapters read the same [`QuotationView`](quote_core::QuotationView):
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        quote-export (THIS CRATE)                        │
//! │                                                                         │
//! │   pdf.rs     PdfExporter    A4 document, header row on every page       │
//! │   sheet.rs   XlsxExporter   single "Quotation" sheet, fixed widths      │
//! │              CsvExporter    same grid as CSV, read_item_rows()          │
//! │   print.rs   HtmlExporter   standalone print page (handlebars)          │
//! │                                                                         │
//! │   exporter.rs  Exporter trait, ExportFormat, deliver() to a directory   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use quote_export::{deliver, exporter_for, ExportFormat, ExportTarget};
//!
//! let view = QuotationView::build(&record, &company, "Rs.");
//! let exporter = exporter_for(ExportFormat::Pdf);
//! if let Some(path) = deliver(exporter.as_ref(), &view, &ExportTarget::directory("./out"))? {
//!     println!("wrote {}", path.display());
//! }
//! ```

pub mod error;
pub mod exporter;
pub mod pdf;
pub mod print;
pub mod sheet;

pub use error::{ExportError, ExportResult};
pub use exporter::{deliver, exporter_for, ExportFormat, ExportTarget, Exporter};
pub use pdf::PdfExporter;
pub use print::{print_quotation, render_html, FileViewer, HtmlExporter, ViewingContext};
pub use sheet::{read_item_rows, CsvExporter, SheetGrid, SheetItem, XlsxExporter};
