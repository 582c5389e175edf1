//! # Spreadsheet Exporter
//!
//! Lays the quotation out as a grid of cells, then encodes the grid as XLSX
//! or CSV. Both encodings share the same [`SheetGrid`].
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────┬────────┬───────┬────────────┬──────────────────┬───────────────┐
//! │ Mabric Interio - Quotation │        │       │            │                  │               │
//! │                            │        │       │            │                  │               │
//! │ Quotation Number           │ QT-…   │       │            │                  │               │
//! │ Date / Valid Until         │ …      │       │            │                  │               │
//! │                            │        │       │            │                  │               │
//! │ Client Details             │        │       │            │                  │               │
//! │ Client Name … Address      │ … / -  │       │            │                  │               │
//! │                            │        │       │            │                  │               │
//! │ Quotation Items            │        │       │            │                  │               │
//! │ Particulars                │ Length │ Width │ Total Sqft │ Price/Sqft (INR) │ Amount (INR)  │
//! │ <item rows, numeric cells>                                                                  │
//! │                            │        │       │            │                  │               │
//! │                            │        │       │            │ Grand Total (INR)│ 385.55        │
//! └────────────────────────────┴────────┴───────┴────────────┴──────────────────┴───────────────┘
//! widths (chars):   25             10       10       12              18                18
//! ```

use std::io::Read;
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use quote_core::QuotationView;

use crate::error::{ExportError, ExportResult};
use crate::exporter::{ExportFormat, Exporter};

/// Column widths in characters.
pub const COLUMN_WIDTHS: [f64; 6] = [25.0, 10.0, 10.0, 12.0, 18.0, 18.0];

pub const SHEET_NAME: &str = "Quotation";

pub const ITEM_HEADER: [&str; 6] = [
    "Particulars",
    "Length",
    "Width",
    "Total Sqft",
    "Price/Sqft (INR)",
    "Amount (INR)",
];

const GRAND_TOTAL_LABEL: &str = "Grand Total (INR)";
const MISSING: &str = "-";

// =============================================================================
// Grid
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Text(String),
    /// Heading or label, bold in XLSX.
    Label(String),
    Number(Decimal),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn label(value: impl Into<String>) -> Self {
        Cell::Label(value.into())
    }

    /// Cell content as written to CSV.
    pub fn as_plain(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Label(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// Rows of cells, ready to encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetGrid {
    pub rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn from_view(view: &QuotationView) -> Self {
        let or_missing = |value: &Option<String>| {
            Cell::text(value.clone().unwrap_or_else(|| MISSING.to_string()))
        };

        let mut rows: Vec<Vec<Cell>> = vec![
            vec![Cell::label(&view.title)],
            vec![],
            vec![Cell::label("Quotation Number"), Cell::text(&view.quotation_number)],
            vec![Cell::label("Date"), Cell::text(&view.date)],
            vec![Cell::label("Valid Until"), Cell::text(&view.valid_until)],
            vec![],
            vec![Cell::label("Client Details")],
            vec![Cell::label("Client Name"), Cell::text(&view.client.name)],
            vec![Cell::label("Company"), or_missing(&view.client.company)],
            vec![Cell::label("Email"), or_missing(&view.client.email)],
            vec![Cell::label("Phone"), or_missing(&view.client.phone)],
            vec![Cell::label("Address"), or_missing(&view.client.address)],
            vec![],
            vec![Cell::label("Quotation Items")],
            ITEM_HEADER.iter().map(|h| Cell::label(*h)).collect(),
        ];

        rows.extend(view.rows.iter().map(|row| {
            vec![
                Cell::text(&row.particulars),
                Cell::Number(row.length_value),
                Cell::Number(row.width_value),
                Cell::Number(row.area_value),
                Cell::Number(row.price_value),
                Cell::Number(row.amount_value),
            ]
        }));

        rows.push(vec![]);
        rows.push(vec![
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::label(GRAND_TOTAL_LABEL),
            Cell::Number(view.grand_total_value),
        ]);

        SheetGrid { rows }
    }

    pub fn to_xlsx(&self) -> ExportResult<Vec<u8>> {
        let bold = Format::new().set_bold();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        for (r, row) in self.rows.iter().enumerate() {
            let r = r as u32;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        sheet.write_string(r, c, s)?;
                    }
                    Cell::Label(s) => {
                        sheet.write_string_with_format(r, c, s, &bold)?;
                    }
                    Cell::Number(n) => {
                        sheet.write_number(r, c, n.to_f64().unwrap_or_default())?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    pub fn to_csv(&self) -> ExportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

        for row in &self.rows {
            if row.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(row.iter().map(Cell::as_plain))?;
            }
        }

        writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
    }
}

// =============================================================================
// Exporters
// =============================================================================

/// `.xlsx` workbook with a single sheet.
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        XlsxExporter
    }
}

impl Exporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, view: &QuotationView) -> ExportResult<Vec<u8>> {
        debug!(quotation_number = %view.quotation_number, "Rendering XLSX");
        SheetGrid::from_view(view).to_xlsx()
    }
}

/// `.csv` with the same rows as the workbook.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        CsvExporter
    }
}

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, view: &QuotationView) -> ExportResult<Vec<u8>> {
        debug!(quotation_number = %view.quotation_number, "Rendering CSV");
        SheetGrid::from_view(view).to_csv()
    }
}

// =============================================================================
// Reading Back
// =============================================================================

/// One item row recovered from a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetItem {
    pub particulars: String,
    pub length: Decimal,
    pub width: Decimal,
    pub area: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
}

/// Reads the item rows of a CSV export.
///
/// Items are the rows between the `Particulars, Length, ...` header and the
/// next blank row.
pub fn read_item_rows<R: Read>(reader: R) -> ExportResult<Vec<SheetItem>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut items = Vec::new();
    let mut in_items = false;

    for record in rdr.records() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();

        if !in_items {
            in_items = fields.len() >= ITEM_HEADER.len()
                && fields.iter().zip(ITEM_HEADER.iter()).all(|(a, b)| a == b);
            continue;
        }

        if fields.iter().all(|f| f.trim().is_empty()) {
            break;
        }

        if fields.len() < ITEM_HEADER.len() {
            return Err(ExportError::MalformedSheet(format!(
                "item row has {} columns, expected {}",
                fields.len(),
                ITEM_HEADER.len()
            )));
        }

        let number = |idx: usize| {
            Decimal::from_str(fields[idx].trim()).map_err(|e| {
                ExportError::MalformedSheet(format!("{}: {}", ITEM_HEADER[idx], e))
            })
        };

        items.push(SheetItem {
            particulars: fields[0].to_string(),
            length: number(1)?,
            width: number(2)?,
            area: number(3)?,
            price: number(4)?,
            amount: number(5)?,
        });
    }

    if !in_items {
        return Err(ExportError::MalformedSheet("item header row not found".to_string()));
    }

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
