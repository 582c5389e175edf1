//! # PDF Exporter
//!
//! A4 portrait, drawn with the built-in Helvetica fonts.
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────────┐  ─┬─ 15 mm
//! │ Mabric                         www.mabric.in │   │
//! │ Sy. No. 245/2, ...            +91 96067 ...  │
//! │                 QUOTATION                    │
//! │──────────────────────────────────────────────│
//! │ Bill To:                  Quotation No: ...  │
//! │ Client (Company)          Date / Valid Until │
//! │──────────────────────────────────────────────│
//! │ # │ Particulars │ L │ W │ Sqft │ Price │ Amt │  ◄── repeated after every
//! │───┼─────────────┼───┼───┼──────┼───────┼─────│      page break
//! │ 1 │ ...         │   │   │      │       │     │
//! │                          Subtotal      ...   │
//! │                          Tax (10%)     ...   │
//! │                          Grand Total   ...   │
//! │ Terms & Conditions                           │
//! │ Thank you ...                  For Mabric    │
//! │                                Director      │
//! └──────────────────────────────────────────────┘  ─┴─ 15 mm
//!  10 mm                                    10 mm
//! ```
//!
//! Builtin fonts carry no metrics here, so right alignment uses an average
//! glyph width estimate.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use tracing::debug;

use quote_core::view::ItemRow;
use quote_core::QuotationView;

use crate::error::{ExportError, ExportResult};
use crate::exporter::{ExportFormat, Exporter};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_TOP: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 15.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_RIGHT: f32 = 10.0;

const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN_RIGHT;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH: f32 = 0.5;

const TABLE_FONT: f32 = 8.5;
const LINE_HEIGHT: f32 = 4.2;
const ROW_PADDING: f32 = 2.6;
const HEADER_ROW_HEIGHT: f32 = 7.0;
const TOTALS_HEIGHT: f32 = 24.0;
const FOOTER_HEIGHT: f32 = 34.0;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    title: &'static str,
    width: f32,
    align: Align,
}

/// Sums to 190 mm, the printable width.
const COLUMNS: [Column; 7] = [
    Column { title: "#", width: 8.0, align: Align::Left },
    Column { title: "Particulars", width: 62.0, align: Align::Left },
    Column { title: "Length", width: 17.0, align: Align::Right },
    Column { title: "Width", width: 17.0, align: Align::Right },
    Column { title: "Total Sqft", width: 20.0, align: Align::Right },
    Column { title: "Price/Sqft", width: 33.0, align: Align::Right },
    Column { title: "Amount", width: 33.0, align: Align::Right },
];

/// `.pdf` document.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        PdfExporter
    }
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, view: &QuotationView) -> ExportResult<Vec<u8>> {
        let (bytes, pages) = layout(view)?;
        debug!(
            quotation_number = %view.quotation_number,
            pages,
            bytes = bytes.len(),
            "Rendered PDF"
        );
        Ok(bytes)
    }
}

// =============================================================================
// Canvas
// =============================================================================

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline cursor, measured from the bottom edge.
    y: f32,
    pages: usize,
}

impl Canvas {
    fn new(title: &str) -> ExportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN_TOP,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN_TOP;
        self.pages += 1;
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN_BOTTOM
    }

    /// Starts a new page if `height` does not fit. Returns `true` on a break.
    fn ensure(&mut self, height: f32) -> bool {
        if self.remaining() < height {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn text_right(&self, text: &str, size: f32, right: f32, y: f32, bold: bool) {
        self.text(text, size, right - text_width(text, size), y, bold);
    }

    fn text_center(&self, text: &str, size: f32, y: f32, bold: bool) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        self.text(text, size, x, y, bold);
    }

    fn rule(&self, x1: f32, x2: f32, y: f32, thickness: f32) {
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn finish(self) -> ExportResult<(Vec<u8>, usize)> {
        let pages = self.pages;
        let bytes = self.doc.save_to_bytes().map_err(pdf_error)?;
        Ok((bytes, pages))
    }
}

fn pdf_error(err: printpdf::Error) -> ExportError {
    ExportError::Pdf(err.to_string())
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH * PT_TO_MM
}

/// How many characters fit in `width` mm at `size` pt.
fn chars_for(width: f32, size: f32) -> usize {
    ((width / (size * AVG_GLYPH * PT_TO_MM)).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are split. Honors `\n`.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// =============================================================================
// Layout
// =============================================================================

fn layout(view: &QuotationView) -> ExportResult<(Vec<u8>, usize)> {
    let mut canvas = Canvas::new(&view.title)?;

    draw_letterhead(&mut canvas, view);
    draw_info_block(&mut canvas, view);
    draw_table_header(&mut canvas);

    for row in &view.rows {
        draw_item_row(&mut canvas, row);
    }

    draw_totals(&mut canvas, view);
    draw_terms(&mut canvas, view);
    draw_footer(&mut canvas, view);

    canvas.finish()
}

fn draw_letterhead(canvas: &mut Canvas, view: &QuotationView) {
    let company = &view.company;
    let top = canvas.y;

    canvas.text(&company.name, 20.0, MARGIN_LEFT, top - 6.0, true);
    let mut y = top - 12.0;
    for line in &company.address_lines {
        canvas.text(line, 8.5, MARGIN_LEFT, y, false);
        y -= 4.0;
    }

    let mut contact_y = top - 3.0;
    for line in &company.contact_lines {
        canvas.text_right(line, 8.5, CONTENT_RIGHT, contact_y, false);
        contact_y -= 4.0;
    }

    canvas.y = y.min(contact_y) - 4.0;
    canvas.text_center("QUOTATION", 14.0, canvas.y, true);
    canvas.y -= 4.0;
    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y, 0.8);
    canvas.y -= 7.0;
}

fn draw_info_block(canvas: &mut Canvas, view: &QuotationView) {
    let top = canvas.y;

    let mut left = vec![(view.client_heading(), true)];
    for value in [&view.client.email, &view.client.phone].into_iter().flatten() {
        left.push((value.clone(), false));
    }
    if let Some(address) = &view.client.address {
        for line in wrap_text(address, 60) {
            left.push((line, false));
        }
    }

    canvas.text("Bill To:", 9.0, MARGIN_LEFT, top, true);
    let mut y = top - 5.0;
    for (line, bold) in &left {
        canvas.text(line, 9.0, MARGIN_LEFT, y, *bold);
        y -= 4.5;
    }

    let mut right = vec![
        ("Quotation No:", view.quotation_number.clone()),
        ("Date:", view.date.clone()),
        ("Valid Until:", view.valid_until.clone()),
    ];
    if let Some(project) = &view.project_name {
        right.push(("Project:", project.clone()));
    }
    if let Some(survey) = &view.survey_number {
        right.push(("Survey No:", survey.clone()));
    }
    if let Some(house) = &view.house_number {
        right.push(("House No:", house.clone()));
    }

    let label_x = CONTENT_RIGHT - 75.0;
    let mut right_y = top;
    for (label, value) in &right {
        canvas.text(label, 9.0, label_x, right_y, true);
        canvas.text_right(value, 9.0, CONTENT_RIGHT, right_y, false);
        right_y -= 4.5;
    }

    canvas.y = y.min(right_y) - 2.0;
    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y, 0.5);
    canvas.y -= 6.0;
}

fn draw_table_header(canvas: &mut Canvas) {
    canvas.ensure(HEADER_ROW_HEIGHT + LINE_HEIGHT + ROW_PADDING);

    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y + LINE_HEIGHT, 0.5);
    let mut x = MARGIN_LEFT;
    for column in &COLUMNS {
        match column.align {
            Align::Left => canvas.text(column.title, TABLE_FONT, x + 1.0, canvas.y, true),
            Align::Right => canvas.text_right(
                column.title,
                TABLE_FONT,
                x + column.width - 1.0,
                canvas.y,
                true,
            ),
        }
        x += column.width;
    }
    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y - 2.5, 0.5);
    canvas.y -= HEADER_ROW_HEIGHT;
}

fn draw_item_row(canvas: &mut Canvas, row: &ItemRow) {
    let particulars = wrap_text(&row.particulars, chars_for(COLUMNS[1].width - 2.0, TABLE_FONT));
    let height = particulars.len() as f32 * LINE_HEIGHT + ROW_PADDING;

    if canvas.ensure(height) {
        draw_table_header(canvas);
    }

    let index = row.index.to_string();
    let cells: [&str; 7] = [
        &index,
        "",
        &row.length,
        &row.width,
        &row.area,
        &row.price,
        &row.amount,
    ];

    let mut x = MARGIN_LEFT;
    for (column, value) in COLUMNS.iter().zip(cells) {
        match column.align {
            Align::Left => canvas.text(value, TABLE_FONT, x + 1.0, canvas.y, false),
            Align::Right => {
                canvas.text_right(value, TABLE_FONT, x + column.width - 1.0, canvas.y, false)
            }
        }
        x += column.width;
    }

    let particulars_x = MARGIN_LEFT + COLUMNS[0].width + 1.0;
    let mut y = canvas.y;
    for line in &particulars {
        canvas.text(line, TABLE_FONT, particulars_x, y, false);
        y -= LINE_HEIGHT;
    }

    canvas.y -= height;
    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y + LINE_HEIGHT - 0.8, 0.1);
}

fn draw_totals(canvas: &mut Canvas, view: &QuotationView) {
    canvas.ensure(TOTALS_HEIGHT);
    canvas.y -= 2.0;

    let label_x = CONTENT_RIGHT - COLUMNS[6].width - COLUMNS[5].width;
    let lines = [
        ("Subtotal:", &view.subtotal, false),
        (view.tax_label.as_str(), &view.tax_amount, false),
        ("Grand Total:", &view.grand_total, true),
    ];

    for (label, value, bold) in lines {
        if bold {
            canvas.rule(label_x, CONTENT_RIGHT, canvas.y + LINE_HEIGHT, 0.5);
        }
        canvas.text(label, 9.5, label_x, canvas.y, bold);
        canvas.text_right(value, 9.5, CONTENT_RIGHT - 1.0, canvas.y, bold);
        canvas.y -= 6.0;
    }
    canvas.y -= 4.0;
}

fn draw_terms(canvas: &mut Canvas, view: &QuotationView) {
    let Some(terms) = &view.terms else {
        return;
    };

    canvas.ensure(12.0);
    canvas.text("Terms & Conditions", 10.0, MARGIN_LEFT, canvas.y, true);
    canvas.y -= 5.5;

    let width = chars_for(CONTENT_RIGHT - MARGIN_LEFT, 9.0);
    for line in wrap_text(terms, width) {
        canvas.ensure(LINE_HEIGHT);
        canvas.text(&line, 9.0, MARGIN_LEFT, canvas.y, false);
        canvas.y -= LINE_HEIGHT + 0.4;
    }
    canvas.y -= 4.0;
}

fn draw_footer(canvas: &mut Canvas, view: &QuotationView) {
    let company = &view.company;
    canvas.ensure(FOOTER_HEIGHT);

    canvas.rule(MARGIN_LEFT, CONTENT_RIGHT, canvas.y + 2.0, 0.5);
    canvas.y -= 4.0;
    canvas.text(&company.thank_you_note, 10.0, MARGIN_LEFT, canvas.y, true);
    canvas.text_right(
        &format!("For {}", company.name),
        10.0,
        CONTENT_RIGHT,
        canvas.y,
        true,
    );
    canvas.y -= 5.0;
    canvas.text(&company.footer_note, 8.5, MARGIN_LEFT, canvas.y, false);

    // Room for a signature.
    canvas.y -= 16.0;
    canvas.rule(CONTENT_RIGHT - 45.0, CONTENT_RIGHT, canvas.y + 4.0, 0.3);
    canvas.text_right(&company.signatory_title, 9.0, CONTENT_RIGHT, canvas.y, false);
    canvas.y -= 5.0;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quote_core::{finalize, CompanyProfile, HeaderFields, ItemPatch, QuotationForm, UserIdentity};

    fn view(item_count: usize, terms: &str) -> QuotationView {
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let mut form = QuotationForm::new();
        form.client_name = "Meera Iyer".to_string();
        form.client_company = "Iyer Homes".to_string();
        form.client_address = "12 Lake Road\nWhitefield, Bengaluru".to_string();
        form.terms = terms.to_string();
        form.items.clear();
        for i in 0..item_count {
            form.add_item();
            form.update_item(
                i,
                &ItemPatch::new()
                    .description(format!("Modular unit {i} with soft-close hinges and laminate finish"))
                    .length("8")
                    .width("2.5")
                    .price_per_area("1450"),
            );
        }
        let owner = UserIdentity {
            id: "u1".to_string(),
            email: "u1@mabric.in".to_string(),
            full_name: None,
        };
        let mut header = HeaderFields::new(today);
        header.project_name = "Lake View".to_string();
        let record = finalize(&form, &header, None, &owner, today);
        QuotationView::build(&record, &CompanyProfile::default(), "Rs.")
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let bytes = PdfExporter::new().render(&view(3, "50% advance")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_short_quotation_fits_one_page() {
        let (_, pages) = layout(&view(2, "")).unwrap();
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_long_quotation_breaks_pages() {
        let (bytes, pages) = layout(&view(80, "Payment within 7 days.")).unwrap();
        assert!(pages > 1);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_quotation() {
        let (_, pages) = layout(&view(0, "")).unwrap();
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(
            wrap_text("false ceiling with cove lights", 14),
            vec!["false ceiling", "with cove", "lights"]
        );
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }
}
