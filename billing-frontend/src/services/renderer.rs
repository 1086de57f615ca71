//! Bill document rendering.
//!
//! A pure layout step turns a bill into rows of formatted cells; the PDF and
//! print backends draw those rows without making further decisions, so
//! identical inputs always produce identical documents.

use crate::models::{DraftBill, Invoice, LineItem};
use billing_core::error::AppError;
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Rgb};
use rust_decimal::Decimal;

/// Everything the renderer needs, detached from whether the bill is still a
/// draft or already persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDocument {
    pub customer_name: String,
    pub date: DateTime<Utc>,
    pub lines: Vec<LineItem>,
}

impl BillDocument {
    pub fn from_draft(draft: &DraftBill, date: DateTime<Utc>) -> Self {
        Self {
            customer_name: draft.customer_name.clone(),
            date,
            lines: draft.lines.clone(),
        }
    }

    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            customer_name: invoice.customer_name.clone(),
            date: invoice.created_at,
            lines: invoice.items.clone(),
        }
    }

    /// Never stored; always the sum of the line totals.
    pub fn grand_total(&self) -> Decimal {
        self.lines.iter().map(|line| line.total).sum()
    }
}

/// One rendered table row, all cells formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub serial: String,
    pub name: String,
    pub mrp: String,
    pub quantity: String,
    pub price: String,
    pub total: String,
}

pub const COLUMNS: [&str; 6] = ["S.No", "Item Name", "MRP", "Quantity", "Price/Unit", "Total"];

/// The deterministic tabular form of a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub customer_name: String,
    pub date: String,
    pub columns: [&'static str; 6],
    pub rows: Vec<TableRow>,
    pub grand_total: String,
}

pub fn format_money(value: Decimal) -> String {
    format!("₹{}", value)
}

/// Totals display with exactly two decimal places.
pub fn format_total(value: Decimal) -> String {
    format!("₹{:.2}", value.round_dp(2))
}

/// Pure layout: same document in, same layout out.
pub fn layout(document: &BillDocument) -> DocumentLayout {
    let rows = document
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| TableRow {
            serial: (index + 1).to_string(),
            name: line.name.clone(),
            mrp: line
                .mrp
                .map(format_money)
                .unwrap_or_else(|| "-".to_string()),
            quantity: format!("{} {}", line.quantity, line.unit),
            price: if line.is_special_price {
                format!("{} (Special)", format_money(line.price))
            } else {
                format_money(line.price)
            },
            total: format_total(line.total),
        })
        .collect();

    DocumentLayout {
        title: "Invoice".to_string(),
        customer_name: document.customer_name.clone(),
        date: document.date.format("%d/%m/%Y").to_string(),
        columns: COLUMNS,
        rows,
        grand_total: format_total(document.grand_total()),
    }
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 15.0;
const MARGIN_RIGHT_MM: f32 = 195.0;
// x positions of the six table columns.
const COLUMN_X_MM: [f32; 6] = [15.0, 30.0, 95.0, 120.0, 148.0, 178.0];
const ROW_STEP_MM: f32 = 7.0;

/// Draws the layout on a single fixed A4 page and returns the PDF bytes.
/// Long bills run off the bottom, the same as the print layout.
pub fn render_pdf(document: &BillDocument) -> Result<Vec<u8>, AppError> {
    let layout = layout(document);

    let (pdf, page, layer_index) =
        PdfDocument::new("Invoice", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = pdf.get_page(page).get_layer(layer_index);

    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::RenderError(e.to_string()))?;
    let font_bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::RenderError(e.to_string()))?;

    let mut y = 280.0;
    layer.use_text(layout.title.as_str(), 20.0, Mm(MARGIN_LEFT_MM), Mm(y), &font_bold);
    layer.use_text(
        format!("Customer: {}", layout.customer_name),
        10.0,
        Mm(60.0),
        Mm(y),
        &font,
    );
    layer.use_text(
        format!("Date: {}", layout.date),
        10.0,
        Mm(160.0),
        Mm(y),
        &font,
    );

    y -= 14.0;
    for (column, x) in layout.columns.iter().zip(COLUMN_X_MM) {
        layer.use_text(*column, 10.0, Mm(x), Mm(y), &font_bold);
    }

    y -= 2.0;
    layer.set_outline_color(Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None)));
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT_MM), Mm(y)), false),
            (Point::new(Mm(MARGIN_RIGHT_MM), Mm(y)), false),
        ],
        is_closed: false,
    });

    for row in &layout.rows {
        y -= ROW_STEP_MM;
        let cells = [
            row.serial.as_str(),
            row.name.as_str(),
            row.mrp.as_str(),
            row.quantity.as_str(),
            row.price.as_str(),
            row.total.as_str(),
        ];
        for (cell, x) in cells.iter().zip(COLUMN_X_MM) {
            layer.use_text(*cell, 10.0, Mm(x), Mm(y), &font);
        }
    }

    y -= 5.0;
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT_MM), Mm(y)), false),
            (Point::new(Mm(MARGIN_RIGHT_MM), Mm(y)), false),
        ],
        is_closed: false,
    });

    y -= 8.0;
    layer.use_text("Total Amount:", 11.0, Mm(130.0), Mm(y), &font);
    layer.use_text(
        layout.grand_total.as_str(),
        13.0,
        Mm(COLUMN_X_MM[5]),
        Mm(y),
        &font_bold,
    );

    layer.use_text(
        "Thank you for your business!",
        9.0,
        Mm(80.0),
        Mm(12.0),
        &font,
    );

    pdf.save_to_bytes()
        .map_err(|e| AppError::RenderError(e.to_string()))
}

/// Download name derived from the invoice identity; a generic name for an
/// unsaved draft.
pub fn export_file_name(invoice_id: Option<&str>) -> String {
    match invoice_id {
        Some(id) => format!("invoice-{}.pdf", id),
        None => "invoice.pdf".to_string(),
    }
}
