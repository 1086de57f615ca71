//! Document renderer tests.

use billing_frontend::models::{CatalogItem, DraftBill, Invoice, LineItem, Unit};
use billing_frontend::services::renderer::{
    export_file_name, format_total, layout, render_pdf, BillDocument, COLUMNS,
};
use chrono::{TimeZone, Utc};

fn catalog_item(name: &str, price: &str, mrp: Option<&str>, unit: Unit) -> CatalogItem {
    CatalogItem {
        id: name.to_lowercase(),
        name: name.to_string(),
        price: price.parse().expect("decimal"),
        mrp: mrp.map(|m| m.parse().expect("decimal")),
        unit,
    }
}

fn sample_document() -> BillDocument {
    let rice = catalog_item("Item A", "10", Some("12"), Unit::Kg);
    let oil = catalog_item("Item B", "5", None, Unit::Liter);
    let draft = DraftBill {
        customer_name: "Ravi".to_string(),
        lines: vec![
            LineItem::snapshot(&rice, "2".parse().expect("decimal"), None),
            LineItem::snapshot(
                &oil,
                "3".parse().expect("decimal"),
                Some("4".parse().expect("decimal")),
            ),
        ],
    };
    let date = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single().expect("date");
    BillDocument::from_draft(&draft, date)
}

#[test]
fn layout_is_deterministic() {
    let document = sample_document();
    assert_eq!(layout(&document), layout(&document));
}

#[test]
fn layout_renders_the_expected_cells() {
    let rendered = layout(&sample_document());

    assert_eq!(rendered.columns, COLUMNS);
    assert_eq!(rendered.customer_name, "Ravi");
    assert_eq!(rendered.date, "14/03/2025");
    assert_eq!(rendered.rows.len(), 2);

    let first = &rendered.rows[0];
    assert_eq!(first.serial, "1");
    assert_eq!(first.name, "Item A");
    assert_eq!(first.mrp, "₹12");
    assert_eq!(first.quantity, "2 kg");
    assert_eq!(first.price, "₹10");
    assert_eq!(first.total, "₹20.00");

    let second = &rendered.rows[1];
    assert_eq!(second.serial, "2");
    assert_eq!(second.mrp, "-");
    assert_eq!(second.quantity, "3 liters");
    assert_eq!(second.price, "₹4 (Special)");
    assert_eq!(second.total, "₹12.00");

    assert_eq!(rendered.grand_total, "₹32.00");
}

#[test]
fn grand_total_is_recomputed_from_line_totals() {
    let document = sample_document();
    assert_eq!(document.grand_total(), "32".parse().expect("decimal"));
    assert_eq!(format_total(document.grand_total()), "₹32.00");
}

#[test]
fn invoice_documents_use_the_creation_timestamp() {
    let created = Utc.with_ymd_and_hms(2024, 12, 1, 18, 5, 0).single().expect("date");
    let invoice = Invoice {
        id: "inv-9".to_string(),
        customer_name: "Meena".to_string(),
        items: sample_document().lines,
        created_at: created,
    };
    let document = BillDocument::from_invoice(&invoice);
    assert_eq!(document.date, created);
    assert_eq!(layout(&document).date, "01/12/2024");
}

#[test]
fn pdf_export_produces_a_pdf_byte_stream() {
    let bytes = render_pdf(&sample_document()).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn pdf_export_handles_an_empty_draft() {
    let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("date");
    let document = BillDocument::from_draft(&DraftBill::default(), date);
    let bytes = render_pdf(&document).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn export_names_derive_from_invoice_identity() {
    assert_eq!(export_file_name(Some("abc123")), "invoice-abc123.pdf");
    assert_eq!(export_file_name(None), "invoice.pdf");
}
