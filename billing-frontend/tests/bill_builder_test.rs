//! Draft bill assembly tests.

use billing_frontend::models::{CatalogItem, Unit};
use billing_frontend::services::bill::{
    BillBuilder, BillError, DRAFT_CUSTOMER_KEY, DRAFT_ITEMS_KEY,
};
use billing_frontend::services::draft_store::{KeyValueStore, MemoryStore};
use billing_frontend::services::invoices::invoice_payload;
use rust_decimal::Decimal;
use std::sync::Arc;

fn item(id: &str, name: &str, price: &str, mrp: Option<&str>, unit: Unit) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        price: price.parse().expect("price decimal"),
        mrp: mrp.map(|m| m.parse().expect("mrp decimal")),
        unit,
    }
}

fn dec(raw: &str) -> Decimal {
    raw.parse().expect("decimal")
}

#[test]
fn total_tracks_adds_and_removes() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);

    bill.select_item(item("1", "Rice", "52.5", None, Unit::Kg));
    bill.add_line_item(dec("2"), None).expect("first add");
    bill.select_item(item("2", "Oil", "120", None, Unit::Liter));
    bill.add_line_item(dec("1"), None).expect("second add");
    bill.select_item(item("3", "Sugar", "40", None, Unit::Kg));
    bill.add_line_item(dec("3"), None).expect("third add");

    assert_eq!(bill.total_amount(), dec("345"));

    bill.remove_line_item(1).expect("remove middle line");
    assert_eq!(bill.total_amount(), dec("225"));
    assert_eq!(bill.draft().lines.len(), 2);
    // order preserved for the survivors
    assert_eq!(bill.draft().lines[0].name, "Rice");
    assert_eq!(bill.draft().lines[1].name, "Sugar");

    bill.remove_line_item(0).expect("remove first line");
    bill.remove_line_item(0).expect("remove last line");
    assert_eq!(bill.total_amount(), Decimal::ZERO);
}

#[test]
fn add_without_selection_is_rejected_and_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store.clone());

    let err = bill.add_line_item(dec("2"), None).expect_err("no selection");
    assert_eq!(err, BillError::NoItemSelected);
    assert!(bill.draft().lines.is_empty());
    assert!(store.get(DRAFT_ITEMS_KEY).is_none());
}

#[test]
fn non_positive_quantity_is_rejected_and_keeps_the_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store.clone());
    bill.select_item(item("1", "Rice", "52.5", None, Unit::Kg));

    for raw in ["0", "-1"] {
        let err = bill
            .add_line_item(dec(raw), None)
            .expect_err("invalid quantity");
        assert_eq!(err, BillError::InvalidQuantity);
    }
    assert!(bill.selection().is_some());
    assert!(bill.draft().lines.is_empty());
    assert!(store.get(DRAFT_ITEMS_KEY).is_none());
}

#[test]
fn override_price_marks_the_line_special() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);
    bill.select_item(item("1", "Oil", "5", None, Unit::Liter));

    let line = bill
        .add_line_item(dec("3"), Some(dec("4")))
        .expect("add with override");
    assert!(line.is_special_price);
    assert_eq!(line.price, dec("4"));
    assert_eq!(line.total, dec("12"));
}

#[test]
fn catalog_price_is_used_without_an_override() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);
    bill.select_item(item("1", "Rice", "10", None, Unit::Kg));

    let line = bill.add_line_item(dec("2"), None).expect("add");
    assert!(!line.is_special_price);
    assert_eq!(line.price, dec("10"));
    assert_eq!(line.total, dec("20"));
}

#[test]
fn adding_clears_the_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);
    bill.select_item(item("1", "Rice", "10", None, Unit::Kg));
    bill.add_line_item(dec("1"), None).expect("add");
    assert!(bill.selection().is_none());
}

#[test]
fn draft_round_trips_through_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store.clone());
    bill.set_customer_name("Ravi");
    bill.select_item(item("1", "Rice", "52.5", Some("60"), Unit::Kg));
    bill.add_line_item(dec("2"), None).expect("add rice");
    bill.select_item(item("2", "Oil", "120", None, Unit::Liter));
    bill.add_line_item(dec("1"), Some(dec("110"))).expect("add oil");
    bill.select_item(item("3", "Eggs", "80", None, Unit::Dozen));
    bill.add_line_item(dec("0.5"), None).expect("add eggs");

    let reloaded = BillBuilder::restore(store);
    assert_eq!(reloaded.draft(), bill.draft());
    assert_eq!(reloaded.draft().customer_name, "Ravi");
    assert_eq!(reloaded.draft().lines.len(), 3);
}

#[test]
fn clear_empties_memory_and_store() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store.clone());
    bill.set_customer_name("Ravi");
    bill.select_item(item("1", "Rice", "10", None, Unit::Kg));
    bill.add_line_item(dec("2"), None).expect("add");

    bill.clear();
    assert!(bill.draft().lines.is_empty());
    assert!(bill.draft().customer_name.is_empty());
    assert!(store.get(DRAFT_ITEMS_KEY).is_none());
    assert!(store.get(DRAFT_CUSTOMER_KEY).is_none());

    let fresh = BillBuilder::restore(store);
    assert!(fresh.draft().lines.is_empty());
    assert!(fresh.draft().customer_name.is_empty());
}

#[test]
fn corrupt_persisted_lines_load_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(DRAFT_ITEMS_KEY, "not json at all")
        .expect("seed garbage");
    store.set(DRAFT_CUSTOMER_KEY, "Ravi").expect("seed name");

    let bill = BillBuilder::restore(store);
    assert!(bill.draft().lines.is_empty());
    // the readable record still loads
    assert_eq!(bill.draft().customer_name, "Ravi");
}

#[test]
fn submission_requires_a_customer_name() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);
    bill.set_customer_name("   ");
    assert_eq!(
        bill.submission().expect_err("blank name"),
        BillError::MissingCustomerName
    );

    bill.set_customer_name("  Ravi ");
    let (name, _) = bill.submission().expect("trimmed name accepted");
    assert_eq!(name, "Ravi");
}

#[test]
fn end_to_end_totals_and_submission_payload() {
    let store = Arc::new(MemoryStore::new());
    let mut bill = BillBuilder::restore(store);
    bill.set_customer_name("Ravi");

    bill.select_item(item("a", "Item A", "10", None, Unit::Piece));
    bill.add_line_item(dec("2"), None).expect("add A");
    bill.select_item(item("b", "Item B", "5", None, Unit::Kg));
    bill.add_line_item(dec("3"), Some(dec("4"))).expect("add B");

    assert_eq!(bill.draft().lines[0].total, dec("20"));
    assert_eq!(bill.draft().lines[1].total, dec("12"));
    assert!(bill.draft().lines[1].is_special_price);
    assert_eq!(bill.total_amount(), dec("32"));

    let (name, lines) = bill.submission().expect("submittable");
    let payload = invoice_payload(&name, lines);
    assert_eq!(payload["customerName"], "Ravi");
    let items = payload["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Item A");
    assert_eq!(items[1]["isSpecialPrice"], true);
}
