pub mod bill;
pub mod item;

pub use bill::{DraftBill, Invoice, LineItem};
pub use item::{CatalogItem, ItemUpdate, NewItem, Unit};
