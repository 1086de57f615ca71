//! Catalog item model for billing-frontend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Unit of measure, spelled exactly as the remote API stores it.
///
/// The set is closed: weight, count and volume units plus the packaging
/// units the shops bill in (sack, crate, bundle, tin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "pcs")]
    Piece,
    #[serde(rename = "liters")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "dozen")]
    Dozen,
    #[serde(rename = "बोरा")]
    Sack,
    #[serde(rename = "पेटी")]
    Crate,
    #[serde(rename = "बंडल")]
    Bundle,
    #[serde(rename = "टीना")]
    Tin,
}

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Kg,
        Unit::Gram,
        Unit::Piece,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Dozen,
        Unit::Sack,
        Unit::Crate,
        Unit::Bundle,
        Unit::Tin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Gram => "g",
            Unit::Piece => "pcs",
            Unit::Liter => "liters",
            Unit::Milliliter => "ml",
            Unit::Dozen => "dozen",
            Unit::Sack => "बोरा",
            Unit::Crate => "पेटी",
            Unit::Bundle => "बंडल",
            Unit::Tin => "टीना",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit: {0}")]
pub struct UnknownUnit(pub String);

/// A sellable item as the server stores it. The id is server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    pub unit: Unit,
}

/// Payload for `POST /items`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, message = "item name must not be empty"))]
    pub name: String,
    pub price: Decimal,
    pub mrp: Option<Decimal>,
    pub unit: Unit,
}

/// Partial payload for `PUT /items/{id}`. Omitted fields are left unchanged
/// server-side, so absent values must not serialize at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.mrp.is_none()
    }
}
