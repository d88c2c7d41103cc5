//! Line item model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::numeric::{lenient_string, parse_number};
use crate::error::Error;

/// Durable identifier assigned by a backing store.
pub type ItemId = i64;

/// Quantity given to every freshly added row.
pub const DEFAULT_QUANTITY: &str = "1";

/// One row of the shopping list.
///
/// Quantity and price hold whatever was typed; use [`LineItem::quantity_value`]
/// and [`LineItem::price_value`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Present only once a store has persisted the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
}

impl LineItem {
    /// Create an unpersisted item.
    pub fn new(quantity: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: None,
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    /// The open entry row: quantity 1, no price.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(DEFAULT_QUANTITY, "")
    }

    /// Attach a durable id.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn quantity_value(&self) -> f64 {
        parse_number(&self.quantity)
    }

    #[must_use]
    pub fn price_value(&self) -> f64 {
        parse_number(&self.price)
    }

    /// Both fields have been filled in (non-empty, not necessarily numeric).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.quantity.is_empty() && !self.price.is_empty()
    }

    #[must_use]
    pub fn has_positive_price(&self) -> bool {
        self.price_value() > 0.0
    }

    /// Same quantity and price, ignoring ids.
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        self.quantity == other.quantity && self.price == other.price
    }

    /// Set one editable field.
    pub fn set(&mut self, field: ItemField, value: impl Into<String>) {
        match field {
            ItemField::Quantity => self.quantity = value.into(),
            ItemField::Price => self.price = value.into(),
        }
    }
}

/// Editable columns of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Quantity,
    Price,
}

impl ItemField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::Price => "price",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantity" | "qty" => Ok(Self::Quantity),
            "price" => Ok(Self::Price),
            other => Err(Error::InvalidArgument(format!(
                "unknown field '{other}' (expected quantity or price)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_row() {
        let item = LineItem::blank();
        assert_eq!(item.quantity, "1");
        assert_eq!(item.price, "");
        assert!(item.id.is_none());
        assert!(!item.is_complete());
    }

    #[test]
    fn test_set_and_complete() {
        let mut item = LineItem::blank();
        item.set(ItemField::Price, "2.49");
        assert!(item.is_complete());
        assert!(item.has_positive_price());
        item.set(ItemField::Quantity, "");
        assert!(!item.is_complete());
    }

    #[test]
    fn test_wire_format() {
        let item: LineItem =
            serde_json::from_str(r#"{"id": 7, "quantity": 2, "price": "1.50", "position": 0}"#)
                .unwrap();
        assert_eq!(item, LineItem::new("2", "1.50").with_id(7));

        let json = serde_json::to_value(LineItem::new("1", "")).unwrap();
        assert_eq!(json, serde_json::json!({"quantity": "1", "price": ""}));
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("Qty".parse::<ItemField>().unwrap(), ItemField::Quantity);
        assert_eq!("price".parse::<ItemField>().unwrap(), ItemField::Price);
        assert!("name".parse::<ItemField>().is_err());
    }
}
