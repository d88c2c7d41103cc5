//! Wire types for the REST API, shared by the server and the HTTP client.
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/api/budget` | - | [`BudgetBody`] |
//! | PUT | `/api/budget` | [`BudgetBody`] | [`SuccessBody`] |
//! | GET | `/api/items` | - | [`ItemsBody`] of [`StoredItem`] |
//! | POST | `/api/items` | [`ItemBody`] | [`CreatedItem`] |
//! | PUT | `/api/items` | [`ItemsBody`] | [`SuccessBody`] |
//! | PUT | `/api/items/{id}` | [`ItemBody`] | [`SuccessBody`] |
//! | DELETE | `/api/items/{id}` | - | [`SuccessBody`] |
//!
//! Failures are status 500 with an [`ErrorBody`].
//!
//! [`StoredItem`]: crate::storage::StoredItem

use serde::{Deserialize, Serialize};

use crate::model::numeric::{lenient_f64, lenient_string};
use crate::model::{ItemId, LineItem, DEFAULT_QUANTITY};

pub const BUDGET_PATH: &str = "/api/budget";
pub const ITEMS_PATH: &str = "/api/items";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetBody {
    #[serde(rename = "maxBudget", default, deserialize_with = "lenient_f64")]
    pub max_budget: f64,
}

/// Quantity and price of one item, as sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBody {
    #[serde(default = "default_quantity", deserialize_with = "lenient_string")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
}

fn default_quantity() -> String {
    DEFAULT_QUANTITY.to_string()
}

impl From<&LineItem> for ItemBody {
    fn from(item: &LineItem) -> Self {
        Self {
            quantity: item.quantity.clone(),
            price: item.price.clone(),
        }
    }
}

impl From<ItemBody> for LineItem {
    fn from(body: ItemBody) -> Self {
        LineItem::new(body.quantity, body.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsBody<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub const OK: Self = Self { success: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
