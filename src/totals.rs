//! Derived totals and budget classification.
//!
//! Everything here is a pure function of the item list, the budget and the
//! [`QuantityPolicy`]. Nothing is rounded until [`format_currency`].

use serde::{Deserialize, Serialize};

use crate::model::LineItem;

/// Sales tax applied to the subtotal.
pub const TAX_RATE: f64 = 0.115;

/// Spend share (percent of budget) at which the list is flagged as close to the cap.
pub const APPROACHING_PERCENT: f64 = 75.0;

/// Spend share (percent of budget) at which the list is over the cap.
pub const OVER_PERCENT: f64 = 100.0;

/// Which rows contribute to the displayed unit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantityPolicy {
    /// Count a row's quantity only once it has a positive price.
    #[default]
    PricedOnly,
    /// Count every row's quantity, priced or not.
    AllRows,
}

impl QuantityPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PricedOnly => "priced-only",
            Self::AllRows => "all-rows",
        }
    }

    fn counts(self, item: &LineItem) -> bool {
        match self {
            Self::PricedOnly => item.price_value() > 0.0,
            Self::AllRows => true,
        }
    }
}

/// How the subtotal sits against the budget cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    Neutral,
    Approaching,
    Over,
}

impl BudgetStatus {
    /// Classify `subtotal` against `max_budget`. A cap of zero or less disables the check.
    #[must_use]
    pub fn classify(subtotal: f64, max_budget: f64) -> Self {
        if max_budget <= 0.0 {
            return Self::Neutral;
        }
        let percentage = subtotal / max_budget * 100.0;
        if percentage >= OVER_PERCENT {
            Self::Over
        } else if percentage >= APPROACHING_PERCENT {
            Self::Approaching
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Approaching => "approaching",
            Self::Over => "over",
        }
    }
}

/// Aggregates shown under the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_qty: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
    pub status: BudgetStatus,
}

/// Compute totals for `items` against `max_budget`.
#[must_use]
pub fn compute_totals(items: &[LineItem], max_budget: f64, policy: QuantityPolicy) -> Totals {
    let mut total_qty = 0.0;
    let mut subtotal = 0.0;

    for item in items {
        let qty = item.quantity_value();
        if policy.counts(item) {
            total_qty += qty;
        }
        subtotal += qty * item.price_value();
    }

    let tax = subtotal * TAX_RATE;
    Totals {
        total_qty,
        subtotal,
        tax,
        grand_total: subtotal + tax,
        status: BudgetStatus::classify(subtotal, max_budget),
    }
}

/// `$` and two decimals.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Quantities print without a trailing `.0` when whole.
#[must_use]
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 && qty.abs() < 1e15 {
        format!("{qty:.0}")
    } else {
        qty.to_string()
    }
}
