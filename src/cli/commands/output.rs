//! Shared list and totals printing.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::error::Result;
use crate::list::ShoppingList;
use crate::model::ItemId;
use crate::persistence::Persistence;
use crate::totals::{format_currency, format_quantity, BudgetStatus, Totals, TAX_RATE};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RowOutput<'a> {
    number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ItemId>,
    quantity: &'a str,
    price: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    backend: &'static str,
    max_budget: f64,
    items: Vec<RowOutput<'a>>,
    totals: Totals,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsOutput {
    max_budget: f64,
    #[serde(flatten)]
    totals: Totals,
}

/// Print every row followed by the totals block.
pub fn print_list<P: Persistence>(list: &ShoppingList<P>, json: bool) -> Result<()> {
    if json {
        let output = ListOutput {
            backend: list.store().backend().as_str(),
            max_budget: list.max_budget(),
            items: list
                .items()
                .iter()
                .enumerate()
                .map(|(i, item)| RowOutput {
                    number: i + 1,
                    id: item.id,
                    quantity: &item.quantity,
                    price: &item.price,
                })
                .collect(),
            totals: list.totals(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if list.is_empty() {
        println!("{}", "Start adding items to your shopping list".dimmed());
    } else {
        println!(
            "{}",
            format!("{:>3}  {:>8}  {:>10}  {:>10}", "#", "Qty", "Price", "Line").bold()
        );
        for (i, item) in list.items().iter().enumerate() {
            let (price, line) = if item.price.is_empty() {
                (format!("{:>10}", "-").dimmed(), format!("{:>10}", "").normal())
            } else {
                let line = item.quantity_value() * item.price_value();
                (
                    format!("{:>10}", format_currency(item.price_value())).normal(),
                    format!("{:>10}", format_currency(line)).normal(),
                )
            };
            println!(
                "{:>3}  {:>8}  {price}  {line}",
                i + 1,
                item.quantity
            );
        }
    }

    println!();
    print_totals_text(&list.totals(), list.max_budget());
    Ok(())
}

/// Print only the totals block.
pub fn print_totals<P: Persistence>(list: &ShoppingList<P>, json: bool) -> Result<()> {
    if json {
        let output = TotalsOutput {
            max_budget: list.max_budget(),
            totals: list.totals(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    print_totals_text(&list.totals(), list.max_budget());
    Ok(())
}

fn print_totals_text(totals: &Totals, max_budget: f64) {
    println!("Items:      {}", format_quantity(totals.total_qty));
    println!(
        "Subtotal:   {}",
        highlight(format_currency(totals.subtotal), totals.status)
    );
    println!(
        "Tax {:.1}%:  {}",
        TAX_RATE * 100.0,
        format_currency(totals.tax)
    );
    println!(
        "Total:      {}",
        highlight(format_currency(totals.grand_total), totals.status).bold()
    );
    println!("Budget:     {}", budget_line(max_budget, totals));
}

fn budget_line(max_budget: f64, totals: &Totals) -> String {
    if max_budget <= 0.0 {
        return "not set".dimmed().to_string();
    }
    let used = totals.subtotal / max_budget * 100.0;
    let line = format!("{} ({used:.0}% used)", format_currency(max_budget));
    highlight(line, totals.status).to_string()
}

fn highlight(text: String, status: BudgetStatus) -> ColoredString {
    match status {
        BudgetStatus::Neutral => text.normal(),
        BudgetStatus::Approaching => text.yellow(),
        BudgetStatus::Over => text.red(),
    }
}
