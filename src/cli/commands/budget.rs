//! Budget command implementations.

use colored::Colorize;
use serde::Serialize;

use super::{block_on, App};
use crate::cli::BudgetCommands;
use crate::error::Result;
use crate::model::parse_number;
use crate::totals::{format_currency, BudgetStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetOutput {
    max_budget: f64,
    status: BudgetStatus,
}

/// Execute budget commands.
pub fn execute(command: &BudgetCommands, app: &App, json: bool) -> Result<()> {
    block_on(async {
        let mut list = app.open_list().await?;

        if let BudgetCommands::Set { value } = command {
            list.set_budget(parse_number(value)).await;
        }

        let output = BudgetOutput {
            max_budget: list.max_budget(),
            status: list.totals().status,
        };

        if json {
            println!("{}", serde_json::to_string(&output)?);
        } else if output.max_budget > 0.0 {
            let amount = format_currency(output.max_budget);
            let amount = match output.status {
                BudgetStatus::Neutral => amount.green(),
                BudgetStatus::Approaching => amount.yellow(),
                BudgetStatus::Over => amount.red(),
            };
            println!("Budget: {amount}");
        } else {
            println!("Budget: {}", "not set".dimmed());
        }
        Ok(())
    })
}
