//! Item command implementations.

use tracing::info;

use super::output::print_list;
use super::{block_on, row_error, row_index, App};
use crate::cli::ItemCommands;
use crate::error::{Error, Result};
use crate::list::ShoppingList;
use crate::model::ItemField;
use crate::persistence::Persistence;

/// Execute item commands.
///
/// Every command prints the resulting list.
pub fn execute(command: &ItemCommands, app: &App, json: bool) -> Result<()> {
    block_on(async {
        let mut list = app.open_list().await?;
        apply(command, &mut list).await.map_err(row_error)?;
        print_list(&list, json)
    })
}

async fn apply<P: Persistence>(command: &ItemCommands, list: &mut ShoppingList<P>) -> Result<()> {
    match command {
        ItemCommands::List => Ok(()),
        ItemCommands::Add { quantity, price } => {
            add(list, quantity.as_deref(), price.as_deref()).await
        }
        ItemCommands::Set {
            index,
            quantity,
            price,
        } => set(list, *index, quantity.as_deref(), price.as_deref()).await,
        ItemCommands::Delete { index } => {
            let removed = list.delete_at(row_index(*index)?).await?;
            info!(id = ?removed.id, "row deleted");
            list.ensure_trailing_blank().await;
            Ok(())
        }
        ItemCommands::Commit => {
            list.commit_row().await;
            Ok(())
        }
        ItemCommands::Sort => {
            list.reorder_by_completeness().await;
            list.ensure_trailing_blank().await;
            Ok(())
        }
        ItemCommands::Clear { yes } => {
            if !yes {
                return Err(Error::InvalidArgument(
                    "clearing deletes every row; pass --yes to confirm".into(),
                ));
            }
            list.clear_all().await;
            Ok(())
        }
    }
}

/// Fill the open entry row, then commit it.
async fn add<P: Persistence>(
    list: &mut ShoppingList<P>,
    quantity: Option<&str>,
    price: Option<&str>,
) -> Result<()> {
    list.ensure_trailing_blank().await;
    let index = list.len().saturating_sub(1);
    write_fields(list, index, quantity, price).await?;
    list.commit_row().await;
    Ok(())
}

async fn set<P: Persistence>(
    list: &mut ShoppingList<P>,
    number: usize,
    quantity: Option<&str>,
    price: Option<&str>,
) -> Result<()> {
    if quantity.is_none() && price.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change: pass --quantity and/or --price".into(),
        ));
    }
    write_fields(list, row_index(number)?, quantity, price).await?;
    list.commit_row().await;
    Ok(())
}

async fn write_fields<P: Persistence>(
    list: &mut ShoppingList<P>,
    index: usize,
    quantity: Option<&str>,
    price: Option<&str>,
) -> Result<()> {
    if let Some(quantity) = quantity {
        list.update_field(index, ItemField::Quantity, quantity).await?;
    }
    if let Some(price) = price {
        list.update_field(index, ItemField::Price, price).await?;
    }
    Ok(())
}
