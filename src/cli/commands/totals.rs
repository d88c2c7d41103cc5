//! Totals command implementation.

use super::output::print_totals;
use super::{block_on, App};
use crate::error::Result;

/// Print totals and budget status for the current list.
pub fn execute(app: &App, json: bool) -> Result<()> {
    block_on(async {
        let list = app.open_list().await?;
        print_totals(&list, json)
    })
}
