//! Migrate command implementation.

use super::{block_on, App};
use crate::error::Result;
use crate::migrate::migrate_legacy;
use crate::totals::format_currency;

/// Push legacy local data to the server at `--api-url`.
///
/// Unlike the automatic run at startup, failures are reported.
pub fn execute(app: &App, json: bool) -> Result<()> {
    block_on(async {
        let outcome = migrate_legacy(&app.local_files(), &app.remote()).await?;

        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else if outcome.migrated {
            print!("Migrated {} item(s) to {}", outcome.items, app.api_url);
            match outcome.max_budget {
                Some(budget) => println!(" with budget {}", format_currency(budget)),
                None => println!(),
            }
        } else {
            println!("Nothing to migrate");
        }
        Ok(())
    })
}
