//! Handler for the `pending` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{output, paths};
use crate::error::Result;
use crate::infrastructure::bootstrap::AppContext;
use crate::port::outbound::store::RedemptionStore;

#[derive(Tabled)]
struct PendingRow {
    #[tabled(rename = "Transaction")]
    tx_hash: String,
    #[tabled(rename = "Market")]
    title: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
}

/// List redemptions that have been submitted but not yet confirmed.
pub fn execute(ctx: &AppContext) -> Result<()> {
    let store = ctx.pending_store(paths::default_pending_store());
    let entries = store.load()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "pending",
            "path": store.path().display().to_string(),
            "pending": entries,
        }));
        return Ok(());
    }

    output::field("Pending file", store.path().display());
    if entries.is_empty() {
        output::note("No redemptions pending.");
        return Ok(());
    }

    let rows: Vec<PendingRow> = entries
        .iter()
        .map(|entry| PendingRow {
            tx_hash: entry.transaction_hash.to_string(),
            title: entry.position.title.clone(),
            value: format!("${}", entry.position.current_value.round_dp(2)),
            submitted: chrono::DateTime::<chrono::Utc>::from_timestamp_millis(entry.submitted_at_epoch_ms)
                .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        })
        .collect();

    output::section(&format!("{} pending", rows.len()));
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
