//! Handler for the `balance` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::AppContext;

/// Print the USDC collateral the CLOB account can trade with.
pub async fn execute(ctx: &AppContext) -> Result<()> {
    let executor = ctx.order_executor().await?;
    let balance = executor.collateral_balance().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "balance",
            "balance": balance.to_string(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Collateral", format!("${}", balance.round_dp(2)));
    Ok(())
}
