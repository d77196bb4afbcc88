//! Handler for the `execute` command.

use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ExecuteArgs;
use crate::adapter::inbound::cli::{output, preview};
use crate::domain::execution::ExecutionResult;
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap::AppContext;

#[derive(Tabled)]
struct FillRow {
    #[tabled(rename = "Order")]
    order_id: String,
    #[tabled(rename = "Price")]
    price: Decimal,
    #[tabled(rename = "Size")]
    size: Decimal,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Price")]
    price: Decimal,
    #[tabled(rename = "Size")]
    size: Decimal,
    #[tabled(rename = "Error")]
    error: String,
}

/// Execute the execute command.
pub async fn execute(args: &ExecuteArgs, ctx: &AppContext) -> Result<()> {
    let request = preview::build_request(&args.purchase, ctx.config())?;
    let executor = ctx.order_executor().await?;

    let (book, estimate) = executor.preview(&request).await?;
    preview::print_preview(&book, &request, &estimate);
    if !estimate.success {
        return Ok(());
    }

    match executor.collateral_balance().await {
        Ok(balance) => {
            output::field("Balance", format!("${}", balance.round_dp(2)));
            if balance < estimate.total_cost {
                output::warning("Balance is below the estimated cost, later levels may fail");
            }
        }
        Err(e) => output::warning(&format!("Could not read collateral balance: {e}")),
    }

    if !args.yes {
        if output::is_json() {
            return Err(ConfigError::InvalidValue {
                field: "yes",
                reason: "--json cannot prompt, pass --yes to execute".to_string(),
            }
            .into());
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Buy ~{} shares for ${}?",
                estimate.shares_filled.round_dp(2),
                estimate.total_cost.round_dp(2)
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Aborted.");
            return Ok(());
        }
    }

    let result = executor.execute(&request).await?;
    print_result(&result);
    Ok(())
}

fn print_result(result: &ExecutionResult) {
    if output::is_json() {
        output::json_output(json!({
            "command": "execute",
            "result": preview::result_json(result),
            "fills": result
                .fills
                .iter()
                .map(|f| json!({
                    "order_id": f.order_id.as_str(),
                    "price": f.price.to_string(),
                    "size": f.size.to_string(),
                }))
                .collect::<Vec<_>>(),
            "failures": result
                .failures
                .iter()
                .map(|f| json!({
                    "price": f.price.to_string(),
                    "size": f.size.to_string(),
                    "error": f.error,
                }))
                .collect::<Vec<_>>(),
        }));
        return;
    }

    if !result.fills.is_empty() {
        output::section("Orders placed");
        let rows: Vec<FillRow> = result
            .fills
            .iter()
            .map(|f| FillRow {
                order_id: f.order_id.to_string(),
                price: f.price,
                size: f.size,
            })
            .collect();
        output::lines(&Table::new(rows).to_string());
    }

    if !result.failures.is_empty() {
        output::section("Failed levels");
        let rows: Vec<FailureRow> = result
            .failures
            .iter()
            .map(|f| FailureRow {
                price: f.price,
                size: f.size,
                error: f.error.clone(),
            })
            .collect();
        output::lines(&Table::new(rows).to_string());
    }

    preview::print_totals(result);
    if result.success && result.is_partial() {
        output::warning("Some levels failed; the purchase is partial.");
    } else if result.success {
        output::success("Purchase complete.");
    }
}
