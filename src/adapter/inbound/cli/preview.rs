//! Handler for the `preview` command.

use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::PurchaseArgs;
use crate::adapter::inbound::cli::output;
use crate::application::execution::OrderBookExecutor;
use crate::domain::book::Book;
use crate::domain::execution::{ExecutionRequest, ExecutionResult};
use crate::domain::id::TokenId;
use crate::error::{ExecutionError, Result};
use crate::infrastructure::bootstrap::AppContext;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Price")]
    price: Decimal,
    #[tabled(rename = "Size")]
    size: Decimal,
    #[tabled(rename = "Notional")]
    notional: Decimal,
}

/// Build a validated request from command arguments.
pub(super) fn build_request(args: &PurchaseArgs, config: &Config) -> Result<ExecutionRequest> {
    let days = args.days.unwrap_or(config.execution.default_days_to_expiry);
    let request = ExecutionRequest::try_new(
        TokenId::new(args.token_id.as_str()),
        args.max_price,
        args.budget,
    )?
    .with_days_to_expiry(days);
    Ok(request)
}

/// Execute the preview command.
pub async fn execute(args: &PurchaseArgs, ctx: &AppContext) -> Result<()> {
    let request = build_request(args, ctx.config())?;
    let book = ctx
        .market_data()
        .order_book(request.token_id())
        .await?
        .ok_or_else(|| ExecutionError::BookUnavailable {
            token_id: args.token_id.clone(),
        })?;

    let result = OrderBookExecutor::simulate(&book, &request);
    print_preview(&book, &request, &result);
    Ok(())
}

/// Print the ask levels under the cap and the simulated totals.
pub(super) fn print_preview(book: &Book, request: &ExecutionRequest, result: &ExecutionResult) {
    if output::is_json() {
        output::json_output(json!({
            "command": "preview",
            "token_id": request.token_id().as_str(),
            "max_price": request.max_price().to_string(),
            "max_budget": request.max_budget().map(|b| b.to_string()),
            "levels": book
                .asks_up_to(request.max_price())
                .map(|l| json!({ "price": l.price().to_string(), "size": l.size().to_string() }))
                .collect::<Vec<_>>(),
            "result": result_json(result),
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Token", request.token_id());
    output::field("Max price", request.max_price());
    match request.max_budget() {
        Some(budget) => output::field("Budget", format!("${budget}")),
        None => output::field("Budget", output::muted("unlimited")),
    }

    output::section("Asks under cap");
    let rows: Vec<LevelRow> = book
        .asks_up_to(request.max_price())
        .map(|level| LevelRow {
            price: level.price(),
            size: level.size(),
            notional: level.notional(),
        })
        .collect();
    if rows.is_empty() {
        output::note("No asks at or below the price cap.");
    } else {
        output::lines(&Table::new(rows).to_string());
    }

    print_totals(result);
}

pub(super) fn print_totals(result: &ExecutionResult) {
    output::section("Result");
    output::field("Shares", result.shares_filled.round_dp(4));
    output::field("Cost", format!("${}", result.total_cost.round_dp(4)));
    output::field("Avg price", result.avg_price.round_dp(4));
    output::field("Profit", output::positive(format!("${}", result.profit.round_dp(4))));
    output::field("APY", format!("{}%", result.apy.round_dp(2)));
    if !result.success {
        output::warning("Nothing would be filled under this cap and budget.");
    }
}

pub(super) fn result_json(result: &ExecutionResult) -> serde_json::Value {
    json!({
        "shares_filled": result.shares_filled.to_string(),
        "total_cost": result.total_cost.to_string(),
        "avg_price": result.avg_price.to_string(),
        "apy": result.apy.to_string(),
        "profit": result.profit.to_string(),
        "success": result.success,
    })
}
