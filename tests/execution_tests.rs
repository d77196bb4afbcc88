//! Integration tests for ladder previews and executions.

use std::sync::Arc;

use bracketeer::application::execution::OrderBookExecutor;
use bracketeer::domain::execution::ExecutionRequest;
use bracketeer::error::{Error, ExecutionError};
use bracketeer::port::outbound::exchange::OrderSide;
use bracketeer::testkit::domain::{ask_ladder, token};
use bracketeer::testkit::exchange::{RecordingVenue, ScriptedMarketData};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn request(max_price: Decimal, budget: Option<Decimal>) -> ExecutionRequest {
    ExecutionRequest::try_new(token("no"), max_price, budget).unwrap()
}

fn two_level_market() -> ScriptedMarketData {
    ScriptedMarketData::new().with_book(ask_ladder(
        "no",
        &[(dec!(0.40), dec!(10)), (dec!(0.45), dec!(20))],
    ))
}

fn executor(
    market: ScriptedMarketData,
    venue: RecordingVenue,
) -> (OrderBookExecutor, Arc<ScriptedMarketData>, Arc<RecordingVenue>) {
    let market = Arc::new(market);
    let venue = Arc::new(venue);
    (
        OrderBookExecutor::new(market.clone(), venue.clone()),
        market,
        venue,
    )
}

#[tokio::test]
async fn preview_walks_fetched_book() {
    let (executor, market, venue) = executor(two_level_market(), RecordingVenue::new(dec!(1)));

    let (book, result) = executor
        .preview(&request(dec!(0.50), Some(dec!(10))))
        .await
        .unwrap();

    assert_eq!(book.asks().len(), 2);
    assert_eq!(result.total_cost, dec!(10));
    assert!((result.shares_filled - dec!(23.3333)).abs() < dec!(0.0001));
    assert!(result.success);
    assert_eq!(market.fetch_count(), 1);
    assert!(venue.orders().is_empty());
}

#[tokio::test]
async fn execute_places_whole_share_orders_within_budget() {
    let (executor, _, venue) = executor(two_level_market(), RecordingVenue::new(dec!(1)));

    let result = executor
        .execute(&request(dec!(0.50), Some(dec!(10))))
        .await
        .unwrap();

    let orders = venue.orders();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.side == OrderSide::Buy));
    assert_eq!((orders[0].price, orders[0].size), (dec!(0.4), dec!(10)));
    assert_eq!((orders[1].price, orders[1].size), (dec!(0.45), dec!(13)));

    assert_eq!(result.shares_filled, dec!(23));
    assert_eq!(result.total_cost, dec!(9.85));
    assert!(result.total_cost <= dec!(10));
    assert_eq!(result.fills.len(), 2);
    assert!(result.failures.is_empty());
    assert!(result.success);
}

#[tokio::test]
async fn execute_stops_when_budget_cannot_buy_a_whole_share() {
    let (executor, _, venue) = executor(two_level_market(), RecordingVenue::new(dec!(1)));

    let result = executor
        .execute(&request(dec!(0.50), Some(dec!(4.30))))
        .await
        .unwrap();

    let orders = venue.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!((orders[0].price, orders[0].size), (dec!(0.4), dec!(10)));
    assert_eq!(result.shares_filled, dec!(10));
    assert_eq!(result.total_cost, dec!(4));
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn collateral_balance_comes_from_the_venue() {
    let venue = RecordingVenue::new(dec!(1)).with_balance(dec!(250.5));
    let (executor, market, _) = executor(two_level_market(), venue);

    assert_eq!(executor.collateral_balance().await.unwrap(), dec!(250.5));
    assert_eq!(market.fetch_count(), 0);
}

#[tokio::test]
async fn execute_without_budget_takes_every_level_under_cap() {
    let market = ScriptedMarketData::new().with_book(ask_ladder(
        "no",
        &[
            (dec!(0.40), dec!(10)),
            (dec!(0.45), dec!(20)),
            (dec!(0.60), dec!(100)),
        ],
    ));
    let (executor, _, venue) = executor(market, RecordingVenue::new(dec!(1)));

    let result = executor.execute(&request(dec!(0.50), None)).await.unwrap();

    assert_eq!(venue.orders().len(), 2);
    assert_eq!(result.shares_filled, dec!(30));
    assert_eq!(result.total_cost, dec!(13));
}

#[tokio::test]
async fn levels_below_min_order_value_are_skipped() {
    let (executor, _, venue) = executor(two_level_market(), RecordingVenue::new(dec!(5)));

    let result = executor.execute(&request(dec!(0.50), None)).await.unwrap();

    let orders = venue.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].price, dec!(0.45));
    assert_eq!(result.shares_filled, dec!(20));
}

#[tokio::test]
async fn rejected_level_yields_partial_fill() {
    let venue = RecordingVenue::new(dec!(1)).rejecting_price(dec!(0.40));
    let (executor, _, venue) = executor(two_level_market(), venue);

    let result = executor.execute(&request(dec!(0.50), None)).await.unwrap();

    assert_eq!(venue.orders().len(), 2);
    assert_eq!(result.fills.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].price, dec!(0.4));
    assert_eq!(result.shares_filled, dec!(20));
    assert!(result.success);
    assert!(result.is_partial());
}

#[tokio::test]
async fn all_levels_rejected_is_not_success() {
    let venue = RecordingVenue::new(dec!(1))
        .rejecting_price(dec!(0.40))
        .rejecting_price(dec!(0.45));
    let (executor, _, _) = executor(two_level_market(), venue);

    let result = executor.execute(&request(dec!(0.50), None)).await.unwrap();

    assert_eq!(result.shares_filled, dec!(0));
    assert_eq!(result.failures.len(), 2);
    assert!(!result.success);
}

#[tokio::test]
async fn missing_book_is_an_error() {
    let (executor, _, venue) = executor(ScriptedMarketData::new(), RecordingVenue::new(dec!(1)));

    let err = executor
        .execute(&request(dec!(0.50), Some(dec!(10))))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Execution(ExecutionError::BookUnavailable { .. })
    ));
    assert!(venue.orders().is_empty());
}

#[tokio::test]
async fn fetch_failure_propagates() {
    let (executor, _, _) = executor(ScriptedMarketData::failing(), RecordingVenue::new(dec!(1)));
    assert!(executor.preview(&request(dec!(0.5), None)).await.is_err());
}

#[tokio::test]
async fn prices_are_rounded_to_tick_and_recapped() {
    let market = ScriptedMarketData::new().with_book(ask_ladder(
        "no",
        &[(dec!(0.4049), dec!(10)), (dec!(0.495), dec!(10))],
    ));
    let (executor, _, venue) = executor(market, RecordingVenue::new(dec!(1)));

    let result = executor.execute(&request(dec!(0.495), None)).await.unwrap();

    let orders = venue.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].price, dec!(0.4));
    assert_eq!(result.shares_filled, dec!(10));
}

#[tokio::test]
async fn execute_refetches_book() {
    let (executor, market, _) = executor(two_level_market(), RecordingVenue::new(dec!(1)));
    let req = request(dec!(0.50), Some(dec!(10)));

    executor.preview(&req).await.unwrap();
    market.set_book(ask_ladder("no", &[(dec!(0.30), dec!(5))]));
    let result = executor.execute(&req).await.unwrap();

    assert_eq!(market.fetch_count(), 2);
    assert_eq!(result.shares_filled, dec!(5));
    assert_eq!(result.total_cost, dec!(1.5));
}
