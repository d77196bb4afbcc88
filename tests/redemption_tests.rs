//! Integration tests for the redemption cycle.

mod support;

use std::time::Duration;

use alloy_primitives::{B256, U256};
use bracketeer::domain::id::ConditionId;
use bracketeer::domain::redemption::ReceiptStatus;
use bracketeer::domain::settlement::{
    Collateral, CTF_ADDRESS, NEG_RISK_ADAPTER_ADDRESS, USDC_BRIDGED_ADDRESS, USDC_NATIVE_ADDRESS,
    WRAPPED_COLLATERAL_ADDRESS,
};
use bracketeer::testkit::domain::{condition_hex, losing_position, pending, tx_hash, winning_position};
use support::redemption::{Harness, FUNDER};

fn condition(n: u8) -> B256 {
    condition_hex(n).parse().unwrap()
}

fn nonces(values: &[u64]) -> Vec<U256> {
    values.iter().map(|&v| U256::from(v)).collect()
}

#[tokio::test]
async fn redeems_resolved_winning_position() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 1);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.submitted, 1);
    assert_eq!(report.confirmed, 1);
    assert_eq!(report.newly_pending, 0);
    assert!(manager.pending().is_empty());
    assert_eq!(harness.store.save_count(), 0);

    let submissions = harness.ledger.submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.wallet, FUNDER);
    assert_eq!(submission.call.target, CTF_ADDRESS);
    assert_eq!(submission.call.collateral, USDC_NATIVE_ADDRESS);
    assert_eq!(submission.call.condition_id, condition(1));
    assert_eq!(submission.call.parent_collection_id, B256::ZERO);
    assert_eq!(submission.call.index_sets, [1, 2]);
    assert_eq!(submission.signature.len(), 65);
    assert_eq!(submission.signature[64], 31);
    assert_eq!(submission.gas.max_priority_fee_per_gas, 45_000_000_000);
    assert_eq!(submission.gas.max_fee_per_gas, 90_000_000_000);
    assert_eq!(harness.signer.signed().len(), 1);
}

#[tokio::test]
async fn unresolved_market_is_left_for_later() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 1);
    assert_eq!(report.resolved, 0);
    assert!(harness.ledger.submissions().is_empty());
    assert_eq!(harness.ledger.nonce_reads(), 0);
}

#[tokio::test]
async fn losing_positions_are_not_candidates() {
    let harness = Harness::new(vec![losing_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [1, 0]);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 0);
    assert_eq!(harness.ledger.payout_reads(), 0);
}

#[tokio::test]
async fn nonce_is_read_once_and_incremented_per_submission() {
    let harness = Harness::new(vec![
        winning_position(1, FUNDER),
        winning_position(2, FUNDER),
        winning_position(3, FUNDER),
    ]);
    for n in 1..=3 {
        harness.ledger.resolve(condition(n), [0, 1]);
    }
    harness.ledger.set_nonce(FUNDER, 7);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.submitted, 3);
    assert_eq!(harness.ledger.nonce_reads(), 1);
    assert_eq!(harness.ledger.hashed_nonces(), nonces(&[7, 8, 9]));
}

#[tokio::test]
async fn failed_submission_does_not_consume_nonce() {
    let harness = Harness::new(vec![
        winning_position(1, FUNDER),
        winning_position(2, FUNDER),
        winning_position(3, FUNDER),
    ]);
    for n in 1..=3 {
        harness.ledger.resolve(condition(n), [0, 1]);
    }
    harness.ledger.set_nonce(FUNDER, 7);
    harness.ledger.fail_submit(condition(2));
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.submitted, 2);
    assert_eq!(report.submit_failures, 1);
    assert_eq!(harness.ledger.hashed_nonces(), nonces(&[7, 8, 8]));
    let redeemed: Vec<B256> = harness
        .ledger
        .submissions()
        .iter()
        .map(|s| s.call.condition_id)
        .collect();
    assert_eq!(redeemed, vec![condition(1), condition(3)]);
}

#[tokio::test]
async fn nonce_read_failure_abandons_batch() {
    let harness = Harness::new(vec![winning_position(1, FUNDER), winning_position(2, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.resolve(condition(2), [0, 1]);
    harness.ledger.fail_nonce();
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.submitted, 0);
    assert_eq!(report.resolved, 1);
    assert!(harness.ledger.hashed_nonces().is_empty());
}

#[tokio::test]
async fn wrapped_collateral_redeems_through_neg_risk_adapter() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_collateral_balance(
        FUNDER,
        Collateral::WrappedCollateral,
        condition(1),
        2,
        100,
    );
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    manager.check_and_redeem_positions().await;

    let submission = &harness.ledger.submissions()[0];
    assert_eq!(submission.call.target, NEG_RISK_ADAPTER_ADDRESS);
    assert_eq!(submission.call.collateral, WRAPPED_COLLATERAL_ADDRESS);
}

#[tokio::test]
async fn bridged_usdc_is_preferred_over_wrapped_collateral() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_collateral_balance(
        FUNDER,
        Collateral::WrappedCollateral,
        condition(1),
        1,
        100,
    );
    harness
        .ledger
        .set_collateral_balance(FUNDER, Collateral::BridgedUsdc, condition(1), 2, 100);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    manager.check_and_redeem_positions().await;

    let submission = &harness.ledger.submissions()[0];
    assert_eq!(submission.call.target, CTF_ADDRESS);
    assert_eq!(submission.call.collateral, USDC_BRIDGED_ADDRESS);
}

#[tokio::test]
async fn slow_resolution_read_counts_as_unresolved() {
    let harness = Harness::new(vec![winning_position(1, FUNDER), winning_position(2, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.hang_payouts(condition(1));
    harness.ledger.resolve(condition(2), [1, 0]);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        manager.check_and_redeem_positions(),
    )
    .await
    .expect("cycle finishes despite hanging read");

    assert_eq!(report.resolved, 1);
    let submissions = harness.ledger.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].call.condition_id, condition(2));
}

#[tokio::test]
async fn failed_resolution_read_counts_as_unresolved() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.fail_payouts(condition(1));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.resolved, 0);
    assert!(harness.ledger.submissions().is_empty());
}

#[tokio::test]
async fn unconfirmed_submission_is_persisted_and_blocks_next_cycle() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    let mut manager = harness.manager();

    let first = manager.check_and_redeem_positions().await;

    assert_eq!(first.submitted, 1);
    assert_eq!(first.newly_pending, 1);
    assert_eq!(manager.pending().len(), 1);
    assert_eq!(harness.store.save_count(), 1);
    let stored = harness.store.entries();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].condition_id(), &ConditionId::new(condition_hex(1)));

    let second = manager.check_and_redeem_positions().await;

    assert!(second.blocked_by_pending);
    assert_eq!(harness.portfolio.call_count(), 1);
    assert_eq!(harness.ledger.submissions().len(), 1);
}

#[tokio::test]
async fn confirmed_pending_entry_is_cleared_on_reconcile() {
    let tx = tx_hash(1);
    let harness = Harness::with_pending(vec![], vec![pending(1, tx, FUNDER)]);
    harness.ledger.set_receipt(tx, ReceiptStatus::Success);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.reconciled_confirmed, 1);
    assert!(!report.blocked_by_pending);
    assert!(manager.pending().is_empty());
    assert!(harness.store.entries().is_empty());
    assert_eq!(harness.portfolio.call_count(), 1);
}

#[tokio::test]
async fn reverted_pending_entry_is_cleared_on_reconcile() {
    let tx = tx_hash(1);
    let harness = Harness::with_pending(vec![], vec![pending(1, tx, FUNDER)]);
    harness.ledger.set_receipt(tx, ReceiptStatus::Failed);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.reconciled_reverted, 1);
    assert!(manager.pending().is_empty());
}

#[tokio::test]
async fn only_mined_entries_leave_pending_on_reconcile() {
    let confirmed = tx_hash(1);
    let reverted = tx_hash(2);
    let unmined = tx_hash(3);
    let harness = Harness::with_pending(
        vec![],
        vec![
            pending(1, confirmed, FUNDER),
            pending(2, reverted, FUNDER),
            pending(3, unmined, FUNDER),
        ],
    );
    harness.ledger.set_receipt(confirmed, ReceiptStatus::Success);
    harness.ledger.set_receipt(reverted, ReceiptStatus::Failed);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.reconciled_confirmed, 1);
    assert_eq!(report.reconciled_reverted, 1);
    assert!(report.blocked_by_pending);
    let stored = harness.store.entries();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].transaction_hash, unmined);
}

#[tokio::test]
async fn receipt_query_failure_keeps_entry_pending() {
    let confirmed = tx_hash(1);
    let unknown = tx_hash(2);
    let harness = Harness::with_pending(
        vec![winning_position(3, FUNDER)],
        vec![pending(1, confirmed, FUNDER), pending(2, unknown, FUNDER)],
    );
    harness.ledger.set_receipt(confirmed, ReceiptStatus::Success);
    harness.ledger.fail_receipt(unknown);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.reconciled_confirmed, 1);
    assert!(report.blocked_by_pending);
    assert_eq!(manager.pending().len(), 1);
    let stored = harness.store.entries();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].transaction_hash, unknown);
    assert_eq!(harness.portfolio.call_count(), 0);
}

#[tokio::test]
async fn reverted_submission_is_not_tracked() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Failed));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.reverted, 1);
    assert_eq!(report.newly_pending, 0);
    assert!(manager.pending().is_empty());
}

#[tokio::test]
async fn duplicate_conditions_in_one_listing_are_redeemed_once() {
    let harness = Harness::new(vec![winning_position(1, FUNDER), winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 1);
    assert_eq!(harness.ledger.submissions().len(), 1);
}

#[tokio::test]
async fn malformed_condition_id_is_skipped() {
    let mut broken = winning_position(9, FUNDER);
    broken.condition_id = ConditionId::new("not-a-condition");
    let harness = Harness::new(vec![broken, winning_position(1, FUNDER)]);
    harness.ledger.resolve(condition(1), [0, 1]);
    harness.ledger.set_default_receipt(Some(ReceiptStatus::Success));
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 2);
    assert_eq!(report.submitted, 1);
}

#[tokio::test]
async fn portfolio_failure_ends_cycle_quietly() {
    let harness = Harness::new(vec![winning_position(1, FUNDER)]);
    harness.portfolio.set_failing(true);
    let mut manager = harness.manager();

    let report = manager.check_and_redeem_positions().await;

    assert_eq!(report.candidates, 0);
    assert!(harness.ledger.submissions().is_empty());
}

#[tokio::test]
async fn cycles_are_throttled_by_check_interval() {
    let harness = Harness::new(vec![]);
    let settings = bracketeer::application::redemption::RedemptionSettings {
        check_interval: Duration::from_secs(3600),
        ..Harness::settings()
    };
    let mut manager = harness.manager_with(settings);

    let first = manager.check_and_redeem_positions().await;
    let second = manager.check_and_redeem_positions().await;

    assert!(!first.throttled);
    assert!(second.throttled);
    assert_eq!(harness.portfolio.call_count(), 1);
}

#[tokio::test]
async fn pending_entries_reload_on_construction() {
    let harness = Harness::with_pending(
        vec![],
        vec![
            pending(1, tx_hash(1), FUNDER),
            pending(2, tx_hash(2), FUNDER),
            pending(3, tx_hash(3), FUNDER),
        ],
    );

    let manager = harness.manager();

    assert_eq!(manager.pending().len(), 3);
}

#[tokio::test]
async fn duplicate_conditions_collapse_on_reload() {
    let harness = Harness::with_pending(
        vec![],
        vec![pending(1, tx_hash(1), FUNDER), pending(1, tx_hash(2), FUNDER)],
    );

    let manager = harness.manager();

    assert_eq!(manager.pending().len(), 1);
}
