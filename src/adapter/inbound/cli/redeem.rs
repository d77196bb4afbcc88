//! Handler for the `redeem` command.

use serde_json::json;

use crate::adapter::inbound::cli::{output, paths};
use crate::domain::redemption::CycleReport;
use crate::error::Result;
use crate::infrastructure::bootstrap::AppContext;

/// Run a single redemption cycle and report what it did.
pub async fn execute(ctx: &AppContext) -> Result<()> {
    let store = ctx.pending_store(paths::default_pending_store());
    let mut manager = ctx.redemption_manager(store)?;

    let report = manager.check_and_redeem_positions().await;
    print_report(&report, manager.pending().len());
    Ok(())
}

pub(super) fn print_report(report: &CycleReport, still_pending: usize) {
    if output::is_json() {
        output::json_output(json!({
            "command": "redeem",
            "throttled": report.throttled,
            "blocked_by_pending": report.blocked_by_pending,
            "reconciled_confirmed": report.reconciled_confirmed,
            "reconciled_reverted": report.reconciled_reverted,
            "candidates": report.candidates,
            "resolved": report.resolved,
            "submitted": report.submitted,
            "submit_failures": report.submit_failures,
            "confirmed": report.confirmed,
            "reverted": report.reverted,
            "newly_pending": report.newly_pending,
            "pending": still_pending,
        }));
        return;
    }

    if report.throttled {
        output::note("Checked recently, skipping.");
        return;
    }

    output::section("Redemption cycle");
    if report.reconciled_confirmed + report.reconciled_reverted > 0 {
        output::field(
            "Reconciled",
            format!(
                "{} confirmed, {} reverted",
                report.reconciled_confirmed, report.reconciled_reverted
            ),
        );
    }
    if report.blocked_by_pending {
        output::warning(&format!(
            "{still_pending} redemption(s) still pending; no new batch submitted."
        ));
        output::hint("run `bracketeer pending` to inspect them");
        return;
    }

    output::field("Candidates", report.candidates);
    output::field("Resolved", report.resolved);
    output::field("Submitted", report.submitted);
    if report.submit_failures > 0 {
        output::field("Failed", output::negative(report.submit_failures));
    }
    output::field("Confirmed", output::positive(report.confirmed));
    if report.reverted > 0 {
        output::field("Reverted", output::negative(report.reverted));
    }
    if report.newly_pending > 0 {
        output::field("Pending", report.newly_pending);
    }

    if report.candidates == 0 {
        output::note("Nothing to redeem.");
    } else if report.submit_failures == 0 && report.reverted == 0 {
        output::success("Cycle complete.");
    }
}
