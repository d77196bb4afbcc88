//! Handler for the `run` command.

use std::time::Duration;

use tokio::signal;
use tracing::info;

use crate::adapter::inbound::cli::{output, paths, redeem};
use crate::error::Result;
use crate::infrastructure::bootstrap::AppContext;

/// How often the loop asks the manager for a cycle. The manager's own check
/// interval decides whether one actually runs.
const POLL_PERIOD: Duration = Duration::from_secs(15);

/// Redeem on every check interval until Ctrl-C.
pub async fn execute(ctx: &AppContext) -> Result<()> {
    let store = ctx.pending_store(paths::default_pending_store());
    let pending_path = store.path().to_path_buf();
    let mut manager = ctx.redemption_manager(store)?;
    let interval = manager.settings().check_interval;

    if !output::is_quiet() {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Funder", manager.settings().funder_address);
        output::field("Interval", format!("{}s", interval.as_secs()));
        output::field("Pending file", pending_path.display());
        output::field("Pending", manager.pending().len());
        output::note("Press Ctrl-C to stop.");
    }

    let mut ticker = tokio::time::interval(POLL_PERIOD.min(interval).max(Duration::from_secs(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = manager.check_and_redeem_positions().await;
                if !report.throttled {
                    redeem::print_report(&report, manager.pending().len());
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(pending = manager.pending().len(), "Redemption loop stopped");
    Ok(())
}
