//! Top-level failure handling: run outcomes become exit codes, and panics are logged.

use snapshot_core::RunOutcome;
use snapshot_logging::{snap_error, snap_info, snap_warn};

/// Process exit status for a finished run.
///
/// Lint warnings never affect the status; write failures and aborts do.
pub fn exit_status(outcome: &RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Completed { pages } => {
            snap_info!("Snapshot run completed with {} page(s)", pages);
            0
        }
        RunOutcome::CompletedWithWriteFailures { pages, failed } => {
            snap_warn!("{} of {} snapshot(s) could not be written", failed, pages);
            1
        }
        RunOutcome::Aborted { phase, reason } => {
            snap_error!("Snapshot run aborted during {:?}: {}", phase, reason);
            1
        }
    }
}

/// Logs panics from any task before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        snap_error!("Unhandled failure: {}", info);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use snapshot_core::{Phase, RunOutcome};

    use super::exit_status;

    #[test]
    fn only_clean_completion_exits_zero() {
        assert_eq!(exit_status(&RunOutcome::Completed { pages: 3 }), 0);
        assert_eq!(
            exit_status(&RunOutcome::CompletedWithWriteFailures {
                pages: 3,
                failed: 1
            }),
            1
        );
        assert_eq!(
            exit_status(&RunOutcome::Aborted {
                phase: Phase::Crawling,
                reason: "boom".to_string()
            }),
            1
        );
    }
}
