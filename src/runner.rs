// src/runner.rs
use crate::commit::{should_commit, CommitSink};
use crate::health::{Prober, StatusRecord};
use crate::notify::{Alert, Notifier};
use crate::state::{StateError, StateStore};
use tracing::{error, info, warn};

/// Exit code for runs that aborted: bad configuration, state that could not
/// be written, or a commit signal the caller never received.
pub const FATAL_EXIT_CODE: u8 = 3;

/// How a run ended, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Healthy,
    DownAlerted,
    DownAlertFailed,
}

impl Outcome {
    /// 0 healthy, 1 down and the alert could not be delivered, 2 down and
    /// alerted. Aborted runs use [`FATAL_EXIT_CODE`].
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Healthy => 0,
            Outcome::DownAlertFailed => 1,
            Outcome::DownAlerted => 2,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub record: StatusRecord,
    pub should_commit: bool,
    pub signal_delivered: bool,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn exit_code(&self) -> u8 {
        if self.signal_delivered {
            self.outcome.exit_code()
        } else {
            FATAL_EXIT_CODE
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Could not persist status: {0}")]
    StateWrite(#[from] StateError),
}

/// Probe, persist, decide, signal the decision, and alert if the target is down.
pub async fn run_check(
    prober: &Prober,
    store: &dyn StateStore,
    sink: &dyn CommitSink,
    notifier: &dyn Notifier,
) -> Result<RunReport, RunError> {
    let record = prober.probe().await;

    let previous = store.read_previous().await;
    store.write(&record).await?;

    let should_commit = should_commit(previous.as_ref(), &record);
    info!(
        previous_ok = ?previous.as_ref().map(|p| p.ok),
        current_ok = record.ok,
        should_commit,
        "Commit decision made"
    );

    // Emitted before any dispatch so a stalled alert cannot withhold it.
    let signal_delivered = match sink.emit(should_commit).await {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    };

    if record.ok {
        return Ok(RunReport {
            record,
            should_commit,
            signal_delivered,
            outcome: Outcome::Healthy,
        });
    }

    let alert = Alert::from_record(&record);
    let outcome = match notifier.notify(&alert.subject, &alert.body).await {
        Ok(()) => {
            warn!("{} is down, alert dispatched via {}", record.url, notifier.name());
            Outcome::DownAlerted
        }
        Err(e) => {
            error!("Failed to send alert via {}: {}", notifier.name(), e);
            Outcome::DownAlertFailed
        }
    };

    Ok(RunReport {
        record,
        should_commit,
        signal_delivered,
        outcome,
    })
}

/// One-line, human-facing summary of a finished run.
pub fn summary(report: &RunReport) -> String {
    match report.outcome {
        Outcome::Healthy => format!(
            "OK {} in {}ms",
            report.record.status_code.unwrap_or_default(),
            report.record.latency_ms.unwrap_or_default()
        ),
        Outcome::DownAlerted => "Alert email sent.".to_string(),
        Outcome::DownAlertFailed => "Alert email could not be sent.".to_string(),
    }
}
