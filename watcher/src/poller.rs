//! The poll loop: fetch, validate, compare with what was last sent, notify, sleep.

use common::protocol::{check_response, parse_status, ResponseError, StatusError};
use common::Notifier;
use practicum::{ApiClient, ApiError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Status(#[from] StatusError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message went out.
    Notified,
    /// The latest homework still yields the message sent last time.
    Unchanged,
    /// The API reported no homework changes since the cursor.
    NoUpdates,
    /// A new status message was produced but could not be delivered.
    DeliveryFailed,
    /// The cycle failed before a status message could be produced.
    Failed,
}

/// Everything carried from one cycle to the next. In memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` for the next request.
    pub cursor: i64,
    /// Last status message successfully delivered.
    pub last_message: Option<String>,
    /// Last error report successfully delivered, cleared by a healthy cycle.
    pub last_error: Option<String>,
}

pub struct StatusPoller {
    api: Arc<dyn ApiClient>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    state: PollState,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn ApiClient>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
        start_cursor: i64,
    ) -> Self {
        Self {
            api,
            notifier,
            interval,
            state: PollState {
                cursor: start_cursor,
                last_message: None,
                last_error: None,
            },
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Poll until `shutdown` resolves. Cycles never overlap, and every cycle is
    /// followed by the full interval whatever its outcome.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.run_cycle() => debug!(?outcome, "Cycle finished"),
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Run one cycle. Every failure is handled here: logged, and reported to the
    /// chat unless the identical report was the last one sent.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(outcome) => {
                self.state.last_error = None;
                outcome
            }
            Err(e) => {
                let report = format!("Сбой в программе: {}", e);
                error!("{}", report);

                if self.state.last_error.as_deref() == Some(report.as_str()) {
                    debug!("Error already reported, not sending again");
                } else if self.notifier.send(&report).await {
                    self.state.last_error = Some(report);
                }
                CycleOutcome::Failed
            }
        }
    }

    async fn poll_once(&mut self) -> Result<CycleOutcome, CycleError> {
        let body = self.api.fetch(self.state.cursor).await?;
        let response = check_response(&body)?;

        let outcome = match response.latest() {
            None => {
                info!(
                    "No status changes, next check in {} seconds",
                    self.interval.as_secs()
                );
                CycleOutcome::NoUpdates
            }
            Some(homework) => {
                let message = parse_status(homework)?;
                if self.state.last_message.as_deref() == Some(message.as_str()) {
                    info!("Homework status unchanged, nothing to send");
                    CycleOutcome::Unchanged
                } else if self.notifier.send(&message).await {
                    info!("Status change sent: {}", message);
                    self.state.last_message = Some(message);
                    CycleOutcome::Notified
                } else {
                    CycleOutcome::DeliveryFailed
                }
            }
        };

        match response.current_date {
            Some(ts) => self.state.cursor = ts,
            None => warn!(
                cursor = self.state.cursor,
                "Response has no current_date, keeping previous cursor"
            ),
        }

        Ok(outcome)
    }
}
