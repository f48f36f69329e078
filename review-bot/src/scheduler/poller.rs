//! Status poller
//!
//! Polls the status API, announces the latest verdict and reports failures.
//!
//! One cycle is: read the cursor, fetch, validate, interpret the first
//! assignment (if any), notify, and advance the cursor. The cursor only
//! advances when every step succeeded; a failed cycle is reported through
//! the notifier (at most once per day per distinct error text) and leaves
//! the cursor where it was. Cycles are separated by a fixed sleep.

use review_client::ApiError;
use review_core::{
    NotificationMessage, PollCursor, ResponseValidator, SentErrorSet, StatusInterpreter,
    ValidationError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::repository::HomeworkRepository;
use crate::service::Notifier;

/// Failure of a single poll cycle
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PollError {
    /// Whether polling must stop
    ///
    /// A rejected credential fails identically on every retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }

    /// Whether the next cycle needs a different cursor to succeed
    pub fn needs_new_cursor(&self) -> bool {
        matches!(self, Self::Api(e) if !e.is_retryable() && !e.is_unauthorized())
    }
}

/// Result of a cycle that did not stop the poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The assignment list was empty
    NoNewStatus,
    /// A status change was found and delivered
    Notified(NotificationMessage),
    /// A status change was found but could not be delivered; it will be
    /// fetched again next cycle
    Undelivered(NotificationMessage),
    /// The cycle failed with a recoverable error
    Failed {
        /// Display text of the error
        error: String,
        /// Whether an error report went out this cycle
        reported: bool,
    },
}

/// Poller driving the poll-detect-notify cycle
pub struct StatusPoller {
    homeworks: Arc<dyn HomeworkRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    validator: ResponseValidator,
    interpreter: StatusInterpreter,
    cursor: PollCursor,
    sent_errors: SentErrorSet,
    retry_period: Duration,
}

impl StatusPoller {
    /// Creates a new poller
    ///
    /// # Arguments
    /// * `homeworks` - Source of status changes
    /// * `notifier` - Channel for status and error messages
    /// * `clock` - Time source for the dedupe window and cursor correction
    /// * `interpreter` - Renders assignment records into messages
    /// * `cursor` - Initial `from_date`
    /// * `sent_errors` - Dedupe set for error reports
    /// * `retry_period` - Pause between cycles
    pub fn new(
        homeworks: Arc<dyn HomeworkRepository>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        interpreter: StatusInterpreter,
        cursor: PollCursor,
        sent_errors: SentErrorSet,
        retry_period: Duration,
    ) -> Self {
        Self {
            homeworks,
            notifier,
            clock,
            validator: ResponseValidator,
            interpreter,
            cursor,
            sent_errors,
            retry_period,
        }
    }

    /// Current cursor
    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    /// Runs cycles until a fatal error occurs
    ///
    /// There is no cancellation primitive; stop the poller by dropping the
    /// future (or terminating the process). The cursor is not persisted.
    pub async fn run(&mut self) -> Result<(), PollError> {
        info!(
            "Starting status poller (interval: {:?}, from_date: {})",
            self.retry_period, self.cursor
        );

        loop {
            match self.poll_once().await? {
                CycleOutcome::NoNewStatus => debug!("No new status"),
                CycleOutcome::Notified(message) => {
                    info!("Status change announced: {}", message.text)
                }
                CycleOutcome::Undelivered(message) => debug!("Not delivered: {}", message.text),
                CycleOutcome::Failed { error, reported } => {
                    debug!("Cycle failed ({}), report sent: {}", error, reported)
                }
            }
            debug!("Next poll in {:?} (from_date: {})", self.retry_period, self.cursor());

            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Performs a single poll cycle
    ///
    /// Recoverable failures are handled here and come back as
    /// [`CycleOutcome::Failed`]; only fatal errors are returned as `Err`.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, PollError> {
        let today = self.clock.now().date_naive();
        if self.sent_errors.roll_over(today) {
            debug!("New day {}, error reports may be repeated", today);
        }

        match self.run_cycle().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn run_cycle(&mut self) -> Result<CycleOutcome, PollError> {
        let cursor = self.cursor;
        debug!("Polling for status changes (from_date: {})", cursor);

        let response = self.homeworks.fetch(cursor).await?;
        let validated = self.validator.check(&response)?;

        // Only the most recent assignment is acted upon per cycle
        let Some(latest) = validated.homeworks.first() else {
            debug!("The response has no new status.");
            self.advance(validated.current_date);
            return Ok(CycleOutcome::NoNewStatus);
        };

        let message = self.interpreter.parse(latest)?;

        match self.notifier.notify(&message).await {
            Ok(()) => {
                self.advance(validated.current_date);
                Ok(CycleOutcome::Notified(message))
            }
            Err(_) => {
                warn!("Keeping from_date {} so the status is fetched again", cursor);
                Ok(CycleOutcome::Undelivered(message))
            }
        }
    }

    async fn handle_failure(&mut self, e: PollError) -> Result<CycleOutcome, PollError> {
        error!("Poll cycle failed: {}", e);

        if e.needs_new_cursor() {
            let now = self.clock.now().timestamp();
            if self.cursor.correct(now) {
                warn!("from_date rejected, moved cursor to {}", self.cursor);
            } else {
                warn!(
                    "from_date {} rejected but is not behind the clock, keeping it",
                    self.cursor
                );
            }
        }

        let report = self.interpreter.templates().error_message(&e);
        let reported = self
            .notifier
            .notify_once(&report, &mut self.sent_errors)
            .await
            .unwrap_or(false);

        if e.is_fatal() {
            return Err(e);
        }

        Ok(CycleOutcome::Failed {
            error: e.to_string(),
            reported,
        })
    }

    fn advance(&mut self, next: Option<i64>) {
        if self.cursor.advance(next) {
            debug!("Cursor advanced to {}", self.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHomeworks, FakeMessages, FixedClock, transport_error};
    use review_core::{MessageKind, Verdicts};
    use serde_json::json;

    struct Harness {
        homeworks: Arc<FakeHomeworks>,
        messages: Arc<FakeMessages>,
        clock: Arc<FixedClock>,
        poller: StatusPoller,
    }

    fn harness(from_date: i64) -> Harness {
        let homeworks = Arc::new(FakeHomeworks::default());
        let messages = Arc::new(FakeMessages::default());
        let clock = Arc::new(FixedClock::at(2024, 3, 4, 12));

        let poller = StatusPoller::new(
            homeworks.clone(),
            Notifier::new(messages.clone()),
            clock.clone(),
            StatusInterpreter::default(),
            PollCursor::new(from_date),
            SentErrorSet::default(),
            Duration::from_secs(600),
        );

        Harness {
            homeworks,
            messages,
            clock,
            poller,
        }
    }

    #[tokio::test]
    async fn test_empty_list_advances_cursor_silently() {
        let mut h = harness(1000);
        h.homeworks
            .push(Ok(json!({"homeworks": [], "current_date": 1700})));

        let outcome = h.poller.poll_once().await.unwrap();

        assert_eq!(outcome, CycleOutcome::NoNewStatus);
        assert_eq!(h.poller.cursor().current(), 1700);
        assert!(h.messages.sent().is_empty());
        assert_eq!(h.homeworks.cursors(), vec![1000]);
    }

    #[tokio::test]
    async fn test_status_change_is_announced() {
        let mut h = harness(1000);
        h.homeworks.push(Ok(json!({
            "homeworks": [{"homework_name": "HW1", "status": "approved"}],
            "current_date": 1800
        })));

        let outcome = h.poller.poll_once().await.unwrap();

        let sent = h.messages.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("HW1"));
        assert!(sent[0].contains(&Verdicts::default().approved));
        assert!(matches!(
            outcome,
            CycleOutcome::Notified(NotificationMessage {
                kind: MessageKind::Status { .. },
                ..
            })
        ));
        assert_eq!(h.poller.cursor().current(), 1800);
    }

    #[tokio::test]
    async fn test_only_first_assignment_is_used() {
        let mut h = harness(1000);
        h.homeworks.push(Ok(json!({
            "homeworks": [
                {"homework_name": "HW2", "status": "rejected"},
                {"homework_name": "HW1", "status": "approved"}
            ],
            "current_date": 1900
        })));

        h.poller.poll_once().await.unwrap();

        let sent = h.messages.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("HW2"));
        assert!(!sent[0].contains("HW1"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_reported_and_cursor_kept() {
        let mut h = harness(1000);
        h.homeworks.push(Ok(json!({
            "homeworks": [{"homework_name": "HW2", "status": "unknown_status"}]
        })));

        let outcome = h.poller.poll_once().await.unwrap();

        assert_eq!(
            outcome,
            CycleOutcome::Failed {
                error: "unexpected homework status: unknown_status".to_string(),
                reported: true,
            }
        );
        assert_eq!(h.poller.cursor().current(), 1000);

        let sent = h.messages.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы"));
        assert!(!sent[0].contains("Изменился статус"));
    }

    #[tokio::test]
    async fn test_invalid_shape_is_reported_and_cursor_kept() {
        let mut h = harness(1000);
        h.homeworks
            .push(Ok(json!({"homeworks": "HW1", "current_date": 5000})));

        let outcome = h.poller.poll_once().await.unwrap();

        assert!(matches!(outcome, CycleOutcome::Failed { reported: true, .. }));
        assert_eq!(h.poller.cursor().current(), 1000);
    }

    #[tokio::test]
    async fn test_repeated_transport_failure_reported_once_per_day() {
        let mut h = harness(1000);
        h.homeworks.push(Err(transport_error()));
        h.homeworks.push(Err(transport_error()));
        h.homeworks.push(Err(transport_error()));

        let first = h.poller.poll_once().await.unwrap();
        let second = h.poller.poll_once().await.unwrap();

        assert!(matches!(first, CycleOutcome::Failed { reported: true, .. }));
        assert!(matches!(second, CycleOutcome::Failed { reported: false, .. }));
        assert_eq!(h.messages.sent().len(), 1);

        // Next day the unresolved error is announced again
        h.clock.advance(chrono::Duration::days(1));
        let third = h.poller.poll_once().await.unwrap();
        assert!(matches!(third, CycleOutcome::Failed { reported: true, .. }));
        assert_eq!(h.messages.sent().len(), 2);

        assert_eq!(h.poller.cursor().current(), 1000);
    }

    #[tokio::test]
    async fn test_failed_error_report_is_retried() {
        let mut h = harness(1000);
        h.homeworks.push(Err(transport_error()));
        h.homeworks.push(Err(transport_error()));
        h.messages.fail_next(1);

        let first = h.poller.poll_once().await.unwrap();
        let second = h.poller.poll_once().await.unwrap();

        assert!(matches!(first, CycleOutcome::Failed { reported: false, .. }));
        assert!(matches!(second, CycleOutcome::Failed { reported: true, .. }));
        assert_eq!(h.messages.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_undelivered_status_is_fetched_again() {
        let mut h = harness(1000);
        let response = json!({
            "homeworks": [{"homework_name": "HW1", "status": "reviewing"}],
            "current_date": 1800
        });
        h.homeworks.push(Ok(response.clone()));
        h.homeworks.push(Ok(response));
        h.messages.fail_next(1);

        let first = h.poller.poll_once().await.unwrap();
        assert!(matches!(first, CycleOutcome::Undelivered(_)));
        assert_eq!(h.poller.cursor().current(), 1000);

        let second = h.poller.poll_once().await.unwrap();
        assert!(matches!(second, CycleOutcome::Notified(_)));
        assert_eq!(h.poller.cursor().current(), 1800);
        assert_eq!(h.homeworks.cursors(), vec![1000, 1000]);
    }

    #[tokio::test]
    async fn test_unauthorized_is_reported_and_fatal() {
        let mut h = harness(1000);
        h.homeworks
            .push(Err(ApiError::Unauthorized("bad token".to_string())));

        let err = h.poller.poll_once().await.unwrap_err();

        assert!(err.is_fatal());
        let sent = h.messages.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("bad token"));
        assert_eq!(h.poller.cursor().current(), 1000);
    }

    #[tokio::test]
    async fn test_run_stops_on_fatal_error() {
        let mut h = harness(1000);
        h.homeworks
            .push(Err(ApiError::Unauthorized("bad token".to_string())));

        let result = h.poller.run().await;
        assert!(matches!(result, Err(PollError::Api(ApiError::Unauthorized(_)))));
    }

    #[tokio::test]
    async fn test_bad_cursor_is_corrected_to_now() {
        let mut h = harness(-5);
        h.homeworks
            .push(Err(ApiError::BadCursor("Wrong from_date format".to_string())));

        let outcome = h.poller.poll_once().await.unwrap();

        assert!(matches!(outcome, CycleOutcome::Failed { reported: true, .. }));
        let now = h.clock.now().timestamp();
        assert_eq!(h.poller.cursor().current(), now);

        h.poller.poll_once().await.unwrap();
        assert_eq!(h.homeworks.cursors(), vec![-5, now]);
    }

    #[test]
    fn test_failure_classification() {
        let unauthorized = PollError::from(ApiError::Unauthorized("x".to_string()));
        assert!(unauthorized.is_fatal());
        assert!(!unauthorized.needs_new_cursor());

        let bad_cursor = PollError::from(ApiError::BadCursor("x".to_string()));
        assert!(!bad_cursor.is_fatal());
        assert!(bad_cursor.needs_new_cursor());

        for recoverable in [
            PollError::from(transport_error()),
            PollError::from(ApiError::UnexpectedStatus(500)),
            PollError::from(ValidationError::MissingKey("homeworks".to_string())),
        ] {
            assert!(!recoverable.is_fatal());
            assert!(!recoverable.needs_new_cursor());
        }
    }

    #[tokio::test]
    async fn test_cursor_never_decreases() {
        let mut h = harness(1000);
        let steps = [
            Ok(json!({"homeworks": [], "current_date": 1500})),
            Err(transport_error()),
            Ok(json!({"homeworks": [], "current_date": 1200})),
            Ok(json!({"homeworks": [{"homework_name": "HW", "status": "nope"}], "current_date": 9000})),
            Err(ApiError::UnexpectedStatus(500)),
            Ok(json!({"homeworks": []})),
            Ok(json!({"homeworks": [{"homework_name": "HW", "status": "rejected"}], "current_date": 2000})),
            Err(ApiError::BadCursor("Wrong from_date format".to_string())),
        ];
        for step in steps {
            h.homeworks.push(step);
        }

        let mut previous = h.poller.cursor();
        for _ in 0..8 {
            h.poller.poll_once().await.unwrap();
            assert!(h.poller.cursor() >= previous);
            previous = h.poller.cursor();
        }
        assert_eq!(h.poller.cursor().current(), h.clock.now().timestamp());
    }
}
