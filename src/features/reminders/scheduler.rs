//! Reminder scheduler: the periodic due-check and dispatch procedure
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Single-writer dispatch path shared with run-now
//! - 1.1.0: Tick-boundary error trap so the timer loop never dies
//! - 1.0.0: Initial polling loop
//!
//! Every 30 seconds the scheduler scans for reminders whose fire time falls
//! within the next tick's horizon, dispatches a send for each, and applies
//! the resulting status transition. A dispatch failure marks the reminder
//! `failed` with no automatic retry, recurring reminders included; the
//! failure stays visible in the activity log and a human can re-trigger the
//! send with [`ReminderScheduler::run_now`].

use crate::app::App;
use crate::core::{AppError, Clock};
use crate::features::activity::{category, ActivityLog};
use crate::features::directory::ClientDirectory;
use crate::features::mailer::{Mailer, SendOutcome};
use crate::features::reminders::ReminderStore;
use crate::models::{Reminder, ReminderStatus, RepeatPolicy};
use chrono::Duration as ChronoDuration;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Fixed polling interval. Coarse on purpose: reminders are not
/// latency-critical and a wider interval keeps overhead negligible.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Selection horizon for one tick: a reminder is due when its fire time is
/// at most this far in the future. Matches the polling interval, so a
/// reminder fires on the tick before its target time would pass.
const DUE_LOOKAHEAD_SECS: i64 = 30;

/// Drives due-reminder dispatch. Stateless beyond the stores it operates
/// over; cheap to clone and share with the request surface.
#[derive(Clone)]
pub struct ReminderScheduler {
    reminders: ReminderStore,
    directory: ClientDirectory,
    mailer: Mailer,
    log: ActivityLog,
    clock: Arc<dyn Clock>,
    /// Serializes every send, from the tick loop and from run-now alike, so
    /// a reminder can never be mid-update in two places at once.
    dispatch_lock: Arc<Mutex<()>>,
}

impl ReminderScheduler {
    pub fn new(app: &App) -> Self {
        ReminderScheduler {
            reminders: app.reminders.clone(),
            directory: app.clients.clone(),
            mailer: app.mailer.clone(),
            log: app.activity.clone(),
            clock: app.clock.clone(),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run the polling loop forever.
    ///
    /// Each tick completes in full, all sends included, before the next
    /// interval fires, so two ticks never overlap. Tick failures are logged
    /// and the loop keeps going; nothing here terminates the timer.
    pub async fn run(self) {
        info!(
            "reminder scheduler started ({}s interval)",
            POLL_INTERVAL.as_secs()
        );
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            interval.tick().await;
            match self.tick().await {
                Ok(0) => {}
                Ok(n) => debug!("tick dispatched {n} reminder(s)"),
                Err(e) => {
                    error!("scheduler tick failed: {e}");
                    self.log
                        .append(category::SCHEDULER, format!("tick failed: {e}"))
                        .await;
                }
            }
        }
    }

    /// One due-check pass: snapshot the reminders due within the lookahead
    /// horizon, then send each sequentially. Returns how many were
    /// dispatched.
    pub async fn tick(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let horizon = now + ChronoDuration::seconds(DUE_LOOKAHEAD_SECS);
        let due = self.reminders.due_ids(horizon).await;

        let mut dispatched = 0;
        for id in due {
            match self.dispatch(id, true).await {
                Ok(Some(_)) => dispatched += 1,
                // Skipped: resolved by a concurrent run-now between the
                // snapshot and this send
                Ok(None) => {}
                Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(dispatched)
    }

    /// Send a reminder immediately, outside the polling cycle.
    ///
    /// Bypasses both the due-time check and the scheduled-only filter: a
    /// reminder already `sent` or `failed` is re-attempted and its state
    /// updated accordingly. Fails with not-found when the reminder or its
    /// client does not exist.
    pub async fn run_now(&self, reminder_id: i64) -> Result<Reminder, AppError> {
        let reminder = self
            .reminders
            .find(reminder_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("reminder #{reminder_id}")))?;
        self.directory
            .find_client(reminder.client_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("client #{}", reminder.client_id)))?;

        self.dispatch(reminder_id, false)
            .await?
            .ok_or_else(|| AppError::Scheduler(format!("reminder #{reminder_id} was not dispatched")))
    }

    /// The send-one-reminder procedure, shared by the tick and run-now
    /// paths. Holds the dispatch lock for the whole attempt; the tick path
    /// re-checks the status under the lock so a stale due snapshot can
    /// never double-send.
    async fn dispatch(
        &self,
        reminder_id: i64,
        only_if_scheduled: bool,
    ) -> Result<Option<Reminder>, AppError> {
        let _guard = self.dispatch_lock.lock().await;

        let reminder = self
            .reminders
            .find(reminder_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("reminder #{reminder_id}")))?;
        if only_if_scheduled && reminder.status != ReminderStatus::Scheduled {
            return Ok(None);
        }

        // Resolve the client; a dangling reference fails the reminder
        // without a dispatch attempt.
        let Some(client) = self.directory.find_client(reminder.client_id).await else {
            let updated = self.reminders.mark_failed(reminder_id).await;
            warn!(
                "reminder #{reminder_id} references missing client #{}, marked failed",
                reminder.client_id
            );
            self.log
                .append(
                    category::SCHEDULER,
                    format!(
                        "reminder #{reminder_id} failed: client #{} not found, no send attempted",
                        reminder.client_id
                    ),
                )
                .await;
            return updated
                .ok_or_else(|| {
                    AppError::Scheduler(format!("reminder #{reminder_id} vanished during dispatch"))
                })
                .map(Some);
        };

        let subject = format!("Follow-up reminder for {}", client.name);
        let body = format!("Hi {},\n\n{}\n", client.name, reminder.message);

        let outcome = self.mailer.send(&client.email, &subject, &body).await;
        let now = self.clock.now();

        let updated = match outcome {
            SendOutcome::Failed(detail) => {
                error!("reminder #{reminder_id} dispatch failed: {detail}");
                let updated = self.reminders.mark_failed(reminder_id).await;
                self.log
                    .append(
                        category::SEND,
                        format!("reminder #{reminder_id} to {} failed: {detail}", client.email),
                    )
                    .await;
                updated
            }
            SendOutcome::Sent | SendOutcome::Simulated => {
                info!("reminder #{reminder_id} sent to {}", client.email);
                self.log
                    .append(
                        category::SEND,
                        format!("reminder #{reminder_id} sent to {}", client.email),
                    )
                    .await;
                match reminder.repeat {
                    RepeatPolicy::None => self.reminders.mark_sent(reminder_id, now).await,
                    RepeatPolicy::Daily | RepeatPolicy::Weekly => {
                        let updated = self.reminders.reschedule(reminder_id, now).await;
                        if let Some(r) = &updated {
                            self.log
                                .append(
                                    category::SCHEDULER,
                                    format!(
                                        "reminder #{reminder_id} rescheduled for {}",
                                        r.fire_at
                                    ),
                                )
                                .await;
                        }
                        updated
                    }
                }
            }
        };

        updated
            .ok_or_else(|| {
                AppError::Scheduler(format!("reminder #{reminder_id} vanished during dispatch"))
            })
            .map(Some)
    }
}
