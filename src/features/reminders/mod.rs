//! # Feature: Reminders
//!
//! Reminder records and their mutable scheduling state, plus the periodic
//! scheduler that drives status transitions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Calendar-day rescheduling for recurring reminders
//! - 1.0.0: Initial store and scheduler

pub mod scheduler;

pub use scheduler::ReminderScheduler;

use crate::core::{AppError, Clock, Result};
use crate::features::activity::{category, ActivityLog};
use crate::features::directory::ClientDirectory;
use crate::models::{NewReminder, Reminder, ReminderStatus, RepeatPolicy};
use crate::store::{IdSeq, Table};
use chrono::{DateTime, Days, Duration, Utc};
use log::info;
use std::sync::Arc;

/// How far in the past a new reminder's fire time may lie. Allows small
/// clock skew between callers and the service while rejecting clearly-past
/// reminders.
const PAST_SKEW_SECS: i64 = 60;

/// Parse a caller-supplied fire time (RFC 3339) into a UTC instant.
pub fn parse_fire_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            AppError::validation(format!("fire_at is not a valid RFC 3339 timestamp: {e}"))
        })
}

/// Shared handle to the reminder store.
#[derive(Clone)]
pub struct ReminderStore {
    pub(crate) table: Table<Reminder>,
    ids: IdSeq,
    directory: ClientDirectory,
    log: ActivityLog,
    clock: Arc<dyn Clock>,
}

impl ReminderStore {
    pub fn new(
        ids: IdSeq,
        directory: ClientDirectory,
        log: ActivityLog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ReminderStore {
            table: Table::new(),
            ids,
            directory,
            log,
            clock,
        }
    }

    /// Schedule a reminder for an existing client.
    ///
    /// The fire time may be up to [`PAST_SKEW_SECS`] in the past; anything
    /// older is rejected. New reminders start `scheduled` with no send
    /// recorded.
    pub async fn add_reminder(&self, input: NewReminder) -> Result<Reminder> {
        let message = input.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::validation("message is required"));
        }

        let client = self
            .directory
            .find_client(input.client_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("client #{}", input.client_id)))?;

        let now = self.clock.now();
        if input.fire_at < now - Duration::seconds(PAST_SKEW_SECS) {
            return Err(AppError::validation(format!(
                "fire_at is more than {PAST_SKEW_SECS}s in the past"
            )));
        }

        let reminder = Reminder {
            id: self.ids.next(),
            client_id: client.id,
            fire_at: input.fire_at,
            message,
            repeat: input.repeat,
            status: ReminderStatus::Scheduled,
            created_at: now,
            last_sent_at: None,
        };

        self.table.insert(reminder.clone()).await;
        info!(
            "reminder #{} scheduled for client #{} at {} (repeat: {})",
            reminder.id,
            client.id,
            reminder.fire_at,
            reminder.repeat.as_str()
        );
        self.log
            .append(
                category::REMINDER,
                format!(
                    "reminder #{} for {} scheduled at {} (repeat: {})",
                    reminder.id,
                    client.name,
                    reminder.fire_at,
                    reminder.repeat.as_str()
                ),
            )
            .await;

        Ok(reminder)
    }

    /// All reminders, most-recently-added first.
    pub async fn list_reminders(&self) -> Vec<Reminder> {
        self.table.newest_first().await
    }

    pub async fn find(&self, id: i64) -> Option<Reminder> {
        self.table.get(id).await
    }

    /// Ids of reminders still `scheduled` whose fire time is at or before
    /// `horizon`, in creation order.
    pub async fn due_ids(&self, horizon: DateTime<Utc>) -> Vec<i64> {
        self.table
            .filtered(|r| r.status == ReminderStatus::Scheduled && r.fire_at <= horizon)
            .await
            .iter()
            .map(|r| r.id)
            .collect()
    }

    /// Terminal success for a one-shot reminder.
    pub async fn mark_sent(&self, id: i64, now: DateTime<Utc>) -> Option<Reminder> {
        self.table
            .update(id, |r| {
                r.status = ReminderStatus::Sent;
                r.last_sent_at = Some(now);
            })
            .await
    }

    /// Terminal failure; never revisited by the scheduler.
    pub async fn mark_failed(&self, id: i64) -> Option<Reminder> {
        self.table
            .update(id, |r| r.status = ReminderStatus::Failed)
            .await
    }

    /// Successful send of a recurring reminder: record the send and advance
    /// the fire time by one or seven calendar days from its previous value,
    /// preserving the wall-clock time across month and year boundaries.
    pub async fn reschedule(&self, id: i64, now: DateTime<Utc>) -> Option<Reminder> {
        self.table
            .update(id, |r| {
                let days = match r.repeat {
                    RepeatPolicy::Daily => 1,
                    RepeatPolicy::Weekly => 7,
                    RepeatPolicy::None => return,
                };
                r.fire_at = r
                    .fire_at
                    .checked_add_days(Days::new(days))
                    .unwrap_or(r.fire_at);
                r.last_sent_at = Some(now);
            })
            .await
    }
}
