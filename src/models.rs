//! Domain records for clients, reminders, and the activity log
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client the service sends follow-up reminders to.
///
/// Immutable after creation; owned by the client directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recurrence policy for a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPolicy {
    None,
    Daily,
    Weekly,
}

impl RepeatPolicy {
    /// Lenient parse: anything outside `{none, daily, weekly}` falls back
    /// to `None`, including a missing value.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("daily") => RepeatPolicy::Daily,
            Some("weekly") => RepeatPolicy::Weekly,
            _ => RepeatPolicy::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatPolicy::None => "none",
            RepeatPolicy::Daily => "daily",
            RepeatPolicy::Weekly => "weekly",
        }
    }
}

/// Lifecycle state of a reminder.
///
/// `scheduled → sent` (repeat none, success), `scheduled → scheduled`
/// (recurring success, fire time advanced), `scheduled → failed` (dispatch
/// failure or missing client). `sent` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Failed,
}

/// A scheduled follow-up message tied to one client.
///
/// `client_id` is a foreign reference, not ownership; the client may be
/// absent by the time the reminder fires and the send path must cope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub client_id: i64,
    pub fire_at: DateTime<Utc>,
    pub message: String,
    pub repeat: RepeatPolicy,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub last_sent_at: Option<DateTime<Utc>>,
}

/// One entry in the append-only activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub category: String,
    pub detail: String,
}

/// Validated input for creating a client.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Validated input for creating a reminder.
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub client_id: i64,
    pub fire_at: DateTime<Utc>,
    pub message: String,
    pub repeat: RepeatPolicy,
}
