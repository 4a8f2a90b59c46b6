//! # Feature: Activity Log
//!
//! Append-only, time-ordered record of system events. Storage is unbounded;
//! read access is capped to the most recent entries so the log can grow for
//! the life of the process without ballooning responses.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use crate::core::Clock;
use crate::models::LogEntry;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Hard cap on how many entries a read may return.
pub const RECENT_LIMIT: usize = 200;

/// Free-form category tags used across the service.
pub mod category {
    pub const CLIENT: &str = "Client";
    pub const REMINDER: &str = "Reminder";
    pub const SEND: &str = "Send";
    pub const SCHEDULER: &str = "Scheduler";
    pub const SYSTEM: &str = "System";
    pub const EMAIL: &str = "Email";
}

/// Shared handle to the process-wide activity log.
#[derive(Clone)]
pub struct ActivityLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
    next_id: Arc<AtomicI64>,
    clock: Arc<dyn Clock>,
}

impl ActivityLog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        ActivityLog {
            entries: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            clock,
        }
    }

    /// Append an entry at the head of the read order. Infallible.
    pub async fn append(&self, category: &str, detail: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            at: self.clock.now(),
            category: category.to_string(),
            detail: detail.into(),
        };
        self.entries.write().await.insert(0, entry.clone());
        entry
    }

    /// Most-recent-first slice of the log, clamped to [`RECENT_LIMIT`].
    pub async fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let limit = limit.min(RECENT_LIMIT);
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    /// Entries in a given category, most-recent-first (same read cap).
    pub async fn recent_in(&self, category: &str, limit: usize) -> Vec<LogEntry> {
        let limit = limit.min(RECENT_LIMIT);
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.category == category)
            .take(limit)
            .cloned()
            .collect()
    }
}
