// Core layer - configuration, errors, clock
pub mod core;

// Domain records
pub mod models;

// Infrastructure - in-memory storage seam
pub mod store;

// Features layer - directory, reminders, mailer, activity log
pub mod features;

// HTTP surface
pub mod api;

// Application context
pub mod app;

// Re-export the application context
pub use app::App;

// Re-export core items for convenience
pub use crate::core::{AppError, Clock, Config, ManualClock, Result, SystemClock};

// Re-export feature items
pub use features::{
    // Activity log
    ActivityLog, RECENT_LIMIT,
    // Client directory
    ClientDirectory,
    // Mail dispatcher
    MailTransport, Mailer, SendOutcome,
    // Reminders
    ReminderScheduler, ReminderStore,
};

// Re-export domain records
pub use models::{Client, LogEntry, Reminder, ReminderStatus, RepeatPolicy};
