//! # Features Module
//!
//! All feature modules of the follow-up service.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

pub mod activity;
pub mod directory;
pub mod mailer;
pub mod reminders;

// Re-export feature items
pub use activity::{ActivityLog, RECENT_LIMIT};
pub use directory::ClientDirectory;
pub use mailer::{MailTransport, Mailer, SendOutcome};
pub use reminders::{ReminderScheduler, ReminderStore};
