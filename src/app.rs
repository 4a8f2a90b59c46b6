//! Application context
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! Owns the injectable stores and collaborators and wires them together.
//! There are no process-wide singletons: tests build as many isolated `App`
//! instances as they need.

use crate::core::Clock;
use crate::features::activity::ActivityLog;
use crate::features::directory::ClientDirectory;
use crate::features::mailer::Mailer;
use crate::features::reminders::ReminderStore;
use crate::store::IdSeq;
use std::sync::Arc;

/// Top-level context holding every shared service handle.
#[derive(Clone)]
pub struct App {
    pub clients: ClientDirectory,
    pub reminders: ReminderStore,
    pub activity: ActivityLog,
    pub mailer: Mailer,
    pub clock: Arc<dyn Clock>,
}

impl App {
    /// Wire the stores around a prebuilt mailer and activity log.
    pub fn new(clock: Arc<dyn Clock>, activity: ActivityLog, mailer: Mailer) -> Self {
        let ids = IdSeq::new();
        let clients = ClientDirectory::new(ids.clone(), activity.clone(), clock.clone());
        let reminders = ReminderStore::new(ids, clients.clone(), activity.clone(), clock.clone());

        App {
            clients,
            reminders,
            activity,
            mailer,
            clock,
        }
    }

    /// Context with a simulated mail dispatcher; the default for tests.
    pub fn simulated(clock: Arc<dyn Clock>) -> Self {
        let activity = ActivityLog::new(clock.clone());
        let mailer = Mailer::simulated(activity.clone());
        App::new(clock, activity, mailer)
    }
}
