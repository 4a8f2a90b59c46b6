//! # Core Module
//!
//! Configuration, error taxonomy, and the clock abstraction shared by every
//! feature of the follow-up service.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add clock module for testable time
//! - 1.0.0: Initial creation with config and error modules

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, SmtpSettings};
pub use error::{AppError, Result};
