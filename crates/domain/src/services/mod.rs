//! Domain services for the audit manager.
//!
//! Services contain business logic that operates on domain models.

pub mod reminder;

pub use reminder::{plan_reminders, ReminderTask, ReminderWindow, ReviewCandidate};
