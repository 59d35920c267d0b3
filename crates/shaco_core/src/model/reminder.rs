//! Reminder domain model.
//!
//! Reminders live only for the current session: they are created by a
//! command and dropped once fired or cancelled.

use chrono::{DateTime, Utc};

/// Session-local reminder identifier, starting at 1.
pub type ReminderId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub message: String,
    /// Instant at which the reminder becomes due.
    pub trigger_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Returns whether the reminder should fire at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.trigger_at <= now
    }
}
