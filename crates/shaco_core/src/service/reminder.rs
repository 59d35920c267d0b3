//! Reminder bot.
//!
//! # Responsibility
//! - Hold pending reminders for the current session.
//! - Hand back due reminders when the main loop polls.
//! - Parse and render reminder delays (`30`, `5m`, `1h30m`).
//!
//! # Invariants
//! - A reminder fires at most once: `poll_due` removes what it returns.
//! - Cancelled reminders never fire.
//! - Nothing fires between polls; there is no background thread.

use crate::model::reminder::{Reminder, ReminderId};
use chrono::{DateTime, Duration, Utc};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[smhdw])+$").expect("valid duration regex"));
static DURATION_PART_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)([smhdw])").expect("valid duration part regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    EmptyMessage,
    InvalidDuration(String),
    NotFound(ReminderId),
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "reminder message cannot be empty"),
            Self::InvalidDuration(value) => write!(
                f,
                "invalid time `{value}`; use seconds or forms like 30s, 5m, 2h, 1d, 1h30m"
            ),
            Self::NotFound(id) => write!(f, "no pending reminder #{id}"),
        }
    }
}

impl Error for ReminderError {}

/// In-memory reminder store.
#[derive(Debug)]
pub struct ReminderBook {
    pending: Vec<Reminder>,
    next_id: ReminderId,
}

impl Default for ReminderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderBook {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedules `message` to fire at `trigger_at`.
    ///
    /// A trigger time in the past is accepted; it fires on the next poll.
    pub fn add(
        &mut self,
        message: &str,
        trigger_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ReminderError::EmptyMessage);
        }

        let reminder = Reminder {
            id: self.next_id,
            message: message.to_string(),
            trigger_at,
            created_at: now,
        };
        self.next_id += 1;
        self.pending.push(reminder.clone());
        info!(
            "event=reminder_add module=reminder status=ok id={} delay_s={}",
            reminder.id,
            (trigger_at - now).num_seconds()
        );
        Ok(reminder)
    }

    /// Schedules `message` to fire `delay` after `now`.
    pub fn add_after(
        &mut self,
        message: &str,
        delay: Duration,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        let trigger_at = now
            .checked_add_signed(delay)
            .ok_or_else(|| ReminderError::InvalidDuration(format!("{}s", delay.num_seconds())))?;
        self.add(message, trigger_at, now)
    }

    /// Cancels a pending reminder.
    pub fn cancel(&mut self, id: ReminderId) -> Result<Reminder, ReminderError> {
        let index = self
            .pending
            .iter()
            .position(|reminder| reminder.id == id)
            .ok_or(ReminderError::NotFound(id))?;
        let removed = self.pending.remove(index);
        info!("event=reminder_cancel module=reminder status=ok id={id}");
        Ok(removed)
    }

    /// Pending reminders ordered by trigger time, then id.
    pub fn pending(&self) -> Vec<Reminder> {
        let mut pending = self.pending.clone();
        sort_by_trigger(&mut pending);
        pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every reminder due at `now`, earliest first.
    pub fn poll_due(&mut self, now: DateTime<Utc>) -> Vec<Reminder> {
        let (mut due, pending): (Vec<Reminder>, Vec<Reminder>) = self
            .pending
            .drain(..)
            .partition(|reminder| reminder.is_due(now));
        self.pending = pending;
        sort_by_trigger(&mut due);
        for reminder in &due {
            info!(
                "event=reminder_fire module=reminder status=ok id={} late_ms={}",
                reminder.id,
                (now - reminder.trigger_at).num_milliseconds()
            );
        }
        due
    }
}

fn sort_by_trigger(reminders: &mut [Reminder]) {
    reminders.sort_by(|a, b| a.trigger_at.cmp(&b.trigger_at).then(a.id.cmp(&b.id)));
}

/// Parses a reminder delay.
///
/// A bare number means seconds. Otherwise one or more `<n><unit>` parts with
/// units `s`, `m`, `h`, `d`, `w` (e.g. `1h30m`). Zero is allowed.
pub fn parse_duration(input: &str) -> Result<Duration, ReminderError> {
    let value = input.trim().to_ascii_lowercase();
    let invalid = || ReminderError::InvalidDuration(input.trim().to_string());

    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let seconds: i64 = value.parse().map_err(|_| invalid())?;
        return Duration::try_seconds(seconds).ok_or_else(invalid);
    }

    if !DURATION_RE.is_match(&value) {
        return Err(invalid());
    }

    let mut total: i64 = 0;
    for caps in DURATION_PART_RE.captures_iter(&value) {
        let amount: i64 = caps[1].parse().map_err(|_| invalid())?;
        let unit_seconds = match &caps[2] {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 60 * 60 * 24,
            _ => 60 * 60 * 24 * 7,
        };
        total = amount
            .checked_mul(unit_seconds)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(invalid)?;
    }
    Duration::try_seconds(total).ok_or_else(invalid)
}

/// Human-readable delay, e.g. `1 hour 30 minutes`.
pub fn format_duration(delay: Duration) -> String {
    let seconds = delay.num_seconds().max(0);
    let plural = |n: i64, unit: &str| format!("{n} {unit}{}", if n == 1 { "" } else { "s" });

    if seconds < 60 {
        plural(seconds, "second")
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let rest = seconds % 60;
        if rest > 0 {
            format!("{} {}", plural(minutes, "minute"), plural(rest, "second"))
        } else {
            plural(minutes, "minute")
        }
    } else if seconds < 86_400 {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{} {}", plural(hours, "hour"), plural(minutes, "minute"))
        } else {
            plural(hours, "hour")
        }
    } else {
        let days = seconds / 86_400;
        let hours = (seconds % 86_400) / 3600;
        if hours > 0 {
            format!("{} {}", plural(days, "day"), plural(hours, "hour"))
        } else {
            plural(days, "day")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_duration, parse_duration, ReminderBook, ReminderError};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn parse_duration_accepts_supported_forms() {
        assert_eq!(parse_duration("30").unwrap(), Duration::seconds(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::minutes(5));
        assert_eq!(
            parse_duration("1H30M").unwrap(),
            Duration::minutes(90)
        );
        assert_eq!(parse_duration("2w").unwrap(), Duration::days(14));
        assert_eq!(parse_duration("0").unwrap(), Duration::zero());
    }

    #[test]
    fn parse_duration_rejects_garbage_and_overflow() {
        for input in ["", "soon", "5x", "m5", "1h 30m", "-5"] {
            assert!(
                matches!(parse_duration(input), Err(ReminderError::InvalidDuration(_))),
                "input `{input}` should be rejected"
            );
        }
        assert!(parse_duration("99999999999999999999").is_err());
        assert!(parse_duration("9999999999999999w").is_err());
    }

    #[test]
    fn format_duration_is_readable() {
        assert_eq!(format_duration(Duration::seconds(1)), "1 second");
        assert_eq!(format_duration(Duration::seconds(90)), "1 minute 30 seconds");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour 30 minutes");
        assert_eq!(format_duration(Duration::hours(49)), "2 days 1 hour");
    }

    #[test]
    fn ids_increase_and_blank_messages_are_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let mut book = ReminderBook::new();
        let first = book.add_after("stretch", Duration::minutes(1), now).unwrap();
        let second = book.add_after("drink water", Duration::minutes(1), now).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(
            book.add_after("   ", Duration::zero(), now).unwrap_err(),
            ReminderError::EmptyMessage
        );
        assert_eq!(book.len(), 2);
    }
}
