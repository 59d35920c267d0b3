use chrono::{Duration, TimeZone, Utc};
use shaco_core::{ReminderBook, ReminderError};

#[test]
fn past_trigger_fires_on_next_poll_exactly_once() {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
    let mut book = ReminderBook::new();
    book.add("overdue", now - Duration::minutes(10), now).unwrap();

    let fired = book.poll_due(now);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].message, "overdue");
    assert!(book.poll_due(now + Duration::hours(1)).is_empty());
}

#[test]
fn reminders_fire_only_once_due_and_in_trigger_order() {
    let start = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
    let mut book = ReminderBook::new();
    book.add_after("later", Duration::minutes(10), start).unwrap();
    book.add_after("sooner", Duration::minutes(5), start).unwrap();
    book.add_after("same time", Duration::minutes(5), start).unwrap();

    assert!(book.poll_due(start + Duration::minutes(4)).is_empty());

    let fired = book.poll_due(start + Duration::minutes(7));
    let messages: Vec<&str> = fired.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec!["sooner", "same time"]);
    assert_eq!(book.len(), 1);

    let fired = book.poll_due(start + Duration::minutes(10));
    assert_eq!(fired[0].message, "later");
    assert!(book.is_empty());
}

#[test]
fn cancelled_reminder_never_fires() {
    let start = Utc::now();
    let mut book = ReminderBook::new();
    let reminder = book.add_after("meeting", Duration::seconds(1), start).unwrap();

    let cancelled = book.cancel(reminder.id).unwrap();
    assert_eq!(cancelled.message, "meeting");
    assert!(book.poll_due(start + Duration::days(1)).is_empty());
    assert_eq!(
        book.cancel(reminder.id).unwrap_err(),
        ReminderError::NotFound(reminder.id)
    );
}

#[test]
fn pending_is_sorted_by_trigger_time() {
    let start = Utc::now();
    let mut book = ReminderBook::new();
    book.add_after("b", Duration::hours(2), start).unwrap();
    book.add_after("a", Duration::hours(1), start).unwrap();
    let pending: Vec<String> = book.pending().into_iter().map(|r| r.message).collect();
    assert_eq!(pending, vec!["a", "b"]);
}
