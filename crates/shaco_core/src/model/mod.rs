//! Domain records shared by stores, services and the dispatcher.
//!
//! # Responsibility
//! - Define the persisted shapes (`Note`, `Job`, `LogEntry`).
//! - Define the in-memory `Reminder` record.
//!
//! # Invariants
//! - Notes and jobs carry stable UUID identities that are never reused.
//! - All timestamps are UTC.

pub mod job;
pub mod log_entry;
pub mod note;
pub mod reminder;
