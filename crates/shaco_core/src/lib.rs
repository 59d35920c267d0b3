//! Core logic for the Shaco personal assistant.
//! The CLI only reads lines and prints replies; everything else lives here.

pub mod clock;
pub mod command;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use clock::{Clock, SystemClock};
/// Test clock re-exported for integration tests; not for production use.
pub use clock::ManualClock;
pub use command::{parse_command, Assistant, Command, CommandError, JobCommand, NoteCommand, Reply};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::job::{normalize_status, Job, JobId, JobStatus};
pub use model::log_entry::LogEntry;
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::reminder::{Reminder, ReminderId};
pub use service::job_service::{JobService, JobServiceError, JobUpdate};
pub use service::math::{calculate, format_number, MathError, MathOp};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::reminder::{parse_duration, ReminderBook, ReminderError};
pub use store::activity_log::ActivityLog;
pub use store::job_store::{JobRepository, JsonJobRepository};
pub use store::note_store::{JsonNoteRepository, NoteRepository};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
