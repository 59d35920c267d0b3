//! Command parsing and dispatch.
//!
//! # Responsibility
//! - Turn one raw input line into a typed [`Command`].
//! - Route commands to the utility modules and render text replies.
//! - Convert every module error into one printable [`CommandError`].
//!
//! # Invariants
//! - No input line can make the dispatcher panic or stop the loop; only
//!   an exit word ends it.

use crate::model::reminder::ReminderId;
use crate::service::job_service::{JobServiceError, JobUpdate};
use crate::service::math::{MathError, MathOp};
use crate::service::note_service::NoteServiceError;
use crate::service::reminder::ReminderError;
use crate::store::StoreError;
use chrono::Duration;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dispatch;
mod help;
pub mod parser;

pub use dispatch::{Assistant, Reply};
pub use parser::{parse_command, tokenize};

/// One parsed user instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Math { op: MathOp, a: f64, b: f64 },
    Remind { message: String, delay: Duration },
    ListReminders,
    CancelReminder(ReminderId),
    Note(NoteCommand),
    Job(JobCommand),
    History { limit: Option<usize> },
    Help { topic: Option<String> },
    Version,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    Add(String),
    List,
    Show(String),
    Edit { id: String, content: String },
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCommand {
    Add {
        role: String,
        company: String,
        status: Option<String>,
    },
    List {
        status: Option<String>,
    },
    Remove(String),
    Update {
        identifier: String,
        update: JobUpdate,
    },
    Help,
}

/// Every failure a command can surface to the user.
#[derive(Debug)]
pub enum CommandError {
    Unrecognized(String),
    InvalidArgument(String),
    Math(MathError),
    Reminder(ReminderError),
    Note(NoteServiceError),
    Job(JobServiceError),
    Storage(StoreError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(input) => write!(
                f,
                "unrecognized command `{input}`. Type 'help' to see available commands."
            ),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::Math(err) => write!(f, "{err}"),
            Self::Reminder(err) => write!(f, "{err}"),
            Self::Note(err) => write!(f, "{err}"),
            Self::Job(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Math(err) => Some(err),
            Self::Reminder(err) => Some(err),
            Self::Note(err) => Some(err),
            Self::Job(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Unrecognized(_) | Self::InvalidArgument(_) => None,
        }
    }
}

impl CommandError {
    /// Short stable name for diagnostic events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unrecognized(_) => "unrecognized_command",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Math(MathError::DivisionByZero) => "division_by_zero",
            Self::Math(_) => "math_error",
            Self::Reminder(_) => "reminder_error",
            Self::Note(NoteServiceError::Store(_)) | Self::Job(JobServiceError::Store(_)) => {
                "storage_error"
            }
            Self::Note(_) => "note_error",
            Self::Job(_) => "job_error",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<MathError> for CommandError {
    fn from(value: MathError) -> Self {
        Self::Math(value)
    }
}

impl From<ReminderError> for CommandError {
    fn from(value: ReminderError) -> Self {
        match value {
            ReminderError::InvalidDuration(_) | ReminderError::EmptyMessage => {
                Self::InvalidArgument(value.to_string())
            }
            other => Self::Reminder(other),
        }
    }
}

impl From<NoteServiceError> for CommandError {
    fn from(value: NoteServiceError) -> Self {
        Self::Note(value)
    }
}

impl From<JobServiceError> for CommandError {
    fn from(value: JobServiceError) -> Self {
        Self::Job(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}
