//! Dispatcher: parsed command -> module call -> reply text.
//!
//! # Responsibility
//! - Own the reminder book, note/job services, activity log and clock.
//! - Turn every error into an `Error: ...` reply at this boundary.
//! - Record each handled line and each fired reminder in the activity log.
//!
//! # Invariants
//! - `handle` never panics and never returns an error.
//! - Activity log failures are logged and swallowed; they never change the
//!   reply for the command that triggered them.

use super::help::{help_text, JOB};
use super::parser::parse_command;
use super::{Command, CommandError, JobCommand, NoteCommand};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::model::job::Job;
use crate::model::log_entry::LogEntry;
use crate::model::reminder::Reminder;
use crate::service::job_service::JobService;
use crate::service::math::{calculate, format_number};
use crate::service::note_service::NoteService;
use crate::service::reminder::{format_duration, ReminderBook};
use crate::store::activity_log::ActivityLog;
use crate::store::job_store::JsonJobRepository;
use crate::store::note_store::JsonNoteRepository;
use chrono::SecondsFormat;
use log::{debug, warn};
use std::time::Instant;

const NOTE_PREVIEW_CHARS: usize = 60;
const SHORT_ID_CHARS: usize = 8;
const ERROR_PREFIX: &str = "Error: ";

/// Reply for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print.
    Text(String),
    /// Blank input; print nothing.
    Empty,
    /// Leave the main loop after printing the farewell.
    Exit(String),
}

/// The assistant session.
pub struct Assistant<C: Clock = SystemClock> {
    config: AppConfig,
    clock: C,
    reminders: ReminderBook,
    notes: NoteService<JsonNoteRepository>,
    jobs: JobService<JsonJobRepository>,
    activity: ActivityLog,
}

impl Assistant<SystemClock> {
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Assistant<C> {
    pub fn with_clock(config: AppConfig, clock: C) -> Self {
        let notes = NoteService::new(JsonNoteRepository::new(config.notes_path()));
        let jobs = JobService::new(JsonJobRepository::new(config.jobs_path()));
        let activity = ActivityLog::new(config.activity_log_path());
        Self {
            config,
            clock,
            reminders: ReminderBook::new(),
            notes,
            jobs,
            activity,
        }
    }

    /// Handles one raw input line.
    pub fn handle(&mut self, line: &str) -> Reply {
        let started_at = Instant::now();
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::Empty,
            Err(err) => return self.fail(line, err, started_at),
        };

        if command == Command::Exit {
            self.record(line, "ok");
            return Reply::Exit("Goodbye!".to_string());
        }

        match self.execute(command) {
            Ok(text) => {
                debug!(
                    "event=command module=dispatch status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.record(line, "ok");
                Reply::Text(text)
            }
            Err(err) => self.fail(line, err, started_at),
        }
    }

    /// Removes and renders reminders due now.
    pub fn poll_reminders(&mut self) -> Vec<String> {
        let due = self.reminders.poll_due(self.clock.now());
        due.iter()
            .map(|reminder| {
                self.append_activity(&format!("reminder fired: {}", reminder.message));
                format!("Reminder: {}", reminder.message)
            })
            .collect()
    }

    fn fail(&self, line: &str, err: CommandError, started_at: Instant) -> Reply {
        warn!(
            "event=command module=dispatch status=error error_code={} duration_ms={}",
            err.code(),
            started_at.elapsed().as_millis()
        );
        self.record(line, &format!("error: {err}"));
        Reply::Text(format!("{ERROR_PREFIX}{err}"))
    }

    fn record(&self, line: &str, outcome: &str) {
        self.append_activity(&format!("{} => {outcome}", line.trim()));
    }

    fn append_activity(&self, text: &str) {
        let entry = LogEntry::new(self.clock.now(), text);
        if let Err(err) = self.activity.append(&entry) {
            warn!("event=activity_append module=dispatch status=error error={err}");
        }
    }

    fn execute(&mut self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Math { op, a, b } => Ok(format_number(calculate(op, a, b)?)),
            Command::Remind { message, delay } => {
                let now = self.clock.now();
                let reminder = self.reminders.add_after(&message, delay, now)?;
                Ok(format!(
                    "Reminder #{} set: '{}' in {}",
                    reminder.id,
                    reminder.message,
                    format_duration(delay)
                ))
            }
            Command::ListReminders => Ok(self.render_reminders()),
            Command::CancelReminder(id) => {
                let removed = self.reminders.cancel(id)?;
                Ok(format!("Cancelled reminder #{}: {}", removed.id, removed.message))
            }
            Command::Note(note) => self.execute_note(note),
            Command::Job(job) => self.execute_job(job),
            Command::History { limit } => {
                let entries = self
                    .activity
                    .tail(limit.unwrap_or(self.config.history_limit))?;
                if entries.is_empty() {
                    return Ok("(no history)".to_string());
                }
                Ok(entries
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Help { topic } => Ok(help_text(topic.as_deref()).to_string()),
            Command::Version => Ok(format!("shaco {}", crate::core_version())),
            Command::Exit => Ok("Goodbye!".to_string()),
        }
    }

    fn execute_note(&mut self, command: NoteCommand) -> Result<String, CommandError> {
        let now = self.clock.now();
        match command {
            NoteCommand::Add(content) => {
                let note = self.notes.create_note(&content, now)?;
                Ok(format!("Saved note {}", note.id))
            }
            NoteCommand::List => {
                let notes = self.notes.list_notes()?;
                if notes.is_empty() {
                    return Ok("(no notes)".to_string());
                }
                Ok(notes
                    .iter()
                    .map(|note| {
                        format!(
                            "{}  {}  {}",
                            short_id(&note.id.to_string()),
                            note.updated_at.format("%Y-%m-%d %H:%M"),
                            note.preview(NOTE_PREVIEW_CHARS)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            NoteCommand::Show(id) => {
                let note = self.notes.get_note(&id)?;
                Ok(format!(
                    "{}\ncreated {}  updated {}\n\n{}",
                    note.id,
                    note.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    note.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    note.content
                ))
            }
            NoteCommand::Edit { id, content } => {
                let note = self.notes.update_note(&id, &content, now)?;
                Ok(format!("Updated note {}", note.id))
            }
            NoteCommand::Delete(id) => {
                let note = self.notes.delete_note(&id)?;
                Ok(format!("Deleted note {}", note.id))
            }
        }
    }

    fn execute_job(&mut self, command: JobCommand) -> Result<String, CommandError> {
        let now = self.clock.now();
        match command {
            JobCommand::Add {
                role,
                company,
                status,
            } => {
                let job = self
                    .jobs
                    .add_job(&role, &company, status.as_deref(), now)?;
                Ok(format!(
                    "Added: {} @ {} [{}] (id={})",
                    job.role, job.company, job.status, job.id
                ))
            }
            JobCommand::List { status } => {
                let jobs = self.jobs.list_jobs(status.as_deref())?;
                Ok(render_jobs(&jobs))
            }
            JobCommand::Remove(identifier) => {
                let removed = self.jobs.remove_job(&identifier)?;
                Ok(format!(
                    "Removed {} @ {} ({})",
                    removed.role, removed.company, removed.id
                ))
            }
            JobCommand::Update { identifier, update } => {
                let job = self.jobs.update_job(&identifier, &update, now)?;
                Ok(format!(
                    "Updated {} @ {} [{}] ({})",
                    job.role, job.company, job.status, job.id
                ))
            }
            JobCommand::Help => Ok(JOB.to_string()),
        }
    }

    fn render_reminders(&self) -> String {
        let pending = self.reminders.pending();
        if pending.is_empty() {
            return "No pending reminders.".to_string();
        }
        let now = self.clock.now();
        pending
            .iter()
            .map(|reminder| render_reminder(reminder, now))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_reminder(reminder: &Reminder, now: chrono::DateTime<chrono::Utc>) -> String {
    let remaining = reminder.trigger_at - now;
    let when = if remaining <= chrono::Duration::zero() {
        "due now".to_string()
    } else {
        format!("in {}", format_duration(remaining))
    };
    format!(
        "#{} {} ({}) {}",
        reminder.id,
        reminder.trigger_at.format("%Y-%m-%d %H:%M:%S"),
        when,
        reminder.message
    )
}

fn render_jobs(jobs: &[(usize, Job)]) -> String {
    if jobs.is_empty() {
        return "(no jobs)".to_string();
    }
    let mut lines = vec![format!(
        "{:>3}  {:8}  {:30}  {:20}  {:12}  {}",
        "idx", "id", "role", "company", "status", "updated"
    )];
    for (index, job) in jobs {
        lines.push(format!(
            "{:>3}  {:8}  {:30}  {:20}  {:12}  {}",
            index,
            short_id(&job.id.to_string()),
            truncate(&job.role, 30),
            truncate(&job.company, 20),
            job.status.as_str(),
            job.updated_at.format("%Y-%m-%d")
        ));
    }
    lines.join("\n")
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_CHARS).unwrap_or(id)
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
