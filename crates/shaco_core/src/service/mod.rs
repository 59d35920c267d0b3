//! Utility modules invoked by the dispatcher.
//!
//! # Responsibility
//! - Keep each module independent: math is pure, reminders are in-memory,
//!   notes and jobs go through repository traits.
//! - Keep the dispatcher decoupled from storage details.

pub mod job_service;
pub mod math;
pub mod note_service;
pub mod reminder;
