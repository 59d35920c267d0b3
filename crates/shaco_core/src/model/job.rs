//! Job application model.
//!
//! # Responsibility
//! - Define the tracked job record and its status lifecycle.
//! - Normalize loose user status input into a known status.
//!
//! # Invariants
//! - `role` and `company` are trimmed and non-empty.
//! - Unknown status input falls back to `JobStatus::Applied`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type JobId = Uuid;

const FUZZY_STATUS_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Accepted,
    Rejected,
    Withdrawn,
    Todo,
}

impl JobStatus {
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Accepted,
        JobStatus::Rejected,
        JobStatus::Withdrawn,
        JobStatus::Todo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
            Self::Todo => "todo",
        }
    }

    fn from_exact(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps loose status text to a known status.
///
/// Order: exact name, short alias, closest name by similarity ratio
/// (>= 0.6), then `Applied`.
pub fn normalize_status(input: &str) -> JobStatus {
    let value = input.trim().to_lowercase();
    if let Some(status) = JobStatus::from_exact(&value) {
        return status;
    }

    let alias = match value.as_str() {
        "int" | "interview" => Some(JobStatus::Interviewing),
        "appl" => Some(JobStatus::Applied),
        "rej" => Some(JobStatus::Rejected),
        "acc" => Some(JobStatus::Accepted),
        "off" => Some(JobStatus::Offer),
        _ => None,
    };
    if let Some(status) = alias {
        return status;
    }

    JobStatus::ALL
        .into_iter()
        .map(|status| (status, similarity(&value, status.as_str())))
        .filter(|(_, score)| *score >= FUZZY_STATUS_CUTOFF)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(status, _)| status)
        .unwrap_or_default()
}

/// Similarity ratio (1.0 means equal) derived from Levenshtein distance.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    let distance = previous[b.len()];

    1.0 - (2 * distance) as f64 / total as f64
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub status: JobStatus,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        role: impl Into<String>,
        company: impl Into<String>,
        status: JobStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into().trim().to_string(),
            company: company.into().trim().to_string(),
            status,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_status, similarity, JobStatus};

    #[test]
    fn exact_and_alias_statuses() {
        assert_eq!(normalize_status("Offer"), JobStatus::Offer);
        assert_eq!(normalize_status(" int "), JobStatus::Interviewing);
        assert_eq!(normalize_status("rej"), JobStatus::Rejected);
    }

    #[test]
    fn fuzzy_statuses_and_fallback() {
        assert_eq!(normalize_status("interveiwing"), JobStatus::Interviewing);
        assert_eq!(normalize_status("rejectd"), JobStatus::Rejected);
        assert_eq!(normalize_status("banana"), JobStatus::Applied);
        assert_eq!(normalize_status(""), JobStatus::Applied);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("todo", "todo"), 1.0);
        assert!(similarity("abc", "xyz") <= 0.0);
    }
}
