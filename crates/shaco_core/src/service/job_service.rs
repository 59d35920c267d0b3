//! Job tracker use-case service.
//!
//! # Responsibility
//! - Add, list, update and remove tracked job applications.
//! - Resolve a job by list index or by id.
//!
//! # Invariants
//! - Every mutation touches `updated_at` and saves the full list.
//! - Status input always goes through `normalize_status`.

use crate::model::job::{normalize_status, Job, JobStatus};
use crate::store::job_store::JobRepository;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum JobServiceError {
    MissingField(&'static str),
    NotFound(String),
    Store(StoreError),
}

impl Display for JobServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "job {field} cannot be empty"),
            Self::NotFound(identifier) => {
                write!(f, "no job found with id or index `{identifier}`")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JobServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for JobServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobUpdate {
    pub role: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.company.is_none() && self.status.is_none()
    }
}

pub struct JobService<R: JobRepository> {
    repo: R,
}

impl<R: JobRepository> JobService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_job(
        &self,
        role: &str,
        company: &str,
        status: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Job, JobServiceError> {
        if role.trim().is_empty() {
            return Err(JobServiceError::MissingField("role"));
        }
        if company.trim().is_empty() {
            return Err(JobServiceError::MissingField("company"));
        }

        let status = status.map(normalize_status).unwrap_or_default();
        let job = Job::new(role, company, status, now);
        let mut jobs = self.repo.load_jobs()?;
        jobs.push(job.clone());
        self.repo.save_jobs(&jobs)?;
        info!(
            "event=job_add module=job status=ok id={} job_status={}",
            job.id, job.status
        );
        Ok(job)
    }

    /// Lists jobs in stored order, optionally filtered by status.
    ///
    /// Returned pairs carry the stored index used by `remove`/`update`.
    pub fn list_jobs(&self, status: Option<&str>) -> Result<Vec<(usize, Job)>, JobServiceError> {
        let filter: Option<JobStatus> = status.map(normalize_status);
        Ok(self
            .repo
            .load_jobs()?
            .into_iter()
            .enumerate()
            .filter(|(_, job)| filter.map_or(true, |wanted| job.status == wanted))
            .collect())
    }

    pub fn remove_job(&self, identifier: &str) -> Result<Job, JobServiceError> {
        let mut jobs = self.repo.load_jobs()?;
        let index = find_job(&jobs, identifier)
            .ok_or_else(|| JobServiceError::NotFound(identifier.trim().to_string()))?;
        let removed = jobs.remove(index);
        self.repo.save_jobs(&jobs)?;
        info!("event=job_remove module=job status=ok id={}", removed.id);
        Ok(removed)
    }

    pub fn update_job(
        &self,
        identifier: &str,
        update: &JobUpdate,
        now: DateTime<Utc>,
    ) -> Result<Job, JobServiceError> {
        if matches!(update.role.as_deref(), Some(role) if role.trim().is_empty()) {
            return Err(JobServiceError::MissingField("role"));
        }
        if matches!(update.company.as_deref(), Some(company) if company.trim().is_empty()) {
            return Err(JobServiceError::MissingField("company"));
        }

        let mut jobs = self.repo.load_jobs()?;
        let index = find_job(&jobs, identifier)
            .ok_or_else(|| JobServiceError::NotFound(identifier.trim().to_string()))?;

        let job = &mut jobs[index];
        if let Some(role) = &update.role {
            job.role = role.trim().to_string();
        }
        if let Some(company) = &update.company {
            job.company = company.trim().to_string();
        }
        if let Some(status) = &update.status {
            job.status = normalize_status(status);
        }
        job.touch(now);
        let updated = job.clone();

        self.repo.save_jobs(&jobs)?;
        info!("event=job_update module=job status=ok id={}", updated.id);
        Ok(updated)
    }
}

/// Digits select by list index; anything else is matched against job ids
/// (full id or unique prefix).
fn find_job(jobs: &[Job], identifier: &str) -> Option<usize> {
    let identifier = identifier.trim().to_ascii_lowercase();
    if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = identifier.parse().ok()?;
        return (index < jobs.len()).then_some(index);
    }

    if let Ok(id) = Uuid::parse_str(&identifier) {
        return jobs.iter().position(|job| job.id == id);
    }

    let mut matches = jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| job.id.to_string().starts_with(&identifier));
    match (matches.next(), matches.next()) {
        (Some((index, _)), None) if identifier.len() >= 4 => Some(index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::find_job;
    use crate::model::job::{Job, JobStatus};
    use chrono::Utc;

    #[test]
    fn find_job_by_index_id_and_prefix() {
        let now = Utc::now();
        let jobs = vec![
            Job::new("a", "x", JobStatus::Applied, now),
            Job::new("b", "y", JobStatus::Applied, now),
        ];
        assert_eq!(find_job(&jobs, "1"), Some(1));
        assert_eq!(find_job(&jobs, "2"), None);
        assert_eq!(find_job(&jobs, &jobs[0].id.to_string()), Some(0));
        assert_eq!(find_job(&jobs, &jobs[1].id.to_string()[..8]), Some(1));
        assert_eq!(find_job(&jobs, "ab"), None);
    }
}
