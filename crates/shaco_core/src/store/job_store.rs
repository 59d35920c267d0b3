//! Job repository contract and JSON-file implementation.
//!
//! Jobs are kept as an ordered JSON array; the array position is the
//! user-facing index shown by `job list`.

use super::{read_json, write_json_atomic, StoreResult};
use crate::model::job::Job;
use log::debug;
use std::path::{Path, PathBuf};

pub trait JobRepository {
    /// Loads all jobs in stored order.
    fn load_jobs(&self) -> StoreResult<Vec<Job>>;
    /// Replaces the stored job list.
    fn save_jobs(&self, jobs: &[Job]) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct JsonJobRepository {
    path: PathBuf,
}

impl JsonJobRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JobRepository for JsonJobRepository {
    fn load_jobs(&self) -> StoreResult<Vec<Job>> {
        let jobs: Vec<Job> = read_json(&self.path)?.unwrap_or_default();
        debug!("event=jobs_load module=store status=ok count={}", jobs.len());
        Ok(jobs)
    }

    fn save_jobs(&self, jobs: &[Job]) -> StoreResult<()> {
        write_json_atomic(&self.path, &jobs)?;
        debug!("event=jobs_save module=store status=ok count={}", jobs.len());
        Ok(())
    }
}
