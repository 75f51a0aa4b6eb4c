//! In-memory job queue for tests
//!
//! [`FakeQueue`] records every enqueue instead of running it. Jobs stay in
//! insertion order until a test clears them, and can be inspected per worker
//! or across all workers. Matchers consume [`EnqueuedJobs`] snapshots taken
//! from the queue.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::{ApplicationJob, EnqueuedJob, JobError, JobId, JobResult, Worker, JOB_WRAPPER_CLASS};
use crate::clock::{Clock, SystemClock};
use crate::config::JobMatchersConfig;

/// Target label of snapshots spanning every worker.
pub const ALL_WORKERS: &str = "worker";

/// In-memory job queue for testing
///
/// Clones share the same recorded jobs, so the queue can be handed to the
/// code under test while the test keeps a handle for assertions.
///
/// # Example
///
/// ```rust
/// use acton_job_matchers::jobs::FakeQueue;
/// use acton_job_matchers::Worker;
///
/// #[derive(Worker)]
/// struct HardWorker;
///
/// let queue = FakeQueue::new();
/// queue.perform_async::<HardWorker>(("string", 1, true)).unwrap();
///
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.jobs_for("HardWorker").len(), 1);
///
/// queue.clear_all();
/// assert!(queue.is_empty());
/// ```
#[derive(Clone)]
pub struct FakeQueue {
    jobs: Arc<Mutex<Vec<EnqueuedJob>>>,
    clock: Arc<dyn Clock>,
    config: Arc<JobMatchersConfig>,
}

impl Default for FakeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FakeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeQueue")
            .field("jobs", &self.jobs.lock().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FakeQueue {
    /// Create an empty queue with default configuration and the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(JobMatchersConfig::default())
    }

    /// Create an empty queue with explicit configuration
    #[must_use]
    pub fn with_config(config: JobMatchersConfig) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(Vec::new())),
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }

    /// Read the current time from `clock` instead of the system clock
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Configuration the queue was created with
    #[must_use]
    pub fn config(&self) -> &JobMatchersConfig {
        &self.config
    }

    /// Current time according to the queue's clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Enqueue a `W` job to run as soon as possible
    ///
    /// `args` must serialize to a JSON array: a tuple, a `Vec`, or
    /// `json!([...])`.
    ///
    /// # Errors
    ///
    /// Returns an error if `args` cannot be serialized or is not an array.
    pub fn perform_async<W: Worker>(&self, args: impl Serialize) -> JobResult<JobId> {
        self.enqueue(W::NAME, W::queue(), serialize_arguments(args)?, None)
    }

    /// Enqueue a `W` job to run after `interval`
    ///
    /// An interval that is not positive enqueues an immediate job.
    ///
    /// # Errors
    ///
    /// Returns an error if `args` cannot be serialized or is not an array, or
    /// if `now + interval` is out of range.
    pub fn perform_in<W: Worker>(&self, interval: Duration, args: impl Serialize) -> JobResult<JobId> {
        let at = self.after(interval)?;
        self.enqueue(W::NAME, W::queue(), serialize_arguments(args)?, Some(at))
    }

    /// Enqueue a `W` job to run at `at`
    ///
    /// A time that is not in the future enqueues an immediate job.
    ///
    /// # Errors
    ///
    /// Returns an error if `args` cannot be serialized or is not an array.
    pub fn perform_at<W: Worker>(&self, at: DateTime<Utc>, args: impl Serialize) -> JobResult<JobId> {
        self.enqueue(W::NAME, W::queue(), serialize_arguments(args)?, Some(at))
    }

    /// Current time plus `interval`
    pub(crate) fn after(&self, interval: Duration) -> JobResult<DateTime<Utc>> {
        self.now()
            .checked_add_signed(interval)
            .ok_or(JobError::ScheduleOutOfRange(interval))
    }

    fn enqueue(
        &self,
        class: &str,
        queue: Option<&str>,
        args: Vec<Value>,
        at: Option<DateTime<Utc>>,
    ) -> JobResult<JobId> {
        let now = self.now();
        let queue = queue.unwrap_or(self.config.queues.default_queue.as_str());
        let mut job = EnqueuedJob::new(class, queue, args, now);
        if let Some(at) = at.filter(|at| *at > now) {
            job = job.scheduled_at(at);
        }
        Ok(self.push(job))
    }

    /// Record an already-built job
    pub fn push(&self, job: EnqueuedJob) -> JobId {
        let jid = job.jid();
        tracing::debug!(
            jid = %jid,
            class = job.class(),
            wrapped = job.wrapped(),
            queue = job.queue(),
            at = ?job.at(),
            "Job enqueued"
        );
        self.jobs.lock().push(job);
        jid
    }

    /// Jobs recorded under worker class `class`, oldest first
    #[must_use]
    pub fn jobs_for(&self, class: &str) -> Vec<EnqueuedJob> {
        self.jobs
            .lock()
            .iter()
            .filter(|job| job.class() == class)
            .cloned()
            .collect()
    }

    /// Every recorded job, oldest first
    #[must_use]
    pub fn all_jobs(&self) -> Vec<EnqueuedJob> {
        self.jobs.lock().clone()
    }

    /// Number of recorded jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Whether no jobs are recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    /// Drop the jobs of worker `W`, returning how many were removed
    pub fn clear<W: Worker>(&self) -> usize {
        self.clear_worker(W::NAME)
    }

    /// Drop the jobs recorded under worker class `class`, returning how many
    /// were removed
    pub fn clear_worker(&self, class: &str) -> usize {
        let mut jobs = self.jobs.lock();
        let before = jobs.len();
        jobs.retain(|job| job.class() != class);
        let removed = before - jobs.len();
        tracing::debug!(class, removed, "Cleared worker jobs");
        removed
    }

    /// Drop every recorded job
    pub fn clear_all(&self) {
        let mut jobs = self.jobs.lock();
        tracing::debug!(removed = jobs.len(), "Cleared all jobs");
        jobs.clear();
    }

    /// Snapshot of the jobs of worker `W`
    #[must_use]
    pub fn worker<W: Worker>(&self) -> EnqueuedJobs {
        self.worker_named(W::NAME)
    }

    /// Snapshot of the jobs recorded under worker class `class`
    #[must_use]
    pub fn worker_named(&self, class: &str) -> EnqueuedJobs {
        self.snapshot(class, self.jobs_for(class))
    }

    /// Snapshot of the wrapped jobs of application job `J`
    #[must_use]
    pub fn application_job<J: ApplicationJob>(&self) -> EnqueuedJobs {
        let jobs = self
            .jobs
            .lock()
            .iter()
            .filter(|job| job.class() == JOB_WRAPPER_CLASS && job.wrapped() == Some(J::NAME))
            .cloned()
            .collect();
        self.snapshot(J::NAME, jobs)
    }

    /// Snapshot of every recorded job, across all workers
    #[must_use]
    pub fn all_workers(&self) -> EnqueuedJobs {
        self.snapshot(ALL_WORKERS, self.all_jobs())
    }

    fn snapshot(&self, target: &str, jobs: Vec<EnqueuedJob>) -> EnqueuedJobs {
        EnqueuedJobs {
            target: target.to_string(),
            jobs,
            now: self.now(),
            schedule_tolerance: self.config.matching.schedule_tolerance(),
        }
    }
}

/// Turn enqueue arguments into the queue's argument list
///
/// # Errors
///
/// Returns an error if `args` cannot be serialized or is not a JSON array.
pub fn serialize_arguments(args: impl Serialize) -> JobResult<Vec<Value>> {
    match serde_json::to_value(args)? {
        Value::Array(values) => Ok(values),
        other => Err(JobError::ArgumentsNotArray(other.to_string())),
    }
}

/// Jobs associated with one worker (or with all workers) at a point in time
///
/// This is what the enqueue matchers inspect. It also carries the instant the
/// snapshot was taken, which interval expectations are measured from, and the
/// configured schedule tolerance.
#[derive(Debug, Clone)]
pub struct EnqueuedJobs {
    target: String,
    jobs: Vec<EnqueuedJob>,
    now: DateTime<Utc>,
    schedule_tolerance: Duration,
}

impl EnqueuedJobs {
    /// Build a snapshot by hand
    #[must_use]
    pub fn new(target: impl Into<String>, jobs: Vec<EnqueuedJob>, now: DateTime<Utc>) -> Self {
        Self {
            target: target.into(),
            jobs,
            now,
            schedule_tolerance: JobMatchersConfig::default().matching.schedule_tolerance(),
        }
    }

    /// Override the schedule tolerance
    #[must_use]
    pub const fn with_schedule_tolerance(mut self, tolerance: Duration) -> Self {
        self.schedule_tolerance = tolerance;
        self
    }

    /// Worker class name, application job name, or [`ALL_WORKERS`]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Jobs in the snapshot, oldest first
    #[must_use]
    pub fn jobs(&self) -> &[EnqueuedJob] {
        &self.jobs
    }

    /// When the snapshot was taken
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Allowed drift for interval expectations
    #[must_use]
    pub const fn schedule_tolerance(&self) -> Duration {
        self.schedule_tolerance
    }

    /// Number of jobs in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the snapshot holds no jobs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
