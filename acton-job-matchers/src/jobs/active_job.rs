//! Application-level jobs on top of the worker queue.
//!
//! Application jobs are not pushed under their own class. The adapter pushes
//! a [`JOB_WRAPPER_CLASS`] job whose single argument is a payload describing
//! the real job:
//!
//! ```json
//! {
//!   "job_class": "ReportJob",
//!   "job_id": "6f1c...",
//!   "queue_name": "default",
//!   "arguments": ["someResource", {"_aj_globalid": "gid://acton/User/1"}]
//! }
//! ```
//!
//! The recorded [`EnqueuedJob`] remembers the application job class in
//! `wrapped`, and matchers compare against the payload's `arguments`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::{EnqueuedJob, FakeQueue, GlobalId, GlobalIdentifiable, JobId, JobResult};

/// Worker class every application job is pushed under.
pub const JOB_WRAPPER_CLASS: &str = "JobWrapper";

/// An application job class.
///
/// Derive it with `#[derive(ApplicationJob)]`, optionally with
/// `#[job(name = "...", queue = "...")]`.
pub trait ApplicationJob: 'static {
    /// Application job class name, recorded in the payload's `job_class`.
    const NAME: &'static str;

    /// Queue the job is pushed to.
    ///
    /// `None` uses the configured default queue.
    fn queue() -> Option<&'static str> {
        None
    }
}

/// One argument of an application job.
///
/// Resources are serialized as global id references; everything else is
/// passed through as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum JobArgument {
    /// Plain JSON value.
    Value(Value),
    /// Resource reference resolved against the configured application name.
    Resource {
        /// Model segment.
        model: String,
        /// Id segment.
        id: String,
    },
    /// Fully qualified resource reference.
    GlobalId(GlobalId),
}

impl JobArgument {
    /// Serialize any value into an argument.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn value(value: impl Serialize) -> JobResult<Self> {
        Ok(Self::Value(serde_json::to_value(value)?))
    }

    /// Reference `resource` by global id.
    #[must_use]
    pub fn resource<R: GlobalIdentifiable>(resource: &R) -> Self {
        Self::Resource {
            model: R::MODEL_NAME.to_string(),
            id: resource.global_key(),
        }
    }

    /// JSON form of the argument within application `app`.
    #[must_use]
    pub fn serialize(&self, app: &str) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Resource { model, id } => GlobalId::new(app, model, id).to_argument(),
            Self::GlobalId(gid) => gid.to_argument(),
        }
    }
}

impl From<Value> for JobArgument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<GlobalId> for JobArgument {
    fn from(gid: GlobalId) -> Self {
        Self::GlobalId(gid)
    }
}

impl From<&str> for JobArgument {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for JobArgument {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i32> for JobArgument {
    fn from(value: i32) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for JobArgument {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for JobArgument {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Enqueues application jobs and mail deliveries onto a [`FakeQueue`].
///
/// # Example
///
/// ```rust
/// use acton_job_matchers::jobs::{FakeQueue, JobAdapter};
/// use acton_job_matchers::ApplicationJob;
///
/// #[derive(ApplicationJob)]
/// struct ReportJob;
///
/// let queue = FakeQueue::new();
/// let adapter = JobAdapter::new(&queue);
/// adapter.perform_later::<ReportJob>(vec!["someResource".into()]);
///
/// let jobs = queue.all_jobs();
/// assert_eq!(jobs[0].wrapped(), Some("ReportJob"));
/// ```
#[derive(Clone)]
pub struct JobAdapter {
    queue: FakeQueue,
}

impl JobAdapter {
    /// Adapter pushing onto `queue`.
    #[must_use]
    pub fn new(queue: &FakeQueue) -> Self {
        Self {
            queue: queue.clone(),
        }
    }

    /// Enqueue `J` to run as soon as possible.
    pub fn perform_later<J: ApplicationJob>(&self, args: Vec<JobArgument>) -> JobId {
        self.enqueue_wrapped(J::NAME, J::queue(), args, None)
    }

    /// Enqueue `J` to run after `wait`.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::ScheduleOutOfRange`](super::JobError::ScheduleOutOfRange)
    /// if `now + wait` is out of range.
    pub fn perform_later_in<J: ApplicationJob>(
        &self,
        wait: Duration,
        args: Vec<JobArgument>,
    ) -> JobResult<JobId> {
        let at = self.queue.after(wait)?;
        Ok(self.enqueue_wrapped(J::NAME, J::queue(), args, Some(at)))
    }

    /// Enqueue `J` to run at `at`.
    pub fn perform_later_at<J: ApplicationJob>(&self, at: DateTime<Utc>, args: Vec<JobArgument>) -> JobId {
        self.enqueue_wrapped(J::NAME, J::queue(), args, Some(at))
    }

    pub(crate) fn queue(&self) -> &FakeQueue {
        &self.queue
    }

    pub(crate) fn enqueue_wrapped(
        &self,
        class: &str,
        queue: Option<&str>,
        args: Vec<JobArgument>,
        at: Option<DateTime<Utc>>,
    ) -> JobId {
        let config = self.queue.config();
        let queue = queue.unwrap_or(config.queues.default_queue.as_str()).to_string();
        let jid = JobId::new();
        let arguments: Vec<Value> = args
            .iter()
            .map(|arg| arg.serialize(&config.global_id.app))
            .collect();

        let payload = json!({
            "job_class": class,
            "job_id": jid.to_string(),
            "queue_name": queue,
            "arguments": arguments,
        });

        let now = self.queue.now();
        let mut job = EnqueuedJob::new(JOB_WRAPPER_CLASS, queue, vec![payload], now)
            .wrapping(class)
            .with_jid(jid);
        if let Some(at) = at.filter(|at| *at > now) {
            job = job.scheduled_at(at);
        }

        self.queue.push(job)
    }
}
