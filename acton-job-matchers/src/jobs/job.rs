//! Enqueued job descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an enqueued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new random job ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for JobId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<JobId> for Uuid {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// A recorded intent to run a worker with given arguments.
///
/// Descriptors are immutable once captured. They live as long as the
/// [`FakeQueue`](crate::jobs::FakeQueue) that recorded them, which tests
/// clear between scenarios.
///
/// Jobs produced by the application-job adapter carry the application job
/// class in [`wrapped`](Self::wrapped) and a single payload argument whose
/// `arguments` array holds the real arguments. [`arguments`](Self::arguments)
/// unwraps that payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnqueuedJob {
    jid: JobId,
    class: String,
    queue: String,
    args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    at: Option<DateTime<Utc>>,
    enqueued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wrapped: Option<String>,
}

impl EnqueuedJob {
    /// Describe an immediate job for `class` on `queue`.
    #[must_use]
    pub fn new(
        class: impl Into<String>,
        queue: impl Into<String>,
        args: Vec<Value>,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            jid: JobId::new(),
            class: class.into(),
            queue: queue.into(),
            args,
            at: None,
            enqueued_at,
            wrapped: None,
        }
    }

    /// Schedule the job for `at`.
    #[must_use]
    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }

    /// Mark the job as a wrapper around the application job class `class`.
    #[must_use]
    pub fn wrapping(mut self, class: impl Into<String>) -> Self {
        self.wrapped = Some(class.into());
        self
    }

    /// Use a specific job id instead of a random one.
    #[must_use]
    pub fn with_jid(mut self, jid: JobId) -> Self {
        self.jid = jid;
        self
    }

    /// Job id.
    #[must_use]
    pub const fn jid(&self) -> JobId {
        self.jid
    }

    /// Worker class name the job was recorded under.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Queue the job was pushed to.
    #[must_use]
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Raw argument list as pushed to the queue.
    #[must_use]
    pub fn raw_args(&self) -> &[Value] {
        &self.args
    }

    /// Scheduled execution time, `None` for immediate jobs.
    #[must_use]
    pub const fn at(&self) -> Option<DateTime<Utc>> {
        self.at
    }

    /// When the job was recorded.
    #[must_use]
    pub const fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    /// Application job class, for jobs recorded by the adapter.
    #[must_use]
    pub fn wrapped(&self) -> Option<&str> {
        self.wrapped.as_deref()
    }

    /// Whether the job has a scheduled execution time.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.at.is_some()
    }

    /// Arguments the job will be performed with.
    ///
    /// For wrapped jobs this is the payload's `arguments` array; for plain
    /// worker jobs it is the raw argument list.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        if self.wrapped.is_none() {
            return &self.args;
        }

        match self.args.as_slice() {
            [payload] => payload
                .get("arguments")
                .and_then(Value::as_array)
                .map_or(self.args.as_slice(), Vec::as_slice),
            _ => &self.args,
        }
    }
}
