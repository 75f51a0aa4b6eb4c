//! The enqueued-job matcher

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use std::fmt;

use super::{contain_exactly, ArgumentMatcher, Matcher};
use crate::jobs::{EnqueuedJob, EnqueuedJobs};

/// Time constraint on a matching job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    At(DateTime<Utc>),
    In(Duration),
}

/// How many jobs must match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Count {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Count {
    const fn accepts(self, matched: usize) -> bool {
        match self {
            Self::Exactly(n) => matched == n,
            Self::AtLeast(n) => matched >= n,
            Self::AtMost(n) => matched <= n,
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match *self {
            Self::Exactly(n) => ("exactly", n),
            Self::AtLeast(n) => ("at least", n),
            Self::AtMost(n) => ("at most", n),
        };
        match n {
            1 => write!(f, "{qualifier} once"),
            2 => write!(f, "{qualifier} twice"),
            n => write!(f, "{qualifier} {n} times"),
        }
    }
}

/// Expects a job with the given arguments among a worker's enqueued jobs
///
/// Built with [`have_enqueued_job`] or the
/// [`have_enqueued_job!`](crate::have_enqueued_job!) macro and checked
/// against an [`EnqueuedJobs`] snapshot. Arguments are compared
/// order-insensitively; wrapped application jobs are compared by the
/// arguments inside their payload.
///
/// Messages describe the last snapshot the matcher saw:
///
/// ```rust
/// use acton_job_matchers::jobs::FakeQueue;
/// use acton_job_matchers::matchers::Matcher;
/// use acton_job_matchers::{have_enqueued_job, Worker};
///
/// #[derive(Worker)]
/// struct HardWorker;
///
/// let queue = FakeQueue::new();
/// queue.perform_async::<HardWorker>(("string", 1)).unwrap();
///
/// let mut matcher = have_enqueued_job!["string", 2];
/// assert!(!matcher.matches(&queue.worker::<HardWorker>()));
/// assert_eq!(
///     matcher.failure_message(),
///     "expected to have an enqueued HardWorker job with arguments [\"string\", 2]\n\nfound: [[\"string\", 1]]"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HaveEnqueuedJob {
    expected: Vec<ArgumentMatcher>,
    schedule: Option<Schedule>,
    queue: Option<String>,
    count: Option<Count>,
    target: Option<String>,
    found: Vec<Vec<Value>>,
}

/// Expect a job enqueued with `expected` arguments
///
/// An empty list expects a job enqueued without arguments.
#[must_use]
pub fn have_enqueued_job<I, A>(expected: I) -> HaveEnqueuedJob
where
    I: IntoIterator<Item = A>,
    A: Into<ArgumentMatcher>,
{
    HaveEnqueuedJob::new(expected.into_iter().map(Into::into).collect())
}

impl HaveEnqueuedJob {
    /// Matcher expecting `expected` arguments
    #[must_use]
    pub const fn new(expected: Vec<ArgumentMatcher>) -> Self {
        Self {
            expected,
            schedule: None,
            queue: None,
            count: None,
            target: None,
            found: Vec::new(),
        }
    }

    /// Require the job to be scheduled at `at`, to the second
    ///
    /// Replaces an earlier [`in_interval`](Self::in_interval).
    #[must_use]
    pub const fn at(mut self, at: DateTime<Utc>) -> Self {
        self.schedule = Some(Schedule::At(at));
        self
    }

    /// Require the job to be scheduled `interval` from now
    ///
    /// "Now" is the time the snapshot was taken. The job may drift from it by
    /// the configured schedule tolerance. Replaces an earlier
    /// [`at`](Self::at).
    #[must_use]
    pub const fn in_interval(mut self, interval: Duration) -> Self {
        self.schedule = Some(Schedule::In(interval));
        self
    }

    /// Require the job to be on queue `queue`
    #[must_use]
    pub fn on_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Require exactly one matching job
    #[must_use]
    pub const fn once(self) -> Self {
        self.exactly(1)
    }

    /// Require exactly `n` matching jobs
    #[must_use]
    pub const fn exactly(mut self, n: usize) -> Self {
        self.count = Some(Count::Exactly(n));
        self
    }

    /// Require at least `n` matching jobs
    #[must_use]
    pub const fn at_least(mut self, n: usize) -> Self {
        self.count = Some(Count::AtLeast(n));
        self
    }

    /// Require at most `n` matching jobs
    #[must_use]
    pub const fn at_most(mut self, n: usize) -> Self {
        self.count = Some(Count::AtMost(n));
        self
    }

    /// Argument lists of every job in the last snapshot
    #[must_use]
    pub fn found(&self) -> &[Vec<Value>] {
        &self.found
    }

    fn job_matches(&self, job: &EnqueuedJob, jobs: &EnqueuedJobs) -> bool {
        if self.queue.as_deref().is_some_and(|queue| queue != job.queue()) {
            return false;
        }
        if !contain_exactly(&self.expected, job.arguments()) {
            return false;
        }

        match self.schedule {
            None => true,
            Some(Schedule::At(expected)) => job
                .at()
                .is_some_and(|at| at.timestamp() == expected.timestamp()),
            Some(Schedule::In(interval)) => {
                // An unrepresentable target time matches nothing
                let Some(expected) = jobs.now().checked_add_signed(interval) else {
                    return false;
                };
                job.at()
                    .is_some_and(|at| (at - expected).abs() <= jobs.schedule_tolerance())
            }
        }
    }
}

impl Matcher<EnqueuedJobs> for HaveEnqueuedJob {
    fn matches(&mut self, actual: &EnqueuedJobs) -> bool {
        self.target = Some(actual.target().to_string());
        self.found = actual
            .jobs()
            .iter()
            .map(|job| job.arguments().to_vec())
            .collect();

        let matched = actual
            .jobs()
            .iter()
            .filter(|job| {
                let matches = self.job_matches(job, actual);
                tracing::trace!(jid = %job.jid(), class = job.class(), matches, "Compared enqueued job");
                matches
            })
            .count();

        let result = self.count.map_or(matched > 0, |count| count.accepts(matched));
        tracing::debug!(target_worker = actual.target(), matched, result, "Matched enqueued jobs");
        result
    }

    fn description(&self) -> String {
        let mut description = match &self.target {
            Some(target) => format!("have an enqueued {target} job"),
            None => "have an enqueued job".to_string(),
        };
        description.push_str(" with arguments ");
        description.push_str(&render_list(&self.expected));

        if let Some(queue) = &self.queue {
            description.push_str(&format!(" on queue {queue}"));
        }
        match self.schedule {
            Some(Schedule::At(at)) => {
                description.push_str(&format!(" at {}", at.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }
            Some(Schedule::In(interval)) => {
                description.push_str(&format!(" in {}", render_interval(interval)));
            }
            None => {}
        }
        if let Some(count) = self.count {
            description.push_str(&format!(" {count}"));
        }
        description
    }

    fn failure_message(&self) -> String {
        let found: Vec<String> = self.found.iter().map(|args| render_list(args.as_slice())).collect();
        format!(
            "expected to {}\n\nfound: [{}]",
            self.description(),
            found.join(", ")
        )
    }

    fn failure_message_when_negated(&self) -> String {
        format!("expected to not {}", self.description())
    }
}

fn render_interval(interval: Duration) -> String {
    if interval.subsec_nanos() == 0 {
        format!("{}s", interval.num_seconds())
    } else {
        format!("{}ms", interval.num_milliseconds())
    }
}

fn render_list<T: fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
