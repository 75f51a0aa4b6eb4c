//! Mail deliveries as application jobs.
//!
//! `deliver_later` records a [`MAIL_DELIVERY_JOB`] application job on the
//! configured mailer queue. Its arguments are the mailer class, the mailer
//! method, the delivery method ([`DELIVER_NOW`]) and then the method's own
//! arguments, so a test can match a delivery like any other job:
//!
//! ```rust
//! use acton_job_matchers::jobs::{FakeQueue, JobAdapter};
//! use acton_job_matchers::matchers::expect;
//! use acton_job_matchers::{have_enqueued_job, Mailer};
//!
//! #[derive(Mailer)]
//! struct AccountMailer;
//!
//! let queue = FakeQueue::new();
//! JobAdapter::new(&queue).deliver_later::<AccountMailer>("welcome", vec![]);
//!
//! expect(queue.all_workers()).to(have_enqueued_job!["AccountMailer", "welcome", "deliver_now"]);
//! ```

use chrono::{DateTime, Duration, Utc};

use super::{JobAdapter, JobArgument, JobId, JobResult};

/// Application job class mail deliveries are recorded under.
pub const MAIL_DELIVERY_JOB: &str = "MailDeliveryJob";

/// Delivery method recorded for deferred deliveries.
pub const DELIVER_NOW: &str = "deliver_now";

/// A mailer class.
///
/// Derive it with `#[derive(Mailer)]`, optionally with
/// `#[mailer(name = "...")]`.
pub trait Mailer: 'static {
    /// Mailer class name, recorded as the delivery's first argument.
    const NAME: &'static str;
}

impl JobAdapter {
    /// Deliver `method` of mailer `M` in the background.
    pub fn deliver_later<M: Mailer>(&self, method: &str, args: Vec<JobArgument>) -> JobId {
        self.enqueue_delivery::<M>(method, args, None)
    }

    /// Deliver `method` of mailer `M` after `wait`.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::ScheduleOutOfRange`](super::JobError::ScheduleOutOfRange)
    /// if `now + wait` is out of range.
    pub fn deliver_later_in<M: Mailer>(
        &self,
        method: &str,
        wait: Duration,
        args: Vec<JobArgument>,
    ) -> JobResult<JobId> {
        let at = self.queue().after(wait)?;
        Ok(self.enqueue_delivery::<M>(method, args, Some(at)))
    }

    /// Deliver `method` of mailer `M` at `at`.
    pub fn deliver_later_at<M: Mailer>(
        &self,
        method: &str,
        at: DateTime<Utc>,
        args: Vec<JobArgument>,
    ) -> JobId {
        self.enqueue_delivery::<M>(method, args, Some(at))
    }

    fn enqueue_delivery<M: Mailer>(
        &self,
        method: &str,
        args: Vec<JobArgument>,
        at: Option<DateTime<Utc>>,
    ) -> JobId {
        let mailer_queue = self.queue().config().queues.mailer_queue.clone();
        let mut arguments = Vec::with_capacity(args.len() + 3);
        arguments.push(JobArgument::from(M::NAME));
        arguments.push(JobArgument::from(method));
        arguments.push(JobArgument::from(DELIVER_NOW));
        arguments.extend(args);

        tracing::debug!(mailer = M::NAME, method, "Deferring mail delivery");
        self.enqueue_wrapped(MAIL_DELIVERY_JOB, Some(&mailer_queue), arguments, at)
    }
}
