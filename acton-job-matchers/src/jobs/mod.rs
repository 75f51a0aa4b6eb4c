//! Background jobs, recorded instead of run
//!
//! Code under test enqueues jobs through a [`FakeQueue`]:
//!
//! - [`Worker`] jobs via [`FakeQueue::perform_async`], [`FakeQueue::perform_in`]
//!   and [`FakeQueue::perform_at`]
//! - [`ApplicationJob`]s via [`JobAdapter::perform_later`], pushed as
//!   [`JOB_WRAPPER_CLASS`] jobs that wrap the real job's payload
//! - [`Mailer`] deliveries via [`JobAdapter::deliver_later`], recorded as
//!   [`MAIL_DELIVERY_JOB`] application jobs
//!
//! Tests then inspect the queue directly or through the matchers in
//! [`crate::matchers`].
//!
//! # Example
//!
//! ```rust
//! use acton_job_matchers::jobs::FakeQueue;
//! use acton_job_matchers::matchers::expect;
//! use acton_job_matchers::{have_enqueued_job, Worker};
//!
//! #[derive(Worker)]
//! struct HardWorker;
//!
//! let queue = FakeQueue::new();
//! queue.perform_async::<HardWorker>(("string", 1, true)).unwrap();
//!
//! expect(queue.worker::<HardWorker>()).to(have_enqueued_job!["string", 1, true]);
//! ```

mod active_job;
mod error;
mod global_id;
mod job;
mod mailer;
mod queue;
mod worker;

pub use active_job::{ApplicationJob, JobAdapter, JobArgument, JOB_WRAPPER_CLASS};
pub use error::{JobError, JobResult};
pub use global_id::{GlobalId, GlobalIdentifiable, GLOBAL_ID_KEY};
pub use job::{EnqueuedJob, JobId};
pub use mailer::{Mailer, DELIVER_NOW, MAIL_DELIVERY_JOB};
pub use queue::{serialize_arguments, EnqueuedJobs, FakeQueue, ALL_WORKERS};
pub use worker::Worker;
