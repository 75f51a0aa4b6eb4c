//! acton-job-matchers: assert on background jobs without running them
//!
//! Code under test enqueues jobs onto a [`FakeQueue`](jobs::FakeQueue), which
//! records them instead of executing anything. Tests then assert on what was
//! enqueued with [`have_enqueued_job!`]:
//!
//! - plain workers (`perform_async`, `perform_in`, `perform_at`)
//! - application jobs, wrapped into the worker queue by
//!   [`JobAdapter`](jobs::JobAdapter), with resources passed as global ids
//! - mail deliveries deferred with `deliver_later`
//!
//! # Quick Start
//!
//! ```rust
//! use acton_job_matchers::prelude::*;
//! use chrono::Duration;
//!
//! #[derive(Worker)]
//! struct HardWorker;
//!
//! #[derive(ApplicationJob)]
//! struct ReportJob;
//!
//! let queue = FakeQueue::new();
//! queue.perform_async::<HardWorker>(("string", 1, true)).unwrap();
//! queue.perform_in::<HardWorker>(Duration::minutes(3), ["later"]).unwrap();
//! JobAdapter::new(&queue).perform_later::<ReportJob>(vec!["someResource".into()]);
//!
//! expect(queue.worker::<HardWorker>()).to(have_enqueued_job!["string", 1, true]);
//! expect(queue.worker::<HardWorker>()).to(have_enqueued_job!["later"].in_interval(Duration::minutes(3)));
//! expect(queue.all_workers()).to(have_enqueued_job!["someResource"]);
//!
//! queue.clear_all();
//! expect(queue.all_workers()).not_to(have_enqueued_job!["someResource"]);
//! ```
//!
//! # Configuration
//!
//! Queue names, the global id application name and the schedule tolerance
//! come from [`config::JobMatchersConfig`]. See the [`config`] module for the
//! sources it is loaded from.

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

// The derive macros expand to `::acton_job_matchers::...` paths
extern crate self as acton_job_matchers;

pub mod clock;
pub mod config;
pub mod jobs;
pub mod matchers;
pub mod observability;

pub use acton_job_matchers_macros::{ApplicationJob, Mailer, Worker};
pub use jobs::{ApplicationJob, Mailer, Worker};

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_job_matchers::prelude::*;
    //! ```

    // Queue double and adapters
    pub use crate::jobs::{
        EnqueuedJob, EnqueuedJobs, FakeQueue, GlobalId, GlobalIdentifiable, JobAdapter, JobArgument,
        JobError, JobId, JobResult,
    };

    // Job identity traits and their derives
    pub use crate::{ApplicationJob, Mailer, Worker};

    // Matchers
    pub use crate::have_enqueued_job;
    pub use crate::matchers::argument::{
        a_boolean, a_float, a_hash, a_number, a_string, an_array, an_integer, anything,
        hash_including, null, satisfying,
    };
    pub use crate::matchers::{expect, have_enqueued_job, ArgumentMatcher, HaveEnqueuedJob, Matcher};

    // Time
    pub use crate::clock::{Clock, FrozenClock, SystemClock};

    // Convenience for JSON arguments
    pub use serde_json::json;
}
