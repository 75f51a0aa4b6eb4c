//! Assertions over enqueued jobs
//!
//! A [`Matcher`] inspects a value and explains itself: a description of
//! what it expects, and failure messages for both the positive and the
//! negated assertion. [`expect`] turns a failed match into a test panic.
//!
//! # Example
//!
//! ```rust
//! use acton_job_matchers::jobs::FakeQueue;
//! use acton_job_matchers::matchers::argument::{a_hash, a_string, an_integer};
//! use acton_job_matchers::matchers::expect;
//! use acton_job_matchers::{have_enqueued_job, Worker};
//! use chrono::Duration;
//! use serde_json::json;
//!
//! #[derive(Worker)]
//! struct HardWorker;
//!
//! let queue = FakeQueue::new();
//! queue
//!     .perform_async::<HardWorker>(json!(["string", 1, true, { "key": "value" }]))
//!     .unwrap();
//! queue.perform_in::<HardWorker>(Duration::minutes(3), ["later"]).unwrap();
//!
//! expect(queue.worker::<HardWorker>()).to(have_enqueued_job![a_string(), an_integer(), true, a_hash()]);
//! expect(queue.worker::<HardWorker>()).to(have_enqueued_job!["later"].in_interval(Duration::minutes(3)));
//! expect(queue.all_workers()).not_to(have_enqueued_job!["missing"]);
//! ```

pub mod argument;
mod contain_exactly;
mod have_enqueued_job;

pub use argument::ArgumentMatcher;
pub use contain_exactly::contain_exactly;
pub use have_enqueued_job::{have_enqueued_job, HaveEnqueuedJob};

/// A reusable expectation about values of type `A`
///
/// `matches` takes `&mut self` so the messages can report what the last
/// match saw.
pub trait Matcher<A: ?Sized> {
    /// Whether `actual` satisfies the expectation
    fn matches(&mut self, actual: &A) -> bool;

    /// What the matcher expects, without the "expected to" prefix
    fn description(&self) -> String;

    /// Message for a failed positive assertion
    fn failure_message(&self) -> String {
        format!("expected to {}", self.description())
    }

    /// Message for a failed negated assertion
    fn failure_message_when_negated(&self) -> String {
        format!("expected to not {}", self.description())
    }
}

/// The subject of an assertion
#[derive(Debug)]
#[must_use = "an expectation does nothing until `to` or `not_to` is called"]
pub struct Expectation<A> {
    actual: A,
}

/// Start an assertion about `actual`
pub const fn expect<A>(actual: A) -> Expectation<A> {
    Expectation { actual }
}

impl<A> Expectation<A> {
    /// Assert that `matcher` matches
    ///
    /// # Panics
    ///
    /// Panics with the matcher's failure message when it does not match.
    #[track_caller]
    pub fn to<M: Matcher<A>>(self, mut matcher: M) {
        if !matcher.matches(&self.actual) {
            panic!("{}", matcher.failure_message());
        }
    }

    /// Assert that `matcher` does not match
    ///
    /// # Panics
    ///
    /// Panics with the matcher's negated failure message when it matches.
    #[track_caller]
    pub fn not_to<M: Matcher<A>>(self, mut matcher: M) {
        if matcher.matches(&self.actual) {
            panic!("{}", matcher.failure_message_when_negated());
        }
    }
}

/// Build a [`HaveEnqueuedJob`] matcher from a list of expected arguments
///
/// Each argument is anything convertible into an
/// [`ArgumentMatcher`](crate::matchers::ArgumentMatcher): literals, JSON
/// values, or matchers such as `a_string()`. With no arguments the matcher
/// expects a job enqueued without arguments.
///
/// ```rust
/// use acton_job_matchers::have_enqueued_job;
/// use acton_job_matchers::matchers::argument::anything;
/// use acton_job_matchers::matchers::Matcher;
///
/// let matcher = have_enqueued_job!["string", 1, true, anything()];
/// assert_eq!(
///     matcher.description(),
///     "have an enqueued job with arguments [\"string\", 1, true, anything]"
/// );
/// ```
#[macro_export]
macro_rules! have_enqueued_job {
    () => {
        $crate::matchers::HaveEnqueuedJob::new(::std::vec::Vec::new())
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::matchers::HaveEnqueuedJob::new(::std::vec![
            $($crate::matchers::ArgumentMatcher::from($arg)),+
        ])
    };
}
