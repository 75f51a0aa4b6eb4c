//! Worker identity.

/// A background worker whose jobs are recorded by the fake queue.
///
/// Workers are identified by [`NAME`](Self::NAME), which is what enqueued
/// jobs record as their class and what matcher messages print. Derive it
/// with `#[derive(Worker)]`:
///
/// ```rust
/// use acton_job_matchers::Worker;
///
/// #[derive(Worker)]
/// struct HardWorker;
///
/// #[derive(Worker)]
/// #[worker(name = "Reports::Nightly", queue = "low")]
/// struct NightlyReport;
///
/// assert_eq!(HardWorker::NAME, "HardWorker");
/// assert_eq!(NightlyReport::queue(), Some("low"));
/// ```
pub trait Worker: 'static {
    /// Class name recorded on enqueued jobs.
    const NAME: &'static str;

    /// Queue the worker's jobs are pushed to.
    ///
    /// `None` uses the configured default queue.
    fn queue() -> Option<&'static str> {
        None
    }
}
