//! Job-related error types.

use thiserror::Error;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Errors that can occur while recording jobs on the fake queue.
///
/// Matching never produces one of these: a failed match is reported through
/// the matcher's failure messages instead.
#[derive(Debug, Error)]
pub enum JobError {
    /// Arguments could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Arguments serialized to something other than a JSON array.
    #[error("job arguments must serialize to a JSON array, got {0}")]
    ArgumentsNotArray(String),

    /// A relative schedule lands outside the representable time range.
    #[error("scheduling {0} from now is out of range")]
    ScheduleOutOfRange(chrono::Duration),

    /// A global id URI could not be parsed.
    #[error("invalid global id: {0}")]
    InvalidGlobalId(String),
}
