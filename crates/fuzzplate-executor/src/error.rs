//! Error types for template submission.

use thiserror::Error;

/// An orchestration service call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  #[error("request rejected: {message}")]
  Rejected { message: String },

  #[error("unknown job: {job_id}")]
  UnknownJob { job_id: uuid::Uuid },

  #[error("unknown prerequisite task: {task_id}")]
  UnknownTask { task_id: uuid::Uuid },
}

/// Submitting a rendered template failed.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// Submission was cancelled before it finished.
  #[error("execution cancelled")]
  Cancelled,

  #[error("failed to create notification on container '{container}': {source}")]
  Notification {
    container: String,
    #[source]
    source: ClientError,
  },

  #[error("failed to create job: {source}")]
  Job {
    #[source]
    source: ClientError,
  },

  #[error("failed to create task {index}: {source}")]
  Task {
    index: usize,
    #[source]
    source: ClientError,
  },
}
