use async_trait::async_trait;
use fuzzplate_config::{JobConfig, NotificationConfig, TaskConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;

/// A notification registered on a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub container: String,
}

/// A created job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub job_id: Uuid,
}

/// A created task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub task_id: Uuid,
  pub job_id: Uuid,
}

/// The subset of the orchestration service's API used to submit a template.
#[async_trait]
pub trait OrchestrationClient: Send + Sync {
  /// Attach a notification to the named container.
  async fn create_notification(
    &self,
    container: &str,
    config: &NotificationConfig,
  ) -> Result<Notification, ClientError>;

  async fn create_job(&self, config: &JobConfig) -> Result<Job, ClientError>;

  /// Create a task. `config.job_id` and `config.prereq_tasks` must already
  /// name objects the service created.
  async fn create_task(&self, config: &TaskConfig) -> Result<Task, ClientError>;
}
