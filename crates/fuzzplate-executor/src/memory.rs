use std::collections::HashSet;

use async_trait::async_trait;
use fuzzplate_config::{JobConfig, NotificationConfig, TaskConfig};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::{Job, Notification, OrchestrationClient, Task};
use crate::error::ClientError;

#[derive(Debug, Default)]
struct State {
  notifications: Vec<(String, NotificationConfig)>,
  jobs: Vec<(Uuid, JobConfig)>,
  tasks: Vec<(Uuid, TaskConfig)>,
  known_tasks: HashSet<Uuid>,
}

/// An [`OrchestrationClient`] that keeps everything in memory.
///
/// Ids are random v4 UUIDs. Tasks are checked against created jobs and
/// tasks, so a dangling `job_id` or prerequisite is rejected the way the
/// service would reject it. Ids registered with [`InMemoryClient::with_task`]
/// count as existing tasks.
#[derive(Debug, Default)]
pub struct InMemoryClient {
  state: Mutex<State>,
}

impl InMemoryClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Treat `task_id` as a task created outside this client.
  pub fn with_task(mut self, task_id: Uuid) -> Self {
    self.state.get_mut().known_tasks.insert(task_id);
    self
  }

  pub async fn notifications(&self) -> Vec<(String, NotificationConfig)> {
    self.state.lock().await.notifications.clone()
  }

  pub async fn jobs(&self) -> Vec<(Uuid, JobConfig)> {
    self.state.lock().await.jobs.clone()
  }

  pub async fn tasks(&self) -> Vec<(Uuid, TaskConfig)> {
    self.state.lock().await.tasks.clone()
  }
}

#[async_trait]
impl OrchestrationClient for InMemoryClient {
  async fn create_notification(
    &self,
    container: &str,
    config: &NotificationConfig,
  ) -> Result<Notification, ClientError> {
    let mut state = self.state.lock().await;
    state.notifications.push((container.to_string(), config.clone()));

    Ok(Notification {
      notification_id: Uuid::new_v4(),
      container: container.to_string(),
    })
  }

  async fn create_job(&self, config: &JobConfig) -> Result<Job, ClientError> {
    if config.project.is_empty() || config.name.is_empty() {
      return Err(ClientError::Rejected {
        message: "job project and name must be set".to_string(),
      });
    }

    let job_id = Uuid::new_v4();
    self.state.lock().await.jobs.push((job_id, config.clone()));
    Ok(Job { job_id })
  }

  async fn create_task(&self, config: &TaskConfig) -> Result<Task, ClientError> {
    let mut state = self.state.lock().await;

    if !state.jobs.iter().any(|(job_id, _)| *job_id == config.job_id) {
      return Err(ClientError::UnknownJob { job_id: config.job_id });
    }

    for prereq in config.prereq_tasks.iter().flatten() {
      if !state.known_tasks.contains(prereq) {
        return Err(ClientError::UnknownTask { task_id: *prereq });
      }
    }

    let task_id = Uuid::new_v4();
    state.tasks.push((task_id, config.clone()));
    state.known_tasks.insert(task_id);

    Ok(Task {
      task_id,
      job_id: config.job_id,
    })
  }
}
