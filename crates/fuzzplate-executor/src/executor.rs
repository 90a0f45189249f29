//! Executor implementation.

use std::collections::HashMap;
use std::sync::Arc;

use fuzzplate_template::{RenderedTemplate, TemplateRequest};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::client::{Notification, OrchestrationClient};
use crate::error::ExecuteError;

/// Identifiers of everything created for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
  pub job_id: Uuid,
  pub notifications: Vec<Notification>,
  /// Created task ids, in template declaration order.
  pub task_ids: Vec<Uuid>,
}

/// Submits rendered templates through an [`OrchestrationClient`].
pub struct Executor {
  client: Arc<dyn OrchestrationClient>,
}

impl Executor {
  pub fn new(client: Arc<dyn OrchestrationClient>) -> Self {
    Self { client }
  }

  /// Create the template's notifications, its job, then its tasks in
  /// declaration order.
  ///
  /// Each task is created with the new job's id, and its prerequisites are
  /// re-targeted from render-time task ids to the ids the service returned
  /// for those tasks. Prerequisites that were not assigned at render time are
  /// passed through as-is.
  #[instrument(
    name = "template_execute",
    skip(self, request, rendered, cancel),
    fields(template_name = %request.template_name)
  )]
  pub async fn execute(
    &self,
    request: &TemplateRequest,
    rendered: RenderedTemplate,
    cancel: CancellationToken,
  ) -> Result<Execution, ExecuteError> {
    let result = self.execute_inner(request, rendered, &cancel).await;

    match &result {
      Ok(execution) => {
        info!(
          job_id = %execution.job_id,
          tasks = execution.task_ids.len(),
          "template_executed"
        );
      }
      Err(e) => {
        error!(error = %e, "template_execute_failed");
      }
    }

    result
  }

  async fn execute_inner(
    &self,
    request: &TemplateRequest,
    rendered: RenderedTemplate,
    cancel: &CancellationToken,
  ) -> Result<Execution, ExecuteError> {
    let mut notifications = Vec::new();
    for template_notification in &rendered.notifications {
      for container in request
        .containers
        .iter()
        .filter(|c| c.container_type == template_notification.container_type)
      {
        check_cancelled(cancel)?;
        let notification = self
          .client
          .create_notification(&container.name, &template_notification.notification)
          .await
          .map_err(|source| ExecuteError::Notification {
            container: container.name.clone(),
            source,
          })?;

        info!(
          container = %container.name,
          notification_id = %notification.notification_id,
          "notification_created"
        );
        notifications.push(notification);
      }
    }

    check_cancelled(cancel)?;
    let job = self
      .client
      .create_job(&rendered.job)
      .await
      .map_err(|source| ExecuteError::Job { source })?;
    info!(job_id = %job.job_id, "job_created");

    let mut created: HashMap<Uuid, Uuid> = HashMap::new();
    let mut task_ids = Vec::with_capacity(rendered.tasks.len());

    for (index, rendered_task) in rendered.tasks.into_iter().enumerate() {
      check_cancelled(cancel)?;

      let mut config = rendered_task.config;
      config.job_id = job.job_id;
      if let Some(prereqs) = config.prereq_tasks.as_mut() {
        for prereq in prereqs.iter_mut() {
          if let Some(task_id) = created.get(prereq) {
            *prereq = *task_id;
          }
        }
      }

      let task = self
        .client
        .create_task(&config)
        .await
        .map_err(|source| ExecuteError::Task { index, source })?;

      info!(
        index,
        task_id = %task.task_id,
        task_type = ?config.task.task_type,
        "task_created"
      );

      created.insert(rendered_task.task_id, task.task_id);
      task_ids.push(task.task_id);
    }

    Ok(Execution {
      job_id: job.job_id,
      notifications,
      task_ids,
    })
  }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), ExecuteError> {
  if cancel.is_cancelled() {
    return Err(ExecuteError::Cancelled);
  }
  Ok(())
}
