//! Submitting rendered templates through the in-memory client.

use std::collections::BTreeMap;
use std::sync::Arc;

use fuzzplate_config::{ContainerType, NotificationConfig, NotificationTemplate, TaskContainers, TeamsTemplate};
use fuzzplate_executor::{ExecuteError, Executor, InMemoryClient};
use fuzzplate_template::{
  RenderedTemplate, TemplateNotification, TemplateRequest, UserValue, builtin, render,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn request() -> TemplateRequest {
  let mut user_fields = BTreeMap::new();
  for (name, value) in [
    ("project", "P"),
    ("name", "N"),
    ("build", "B"),
    ("pool_name", "linux"),
    ("target_exe", "fuzz.exe"),
  ] {
    user_fields.insert(name.to_string(), UserValue::from(value));
  }

  TemplateRequest {
    template_name: builtin::LIBFUZZER_BASIC.to_string(),
    user_fields,
    containers: vec![
      TaskContainers::new("mysetup", ContainerType::Setup),
      TaskContainers::new("mycrashes", ContainerType::Crashes),
      TaskContainers::new("myinputs", ContainerType::Inputs),
      TaskContainers::new("mynorepro", ContainerType::NoRepro),
      TaskContainers::new("myreports", ContainerType::Reports),
      TaskContainers::new("myuniq", ContainerType::UniqueReports),
      TaskContainers::new("myinputs", ContainerType::ReadonlyInputs),
      TaskContainers::new("mycoverage", ContainerType::Coverage),
    ],
  }
}

fn rendered(request: &TemplateRequest) -> RenderedTemplate {
  let template = builtin::libfuzzer_basic().unwrap();
  render(request, &template).unwrap()
}

#[tokio::test]
async fn test_execute_creates_job_and_tasks_in_order() {
  let request = request();
  let rendered = rendered(&request);
  let client = Arc::new(InMemoryClient::new());
  let executor = Executor::new(client.clone());

  let execution = executor
    .execute(&request, rendered, CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(execution.task_ids.len(), 3);
  assert!(execution.notifications.is_empty());

  let jobs = client.jobs().await;
  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0].0, execution.job_id);
  assert_eq!(jobs[0].1.project, "P");

  let tasks = client.tasks().await;
  assert_eq!(tasks.len(), 3);
  for (idx, (task_id, config)) in tasks.iter().enumerate() {
    assert_eq!(*task_id, execution.task_ids[idx]);
    assert_eq!(config.job_id, execution.job_id);
  }

  // Prerequisites point at the created fuzz task, not the render-time id.
  assert_eq!(tasks[0].1.prereq_tasks, None);
  assert_eq!(tasks[1].1.prereq_tasks, Some(vec![execution.task_ids[0]]));
  assert_eq!(tasks[2].1.prereq_tasks, Some(vec![execution.task_ids[0]]));
}

#[tokio::test]
async fn test_execute_creates_notifications_on_matching_containers() {
  let request = request();
  let mut rendered = rendered(&request);
  let notification = NotificationConfig {
    config: NotificationTemplate::Teams(TeamsTemplate {
      url: "https://example.invalid/hook".to_string(),
    }),
  };
  rendered.notifications.push(TemplateNotification {
    container_type: ContainerType::UniqueReports,
    notification: notification.clone(),
  });

  let client = Arc::new(InMemoryClient::new());
  let execution = Executor::new(client.clone())
    .execute(&request, rendered, CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(execution.notifications.len(), 1);
  assert_eq!(execution.notifications[0].container, "myuniq");
  assert_eq!(client.notifications().await, vec![("myuniq".to_string(), notification)]);
}

#[tokio::test]
async fn test_execute_passes_through_resolved_prerequisites() {
  let request = request();
  let mut rendered = rendered(&request);
  let external = Uuid::new_v4();
  rendered.tasks[0].config.prereq_tasks = Some(vec![external]);

  let client = Arc::new(InMemoryClient::new().with_task(external));
  Executor::new(client.clone())
    .execute(&request, rendered, CancellationToken::new())
    .await
    .unwrap();

  let tasks = client.tasks().await;
  assert_eq!(tasks[0].1.prereq_tasks, Some(vec![external]));
}

#[tokio::test]
async fn test_execute_reports_client_failure() {
  let request = request();
  let mut rendered = rendered(&request);
  rendered.tasks[0].config.prereq_tasks = Some(vec![Uuid::new_v4()]);

  let client = Arc::new(InMemoryClient::new());
  let err = Executor::new(client.clone())
    .execute(&request, rendered, CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(err, ExecuteError::Task { index: 0, .. }));
  assert_eq!(client.jobs().await.len(), 1);
  assert!(client.tasks().await.is_empty());
}

#[tokio::test]
async fn test_execute_rejected_job() {
  let request = request();
  let mut rendered = rendered(&request);
  rendered.job.project.clear();

  let err = Executor::new(Arc::new(InMemoryClient::new()))
    .execute(&request, rendered, CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(err, ExecuteError::Job { .. }));
}

#[tokio::test]
async fn test_execute_cancelled() {
  let request = request();
  let rendered = rendered(&request);
  let cancel = CancellationToken::new();
  cancel.cancel();

  let client = Arc::new(InMemoryClient::new());
  let err = Executor::new(client.clone())
    .execute(&request, rendered, cancel)
    .await
    .unwrap_err();

  assert!(matches!(err, ExecuteError::Cancelled));
  assert!(client.jobs().await.is_empty());
}
