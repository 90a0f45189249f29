use std::collections::BTreeMap;

use fuzzplate_config::{ContainerType, JobConfig, NotificationConfig, TaskContainers, TaskDetails, TaskPool};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference from one task to another.
///
/// Templates are written before any task exists, so they refer to earlier
/// tasks by their position in the task list. Rendering turns every
/// `Ordinal` into the identifier assigned to that task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRef {
  Ordinal(usize),
  Resolved(Uuid),
}

/// A task as declared in a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSkeleton {
  #[serde(default)]
  pub prereq_tasks: Vec<TaskRef>,
  pub task: TaskDetails,
  pub pool: TaskPool,
  pub containers: Vec<TaskContainers>,
  #[serde(default)]
  pub tags: BTreeMap<String, String>,
}

/// A notification to create on whichever container of `container_type` the
/// caller supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNotification {
  pub container_type: ContainerType,
  pub notification: NotificationConfig,
}

/// The patchable part of a template. Field paths are pointers into the JSON
/// form of this struct (`/job/...`, `/tasks/N/...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
  pub job: JobConfig,
  pub tasks: Vec<TaskSkeleton>,
  #[serde(default)]
  pub notifications: Vec<TemplateNotification>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_task_ref_json() {
    assert_eq!(serde_json::to_value(TaskRef::Ordinal(0)).unwrap(), json!({"ordinal": 0}));

    let id = Uuid::new_v4();
    let parsed: TaskRef = serde_json::from_value(json!({"resolved": id.to_string()})).unwrap();
    assert_eq!(parsed, TaskRef::Resolved(id));
  }
}
