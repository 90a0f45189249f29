use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::TaskContainers;
use crate::enums::TaskType;

/// What a task runs and how.
///
/// Fields that are `None` serialize as `null` so they stay addressable by a
/// JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
  #[serde(rename = "type")]
  pub task_type: TaskType,
  /// Lifetime of the task in hours.
  pub duration: u64,
  pub target_exe: String,
  #[serde(default)]
  pub target_env: BTreeMap<String, String>,
  #[serde(default)]
  pub target_options: Vec<String>,
  #[serde(default)]
  pub target_workers: Option<u64>,
  #[serde(default)]
  pub target_timeout: Option<u64>,
  #[serde(default)]
  pub check_retry_count: Option<u64>,
  #[serde(default)]
  pub check_asan_log: Option<bool>,
  #[serde(default)]
  pub check_debugger: Option<bool>,
  #[serde(default)]
  pub check_fuzzer_help: Option<bool>,
  #[serde(default)]
  pub rename_output: Option<bool>,
  #[serde(default)]
  pub reboot_after_setup: Option<bool>,
}

impl TaskDetails {
  /// Details with every optional knob left unset.
  pub fn new(task_type: TaskType, duration: u64, target_exe: impl Into<String>) -> Self {
    Self {
      task_type,
      duration,
      target_exe: target_exe.into(),
      target_env: BTreeMap::new(),
      target_options: Vec::new(),
      target_workers: None,
      target_timeout: None,
      check_retry_count: None,
      check_asan_log: None,
      check_debugger: None,
      check_fuzzer_help: None,
      rename_output: None,
      reboot_after_setup: None,
    }
  }
}

/// Where a task runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPool {
  pub count: u64,
  pub pool_name: String,
}

/// Task configuration passed to the service's create-task call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
  pub job_id: Uuid,
  #[serde(default)]
  pub prereq_tasks: Option<Vec<Uuid>>,
  pub task: TaskDetails,
  pub pool: TaskPool,
  pub containers: Vec<TaskContainers>,
  #[serde(default)]
  pub tags: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unset_options_serialize_as_null() {
    let details = TaskDetails::new(TaskType::LibfuzzerFuzz, 1, "fuzz.exe");
    let value = serde_json::to_value(&details).unwrap();

    assert_eq!(value["type"], "libfuzzer_fuzz");
    assert!(value.get("target_workers").is_some());
    assert!(value["target_workers"].is_null());
    assert!(value["reboot_after_setup"].is_null());
  }

  #[test]
  fn test_task_details_defaults_on_parse() {
    let details: TaskDetails = serde_json::from_value(serde_json::json!({
      "type": "libfuzzer_coverage",
      "duration": 24,
      "target_exe": "fuzz.exe"
    }))
    .unwrap();

    assert_eq!(details.task_type, TaskType::LibfuzzerCoverage);
    assert!(details.target_env.is_empty());
    assert_eq!(details.target_workers, None);
  }
}
