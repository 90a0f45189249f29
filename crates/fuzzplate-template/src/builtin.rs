//! Templates that ship with fuzzplate.

use std::collections::BTreeMap;

use fuzzplate_config::{ContainerType, JobConfig, TaskContainers, TaskDetails, TaskPool, TaskType};

use crate::error::DefinitionError;
use crate::field::{FieldLocation, FieldType, UserField};
use crate::skeleton::{TaskRef, TaskSkeleton};
use crate::template::{Template, TemplateDef};

pub const LIBFUZZER_BASIC: &str = "libfuzzer_basic";

/// Every built-in template, keyed by name.
pub fn all() -> Result<Vec<(&'static str, Template)>, DefinitionError> {
  Ok(vec![(LIBFUZZER_BASIC, libfuzzer_basic()?)])
}

fn task(task_type: TaskType, prereq_tasks: Vec<TaskRef>, containers: &[ContainerType]) -> TaskSkeleton {
  TaskSkeleton {
    prereq_tasks,
    task: TaskDetails::new(task_type, 1, ""),
    pool: TaskPool {
      count: 1,
      pool_name: String::new(),
    },
    containers: containers.iter().map(|t| TaskContainers::unbound(*t)).collect(),
    tags: BTreeMap::new(),
  }
}

/// Paths for `suffix` under each of the first `count` tasks.
fn per_task(count: usize, suffix: &str) -> Vec<String> {
  (0..count).map(|idx| format!("/tasks/{idx}/{suffix}")).collect()
}

fn replacing_all(name: &str, field_type: FieldType, paths: Vec<String>) -> UserField {
  UserField::new(name, field_type, paths.into_iter().map(FieldLocation::replace).collect())
}

/// Fuzz, crash-report and coverage tasks for a libFuzzer target. The report
/// and coverage tasks wait on the fuzzing task.
pub fn libfuzzer_basic() -> Result<Template, DefinitionError> {
  let tasks = vec![
    task(
      TaskType::LibfuzzerFuzz,
      vec![],
      &[ContainerType::Setup, ContainerType::Crashes, ContainerType::Inputs],
    ),
    task(
      TaskType::LibfuzzerCrashReport,
      vec![TaskRef::Ordinal(0)],
      &[
        ContainerType::Setup,
        ContainerType::Crashes,
        ContainerType::NoRepro,
        ContainerType::Reports,
        ContainerType::UniqueReports,
      ],
    ),
    task(
      TaskType::LibfuzzerCoverage,
      vec![TaskRef::Ordinal(0)],
      &[ContainerType::Setup, ContainerType::ReadonlyInputs, ContainerType::Coverage],
    ),
  ];
  let count = tasks.len();

  let mut duration = per_task(count, "task/duration");
  duration.push("/job/duration".to_string());

  Template::new(TemplateDef {
    job: JobConfig {
      project: String::new(),
      name: String::new(),
      build: String::new(),
      duration: 1,
      logs: None,
    },
    tasks,
    notifications: vec![],
    required_fields: vec![
      replacing_all("pool_name", FieldType::Str, per_task(count, "pool/pool_name")),
      replacing_all("target_exe", FieldType::Str, per_task(count, "task/target_exe")),
    ],
    optional_fields: vec![
      replacing_all("duration", FieldType::Int, duration),
      UserField::replacing("target_workers", FieldType::Int, &["/tasks/0/task/target_workers"]),
      UserField::replacing("vm_count", FieldType::Int, &["/tasks/0/pool/count"]),
      replacing_all("target_options", FieldType::ListStr, per_task(count, "task/target_options")),
      replacing_all("target_env", FieldType::DictStr, per_task(count, "task/target_env")),
      replacing_all(
        "reboot_after_setup",
        FieldType::Bool,
        per_task(count, "task/reboot_after_setup"),
      ),
      UserField::replacing("check_retry_count", FieldType::Int, &["/tasks/1/task/check_retry_count"]),
      UserField::replacing("target_timeout", FieldType::Int, &["/tasks/1/task/target_timeout"]),
      UserField::new(
        "tags",
        FieldType::DictStr,
        per_task(count, "tags").into_iter().map(FieldLocation::add).collect(),
      ),
    ],
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_libfuzzer_basic_is_valid() {
    let template = libfuzzer_basic().unwrap();
    assert_eq!(template.tasks().len(), 3);
    assert_eq!(template.tasks()[1].prereq_tasks, vec![TaskRef::Ordinal(0)]);
    assert_eq!(template.required_fields().len(), 2);
    assert_eq!(template.optional_fields().len(), 9);
  }

  #[test]
  fn test_duration_reaches_job() {
    let template = libfuzzer_basic().unwrap();
    let duration = template
      .optional_fields()
      .iter()
      .find(|f| f.name == "duration")
      .unwrap();

    assert_eq!(duration.locations.len(), 4);
    assert_eq!(duration.locations[3].path, "/job/duration");
  }

  #[test]
  fn test_all_names() {
    let names: Vec<&str> = all().unwrap().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec![LIBFUZZER_BASIC]);
  }
}
