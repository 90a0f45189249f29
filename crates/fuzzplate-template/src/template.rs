use std::collections::HashSet;

use fuzzplate_config::JobConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DefinitionError;
use crate::field::{UserField, base_fields};
use crate::patch::probe;
use crate::skeleton::{Skeleton, TaskRef, TaskSkeleton, TemplateNotification};

/// An unvalidated template, as written by a template author or read from a
/// template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDef {
  pub job: JobConfig,
  pub tasks: Vec<TaskSkeleton>,
  #[serde(default)]
  pub notifications: Vec<TemplateNotification>,
  #[serde(default)]
  pub required_fields: Vec<UserField>,
  #[serde(default)]
  pub optional_fields: Vec<UserField>,
}

/// A validated template.
///
/// Construction guarantees that across the base, required and optional
/// fields every name and every location path is unique, every location
/// resolves against the skeleton, and every task only depends on tasks
/// declared before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateDef")]
pub struct Template {
  #[serde(flatten)]
  skeleton: Skeleton,
  required_fields: Vec<UserField>,
  optional_fields: Vec<UserField>,
}

impl Template {
  pub fn new(def: TemplateDef) -> Result<Self, DefinitionError> {
    let template = Self {
      skeleton: Skeleton {
        job: def.job,
        tasks: def.tasks,
        notifications: def.notifications,
      },
      required_fields: def.required_fields,
      optional_fields: def.optional_fields,
    };

    template.check_fields()?;
    template.check_task_prereqs()?;
    template.check_locations()?;

    Ok(template)
  }

  pub fn skeleton(&self) -> &Skeleton {
    &self.skeleton
  }

  pub fn job(&self) -> &JobConfig {
    &self.skeleton.job
  }

  pub fn tasks(&self) -> &[TaskSkeleton] {
    &self.skeleton.tasks
  }

  pub fn notifications(&self) -> &[TemplateNotification] {
    &self.skeleton.notifications
  }

  pub fn required_fields(&self) -> &[UserField] {
    &self.required_fields
  }

  pub fn optional_fields(&self) -> &[UserField] {
    &self.optional_fields
  }

  /// Base, required and optional fields in declaration order, each paired
  /// with whether the caller must supply it.
  pub fn fields(&self) -> impl Iterator<Item = (&UserField, bool)> {
    base_fields()
      .iter()
      .chain(self.required_fields.iter())
      .map(|field| (field, true))
      .chain(self.optional_fields.iter().map(|field| (field, false)))
  }

  /// The skeleton as a fresh JSON document, the target of field patches.
  pub fn skeleton_document(&self) -> Result<Value, serde_json::Error> {
    serde_json::to_value(&self.skeleton)
  }

  fn check_fields(&self) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    let mut seen_path = HashSet::new();

    for (field, _) in self.fields() {
      if field.locations.is_empty() {
        return Err(DefinitionError::NoLocations {
          name: field.name.clone(),
        });
      }

      if !seen.insert(field.name.as_str()) {
        return Err(DefinitionError::DuplicateField {
          name: field.name.clone(),
        });
      }

      for location in &field.locations {
        if !seen_path.insert(location.path.as_str()) {
          return Err(DefinitionError::DuplicatePath {
            name: field.name.clone(),
            path: location.path.clone(),
          });
        }
      }
    }

    Ok(())
  }

  fn check_task_prereqs(&self) -> Result<(), DefinitionError> {
    for (idx, task) in self.skeleton.tasks.iter().enumerate() {
      for prereq in &task.prereq_tasks {
        if let TaskRef::Ordinal(reference) = *prereq
          && reference >= idx
        {
          return Err(DefinitionError::InvalidTaskReference { task: idx, reference });
        }
      }
    }
    Ok(())
  }

  fn check_locations(&self) -> Result<(), DefinitionError> {
    let document = self
      .skeleton_document()
      .map_err(|e| DefinitionError::Serialization { message: e.to_string() })?;

    for (field, _) in self.fields() {
      for location in &field.locations {
        probe(&document, location.op, &location.path).map_err(|source| {
          DefinitionError::UnresolvablePath {
            name: field.name.clone(),
            path: location.path.clone(),
            source,
          }
        })?;
      }
    }

    Ok(())
  }
}

impl TryFrom<TemplateDef> for Template {
  type Error = DefinitionError;

  fn try_from(def: TemplateDef) -> Result<Self, Self::Error> {
    Template::new(def)
  }
}

#[cfg(test)]
mod tests {
  use fuzzplate_config::{ContainerType, TaskContainers, TaskDetails, TaskPool, TaskType};

  use super::*;
  use crate::field::{FieldLocation, FieldType};

  fn task(prereq_tasks: Vec<TaskRef>) -> TaskSkeleton {
    TaskSkeleton {
      prereq_tasks,
      task: TaskDetails::new(TaskType::LibfuzzerFuzz, 1, ""),
      pool: TaskPool {
        count: 1,
        pool_name: String::new(),
      },
      containers: vec![TaskContainers::unbound(ContainerType::Setup)],
      tags: Default::default(),
    }
  }

  fn def(tasks: Vec<TaskSkeleton>, required_fields: Vec<UserField>) -> TemplateDef {
    TemplateDef {
      job: JobConfig {
        project: String::new(),
        name: String::new(),
        build: String::new(),
        duration: 1,
        logs: None,
      },
      tasks,
      notifications: vec![],
      required_fields,
      optional_fields: vec![],
    }
  }

  #[test]
  fn test_valid_template() {
    let required = vec![UserField::replacing(
      "pool_name",
      FieldType::Str,
      &["/tasks/0/pool/pool_name", "/tasks/1/pool/pool_name"],
    )];
    let template = Template::new(def(vec![task(vec![]), task(vec![TaskRef::Ordinal(0)])], required)).unwrap();

    assert_eq!(template.tasks().len(), 2);
    let names: Vec<&str> = template.fields().map(|(f, _)| f.name.as_str()).collect();
    assert_eq!(names, vec!["project", "name", "build", "pool_name"]);
  }

  #[test]
  fn test_duplicate_field_name() {
    let required = vec![UserField::replacing("project", FieldType::Str, &["/tasks/0/pool/pool_name"])];
    let err = Template::new(def(vec![task(vec![])], required)).unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateField { name } if name == "project"));
  }

  #[test]
  fn test_duplicate_path() {
    let required = vec![UserField::replacing("label", FieldType::Str, &["/job/name"])];
    let err = Template::new(def(vec![task(vec![])], required)).unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicatePath { path, .. } if path == "/job/name"));
  }

  #[test]
  fn test_duplicate_path_within_one_field() {
    let required = vec![UserField::replacing(
      "pool_name",
      FieldType::Str,
      &["/tasks/0/pool/pool_name", "/tasks/0/pool/pool_name"],
    )];
    let err = Template::new(def(vec![task(vec![])], required)).unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicatePath { .. }));
  }

  #[test]
  fn test_field_without_locations() {
    let required = vec![UserField::new("pool_name", FieldType::Str, vec![])];
    let err = Template::new(def(vec![task(vec![])], required)).unwrap_err();
    assert!(matches!(err, DefinitionError::NoLocations { .. }));
  }

  #[test]
  fn test_self_reference_rejected() {
    let err = Template::new(def(vec![task(vec![TaskRef::Ordinal(0)])], vec![])).unwrap_err();
    assert!(matches!(
      err,
      DefinitionError::InvalidTaskReference { task: 0, reference: 0 }
    ));
  }

  #[test]
  fn test_forward_reference_rejected() {
    let tasks = vec![task(vec![TaskRef::Ordinal(1)]), task(vec![])];
    let err = Template::new(def(tasks, vec![])).unwrap_err();
    assert!(matches!(
      err,
      DefinitionError::InvalidTaskReference { task: 0, reference: 1 }
    ));
  }

  #[test]
  fn test_resolved_reference_passes() {
    let tasks = vec![task(vec![TaskRef::Resolved(uuid::Uuid::new_v4())])];
    assert!(Template::new(def(tasks, vec![])).is_ok());
  }

  #[test]
  fn test_unresolvable_location() {
    let required = vec![UserField::new(
      "pool_name",
      FieldType::Str,
      vec![FieldLocation::replace("/tasks/5/pool/pool_name")],
    )];
    let err = Template::new(def(vec![task(vec![])], required)).unwrap_err();
    assert!(matches!(err, DefinitionError::UnresolvablePath { path, .. } if path == "/tasks/5/pool/pool_name"));
  }

  #[test]
  fn test_deserialize_validates() {
    let json = serde_json::json!({
      "job": {"project": "", "name": "", "build": "", "duration": 1},
      "tasks": [{
        "prereq_tasks": [{"ordinal": 0}],
        "task": {"type": "libfuzzer_fuzz", "duration": 1, "target_exe": ""},
        "pool": {"count": 1, "pool_name": ""},
        "containers": []
      }]
    });

    let err = serde_json::from_value::<Template>(json).unwrap_err();
    assert!(err.to_string().contains("invalid task reference"));
  }

  #[test]
  fn test_serialize_shape() {
    let template = Template::new(def(vec![task(vec![])], vec![])).unwrap();
    let value = serde_json::to_value(&template).unwrap();

    assert!(value.get("job").is_some());
    assert!(value.get("tasks").is_some());
    assert!(value.get("required_fields").is_some());

    let parsed: Template = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, template);
  }
}
