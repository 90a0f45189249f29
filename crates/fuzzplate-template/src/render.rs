//! Rendering a template request into concrete job and task configurations.

use std::collections::BTreeMap;

use fuzzplate_config::{JobConfig, TaskConfig, TaskContainers};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::RenderError;
use crate::patch::{Patch, apply_patch};
use crate::skeleton::{Skeleton, TaskRef, TaskSkeleton, TemplateNotification};
use crate::template::Template;
use crate::value::UserValue;

/// A caller's answers for a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRequest {
  pub template_name: String,
  #[serde(default)]
  pub user_fields: BTreeMap<String, UserValue>,
  #[serde(default)]
  pub containers: Vec<TaskContainers>,
}

/// A rendered task. `task_id` is assigned at render time so that later tasks
/// can name it as a prerequisite; `config.job_id` is nil until the job exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTask {
  pub task_id: Uuid,
  #[serde(flatten)]
  pub config: TaskConfig,
}

/// The output of [`render`]: every field written, every prerequisite
/// resolved and every container named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTemplate {
  pub job: JobConfig,
  pub tasks: Vec<RenderedTask>,
  pub notifications: Vec<TemplateNotification>,
}

/// Render `request` against `template`.
///
/// Steps run in order and the first failure aborts the render:
/// unknown fields, missing required fields, field types, patch application,
/// prerequisite resolution, then container binding. The template is not
/// modified.
#[instrument(
  name = "template_render",
  skip(request, template),
  fields(template_name = %request.template_name)
)]
pub fn render(request: &TemplateRequest, template: &Template) -> Result<RenderedTemplate, RenderError> {
  check_extra_fields(request, template)?;
  check_required_fields(request, template)?;
  let patches = build_patches(request, template)?;

  let mut document = template
    .skeleton_document()
    .map_err(|e| RenderError::InvalidDocument { message: e.to_string() })?;

  for patch in &patches {
    apply_patch(&mut document, patch).map_err(|source| {
      error!(path = %patch.path, error = %source, "patch_failed");
      RenderError::Apply {
        path: patch.path.clone(),
        source,
      }
    })?;
  }
  debug!(patches = patches.len(), "patches applied");

  let skeleton: Skeleton =
    serde_json::from_value(document).map_err(|e| RenderError::InvalidDocument { message: e.to_string() })?;

  let mut tasks = resolve_tasks(skeleton.tasks)?;
  bind_containers(&mut tasks, &request.containers)?;

  info!(tasks = tasks.len(), patches = patches.len(), "template_rendered");

  Ok(RenderedTemplate {
    job: skeleton.job,
    tasks,
    notifications: skeleton.notifications,
  })
}

fn check_extra_fields(request: &TemplateRequest, template: &Template) -> Result<(), RenderError> {
  for name in request.user_fields.keys() {
    if !template.fields().any(|(field, _)| field.name == *name) {
      return Err(RenderError::ExtraField { name: name.clone() });
    }
  }
  Ok(())
}

fn check_required_fields(request: &TemplateRequest, template: &Template) -> Result<(), RenderError> {
  for (field, required) in template.fields() {
    if required && !request.user_fields.contains_key(&field.name) {
      return Err(RenderError::MissingField {
        name: field.name.clone(),
      });
    }
  }
  Ok(())
}

/// One patch per location of every supplied field, in field declaration order.
fn build_patches(request: &TemplateRequest, template: &Template) -> Result<Vec<Patch>, RenderError> {
  let mut patches = Vec::new();

  for (field, _) in template.fields() {
    let Some(value) = request.user_fields.get(&field.name) else {
      continue;
    };

    if value.field_type() != field.field_type {
      return Err(RenderError::TypeMismatch {
        name: field.name.clone(),
        expected: field.field_type,
        actual: value.field_type(),
      });
    }

    let data = value.to_json();
    patches.extend(field.locations.iter().map(|location| Patch {
      op: location.op,
      path: location.path.clone(),
      value: data.clone(),
    }));
  }

  Ok(patches)
}

/// Assign task ids in declaration order and turn ordinal prerequisites into
/// those ids. Field values may have rewritten ordinals, so each one must
/// still point at an earlier task.
fn resolve_tasks(skeletons: Vec<TaskSkeleton>) -> Result<Vec<RenderedTask>, RenderError> {
  let task_ids: Vec<Uuid> = skeletons.iter().map(|_| Uuid::new_v4()).collect();
  let mut tasks = Vec::with_capacity(skeletons.len());

  for (idx, skeleton) in skeletons.into_iter().enumerate() {
    let mut prereqs = Vec::with_capacity(skeleton.prereq_tasks.len());
    for prereq in &skeleton.prereq_tasks {
      let id = match *prereq {
        TaskRef::Ordinal(reference) => task_ids[..idx]
          .get(reference)
          .copied()
          .ok_or(RenderError::InvalidTaskReference { task: idx, reference })?,
        TaskRef::Resolved(id) => id,
      };
      prereqs.push(id);
    }

    tasks.push(RenderedTask {
      task_id: task_ids[idx],
      config: TaskConfig {
        job_id: Uuid::nil(),
        prereq_tasks: (!prereqs.is_empty()).then_some(prereqs),
        task: skeleton.task,
        pool: skeleton.pool,
        containers: skeleton.containers,
        tags: skeleton.tags,
      },
    });
  }

  Ok(tasks)
}

/// Bind each unnamed container slot to the first requested container of the
/// same type. A requested container may fill any number of slots, but every
/// requested container must fill at least one.
fn bind_containers(tasks: &mut [RenderedTask], requested: &[TaskContainers]) -> Result<(), RenderError> {
  if let Some(entry) = requested.iter().find(|entry| entry.is_unbound()) {
    return Err(RenderError::EmptyContainerName {
      container_type: entry.container_type,
    });
  }

  let mut used = vec![false; requested.len()];

  for (idx, task) in tasks.iter_mut().enumerate() {
    for slot in task.config.containers.iter_mut().filter(|slot| slot.is_unbound()) {
      let position = requested
        .iter()
        .position(|entry| entry.container_type == slot.container_type)
        .ok_or(RenderError::MissingContainer {
          task: idx,
          container_type: slot.container_type,
        })?;

      slot.name = requested[position].name.clone();
      used[position] = true;
    }
  }

  if let Some(position) = used.iter().position(|used| !used) {
    let entry = &requested[position];
    return Err(RenderError::UnusedContainer {
      name: entry.name.clone(),
      container_type: entry.container_type,
    });
  }

  Ok(())
}
