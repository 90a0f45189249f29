//! What a caller has to supply to render a template.

use std::collections::BTreeSet;

use fuzzplate_config::ContainerType;
use serde::{Deserialize, Serialize};

use crate::field::FieldType;
use crate::template::Template;

/// A user field as presented to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
  pub name: String,
  #[serde(rename = "type")]
  pub field_type: FieldType,
  pub required: bool,
}

/// Input form for a template: its fields and the container types the caller
/// must name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
  pub user_fields: Vec<TemplateField>,
  pub containers: Vec<ContainerType>,
}

/// Container types left unbound by the template author, without duplicates.
///
/// The order carries no meaning.
pub fn template_container_types(template: &Template) -> Vec<ContainerType> {
  template
    .tasks()
    .iter()
    .flat_map(|task| task.containers.iter())
    .filter(|container| container.is_unbound())
    .map(|container| container.container_type)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

pub fn describe(template: &Template) -> InputConfig {
  let user_fields = template
    .fields()
    .map(|(field, required)| TemplateField {
      name: field.name.clone(),
      field_type: field.field_type,
      required,
    })
    .collect();

  InputConfig {
    user_fields,
    containers: template_container_types(template),
  }
}
