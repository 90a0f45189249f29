use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a storage container plays for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
  Analysis,
  Coverage,
  Crashes,
  Inputs,
  NoRepro,
  ReadonlyInputs,
  Reports,
  Setup,
  Tools,
  UniqueInputs,
  UniqueReports,
  RegressionReports,
  Logs,
}

impl ContainerType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ContainerType::Analysis => "analysis",
      ContainerType::Coverage => "coverage",
      ContainerType::Crashes => "crashes",
      ContainerType::Inputs => "inputs",
      ContainerType::NoRepro => "no_repro",
      ContainerType::ReadonlyInputs => "readonly_inputs",
      ContainerType::Reports => "reports",
      ContainerType::Setup => "setup",
      ContainerType::Tools => "tools",
      ContainerType::UniqueInputs => "unique_inputs",
      ContainerType::UniqueReports => "unique_reports",
      ContainerType::RegressionReports => "regression_reports",
      ContainerType::Logs => "logs",
    }
  }
}

impl fmt::Display for ContainerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A named storage container bound to a task role.
///
/// Inside a template an empty `name` means the caller must supply the
/// container when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskContainers {
  pub name: String,
  #[serde(rename = "type")]
  pub container_type: ContainerType,
}

impl TaskContainers {
  pub fn new(name: impl Into<String>, container_type: ContainerType) -> Self {
    Self {
      name: name.into(),
      container_type,
    }
  }

  /// A slot left for the caller to fill in.
  pub fn unbound(container_type: ContainerType) -> Self {
    Self::new("", container_type)
  }

  pub fn is_unbound(&self) -> bool {
    self.name.is_empty()
  }
}
