use serde::{Deserialize, Serialize};

/// Job-level configuration passed to the service's create-job call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
  pub project: String,
  pub name: String,
  pub build: String,
  /// Lifetime of the job in hours.
  pub duration: u64,
  #[serde(default)]
  pub logs: Option<String>,
}
