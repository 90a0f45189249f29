use serde::{Deserialize, Serialize};

/// The kind of work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
  LibfuzzerFuzz,
  LibfuzzerCoverage,
  LibfuzzerCrashReport,
  LibfuzzerMerge,
  LibfuzzerRegression,
  GenericAnalysis,
  GenericSupervisor,
  GenericMerge,
  GenericGenerator,
  GenericCrashReport,
  GenericRegression,
}
