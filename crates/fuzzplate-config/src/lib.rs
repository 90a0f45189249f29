//! Fuzzplate Config
//!
//! This crate contains the serializable job, task and notification types that
//! the fuzzing orchestration service accepts. Templates are built out of these
//! types, and a rendered template hands them to the service unchanged.
//!
//! Every optional field is serialized as an explicit `null` rather than being
//! skipped, so that a JSON pointer such as `/tasks/0/task/target_workers`
//! resolves against the serialized document even when the value is unset.

mod container;
mod enums;
mod job;
mod notification;
mod task;

pub use container::{ContainerType, TaskContainers};
pub use enums::TaskType;
pub use job::JobConfig;
pub use notification::{AdoTemplate, NotificationConfig, NotificationTemplate, TeamsTemplate};
pub use task::{TaskConfig, TaskDetails, TaskPool};
