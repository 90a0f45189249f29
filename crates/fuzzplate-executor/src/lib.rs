//! Fuzzplate Executor
//!
//! Turns a [`RenderedTemplate`](fuzzplate_template::RenderedTemplate) into
//! notifications, a job and tasks on the orchestration service.
//!
//! The service itself sits behind the [`OrchestrationClient`] trait.
//! [`InMemoryClient`] implements it without a network and records every call,
//! which is what the CLI's `execute` command and the tests use.

mod client;
mod error;
mod executor;
mod memory;

pub use client::{Job, Notification, OrchestrationClient, Task};
pub use error::{ClientError, ExecuteError};
pub use executor::{Execution, Executor};
pub use memory::InMemoryClient;
