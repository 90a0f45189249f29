//! Error types for template definition, rendering and loading.

use std::path::PathBuf;

use fuzzplate_config::ContainerType;
use thiserror::Error;

use crate::field::FieldType;

/// A template is malformed. These are authoring bugs and are never retryable.
#[derive(Debug, Error)]
pub enum DefinitionError {
  #[error("field '{name}' must provide at least one location")]
  NoLocations { name: String },

  #[error("duplicate field found: {name}")]
  DuplicateField { name: String },

  #[error("duplicate path found: {path} (field '{name}')")]
  DuplicatePath { name: String, path: String },

  #[error("invalid task reference: task {task} references task {reference}")]
  InvalidTaskReference { task: usize, reference: usize },

  #[error("field '{name}' location {path} does not resolve against the skeleton: {source}")]
  UnresolvablePath {
    name: String,
    path: String,
    #[source]
    source: PatchError,
  },

  #[error("failed to serialize template skeleton: {message}")]
  Serialization { message: String },
}

/// A JSON patch operation could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
  #[error("invalid pointer '{path}': must be empty or start with '/'")]
  InvalidPointer { path: String },

  #[error("invalid array index '{token}' in {path}")]
  InvalidIndex { path: String, token: String },

  #[error("path not found: {path}")]
  PathNotFound { path: String },
}

/// Rendering a request against a template failed.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("template not found: {name}")]
  TemplateNotFound { name: String },

  #[error("extra field: {name}")]
  ExtraField { name: String },

  #[error("missing required field: {name}")]
  MissingField { name: String },

  #[error("invalid {expected} field '{name}': got {actual}")]
  TypeMismatch {
    name: String,
    expected: FieldType,
    actual: FieldType,
  },

  #[error("failed to apply patch at {path}: {source}")]
  Apply {
    path: String,
    #[source]
    source: PatchError,
  },

  #[error("rendered document does not match the template shape: {message}")]
  InvalidDocument { message: String },

  #[error("invalid task reference after render: task {task} references task {reference}")]
  InvalidTaskReference { task: usize, reference: usize },

  #[error("container of type {container_type} has an empty name")]
  EmptyContainerName { container_type: ContainerType },

  #[error("missing container definition {container_type} (task {task})")]
  MissingContainer {
    task: usize,
    container_type: ContainerType,
  },

  #[error("unused container in request: {name} ({container_type})")]
  UnusedContainer {
    name: String,
    container_type: ContainerType,
  },
}

/// Building or extending a template catalog failed.
#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("template already registered: {name}")]
  AlreadyExists { name: String },

  #[error("invalid template '{name}': {source}")]
  Definition {
    name: String,
    #[source]
    source: DefinitionError,
  },

  #[error("failed to parse template file {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
