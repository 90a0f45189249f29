//! Fuzzplate Template
//!
//! A template is a skeleton job plus an ordered list of task skeletons, and a
//! set of named user fields that a caller fills in. This crate provides:
//!
//! - [`Template`]: the validated template model. Field names and field paths
//!   are unique, and task prerequisites only point backwards.
//! - [`TemplateCatalog`]: a name-keyed [`TemplateRegistry`] seeded with the
//!   built-in templates and optionally extended from a directory of JSON files.
//! - [`describe`]: the fields and container types a caller must supply.
//! - [`render`]: validates a [`TemplateRequest`], patches the skeleton, resolves
//!   task references and binds container names into a [`RenderedTemplate`].
//!
//! Templates are built from [`TemplateDef`], the same way a JSON template file
//! is parsed, so the checks run whether a template comes from code or disk.

pub mod builtin;
mod describe;
mod error;
mod field;
mod patch;
mod registry;
mod render;
mod skeleton;
mod template;
mod value;

pub use describe::{InputConfig, TemplateField, describe, template_container_types};
pub use error::{DefinitionError, PatchError, RegistryError, RenderError};
pub use field::{FieldLocation, FieldOperation, FieldType, UserField, base_fields};
pub use patch::{Patch, apply_patch, apply_patches, probe};
pub use registry::{TemplateCatalog, TemplateRegistry};
pub use render::{RenderedTask, RenderedTemplate, TemplateRequest, render};
pub use skeleton::{Skeleton, TaskRef, TaskSkeleton, TemplateNotification};
pub use template::{Template, TemplateDef};
pub use value::UserValue;
