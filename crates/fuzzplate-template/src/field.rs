use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// The value shape a user field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
  Bool,
  Int,
  Str,
  DictStr,
  ListStr,
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      FieldType::Bool => "Bool",
      FieldType::Int => "Int",
      FieldType::Str => "Str",
      FieldType::DictStr => "DictStr",
      FieldType::ListStr => "ListStr",
    };
    f.write_str(name)
  }
}

/// How a field value is written into the skeleton document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOperation {
  /// Insert, creating the key (or array slot) if needed.
  Add,
  /// Overwrite; the target must already exist.
  Replace,
}

/// A JSON pointer into the skeleton document and the operation used there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocation {
  pub op: FieldOperation,
  pub path: String,
}

impl FieldLocation {
  pub fn add(path: impl Into<String>) -> Self {
    Self {
      op: FieldOperation::Add,
      path: path.into(),
    }
  }

  pub fn replace(path: impl Into<String>) -> Self {
    Self {
      op: FieldOperation::Replace,
      path: path.into(),
    }
  }
}

/// A named, typed input that a caller supplies when rendering a template.
///
/// One value fans out to every location, e.g. a single `pool_name` answer is
/// written into each task's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserField {
  pub name: String,
  #[serde(rename = "type")]
  pub field_type: FieldType,
  pub locations: Vec<FieldLocation>,
}

impl UserField {
  pub fn new(name: impl Into<String>, field_type: FieldType, locations: Vec<FieldLocation>) -> Self {
    Self {
      name: name.into(),
      field_type,
      locations,
    }
  }

  /// A field written with `replace` at each of `paths`.
  pub fn replacing(name: impl Into<String>, field_type: FieldType, paths: &[&str]) -> Self {
    let locations = paths.iter().map(|p| FieldLocation::replace(*p)).collect();
    Self::new(name, field_type, locations)
  }
}

static BASE_FIELDS: LazyLock<Vec<UserField>> = LazyLock::new(|| {
  vec![
    UserField::replacing("project", FieldType::Str, &["/job/project"]),
    UserField::replacing("name", FieldType::Str, &["/job/name"]),
    UserField::replacing("build", FieldType::Str, &["/job/build"]),
  ]
});

/// Fields every template requires: the job's project, name and build.
pub fn base_fields() -> &'static [UserField] {
  &BASE_FIELDS
}
