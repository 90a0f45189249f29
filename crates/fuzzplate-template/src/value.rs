use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldType;

/// A value supplied by the caller for a user field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserValue {
  Bool(bool),
  Int(i64),
  Str(String),
  ListStr(Vec<String>),
  DictStr(BTreeMap<String, String>),
}

impl UserValue {
  /// The field type this value satisfies.
  pub fn field_type(&self) -> FieldType {
    match self {
      UserValue::Bool(_) => FieldType::Bool,
      UserValue::Int(_) => FieldType::Int,
      UserValue::Str(_) => FieldType::Str,
      UserValue::ListStr(_) => FieldType::ListStr,
      UserValue::DictStr(_) => FieldType::DictStr,
    }
  }

  pub fn to_json(&self) -> Value {
    match self {
      UserValue::Bool(b) => Value::Bool(*b),
      UserValue::Int(i) => Value::from(*i),
      UserValue::Str(s) => Value::String(s.clone()),
      UserValue::ListStr(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
      UserValue::DictStr(map) => Value::Object(
        map
          .iter()
          .map(|(k, v)| (k.clone(), Value::String(v.clone())))
          .collect(),
      ),
    }
  }
}

impl From<bool> for UserValue {
  fn from(value: bool) -> Self {
    UserValue::Bool(value)
  }
}

impl From<i64> for UserValue {
  fn from(value: i64) -> Self {
    UserValue::Int(value)
  }
}

impl From<&str> for UserValue {
  fn from(value: &str) -> Self {
    UserValue::Str(value.to_string())
  }
}

impl From<String> for UserValue {
  fn from(value: String) -> Self {
    UserValue::Str(value)
  }
}

impl From<Vec<String>> for UserValue {
  fn from(value: Vec<String>) -> Self {
    UserValue::ListStr(value)
  }
}

impl From<BTreeMap<String, String>> for UserValue {
  fn from(value: BTreeMap<String, String>) -> Self {
    UserValue::DictStr(value)
  }
}
