//! JSON patch `add` / `replace` over `serde_json::Value`.
//!
//! Paths are JSON pointers: `""` is the whole document, otherwise a sequence
//! of `/`-separated tokens where `~1` stands for `/` and `~0` for `~`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PatchError;
use crate::field::FieldOperation;

/// A single patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
  pub op: FieldOperation,
  pub path: String,
  pub value: Value,
}

/// Apply `patches` in order. Stops at the first failure, leaving earlier
/// patches applied; callers that need all-or-nothing patch a copy.
pub fn apply_patches(doc: &mut Value, patches: &[Patch]) -> Result<(), PatchError> {
  for patch in patches {
    apply_patch(doc, patch)?;
  }
  Ok(())
}

pub fn apply_patch(doc: &mut Value, patch: &Patch) -> Result<(), PatchError> {
  let tokens = parse_pointer(&patch.path)?;
  let Some((last, parents)) = tokens.split_last() else {
    *doc = patch.value.clone();
    return Ok(());
  };

  let parent = resolve_mut(doc, parents, &patch.path)?;
  let not_found = || PatchError::PathNotFound {
    path: patch.path.clone(),
  };

  match (patch.op, parent) {
    (FieldOperation::Add, Value::Object(map)) => {
      map.insert(last.clone(), patch.value.clone());
    }
    (FieldOperation::Add, Value::Array(items)) => {
      if last == "-" {
        items.push(patch.value.clone());
      } else {
        let index = parse_index(last, &patch.path)?;
        if index > items.len() {
          return Err(not_found());
        }
        items.insert(index, patch.value.clone());
      }
    }
    (FieldOperation::Replace, Value::Object(map)) => {
      let slot = map.get_mut(last.as_str()).ok_or_else(not_found)?;
      *slot = patch.value.clone();
    }
    (FieldOperation::Replace, Value::Array(items)) => {
      let index = parse_index(last, &patch.path)?;
      let slot = items.get_mut(index).ok_or_else(not_found)?;
      *slot = patch.value.clone();
    }
    _ => return Err(not_found()),
  }

  Ok(())
}

/// Check that an operation at `path` would succeed against `doc` without
/// modifying it.
pub fn probe(doc: &Value, op: FieldOperation, path: &str) -> Result<(), PatchError> {
  let tokens = parse_pointer(path)?;
  let Some((last, parents)) = tokens.split_last() else {
    return Ok(());
  };

  let parent = resolve(doc, parents, path)?;
  let found = match (op, parent) {
    (FieldOperation::Add, Value::Object(_)) => true,
    (FieldOperation::Add, Value::Array(items)) => last == "-" || parse_index(last, path)? <= items.len(),
    (FieldOperation::Replace, Value::Object(map)) => map.contains_key(last.as_str()),
    (FieldOperation::Replace, Value::Array(items)) => parse_index(last, path)? < items.len(),
    _ => false,
  };

  if found {
    Ok(())
  } else {
    Err(PatchError::PathNotFound {
      path: path.to_string(),
    })
  }
}

fn parse_pointer(path: &str) -> Result<Vec<String>, PatchError> {
  if path.is_empty() {
    return Ok(Vec::new());
  }

  let rest = path.strip_prefix('/').ok_or_else(|| PatchError::InvalidPointer {
    path: path.to_string(),
  })?;

  Ok(
    rest
      .split('/')
      .map(|token| token.replace("~1", "/").replace("~0", "~"))
      .collect(),
  )
}

/// Array indices are plain decimal with no leading zeros.
fn parse_index(token: &str, path: &str) -> Result<usize, PatchError> {
  let valid = !token.is_empty()
    && token.bytes().all(|b| b.is_ascii_digit())
    && (token == "0" || !token.starts_with('0'));

  let invalid = || PatchError::InvalidIndex {
    path: path.to_string(),
    token: token.to_string(),
  };

  if !valid {
    return Err(invalid());
  }
  token.parse().map_err(|_| invalid())
}

fn resolve<'a>(mut current: &'a Value, tokens: &[String], path: &str) -> Result<&'a Value, PatchError> {
  for token in tokens {
    current = match current {
      Value::Object(map) => map.get(token.as_str()),
      Value::Array(items) => items.get(parse_index(token, path)?),
      _ => None,
    }
    .ok_or_else(|| PatchError::PathNotFound {
      path: path.to_string(),
    })?;
  }
  Ok(current)
}

fn resolve_mut<'a>(
  mut current: &'a mut Value,
  tokens: &[String],
  path: &str,
) -> Result<&'a mut Value, PatchError> {
  for token in tokens {
    current = match current {
      Value::Object(map) => map.get_mut(token.as_str()),
      Value::Array(items) => items.get_mut(parse_index(token, path)?),
      _ => None,
    }
    .ok_or_else(|| PatchError::PathNotFound {
      path: path.to_string(),
    })?;
  }
  Ok(current)
}
