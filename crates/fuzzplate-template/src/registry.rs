use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument};

use crate::builtin;
use crate::error::{RegistryError, RenderError};
use crate::render::{RenderedTemplate, TemplateRequest, render};
use crate::template::{Template, TemplateDef};

/// Name-keyed lookup of templates.
pub trait TemplateRegistry: Send + Sync {
  /// Get a template by name.
  fn get(&self, name: &str) -> Option<&Template>;

  /// Names of all registered templates.
  fn names(&self) -> Vec<&str>;

  /// Look up `request.template_name` and render the request against it.
  fn render(&self, request: &TemplateRequest) -> Result<RenderedTemplate, RenderError> {
    let template = self
      .get(&request.template_name)
      .ok_or_else(|| RenderError::TemplateNotFound {
        name: request.template_name.clone(),
      })?;
    render(request, template)
  }
}

/// In-memory template catalog.
///
/// Built once at startup and read-only afterwards; share it by reference or
/// behind an `Arc`.
///
/// Template files live in a flat directory, one template per file, named
/// after the template:
/// ```text
/// {dir}/
/// ├── libfuzzer_extended.json
/// └── afl_basic.json
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
  templates: BTreeMap<String, Template>,
}

impl TemplateCatalog {
  /// Create an empty catalog.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a catalog holding the built-in templates.
  pub fn builtin() -> Result<Self, RegistryError> {
    let mut catalog = Self::new();
    let templates = builtin::all().map_err(|source| RegistryError::Definition {
      name: "builtin".to_string(),
      source,
    })?;

    for (name, template) in templates {
      catalog.insert(name, template)?;
    }
    Ok(catalog)
  }

  /// Register a template. Names are never overwritten.
  pub fn insert(&mut self, name: impl Into<String>, template: Template) -> Result<(), RegistryError> {
    let name = name.into();
    if self.templates.contains_key(&name) {
      return Err(RegistryError::AlreadyExists { name });
    }
    self.templates.insert(name, template);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.templates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.templates.is_empty()
  }

  /// Load every `*.json` file in `dir` as a template named after the file
  /// stem. A missing directory loads nothing. Returns the number loaded.
  #[instrument(skip(self, dir), fields(dir = %dir.display()))]
  pub async fn load_dir(&mut self, dir: &Path) -> Result<usize, RegistryError> {
    if !fs::try_exists(dir).await? {
      debug!("template directory does not exist");
      return Ok(0);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
        paths.push(path);
      }
    }
    paths.sort();

    let mut loaded = 0;
    for path in paths {
      let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
        continue;
      };

      let content = fs::read_to_string(&path).await?;
      let def: TemplateDef =
        serde_json::from_str(&content).map_err(|source| RegistryError::Parse { path: path.clone(), source })?;
      let template = Template::new(def).map_err(|source| RegistryError::Definition {
        name: name.clone(),
        source,
      })?;

      self.insert(name.clone(), template)?;
      info!(template = %name, path = %path.display(), "template_loaded");
      loaded += 1;
    }

    Ok(loaded)
  }
}

impl TemplateRegistry for TemplateCatalog {
  fn get(&self, name: &str) -> Option<&Template> {
    self.templates.get(name)
  }

  fn names(&self) -> Vec<&str> {
    self.templates.keys().map(String::as_str).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_lookup() {
    let catalog = TemplateCatalog::builtin().unwrap();
    assert!(catalog.get(builtin::LIBFUZZER_BASIC).is_some());
    assert!(catalog.get("afl_basic").is_none());
    assert_eq!(catalog.names(), vec![builtin::LIBFUZZER_BASIC]);
  }

  #[test]
  fn test_insert_rejects_duplicates() {
    let mut catalog = TemplateCatalog::builtin().unwrap();
    let template = builtin::libfuzzer_basic().unwrap();

    let err = catalog.insert(builtin::LIBFUZZER_BASIC, template).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists { .. }));
    assert_eq!(catalog.len(), 1);
  }

  #[test]
  fn test_render_unknown_template() {
    let catalog = TemplateCatalog::new();
    let request = TemplateRequest {
      template_name: "nope".to_string(),
      user_fields: Default::default(),
      containers: vec![],
    };

    let err = catalog.render(&request).unwrap_err();
    assert!(matches!(err, RenderError::TemplateNotFound { name } if name == "nope"));
  }
}
