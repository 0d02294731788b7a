//! Project-flag persistence
//!
//! Whether a component is an internally managed project is an operator
//! decision, persisted per (site id, artifact id) outside the site
//! descriptor. `JsonFlagStore` keeps the flags in a single JSON file;
//! `MemoryFlagStore` is the in-memory double used by unit tests.

use crate::core::error::{ConvoyResult, ResultExt};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-site project flags, keyed by artifact id; defaults to false
pub trait ProjectFlagStore {
  fn is_project(&self, site_id: u32, artifact_id: &str) -> bool;

  fn set_project(&mut self, site_id: u32, artifact_id: &str, is_project: bool) -> ConvoyResult<()>;

  /// Drop every flag recorded for a site
  fn remove_site(&mut self, site_id: u32) -> ConvoyResult<()>;
}

type FlagMap = HashMap<String, HashMap<String, bool>>;

/// JSON-file-backed flag store, written through on every mutation
pub struct JsonFlagStore {
  path: PathBuf,
  flags: FlagMap,
}

impl JsonFlagStore {
  /// Load the store from `path`; a missing file is an empty store
  pub fn load(path: impl Into<PathBuf>) -> ConvoyResult<Self> {
    let path = path.into();
    let flags = if path.exists() {
      let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read flag store {}", path.display()))?;
      serde_json::from_str(&content).with_context(|| format!("Failed to parse flag store {}", path.display()))?
    } else {
      FlagMap::new()
    };
    Ok(Self { path, flags })
  }

  fn save(&self) -> ConvoyResult<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&self.flags)?;
    fs::write(&self.path, content).with_context(|| format!("Failed to write flag store {}", self.path.display()))?;
    Ok(())
  }

  /// Default flag store location inside a workspace
  pub fn default_path(root: &Path) -> PathBuf {
    root.join(".convoy").join("flags.json")
  }
}

impl ProjectFlagStore for JsonFlagStore {
  fn is_project(&self, site_id: u32, artifact_id: &str) -> bool {
    self
      .flags
      .get(&site_id.to_string())
      .and_then(|site| site.get(artifact_id))
      .copied()
      .unwrap_or(false)
  }

  fn set_project(&mut self, site_id: u32, artifact_id: &str, is_project: bool) -> ConvoyResult<()> {
    self
      .flags
      .entry(site_id.to_string())
      .or_default()
      .insert(artifact_id.to_string(), is_project);
    self.save()
  }

  fn remove_site(&mut self, site_id: u32) -> ConvoyResult<()> {
    self.flags.remove(&site_id.to_string());
    self.save()
  }
}

/// In-memory flag store for tests
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
  flags: FlagMap,
}

impl MemoryFlagStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ProjectFlagStore for MemoryFlagStore {
  fn is_project(&self, site_id: u32, artifact_id: &str) -> bool {
    self
      .flags
      .get(&site_id.to_string())
      .and_then(|site| site.get(artifact_id))
      .copied()
      .unwrap_or(false)
  }

  fn set_project(&mut self, site_id: u32, artifact_id: &str, is_project: bool) -> ConvoyResult<()> {
    self
      .flags
      .entry(site_id.to_string())
      .or_default()
      .insert(artifact_id.to_string(), is_project);
    Ok(())
  }

  fn remove_site(&mut self, site_id: u32) -> ConvoyResult<()> {
    self.flags.remove(&site_id.to_string());
    Ok(())
  }
}
