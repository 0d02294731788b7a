//! Site aggregate: a top-level project and the components it declares
//!
//! The component list is derived 1:1 from the declared dependencies and is
//! rebuilt, never patched, when the dependencies change. Duplicate artifact
//! ids within one site are rejected at construction: every interactive
//! operation looks components up by artifact id, so uniqueness is a hard
//! invariant rather than a convention.

use crate::core::component::{Component, Dependency};
use crate::core::error::{ConvoyResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A site: identity, site-level version state and the owned components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
  pub id: u32,
  pub artifact_id: String,
  pub group_id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub scm_url: Option<String>,

  /// Declared current version of the site itself
  pub version: String,

  /// Last release found upstream for the site, if any
  #[serde(default)]
  pub last_release_version: Option<String>,

  /// Selected next release version of the site
  #[serde(default)]
  pub next_release_version: Option<String>,

  /// Snapshot the site moves to after the selected release
  #[serde(default)]
  pub next_snapshot_version: Option<String>,

  /// Candidate series the operator can cycle through
  #[serde(default)]
  pub target_versions: Vec<String>,

  /// Cursor into `target_versions`
  #[serde(default)]
  pub target_version_index: usize,

  pub dependencies: Vec<Dependency>,

  #[serde(default)]
  pub components: Vec<Component>,
}

impl Site {
  /// Build a site from its identity fields and declared dependencies.
  ///
  /// Fails when two dependencies share an artifact id.
  pub fn new(
    id: u32,
    artifact_id: impl Into<String>,
    group_id: impl Into<String>,
    name: impl Into<String>,
    version: impl Into<String>,
    dependencies: Vec<Dependency>,
  ) -> ConvoyResult<Self> {
    let mut seen = HashSet::new();
    for dependency in &dependencies {
      if !seen.insert(dependency.artifact_id.as_str()) {
        return Err(
          ValidationError::DuplicateArtifact {
            artifact_id: dependency.artifact_id.clone(),
          }
          .into(),
        );
      }
    }

    Ok(Self {
      id,
      artifact_id: artifact_id.into(),
      group_id: group_id.into(),
      name: name.into(),
      description: String::new(),
      scm_url: None,
      version: version.into(),
      last_release_version: None,
      next_release_version: None,
      next_snapshot_version: None,
      target_versions: Vec::new(),
      target_version_index: 0,
      dependencies,
      components: Vec::new(),
    })
  }

  /// Derive the component list from the declared dependencies, one component
  /// per dependency in declaration order. Any previous components are
  /// discarded.
  pub fn rebuild_components<F>(&mut self, is_project: F)
  where
    F: Fn(&str) -> bool,
  {
    self.components = self
      .dependencies
      .iter()
      .map(|dependency| Component::from_dependency(dependency, is_project(&dependency.artifact_id)))
      .collect();
  }

  pub fn find_component(&self, artifact_id: &str) -> Option<&Component> {
    self.components.iter().find(|c| c.artifact_id == artifact_id)
  }

  pub fn find_component_mut(&mut self, artifact_id: &str) -> Option<&mut Component> {
    self.components.iter_mut().find(|c| c.artifact_id == artifact_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dependency(artifact_id: &str, version: &str) -> Dependency {
    Dependency {
      group_id: "com.example".to_string(),
      artifact_id: artifact_id.to_string(),
      version: version.to_string(),
      dep_type: "jar".to_string(),
    }
  }

  #[test]
  fn test_duplicate_artifact_ids_rejected() {
    let result = Site::new(
      1,
      "demo-site",
      "com.example",
      "Demo",
      "1.0.0-SNAPSHOT",
      vec![dependency("lib-a", "1.0.0"), dependency("lib-a", "2.0.0")],
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_components_rebuilt_one_to_one_in_order() {
    let mut site = Site::new(
      1,
      "demo-site",
      "com.example",
      "Demo",
      "1.0.0-SNAPSHOT",
      vec![dependency("lib-a", "1.0.0"), dependency("lib-b", "2.0.0-SNAPSHOT")],
    )
    .unwrap();

    site.rebuild_components(|artifact_id| artifact_id == "lib-b");

    assert_eq!(site.components.len(), 2);
    assert_eq!(site.components[0].artifact_id, "lib-a");
    assert!(!site.components[0].is_project);
    assert_eq!(site.components[1].artifact_id, "lib-b");
    assert!(site.components[1].is_project);

    // Rebuilding discards previous state entirely
    site.components[0].target_version = Some("9.9.9".to_string());
    site.rebuild_components(|_| false);
    assert!(site.components[0].target_version.is_none());
  }

  #[test]
  fn test_find_component_by_artifact_id() {
    let mut site = Site::new(
      1,
      "demo-site",
      "com.example",
      "Demo",
      "1.0.0-SNAPSHOT",
      vec![dependency("lib-a", "1.0.0")],
    )
    .unwrap();
    site.rebuild_components(|_| false);

    assert!(site.find_component("lib-a").is_some());
    assert!(site.find_component("lib-z").is_none());
  }
}
