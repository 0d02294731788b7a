//! Per-dependency release state
//!
//! A `Dependency` is the immutable declaration parsed from the site
//! descriptor. A `Component` is the mutable release-management view derived
//! from it: enriched once with remote metadata, then re-derived by the
//! resolver as the operator toggles decisions.

use crate::core::version::Version;
use serde::{Deserialize, Serialize};

/// Dependency type that marks a theme component
const TYPE_THEME: &str = "theme";

/// A declared reference to another artifact, owned by the declaring site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
  #[serde(rename = "type", default = "default_dependency_type")]
  pub dep_type: String,
}

fn default_dependency_type() -> String {
  "jar".to_string()
}

/// Operator decision carried by a component
///
/// Exactly one of these states is active at a time; `Default` means the
/// resolver-computed versions stand untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentDecision {
  #[default]
  Default,
  Upgraded,
  Downgraded,
}

/// Mutable release state for one dependency of a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
  pub artifact_id: String,
  pub group_id: String,
  #[serde(rename = "type")]
  pub dep_type: String,

  /// Resolved display name (defaults to the artifact id)
  pub name: String,

  /// True when the component is an internally managed project artifact,
  /// persisted per (site, artifact) in the flag store
  pub is_project: bool,

  pub current_version: String,

  /// Latest release published upstream, absent when the remote lookup
  /// failed or nothing is published
  pub last_available_version: Option<String>,

  /// Latest snapshot published upstream
  pub last_available_snapshot_version: Option<String>,

  /// Version this component would be released or pinned to
  pub target_version: Option<String>,

  /// Snapshot development moves to after the release; `None` is the
  /// "not available" sentinel
  pub next_snapshot_version: Option<String>,

  /// Candidate series for operator cycling, recomputed by the resolver
  pub target_versions: Vec<String>,

  /// Cursor into `target_versions`
  pub target_version_index: usize,

  pub decision: ComponentDecision,

  /// Set when the last release dispatch for this component failed
  pub error_last_release: bool,

  pub release_comments: Vec<String>,

  /// SCM connection string reported by the remote provider
  pub scm_connection: Option<String>,
}

impl Component {
  /// Build the initial component state for a declared dependency
  pub fn from_dependency(dependency: &Dependency, is_project: bool) -> Self {
    Self {
      artifact_id: dependency.artifact_id.clone(),
      group_id: dependency.group_id.clone(),
      dep_type: dependency.dep_type.clone(),
      name: dependency.artifact_id.clone(),
      is_project,
      current_version: dependency.version.clone(),
      last_available_version: None,
      last_available_snapshot_version: None,
      target_version: None,
      next_snapshot_version: None,
      target_versions: Vec::new(),
      target_version_index: 0,
      decision: ComponentDecision::Default,
      error_last_release: false,
      release_comments: Vec::new(),
      scm_connection: None,
    }
  }

  /// Themes adopt upstream versions directly instead of the standard
  /// snapshot-to-release derivation
  pub fn is_theme(&self) -> bool {
    self.dep_type == TYPE_THEME
  }

  pub fn is_snapshot_version(&self) -> bool {
    Version::is_snapshot_text(&self.current_version)
  }

  /// A component may be released exactly when it is a project component on a
  /// snapshot version, is not a theme, and a concrete (non-snapshot) target
  /// has been computed
  pub fn should_be_released(&self) -> bool {
    self.is_project
      && self.is_snapshot_version()
      && !self.is_theme()
      && self
        .target_version
        .as_deref()
        .is_some_and(|target| !Version::is_snapshot_text(target))
  }

  pub fn add_release_comment(&mut self, comment: impl Into<String>) {
    self.release_comments.push(comment.into());
  }

  pub fn reset_comments(&mut self) {
    self.release_comments.clear();
  }
}
