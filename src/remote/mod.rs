//! Remote artifact metadata lookup
//!
//! The resolution core only needs three facts per artifact: the latest
//! published release, the latest published snapshot and the SCM connection
//! string. `RemoteInfoProvider` is the boundary; `RegistryProvider` is the
//! file-backed implementation reading per-artifact metadata from a local
//! registry tree, which keeps every operation testable offline.

use crate::core::error::{ConvoyResult, RemoteError};
use crate::core::version::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Remote facts about one artifact; every field may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteInfo {
  pub last_available_version: Option<String>,
  pub last_available_snapshot_version: Option<String>,
  pub scm_connection: Option<String>,
}

/// Per-artifact remote lookup; implementations must tolerate concurrent calls
pub trait RemoteInfoProvider: Sync {
  fn fetch(&self, artifact_id: &str, group_id: &str) -> ConvoyResult<RemoteInfo>;
}

/// Raw registry metadata file: the published version list plus SCM pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryMetadata {
  #[serde(default)]
  pub versions: Vec<String>,
  #[serde(default)]
  pub scm: Option<String>,
}

/// File-based registry: `<root>/<group_id>/<artifact_id>.json`
pub struct RegistryProvider {
  root: PathBuf,
}

impl RegistryProvider {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn metadata_path(&self, artifact_id: &str, group_id: &str) -> PathBuf {
    self.root.join(group_id).join(format!("{}.json", artifact_id))
  }

  /// Reduce a published version list to the latest release and the latest
  /// snapshot, using the version total order. Unparseable entries are
  /// skipped with a warning.
  fn summarize(artifact_id: &str, metadata: &RegistryMetadata) -> RemoteInfo {
    let mut last_release: Option<Version> = None;
    let mut last_snapshot: Option<Version> = None;

    for text in &metadata.versions {
      let version = match Version::parse(text) {
        Ok(version) => version,
        Err(err) => {
          log::warn!("registry entry for '{}' skipped: {}", artifact_id, err);
          continue;
        }
      };
      let slot = if version.is_snapshot() {
        &mut last_snapshot
      } else {
        &mut last_release
      };
      if slot.as_ref().map_or(true, |current| version > *current) {
        *slot = Some(version);
      }
    }

    RemoteInfo {
      last_available_version: last_release.map(|v| v.to_string()),
      last_available_snapshot_version: last_snapshot.map(|v| v.to_string()),
      scm_connection: metadata.scm.clone(),
    }
  }
}

impl RemoteInfoProvider for RegistryProvider {
  fn fetch(&self, artifact_id: &str, group_id: &str) -> ConvoyResult<RemoteInfo> {
    let path = self.metadata_path(artifact_id, group_id);
    if !path.exists() {
      return Err(
        RemoteError::NotFound {
          artifact_id: artifact_id.to_string(),
        }
        .into(),
      );
    }

    let content = fs::read_to_string(&path).map_err(|e| RemoteError::Unreadable {
      artifact_id: artifact_id.to_string(),
      reason: e.to_string(),
    })?;
    let metadata: RegistryMetadata = serde_json::from_str(&content).map_err(|e| RemoteError::Unreadable {
      artifact_id: artifact_id.to_string(),
      reason: e.to_string(),
    })?;

    Ok(Self::summarize(artifact_id, &metadata))
  }
}

/// Write a metadata file into a registry tree (used by tooling and tests)
pub fn write_metadata(root: &Path, group_id: &str, artifact_id: &str, metadata: &RegistryMetadata) -> ConvoyResult<()> {
  let dir = root.join(group_id);
  fs::create_dir_all(&dir)?;
  let content = serde_json::to_string_pretty(metadata)?;
  fs::write(dir.join(format!("{}.json", artifact_id)), content)?;
  Ok(())
}
