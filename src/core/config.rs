//! Convoy configuration (convoy.toml)
//!
//! Searched in order: convoy.toml, .convoy.toml, .config/convoy.toml

use crate::core::enrich::DEFAULT_POOL_SIZE;
use crate::core::error::{ConfigError, ConvoyError, ConvoyResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyConfig {
  pub site: SiteConfig,
  #[serde(default)]
  pub registry: RegistryConfig,
  #[serde(default)]
  pub enrichment: EnrichmentConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
}

/// Where the managed site is described
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
  /// Path to the site descriptor, relative to the workspace root
  pub descriptor: PathBuf,
}

/// Location of the artifact registry holding published version metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
  #[serde(default = "default_registry_path")]
  pub path: PathBuf,
}

fn default_registry_path() -> PathBuf {
  PathBuf::from("registry")
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      path: default_registry_path(),
    }
  }
}

/// Remote enrichment tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
  /// Worker pool ceiling for concurrent remote lookups; independent of the
  /// number of components in the site
  #[serde(default = "default_pool_size")]
  pub pool_size: usize,
}

fn default_pool_size() -> usize {
  DEFAULT_POOL_SIZE
}

impl Default for EnrichmentConfig {
  fn default() -> Self {
    Self {
      pool_size: default_pool_size(),
    }
  }
}

/// Release dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Command template run per component release; `{artifact}`, `{group}`,
  /// `{target}`, `{next}` and `{user}` are substituted
  #[serde(default)]
  pub command: Option<String>,

  /// User recorded on dispatched releases
  #[serde(default = "default_release_user")]
  pub user: String,
}

fn default_release_user() -> String {
  "releaser".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      command: None,
      user: default_release_user(),
    }
  }
}

impl ConvoyConfig {
  /// Find config file in search order: convoy.toml, .convoy.toml,
  /// .config/convoy.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("convoy.toml"),
      path.join(".convoy.toml"),
      path.join(".config").join("convoy.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from convoy.toml (searches multiple locations)
  pub fn load(path: &Path) -> ConvoyResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ConvoyError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ConvoyConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Save config to convoy.toml (default location)
  pub fn save(&self, path: &Path) -> ConvoyResult<()> {
    let config_path = path.join("convoy.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Validate configuration invariants
  pub fn validate(&self) -> ConvoyResult<()> {
    if self.site.descriptor.as_os_str().is_empty() {
      return Err(ConvoyError::Config(ConfigError::MissingField {
        field: "site.descriptor".to_string(),
      }));
    }
    if self.enrichment.pool_size == 0 {
      return Err(ConvoyError::message("enrichment.pool_size must be at least 1"));
    }
    Ok(())
  }
}
