//! Workspace context - build once, pass everywhere
//!
//! `ReleaseContext` loads the configuration once in main.rs and hands the
//! composed collaborators (registry provider, flag store, site service) to
//! the commands, which take it by reference. No hidden process-wide state:
//! everything a command touches flows through this struct.

use crate::core::config::ConvoyConfig;
use crate::core::error::ConvoyResult;
use crate::core::site::Site;
use crate::descriptor;
use crate::remote::RegistryProvider;
use crate::store::JsonFlagStore;
use std::path::{Path, PathBuf};

/// Shared per-invocation context: workspace root plus configuration
pub struct ReleaseContext {
  /// Workspace root directory (where convoy.toml was found)
  pub root: PathBuf,

  /// Convoy configuration (convoy.toml)
  pub config: ConvoyConfig,
}

impl ReleaseContext {
  /// Build the context from a workspace root
  pub fn build(workspace_root: &Path) -> ConvoyResult<Self> {
    let config = ConvoyConfig::load(workspace_root)?;
    Ok(Self {
      root: workspace_root.to_path_buf(),
      config,
    })
  }

  /// Parse the configured site descriptor into a (pre-enrichment) site
  pub fn parse_site(&self) -> ConvoyResult<Site> {
    descriptor::load_site(&self.root.join(&self.config.site.descriptor))
  }

  /// Registry-backed remote info provider
  pub fn provider(&self) -> RegistryProvider {
    RegistryProvider::new(self.root.join(&self.config.registry.path))
  }

  /// Flag store at the workspace default location
  pub fn flag_store(&self) -> ConvoyResult<JsonFlagStore> {
    JsonFlagStore::load(JsonFlagStore::default_path(&self.root))
  }

  pub fn pool_size(&self) -> usize {
    self.config.enrichment.pool_size
  }

  pub fn release_user(&self) -> &str {
    &self.config.release.user
  }

  pub fn release_command(&self) -> Option<&str> {
    self.config.release.command.as_deref()
  }
}
