//! Site descriptor parsing
//!
//! The descriptor (`site.toml`) is the pure input producer for the engine:
//! site identity fields plus the declared dependency list. Unlike version
//! resolution, a malformed descriptor is a hard error; there is nothing
//! sensible to degrade to.

use crate::core::component::Dependency;
use crate::core::error::{ConvoyResult, ResultExt, ValidationError};
use crate::core::site::Site;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SiteDescriptor {
  site: SiteIdentity,
  #[serde(default)]
  dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct SiteIdentity {
  id: u32,
  artifact_id: String,
  group_id: String,
  version: String,
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  scm_url: Option<String>,
}

/// Parse a site descriptor file into a pre-enrichment site
pub fn load_site(path: &Path) -> ConvoyResult<Site> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read site descriptor {}", path.display()))?;
  parse_site(&content).with_context(|| format!("Failed to parse site descriptor {}", path.display()))
}

/// Parse site descriptor content
pub fn parse_site(content: &str) -> ConvoyResult<Site> {
  let descriptor: SiteDescriptor = toml_edit::de::from_str(content)?;
  let identity = descriptor.site;

  if identity.artifact_id.is_empty() {
    return Err(invalid("site.artifact_id must not be empty"));
  }
  if identity.version.is_empty() {
    return Err(invalid("site.version must not be empty"));
  }
  for dependency in &descriptor.dependencies {
    if dependency.artifact_id.is_empty() {
      return Err(invalid("dependency artifact_id must not be empty"));
    }
    if dependency.version.is_empty() {
      return Err(invalid(format!(
        "dependency '{}' has an empty version",
        dependency.artifact_id
      )));
    }
  }

  let name = identity.name.unwrap_or_else(|| identity.artifact_id.clone());
  let mut site = Site::new(
    identity.id,
    identity.artifact_id,
    identity.group_id,
    name,
    identity.version,
    descriptor.dependencies,
  )?;
  site.description = identity.description.unwrap_or_default();
  site.scm_url = identity.scm_url;
  Ok(site)
}

fn invalid(reason: impl Into<String>) -> crate::core::error::ConvoyError {
  ValidationError::DescriptorInvalid { reason: reason.into() }.into()
}
