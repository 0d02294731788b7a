//! Version resolution: the decision procedure behind target and next-snapshot
//! versions
//!
//! Resolution is pure state-to-state derivation over already-fetched data.
//! Parse failures are recovered locally: the affected field falls back to the
//! "not available" sentinel (`None`), a warning is logged, and resolution
//! continues for the remaining components.

use crate::core::component::{Component, ComponentDecision};
use crate::core::site::Site;
use crate::core::version::Version;

/// Comment shown on third-party components whose pinned version is a snapshot
const MSG_AVOID_SNAPSHOT: &str = "The target version is a snapshot and should not go into a release.";
/// Comment shown when a component is ready to be released
const MSG_TO_BE_RELEASED: &str = "To be released.";

/// Pick the version new targets are derived from.
///
/// A candidate last release blocks deriving targets from the in-progress
/// snapshot until the candidate is finalized:
///
/// - last release `3.2.1`, current `4.0.0-SNAPSHOT` -> current
/// - last release missing, current `1.0.0-SNAPSHOT` -> current
/// - last release `3.2.1-RC-2`, current `3.2.1-SNAPSHOT` -> last release
pub fn choose_origin_version(last_release: Option<&str>, current_version: &str) -> String {
  match last_release {
    Some(last) if Version::is_candidate_text(last) => last.to_string(),
    _ => current_version.to_string(),
  }
}

/// Derive the site-level next release/snapshot versions and the candidate
/// series from the origin version
pub fn resolve_site_versions(site: &mut Site) {
  let origin = choose_origin_version(site.last_release_version.as_deref(), &site.version);
  match Version::parse(&origin) {
    Ok(version) => {
      site.next_release_version = Some(version.release_of().to_string());
      site.next_snapshot_version = Some(version.next_snapshot_of().to_string());
      site.target_versions = version.candidate_series().iter().map(|v| v.to_string()).collect();
      site.target_version_index = 0;
    }
    Err(err) => {
      log::warn!("site '{}': cannot derive next versions: {}", site.artifact_id, err);
      site.next_release_version = None;
      site.next_snapshot_version = None;
      site.target_versions = Vec::new();
      site.target_version_index = 0;
    }
  }
}

/// Run the full per-component derivation: target version, next snapshot
/// version and display name
pub fn resolve_component(component: &mut Component) {
  define_target_version(component);
  define_next_snapshot_version(component);
  component.name = component_display_name(component.scm_connection.as_deref(), &component.artifact_id);
}

/// Derive the target version of a component.
///
/// Project components on a snapshot either adopt the upstream release (an
/// upstream release has superseded the working snapshot, or the component is
/// a theme) or move to the release version of their current snapshot.
/// Everything else is pass-through: target equals current.
pub fn define_target_version(component: &mut Component) {
  if component.is_project && component.is_snapshot_version() {
    let superseded = component.last_available_version.is_some()
      && component.last_available_snapshot_version.as_deref() != Some(component.current_version.as_str());
    if superseded || component.is_theme() {
      component.target_version = component.last_available_version.clone();
    } else {
      match Version::parse(&component.current_version) {
        Ok(current) => {
          component.target_versions = current.candidate_series().iter().map(|v| v.to_string()).collect();
          component.target_version_index = 0;
          component.target_version = Some(current.release_of().to_string());
        }
        Err(err) => {
          log::warn!("component '{}': cannot derive target version: {}", component.artifact_id, err);
          component.target_versions = Vec::new();
          component.target_version_index = 0;
          component.target_version = None;
        }
      }
    }
  } else {
    component.target_version = Some(component.current_version.clone());
  }
}

/// Derive the next snapshot version of a component.
///
/// When the component's snapshot is not the latest one upstream (or the
/// component is a theme), upstream's next snapshot is adopted. Otherwise the
/// next snapshot is computed from the target version; a parse failure leaves
/// the "not available" sentinel.
pub fn define_next_snapshot_version(component: &mut Component) {
  let on_latest_snapshot =
    component.last_available_snapshot_version.as_deref() == Some(component.current_version.as_str());

  if !on_latest_snapshot || component.is_theme() {
    component.next_snapshot_version = component.last_available_snapshot_version.clone();
    return;
  }

  component.next_snapshot_version = component.target_version.as_deref().and_then(|target| {
    match Version::parse(target) {
      Ok(version) => Some(version.next_snapshot_of().to_string()),
      Err(err) => {
        log::warn!(
          "component '{}': cannot derive next snapshot version: {}",
          component.artifact_id,
          err
        );
        None
      }
    }
  });
}

/// Resolve the display name of a component from its SCM connection string,
/// falling back to the artifact id
pub fn component_display_name(scm_connection: Option<&str>, artifact_id: &str) -> String {
  scm_connection
    .and_then(|connection| {
      connection
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches(".git"))
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
    })
    .unwrap_or_else(|| artifact_id.to_string())
}

/// Rebuild the release comments of every component of a site, in the site's
/// stable component order
pub fn build_comments(site: &mut Site) {
  for component in &mut site.components {
    component.reset_comments();
    build_release_comments(component);
  }
}

fn build_release_comments(component: &mut Component) {
  if !component.is_project {
    if component.target_version.as_deref().is_some_and(Version::is_snapshot_text) {
      component.add_release_comment(MSG_AVOID_SNAPSHOT);
    } else if component.last_available_version.is_some()
      && component.target_version != component.last_available_version
    {
      component.add_release_comment(format!(
        "A more recent version is available: {}.",
        or_na(&component.last_available_version)
      ));
    }
    return;
  }

  if component.is_snapshot_version() {
    let on_latest_snapshot =
      component.last_available_snapshot_version.as_deref() == Some(component.current_version.as_str());
    if !on_latest_snapshot {
      component.add_release_comment(format!(
        "Upgrade to version {} selected.",
        or_na(&component.last_available_version)
      ));
    } else if !component.should_be_released() && component.decision != ComponentDecision::Downgraded {
      component.add_release_comment(format!(
        "A release version {} already exists.",
        or_na(&component.last_available_version)
      ));
    } else if component.should_be_released() {
      component.add_release_comment(MSG_TO_BE_RELEASED);
    }
  } else if component.last_available_version.is_some()
    && component.last_available_version.as_deref() != Some(component.current_version.as_str())
  {
    component.add_release_comment(format!(
      "A more recent version is available: {}.",
      or_na(&component.last_available_version)
    ));
  }
}

fn or_na(version: &Option<String>) -> &str {
  version.as_deref().unwrap_or("n/a")
}
