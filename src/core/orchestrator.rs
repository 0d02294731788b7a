//! Release orchestration: dispatch eligible components, then the site
//!
//! Component releases are dispatched strictly sequentially; the collaborator
//! side commonly serializes on a single working checkout, so parallel
//! dispatch would only move the contention. A dispatch failure is recorded
//! in the per-artifact outcome map and never stops the remaining releases.

use crate::core::component::Component;
use crate::core::error::ConvoyResult;
use crate::core::site::Site;
use crate::core::version::Version;
use crate::workflow::{ContextId, ReleaseCommandRunner, WorkflowReleaseContext, WorkflowService};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Release plan identifier (SHA256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// One component release within a site release plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRelease {
  pub artifact_id: String,
  pub name: String,
  pub current_version: String,
  pub target_version: String,
  pub next_snapshot_version: Option<String>,
}

/// What a site release would dispatch, reviewable before applying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasePlan {
  pub id: PlanId,
  pub site_artifact_id: String,
  pub site_next_release_version: Option<String>,
  pub components: Vec<PlannedRelease>,
}

impl ReleasePlan {
  /// Plan the release of every currently eligible component of a site
  pub fn for_site(site: &Site) -> ConvoyResult<Self> {
    let components: Vec<PlannedRelease> = site
      .components
      .iter()
      .filter(|c| c.is_project && c.should_be_released() && !c.is_theme())
      .map(|c| PlannedRelease {
        artifact_id: c.artifact_id.clone(),
        name: c.name.clone(),
        current_version: c.current_version.clone(),
        target_version: c.target_version.clone().unwrap_or_default(),
        next_snapshot_version: c.next_snapshot_version.clone(),
      })
      .collect();

    let mut plan = Self {
      id: PlanId::from_contents(b""),
      site_artifact_id: site.artifact_id.clone(),
      site_next_release_version: site.next_release_version.clone(),
      components,
    };
    let fingerprint = serde_json::to_vec(&(
      &plan.site_artifact_id,
      &plan.site_next_release_version,
      &plan.components,
    ))?;
    plan.id = PlanId::from_contents(&fingerprint);
    Ok(plan)
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }
}

/// Terminal outcome of one dispatched release, keyed by artifact id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReleaseOutcome {
  Started { context_id: ContextId },
  Failed { error: String },
}

/// Drives per-component release dispatch and the site-level workflow
pub struct ReleaseOrchestrator<'a> {
  runner: &'a dyn ReleaseCommandRunner,
  workflow: &'a dyn WorkflowService,
}

impl<'a> ReleaseOrchestrator<'a> {
  pub fn new(runner: &'a dyn ReleaseCommandRunner, workflow: &'a dyn WorkflowService) -> Self {
    Self { runner, workflow }
  }

  /// Release a single named component if it is eligible; an ineligible or
  /// unknown component yields `None` and the collaborator is never invoked
  pub fn release_component(&self, site: &mut Site, artifact_id: &str, user: &str) -> ConvoyResult<Option<ContextId>> {
    let Some(component) = site.find_component_mut(artifact_id) else {
      return Ok(None);
    };
    if !component.should_be_released() {
      return Ok(None);
    }

    component.error_last_release = false;
    match self.runner.release(component, user) {
      Ok(context_id) => Ok(Some(context_id)),
      Err(err) => {
        component.error_last_release = true;
        Err(err)
      }
    }
  }

  /// Release every eligible project component of the site sequentially, then
  /// start the site-level workflow. Returns artifact id -> outcome, with one
  /// extra entry for the site itself.
  pub fn release_site(&self, site: &mut Site, user: &str) -> ConvoyResult<BTreeMap<String, ReleaseOutcome>> {
    let mut outcomes = BTreeMap::new();

    for component in &mut site.components {
      if component.is_project && component.should_be_released() && !component.is_theme() {
        component.error_last_release = false;
        match self.runner.release(component, user) {
          Ok(context_id) => {
            outcomes.insert(component.artifact_id.clone(), ReleaseOutcome::Started { context_id });
          }
          Err(err) => {
            component.error_last_release = true;
            log::error!("release dispatch failed for '{}': {}", component.artifact_id, err);
            outcomes.insert(
              component.artifact_id.clone(),
              ReleaseOutcome::Failed { error: err.to_string() },
            );
          }
        }
      }
    }

    let mut context = WorkflowReleaseContext::new(site, user);
    let workflow_id = self.workflow.resolve_workflow_id(&context)?;
    self.workflow.register(&mut context)?;
    self.workflow.start(&context, workflow_id)?;
    outcomes.insert(site.artifact_id.clone(), ReleaseOutcome::Started { context_id: context.id });

    Ok(outcomes)
  }
}

/// Cycle the site's next release version through its candidate series,
/// recomputing the next snapshot from the new selection
pub fn change_next_release_version(site: &mut Site) {
  if site.target_versions.is_empty() {
    log::warn!("site '{}': no candidate versions to cycle through", site.artifact_id);
    return;
  }

  let index = (site.target_version_index + 1) % site.target_versions.len();
  let target = site.target_versions[index].clone();
  site.target_version_index = index;
  site.next_snapshot_version = match Version::parse(&target) {
    Ok(version) => Some(version.next_snapshot_of().to_string()),
    Err(err) => {
      log::warn!("site '{}': cannot derive next snapshot: {}", site.artifact_id, err);
      None
    }
  };
  site.next_release_version = Some(target);
}

/// Component-level counterpart of [`change_next_release_version`]
pub fn cycle_component_target(component: &mut Component) {
  if component.target_versions.is_empty() {
    log::warn!(
      "component '{}': no candidate versions to cycle through",
      component.artifact_id
    );
    return;
  }

  let index = (component.target_version_index + 1) % component.target_versions.len();
  let target = component.target_versions[index].clone();
  component.target_version_index = index;
  component.next_snapshot_version = match Version::parse(&target) {
    Ok(version) => Some(version.next_snapshot_of().to_string()),
    Err(err) => {
      log::warn!("component '{}': cannot derive next snapshot: {}", component.artifact_id, err);
      None
    }
  };
  component.target_version = Some(target);
}
