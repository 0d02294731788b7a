//! Site-level operations: loading and the operator-facing state transitions
//!
//! Every transition locates a single component by artifact id (unique per
//! site, validated at construction), mutates it, and rebuilds the release
//! comments so the displayed state is always consistent with the flags.

use crate::core::component::ComponentDecision;
use crate::core::enrich::Enricher;
use crate::core::error::{ConfigError, ConvoyError, ConvoyResult};
use crate::core::resolver;
use crate::core::site::Site;
use crate::remote::RemoteInfoProvider;
use crate::store::ProjectFlagStore;
use crate::ui::progress::MultiProgress;

/// Facade over the load/enrich/resolve pipeline and interactive transitions
pub struct SiteService<'a> {
  provider: &'a dyn RemoteInfoProvider,
  pool_size: usize,
}

impl<'a> SiteService<'a> {
  pub fn new(provider: &'a dyn RemoteInfoProvider, pool_size: usize) -> Self {
    Self { provider, pool_size }
  }

  fn enricher(&self) -> Enricher<'a> {
    Enricher::new(self.provider, self.pool_size)
  }

  /// Run the full pipeline on a freshly parsed site: site-level remote
  /// lookup, site version derivation, component rebuild from the flag store,
  /// bulk enrichment and comment generation
  pub fn load_site(
    &self,
    mut site: Site,
    store: &dyn ProjectFlagStore,
    progress: Option<&MultiProgress>,
  ) -> ConvoyResult<Site> {
    match self.provider.fetch(&site.artifact_id, &site.group_id) {
      Ok(info) => site.last_release_version = info.last_available_version,
      Err(err) => {
        log::warn!("site '{}': remote lookup failed: {}", site.artifact_id, err);
      }
    }
    resolver::resolve_site_versions(&mut site);

    let site_id = site.id;
    site.rebuild_components(|artifact_id| store.is_project(site_id, artifact_id));
    self.enricher().enrich_site(&mut site, progress)?;
    resolver::build_comments(&mut site);
    Ok(site)
  }

  /// Pin the component to the latest upstream release
  pub fn upgrade_component(&self, site: &mut Site, artifact_id: &str) -> ConvoyResult<()> {
    {
      let component = find_mut(site, artifact_id)?;
      component.target_version = component.last_available_version.clone();
      component.decision = ComponentDecision::Upgraded;
    }
    resolver::build_comments(site);
    Ok(())
  }

  /// Undo an upgrade: the target falls back to the current version
  pub fn cancel_upgrade(&self, site: &mut Site, artifact_id: &str) -> ConvoyResult<()> {
    {
      let component = find_mut(site, artifact_id)?;
      component.target_version = Some(component.current_version.clone());
      component.decision = ComponentDecision::Default;
    }
    resolver::build_comments(site);
    Ok(())
  }

  /// Move a snapshot component back to the upstream release and snapshot
  pub fn downgrade_component(&self, site: &mut Site, artifact_id: &str) -> ConvoyResult<()> {
    {
      let component = find_mut(site, artifact_id)?;
      if !component.is_snapshot_version() {
        return Err(not_a_snapshot(artifact_id));
      }
      component.target_version = component.last_available_version.clone();
      component.next_snapshot_version = component.last_available_snapshot_version.clone();
      component.decision = ComponentDecision::Downgraded;
    }
    resolver::build_comments(site);
    Ok(())
  }

  /// Undo a downgrade and re-run the standard derivations from scratch
  pub fn cancel_downgrade(&self, site: &mut Site, artifact_id: &str) -> ConvoyResult<()> {
    {
      let component = find_mut(site, artifact_id)?;
      if !component.is_snapshot_version() {
        return Err(not_a_snapshot(artifact_id));
      }
      component.decision = ComponentDecision::Default;
      resolver::define_target_version(component);
      resolver::define_next_snapshot_version(component);
    }
    resolver::build_comments(site);
    Ok(())
  }

  /// Flip the project flag, persist it, and (when newly set) enrich and
  /// re-derive the component outside the bulk pool
  pub fn toggle_project_component(
    &self,
    site: &mut Site,
    artifact_id: &str,
    store: &mut dyn ProjectFlagStore,
  ) -> ConvoyResult<bool> {
    let site_id = site.id;
    let is_project = {
      let component = find_mut(site, artifact_id)?;
      component.is_project = !component.is_project;
      component.is_project
    };
    store.set_project(site_id, artifact_id, is_project)?;

    if is_project {
      let component = find_mut(site, artifact_id)?;
      self.enricher().enrich_component(component);
    }
    resolver::build_comments(site);
    Ok(is_project)
  }
}

fn find_mut<'s>(site: &'s mut Site, artifact_id: &str) -> ConvoyResult<&'s mut crate::core::component::Component> {
  site.find_component_mut(artifact_id).ok_or_else(|| {
    ConvoyError::Config(ConfigError::ComponentNotFound {
      artifact_id: artifact_id.to_string(),
    })
  })
}

fn not_a_snapshot(artifact_id: &str) -> ConvoyError {
  ConvoyError::with_help(
    format!("Component '{}' is not on a snapshot version", artifact_id),
    "Only snapshot components can be downgraded.",
  )
}
