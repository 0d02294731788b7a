//! Bounded-parallel remote enrichment
//!
//! One lookup task per component runs on a fixed-size worker pool; the call
//! joins on the whole batch before returning. A failed lookup degrades that
//! one component to "no remote information" and never aborts the batch.
//! After the join, a strictly sequential pass applies the resolver in the
//! site's insertion order so derived state and comments are deterministic.

use crate::core::component::Component;
use crate::core::error::ConvoyResult;
use crate::core::resolver;
use crate::core::site::Site;
use crate::remote::{RemoteInfo, RemoteInfoProvider};
use crate::ui::progress::MultiProgress;
use rayon::prelude::*;

/// Default ceiling for concurrent remote lookups, independent of site size
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Remote enrichment over a site's components
pub struct Enricher<'a> {
  provider: &'a dyn RemoteInfoProvider,
  pool_size: usize,
}

impl<'a> Enricher<'a> {
  pub fn new(provider: &'a dyn RemoteInfoProvider, pool_size: usize) -> Self {
    Self {
      provider,
      pool_size: pool_size.max(1),
    }
  }

  /// Fetch remote metadata for every component in parallel, then resolve all
  /// components sequentially in insertion order.
  ///
  /// Blocks until every lookup task has completed or failed.
  pub fn enrich_site(&self, site: &mut Site, progress: Option<&MultiProgress>) -> ConvoyResult<()> {
    if !site.components.is_empty() {
      let pool = rayon::ThreadPoolBuilder::new().num_threads(self.pool_size).build()?;
      let bar = progress.map(|p| p.add_bar(site.components.len(), format!("fetching metadata for {}", site.artifact_id)));

      pool.install(|| {
        site.components.par_iter_mut().for_each(|component| {
          fetch_into(self.provider, component);
          if let (Some(p), Some(b)) = (progress, bar.as_ref()) {
            p.inc(b);
          }
        });
      });
    }

    for component in &mut site.components {
      resolver::resolve_component(component);
    }
    Ok(())
  }

  /// Synchronous single-component enrichment, outside the bulk pool (used
  /// when a component is newly flagged as a project)
  pub fn enrich_component(&self, component: &mut Component) {
    fetch_into(self.provider, component);
    resolver::resolve_component(component);
  }
}

fn fetch_into(provider: &dyn RemoteInfoProvider, component: &mut Component) {
  match provider.fetch(&component.artifact_id, &component.group_id) {
    Ok(info) => apply_remote_info(component, info),
    Err(err) => {
      log::warn!("component '{}': remote lookup failed: {}", component.artifact_id, err);
    }
  }
}

fn apply_remote_info(component: &mut Component, info: RemoteInfo) {
  component.last_available_version = info.last_available_version;
  component.last_available_snapshot_version = info.last_available_snapshot_version;
  component.scm_connection = info.scm_connection;
}
