//! CLI commands for convoy
//!
//! This module contains all user-facing command implementations:
//!
//! ## Inspection
//! - **status**: Show the declared components of the site (offline)
//! - **plan**: Fetch remote metadata and resolve every component
//!
//! ## Interactive decisions
//! - **component**: upgrade/downgrade toggles and the project flag
//! - **cycle**: cycle next release versions through the candidate series
//!
//! ## Release
//! - **release**: dry-run release plans, then dispatch with `--apply`
//!
//! All commands accept `&ReleaseContext` to avoid redundant loads.

pub mod component;
pub mod cycle;
pub mod plan;
pub mod release;
pub mod status;

pub use component::{run_downgrade, run_project, run_upgrade};
pub use cycle::run_cycle;
pub use plan::run_plan;
pub use release::run_release;
pub use status::run_status;

use crate::core::context::ReleaseContext;
use crate::core::error::ConvoyResult;
use crate::core::service::SiteService;
use crate::core::site::Site;
use crate::remote::RegistryProvider;
use crate::ui::progress::MultiProgress;

/// Parse, enrich and resolve the configured site
pub(crate) fn load_resolved_site(ctx: &ReleaseContext, show_progress: bool) -> ConvoyResult<Site> {
  let provider: RegistryProvider = ctx.provider();
  let store = ctx.flag_store()?;
  let service = SiteService::new(&provider, ctx.pool_size());

  let progress = if show_progress { Some(MultiProgress::new()) } else { None };
  service.load_site(ctx.parse_site()?, &store, progress.as_ref())
}

/// One-line component summary used by several commands
pub(crate) fn component_line(component: &crate::core::component::Component) -> String {
  let mut line = format!(
    "{} {} -> {}",
    component.artifact_id,
    component.current_version,
    component.target_version.as_deref().unwrap_or("n/a"),
  );
  if let Some(next) = component.next_snapshot_version.as_deref() {
    line.push_str(&format!(" (next snapshot {})", next));
  }
  line
}
