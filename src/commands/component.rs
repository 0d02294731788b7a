//! Per-component operator decisions: upgrade, downgrade, project flag

use crate::commands::component_line;
use crate::core::context::ReleaseContext;
use crate::core::error::{ConfigError, ConvoyError, ConvoyResult};
use crate::core::service::SiteService;

/// Run the upgrade command (or cancel a previous upgrade)
pub fn run_upgrade(ctx: &ReleaseContext, artifact_id: String, cancel: bool) -> ConvoyResult<()> {
  let provider = ctx.provider();
  let store = ctx.flag_store()?;
  let service = SiteService::new(&provider, ctx.pool_size());
  let mut site = service.load_site(ctx.parse_site()?, &store, None)?;

  if cancel {
    service.cancel_upgrade(&mut site, &artifact_id)?;
    println!("↩️  Upgrade cancelled for '{}'", artifact_id);
  } else {
    service.upgrade_component(&mut site, &artifact_id)?;
    println!("⬆️  Upgrade selected for '{}'", artifact_id);
  }

  print_component(&site, &artifact_id)
}

/// Run the downgrade command (or cancel a previous downgrade)
pub fn run_downgrade(ctx: &ReleaseContext, artifact_id: String, cancel: bool) -> ConvoyResult<()> {
  let provider = ctx.provider();
  let store = ctx.flag_store()?;
  let service = SiteService::new(&provider, ctx.pool_size());
  let mut site = service.load_site(ctx.parse_site()?, &store, None)?;

  if cancel {
    service.cancel_downgrade(&mut site, &artifact_id)?;
    println!("↩️  Downgrade cancelled for '{}'", artifact_id);
  } else {
    service.downgrade_component(&mut site, &artifact_id)?;
    println!("⬇️  Downgrade selected for '{}'", artifact_id);
  }

  print_component(&site, &artifact_id)
}

/// Run the project command: toggle and persist the project flag
pub fn run_project(ctx: &ReleaseContext, artifact_id: String) -> ConvoyResult<()> {
  let provider = ctx.provider();
  let mut store = ctx.flag_store()?;
  let service = SiteService::new(&provider, ctx.pool_size());
  let mut site = service.load_site(ctx.parse_site()?, &store, None)?;

  let is_project = service.toggle_project_component(&mut site, &artifact_id, &mut store)?;
  if is_project {
    println!("●  '{}' is now a project component", artifact_id);
  } else {
    println!("○  '{}' is no longer a project component", artifact_id);
  }

  print_component(&site, &artifact_id)
}

fn print_component(site: &crate::core::site::Site, artifact_id: &str) -> ConvoyResult<()> {
  let component = site.find_component(artifact_id).ok_or_else(|| {
    ConvoyError::Config(ConfigError::ComponentNotFound {
      artifact_id: artifact_id.to_string(),
    })
  })?;
  println!("   {}", component_line(component));
  for comment in &component.release_comments {
    println!("      💬 {}", comment);
  }
  Ok(())
}
