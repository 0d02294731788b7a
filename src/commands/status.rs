//! Status command: the declared state of the site, no remote lookups

use crate::core::context::ReleaseContext;
use crate::core::error::ConvoyResult;
use crate::store::ProjectFlagStore;

/// Run the status command
pub fn run_status(ctx: &ReleaseContext, json: bool) -> ConvoyResult<()> {
  let mut site = ctx.parse_site()?;
  let store = ctx.flag_store()?;
  let site_id = site.id;
  site.rebuild_components(|artifact_id| store.is_project(site_id, artifact_id));

  if json {
    println!("{}", serde_json::to_string_pretty(&site)?);
    return Ok(());
  }

  println!("📦 Site {} ({}) version {}", site.name, site.artifact_id, site.version);
  println!("   {} declared dependencies\n", site.dependencies.len());

  for component in &site.components {
    let marker = if component.is_project { "●" } else { "○" };
    println!(
      "  {} {:<32} {:<24} {}",
      marker, component.artifact_id, component.current_version, component.dep_type
    );
  }

  println!("\n  ● project component   ○ third-party");
  Ok(())
}
