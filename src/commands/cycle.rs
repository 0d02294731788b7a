//! Cycle command: walk the candidate series of the site or one component

use crate::commands::{component_line, load_resolved_site};
use crate::core::context::ReleaseContext;
use crate::core::error::{ConfigError, ConvoyError, ConvoyResult};
use crate::core::orchestrator;

/// Run the cycle command
pub fn run_cycle(ctx: &ReleaseContext, artifact_id: Option<String>, times: u32) -> ConvoyResult<()> {
  let mut site = load_resolved_site(ctx, false)?;
  let steps = times.max(1);

  match artifact_id {
    Some(artifact_id) => {
      let component = site.find_component_mut(&artifact_id).ok_or_else(|| {
        ConvoyError::Config(ConfigError::ComponentNotFound {
          artifact_id: artifact_id.clone(),
        })
      })?;
      for _ in 0..steps {
        orchestrator::cycle_component_target(component);
      }
      println!("🔄 {}", component_line(component));
    }
    None => {
      for _ in 0..steps {
        orchestrator::change_next_release_version(&mut site);
      }
      println!(
        "🔄 Site {}: next release {} (next snapshot {})",
        site.artifact_id,
        site.next_release_version.as_deref().unwrap_or("n/a"),
        site.next_snapshot_version.as_deref().unwrap_or("n/a"),
      );
      let series: Vec<String> = site
        .target_versions
        .iter()
        .enumerate()
        .map(|(i, v)| {
          if i == site.target_version_index {
            format!("[{}]", v)
          } else {
            v.clone()
          }
        })
        .collect();
      println!("   candidates: {}", series.join(" "));
    }
  }
  Ok(())
}
