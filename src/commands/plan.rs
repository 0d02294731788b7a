//! Plan command: enrich the whole site and show the resolved release state

use crate::commands::{component_line, load_resolved_site};
use crate::core::component::ComponentDecision;
use crate::core::context::ReleaseContext;
use crate::core::error::ConvoyResult;

/// Run the plan command
pub fn run_plan(ctx: &ReleaseContext, json: bool) -> ConvoyResult<()> {
  let site = load_resolved_site(ctx, !json)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&site)?);
    return Ok(());
  }

  println!("📦 Site {} ({})", site.name, site.artifact_id);
  println!("   current          {}", site.version);
  println!("   last release     {}", site.last_release_version.as_deref().unwrap_or("n/a"));
  println!(
    "   next release     {}",
    site.next_release_version.as_deref().unwrap_or("n/a")
  );
  println!(
    "   next snapshot    {}",
    site.next_snapshot_version.as_deref().unwrap_or("n/a")
  );
  if !site.target_versions.is_empty() {
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
    println!("   candidates       {}", series.join(" "));
  }
  println!();

  for component in &site.components {
    let marker = if component.should_be_released() {
      "🚀"
    } else if component.is_theme() {
      "🎨"
    } else if component.is_project {
      "●"
    } else {
      "○"
    };
    let decision = match component.decision {
      ComponentDecision::Default => "",
      ComponentDecision::Upgraded => " [upgraded]",
      ComponentDecision::Downgraded => " [downgraded]",
    };
    let error = if component.error_last_release {
      " [last release failed]"
    } else {
      ""
    };
    println!("  {} {}{}{}", marker, component_line(component), decision, error);
    for comment in &component.release_comments {
      println!("      💬 {}", comment);
    }
  }

  println!("\n  🚀 to be released   ● project   ○ third-party   🎨 theme");
  Ok(())
}
