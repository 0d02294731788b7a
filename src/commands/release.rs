//! Release command: review the plan, then dispatch with --apply

use crate::commands::load_resolved_site;
use crate::core::context::ReleaseContext;
use crate::core::error::{ConfigError, ConvoyError, ConvoyResult, ReleaseError};
use crate::core::orchestrator::{ReleaseOrchestrator, ReleaseOutcome, ReleasePlan};
use crate::workflow::{CommandReleaseRunner, LocalWorkflowService, ReleaseCommandRunner};

/// Run the release command
pub fn run_release(ctx: &ReleaseContext, artifact_id: Option<String>, apply: bool, json: bool) -> ConvoyResult<()> {
  let mut site = load_resolved_site(ctx, !json)?;

  if let Some(ref artifact_id) = artifact_id {
    if site.find_component(artifact_id).is_none() {
      return Err(ConvoyError::Config(ConfigError::ComponentNotFound {
        artifact_id: artifact_id.clone(),
      }));
    }
  }

  let plan = ReleasePlan::for_site(&site)?;

  if !apply {
    if json {
      println!("{}", serde_json::to_string_pretty(&plan)?);
      return Ok(());
    }

    println!("🚆 Release plan {} for site {}", plan.id, plan.site_artifact_id);
    let planned: Vec<_> = plan
      .components
      .iter()
      .filter(|p| artifact_id.as_deref().map_or(true, |a| a == p.artifact_id))
      .collect();
    if planned.is_empty() {
      println!("   Nothing to release.");
    }
    for release in planned {
      println!(
        "   🚀 {} {} -> {} (then {})",
        release.artifact_id,
        release.current_version,
        release.target_version,
        release.next_snapshot_version.as_deref().unwrap_or("n/a"),
      );
    }
    if artifact_id.is_none() {
      println!(
        "   🏁 {} site workflow, next release {}",
        plan.site_artifact_id,
        plan.site_next_release_version.as_deref().unwrap_or("n/a"),
      );
    }
    println!("\nDry-run mode. Re-run with --apply to dispatch the release.");
    return Ok(());
  }

  let template = ctx
    .release_command()
    .filter(|command| !command.trim().is_empty())
    .ok_or(ReleaseError::NoCommand)?;
  let runner = CommandReleaseRunner::new(template, &ctx.root);
  let workflow = LocalWorkflowService::new();
  let orchestrator = ReleaseOrchestrator::new(&runner, &workflow);
  let user = ctx.release_user();

  match artifact_id {
    Some(artifact_id) => match orchestrator.release_component(&mut site, &artifact_id, user)? {
      Some(context_id) => {
        if json {
          println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
              "artifact_id": artifact_id,
              "context_id": context_id,
            }))?
          );
        } else {
          println!("✅ {} released (context {})", artifact_id, context_id);
          if let Some(result) = runner.result(context_id) {
            if !result.log.trim().is_empty() {
              println!("{}", result.log.trim_end());
            }
          }
        }
      }
      None => {
        println!("⏭  '{}' is not eligible for release", artifact_id);
      }
    },
    None => {
      let outcomes = orchestrator.release_site(&mut site, user)?;
      if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
      }
      for (artifact_id, outcome) in &outcomes {
        match outcome {
          ReleaseOutcome::Started { context_id } => {
            println!("✅ {} (context {})", artifact_id, context_id);
          }
          ReleaseOutcome::Failed { error } => {
            println!("❌ {}: {}", artifact_id, error);
          }
        }
      }
    }
  }

  Ok(())
}
