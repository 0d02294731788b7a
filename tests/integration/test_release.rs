//! Integration tests for `convoy release`

use crate::helpers::{stdout_of, TestWorkspace};
use anyhow::Result;

fn releasable_workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.write_site(
    "1.0.0-SNAPSHOT",
    &[("lib-a", "1.4.0-SNAPSHOT", "jar"), ("lib-vendor", "2.0.0", "jar")],
  )?;
  ws.flag_as_project("lib-a")?;
  ws.write_registry("lib-a", &["1.3.0", "1.4.0-SNAPSHOT"], None)?;
  Ok(ws)
}

#[test]
fn test_release_defaults_to_dry_run() -> Result<()> {
  let ws = releasable_workspace()?;

  let stdout = stdout_of(&ws.path, &["release"])?;
  assert!(stdout.contains("Release plan"), "unexpected:\n{}", stdout);
  assert!(stdout.contains("lib-a 1.4.0-SNAPSHOT -> 1.4.0"));
  assert!(stdout.contains("Dry-run mode"));
  // The ineligible third-party component is not part of the plan
  assert!(!stdout.contains("lib-vendor"));

  Ok(())
}

#[test]
fn test_release_dry_run_json_plan() -> Result<()> {
  let ws = releasable_workspace()?;

  let stdout = stdout_of(&ws.path, &["release", "--json"])?;
  let plan: serde_json::Value = serde_json::from_str(&stdout)?;

  assert_eq!(plan["site_artifact_id"], "demo-site");
  let components = plan["components"].as_array().unwrap();
  assert_eq!(components.len(), 1);
  assert_eq!(components[0]["artifact_id"], "lib-a");
  assert_eq!(components[0]["target_version"], "1.4.0");
  assert!(plan["id"].as_str().is_some());

  Ok(())
}

#[test]
fn test_release_apply_dispatches_component_and_site() -> Result<()> {
  let ws = releasable_workspace()?;
  ws.write_config("touch released-{artifact}")?;

  let stdout = stdout_of(&ws.path, &["release", "--apply"])?;

  // Exactly one component release was dispatched, plus the site workflow
  assert!(ws.file_exists("released-lib-a"));
  assert!(!ws.file_exists("released-lib-vendor"));
  assert!(stdout.contains("lib-a"), "unexpected:\n{}", stdout);
  assert!(stdout.contains("demo-site"));

  Ok(())
}

#[test]
fn test_release_apply_json_outcomes() -> Result<()> {
  let ws = releasable_workspace()?;

  let stdout = stdout_of(&ws.path, &["release", "--apply", "--json"])?;
  let outcomes: serde_json::Value = serde_json::from_str(&stdout)?;
  let map = outcomes.as_object().unwrap();

  // One entry per dispatched component, one for the site itself
  assert_eq!(map.len(), 2);
  assert_eq!(map["lib-a"]["outcome"], "started");
  assert_eq!(map["demo-site"]["outcome"], "started");

  Ok(())
}

#[test]
fn test_release_continues_past_failed_dispatch() -> Result<()> {
  let ws = releasable_workspace()?;
  ws.write_config("false")?;

  let stdout = stdout_of(&ws.path, &["release", "--apply", "--json"])?;
  let outcomes: serde_json::Value = serde_json::from_str(&stdout)?;

  // The component dispatch failed, but the site workflow still started
  assert_eq!(outcomes["lib-a"]["outcome"], "failed");
  assert_eq!(outcomes["demo-site"]["outcome"], "started");

  Ok(())
}

#[test]
fn test_release_single_component() -> Result<()> {
  let ws = releasable_workspace()?;
  ws.write_config("touch released-{artifact}")?;

  let stdout = stdout_of(&ws.path, &["release", "lib-a", "--apply"])?;
  assert!(stdout.contains("lib-a released"), "unexpected:\n{}", stdout);
  assert!(ws.file_exists("released-lib-a"));

  Ok(())
}

#[test]
fn test_release_single_ineligible_component_is_skipped() -> Result<()> {
  let ws = releasable_workspace()?;
  ws.write_config("touch released-{artifact}")?;

  let stdout = stdout_of(&ws.path, &["release", "lib-vendor", "--apply"])?;
  assert!(stdout.contains("not eligible"), "unexpected:\n{}", stdout);
  assert!(!ws.file_exists("released-lib-vendor"));

  Ok(())
}
