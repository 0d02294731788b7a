//! Integration tests for operator decisions: project flag, upgrade,
//! downgrade, cycling

use crate::helpers::{run_convoy_raw, stdout_of, TestWorkspace};
use anyhow::Result;

#[test]
fn test_project_toggle_persists_the_flag() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;
  ws.write_registry("lib-a", &["1.3.0", "1.4.0-SNAPSHOT"], None)?;

  let stdout = stdout_of(&ws.path, &["project", "lib-a"])?;
  assert!(stdout.contains("now a project component"), "unexpected:\n{}", stdout);
  assert!(ws.file_exists(".convoy/flags.json"));
  assert!(ws.read_file(".convoy/flags.json")?.contains("lib-a"));

  // The flag survives into the next invocation
  let stdout = stdout_of(&ws.path, &["status", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;
  assert_eq!(site["components"][0]["is_project"], true);

  // Toggling again clears it
  let stdout = stdout_of(&ws.path, &["project", "lib-a"])?;
  assert!(stdout.contains("no longer a project component"));

  Ok(())
}

#[test]
fn test_upgrade_pins_to_latest_upstream_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-vendor", "2.0.0", "jar")])?;
  ws.write_registry("lib-vendor", &["2.0.0", "2.1.0"], None)?;

  let stdout = stdout_of(&ws.path, &["upgrade", "lib-vendor"])?;
  assert!(stdout.contains("2.0.0 -> 2.1.0"), "unexpected:\n{}", stdout);

  Ok(())
}

#[test]
fn test_cancel_upgrade_restores_current_version() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-vendor", "2.0.0", "jar")])?;
  ws.write_registry("lib-vendor", &["2.1.0"], None)?;

  let stdout = stdout_of(&ws.path, &["upgrade", "lib-vendor", "--cancel"])?;
  assert!(stdout.contains("2.0.0 -> 2.0.0"), "unexpected:\n{}", stdout);

  Ok(())
}

#[test]
fn test_downgrade_requires_a_snapshot_component() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-vendor", "2.0.0", "jar")])?;

  let output = run_convoy_raw(&ws.path, &["downgrade", "lib-vendor"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("snapshot"), "unexpected stderr:\n{}", stderr);

  Ok(())
}

#[test]
fn test_downgrade_adopts_upstream_release_and_snapshot() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;
  ws.flag_as_project("lib-a")?;
  ws.write_registry("lib-a", &["1.3.0", "1.3.1-SNAPSHOT"], None)?;

  let stdout = stdout_of(&ws.path, &["downgrade", "lib-a"])?;
  assert!(stdout.contains("1.4.0-SNAPSHOT -> 1.3.0"), "unexpected:\n{}", stdout);
  assert!(stdout.contains("1.3.1-SNAPSHOT"));

  Ok(())
}

#[test]
fn test_unknown_component_is_reported() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;

  let output = run_convoy_raw(&ws.path, &["upgrade", "lib-zzz"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("lib-zzz"));

  Ok(())
}

#[test]
fn test_cycle_advances_the_site_candidate() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[])?;

  let stdout = stdout_of(&ws.path, &["cycle"])?;
  assert!(stdout.contains("next release 1.1.0"), "unexpected:\n{}", stdout);
  assert!(stdout.contains("[1.1.0]"));

  Ok(())
}

#[test]
fn test_cycle_wraps_around_the_series() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[])?;

  // Three candidates (1.0.0, 1.1.0, 2.0.0): three steps land back on the first
  let stdout = stdout_of(&ws.path, &["cycle", "--times", "3"])?;
  assert!(stdout.contains("next release 1.0.0"), "unexpected:\n{}", stdout);
  assert!(stdout.contains("next snapshot 1.0.1-SNAPSHOT"));

  Ok(())
}
