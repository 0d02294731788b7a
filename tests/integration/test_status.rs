//! Integration tests for `convoy status`

use crate::helpers::{run_convoy_raw, stdout_of, TestWorkspace};
use anyhow::Result;

#[test]
fn test_status_lists_declared_components() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site(
    "1.0.0-SNAPSHOT",
    &[("lib-a", "1.4.0-SNAPSHOT", "jar"), ("lib-vendor", "2.0.0", "jar")],
  )?;

  let stdout = stdout_of(&ws.path, &["status"])?;
  assert!(stdout.contains("demo-site"), "should show the site:\n{}", stdout);
  assert!(stdout.contains("lib-a"));
  assert!(stdout.contains("lib-vendor"));
  assert!(stdout.contains("1.4.0-SNAPSHOT"));

  Ok(())
}

#[test]
fn test_status_json_output() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;

  let stdout = stdout_of(&ws.path, &["status", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;

  assert_eq!(site["artifact_id"], "demo-site");
  assert_eq!(site["components"].as_array().unwrap().len(), 1);
  assert_eq!(site["components"][0]["artifact_id"], "lib-a");
  assert_eq!(site["components"][0]["is_project"], false);

  Ok(())
}

#[test]
fn test_status_respects_persisted_project_flags() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;
  ws.flag_as_project("lib-a")?;

  let stdout = stdout_of(&ws.path, &["status", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;
  assert_eq!(site["components"][0]["is_project"], true);

  Ok(())
}

#[test]
fn test_missing_config_is_a_user_error() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = run_convoy_raw(dir.path(), &["status"])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_duplicate_dependency_is_a_validation_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site(
    "1.0.0-SNAPSHOT",
    &[("lib-a", "1.0.0", "jar"), ("lib-a", "2.0.0", "jar")],
  )?;

  let output = run_convoy_raw(&ws.path, &["status"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("lib-a"), "stderr should name the duplicate:\n{}", stderr);

  Ok(())
}
