//! Integration tests for `convoy plan`

use crate::helpers::{stdout_of, TestWorkspace};
use anyhow::Result;

#[test]
fn test_plan_resolves_project_snapshot_to_release_target() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;
  ws.flag_as_project("lib-a")?;
  // The current snapshot is the latest published snapshot: standard derivation
  ws.write_registry("lib-a", &["1.3.0", "1.4.0-SNAPSHOT"], None)?;

  let stdout = stdout_of(&ws.path, &["plan"])?;
  assert!(stdout.contains("1.4.0-SNAPSHOT -> 1.4.0"), "unexpected plan:\n{}", stdout);
  assert!(stdout.contains("1.4.1-SNAPSHOT"));
  assert!(stdout.contains("To be released."));

  Ok(())
}

#[test]
fn test_plan_json_exposes_resolved_fields() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site(
    "1.0.0-SNAPSHOT",
    &[("lib-a", "1.4.0-SNAPSHOT", "jar"), ("lib-vendor", "2.0.0", "jar")],
  )?;
  ws.flag_as_project("lib-a")?;
  ws.write_registry("lib-a", &["1.4.0-SNAPSHOT"], Some("scm:git:https://example.org/lib-core.git"))?;
  ws.write_registry("lib-vendor", &["2.1.0"], None)?;

  let stdout = stdout_of(&ws.path, &["plan", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;

  // Site-level derivation from the declared snapshot
  assert_eq!(site["next_release_version"], "1.0.0");
  assert_eq!(site["next_snapshot_version"], "1.0.1-SNAPSHOT");
  assert_eq!(site["target_versions"], serde_json::json!(["1.0.0", "1.1.0", "2.0.0"]));

  let components = site["components"].as_array().unwrap();
  assert_eq!(components.len(), 2);

  // Project snapshot: standard derivation, display name from SCM
  assert_eq!(components[0]["target_version"], "1.4.0");
  assert_eq!(components[0]["next_snapshot_version"], "1.4.1-SNAPSHOT");
  assert_eq!(components[0]["name"], "lib-core");

  // Third-party component: pass-through target
  assert_eq!(components[1]["target_version"], "2.0.0");

  Ok(())
}

#[test]
fn test_plan_survives_missing_registry_metadata() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("lib-a", "1.4.0-SNAPSHOT", "jar")])?;
  ws.flag_as_project("lib-a")?;
  // No registry metadata at all: the lookup fails per component and degrades

  let stdout = stdout_of(&ws.path, &["plan", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;

  let component = &site["components"][0];
  assert_eq!(component["last_available_version"], serde_json::Value::Null);
  // Target is still derived from the current snapshot
  assert_eq!(component["target_version"], "1.4.0");

  Ok(())
}

#[test]
fn test_plan_theme_adopts_upstream_versions() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_site("1.0.0-SNAPSHOT", &[("site-theme", "2.0.0-SNAPSHOT", "theme")])?;
  ws.flag_as_project("site-theme")?;
  ws.write_registry("site-theme", &["2.1.0", "2.2.0-SNAPSHOT"], None)?;

  let stdout = stdout_of(&ws.path, &["plan", "--json"])?;
  let site: serde_json::Value = serde_json::from_str(&stdout)?;

  let component = &site["components"][0];
  assert_eq!(component["target_version"], "2.1.0");
  assert_eq!(component["next_snapshot_version"], "2.2.0-SNAPSHOT");

  Ok(())
}
