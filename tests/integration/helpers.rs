//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Group id used by every test artifact
pub const GROUP_ID: &str = "com.example";

/// A test workspace with a convoy config, site descriptor and registry tree
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a workspace with a default configuration
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let ws = Self { _root: root, path };
    ws.write_config("true")?;
    std::fs::create_dir_all(ws.path.join("registry"))?;
    Ok(ws)
  }

  /// Write convoy.toml with the given release command template
  pub fn write_config(&self, release_command: &str) -> Result<()> {
    let content = format!(
      r#"[site]
descriptor = "site.toml"

[registry]
path = "registry"

[enrichment]
pool_size = 4

[release]
command = "{}"
user = "tester"
"#,
      release_command
    );
    std::fs::write(self.path.join("convoy.toml"), content)?;
    Ok(())
  }

  /// Write the site descriptor; dependencies are (artifact_id, version, type)
  pub fn write_site(&self, site_version: &str, dependencies: &[(&str, &str, &str)]) -> Result<()> {
    let mut content = format!(
      r#"[site]
id = 1
artifact_id = "demo-site"
group_id = "{}"
version = "{}"
name = "Demo Site"
"#,
      GROUP_ID, site_version
    );

    for (artifact_id, version, dep_type) in dependencies {
      content.push_str(&format!(
        r#"
[[dependencies]]
group_id = "{}"
artifact_id = "{}"
version = "{}"
type = "{}"
"#,
        GROUP_ID, artifact_id, version, dep_type
      ));
    }

    std::fs::write(self.path.join("site.toml"), content)?;
    Ok(())
  }

  /// Publish registry metadata for an artifact
  pub fn write_registry(&self, artifact_id: &str, versions: &[&str], scm: Option<&str>) -> Result<()> {
    let dir = self.path.join("registry").join(GROUP_ID);
    std::fs::create_dir_all(&dir)?;

    let metadata = serde_json::json!({
      "versions": versions,
      "scm": scm,
    });
    std::fs::write(
      dir.join(format!("{}.json", artifact_id)),
      serde_json::to_string_pretty(&metadata)?,
    )?;
    Ok(())
  }

  /// Mark an artifact as a project component by seeding the flag store
  pub fn flag_as_project(&self, artifact_id: &str) -> Result<()> {
    let dir = self.path.join(".convoy");
    std::fs::create_dir_all(&dir)?;

    let mut site_flags = serde_json::Map::new();
    site_flags.insert(artifact_id.to_string(), serde_json::Value::Bool(true));
    let flags = serde_json::json!({ "1": site_flags });
    std::fs::write(dir.join("flags.json"), serde_json::to_string_pretty(&flags)?)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run the convoy CLI, failing the test on a non-zero exit
pub fn run_convoy(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_convoy_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "convoy command failed: convoy {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the convoy CLI without asserting on the exit status
pub fn run_convoy_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let convoy_bin = env!("CARGO_BIN_EXE_convoy");

  Command::new(convoy_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run convoy")
}

/// Stdout of a successful run as a string
pub fn stdout_of(cwd: &Path, args: &[&str]) -> Result<String> {
  let output = run_convoy(cwd, args)?;
  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
