//! Release dispatch collaborators
//!
//! The engine never performs a release itself: per-component releases go
//! through a `ReleaseCommandRunner`, and the site-level release is handed to
//! a `WorkflowService` as a `WorkflowReleaseContext`. Both are injected at
//! composition time; the engine only observes context ids and statuses.

use crate::core::component::Component;
use crate::core::error::{ConvoyResult, ReleaseError};
use crate::core::site::Site;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Identifier of a dispatched release, usable for independent polling
pub type ContextId = u64;

/// Per-site record created once per release operation and handed to the
/// workflow collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReleaseContext {
  pub id: ContextId,
  pub site_artifact_id: String,
  pub user: String,
  pub workflow_id: Option<u64>,
  pub created_at: DateTime<Utc>,
}

impl WorkflowReleaseContext {
  pub fn new(site: &Site, user: impl Into<String>) -> Self {
    Self {
      id: 0,
      site_artifact_id: site.artifact_id.clone(),
      user: user.into(),
      workflow_id: None,
      created_at: Utc::now(),
    }
  }
}

/// Workflow collaborator boundary: resolve a workflow id, register the
/// context (assigning its id), start it
pub trait WorkflowService {
  fn resolve_workflow_id(&self, context: &WorkflowReleaseContext) -> ConvoyResult<u64>;

  fn register(&self, context: &mut WorkflowReleaseContext) -> ConvoyResult<()>;

  fn start(&self, context: &WorkflowReleaseContext, workflow_id: u64) -> ConvoyResult<()>;
}

/// Workflow definition id used for site releases
const ID_WORKFLOW_SITE_RELEASE: u64 = 1;

/// In-process workflow service: monotonic context ids, started contexts kept
/// for inspection
#[derive(Default)]
pub struct LocalWorkflowService {
  next_id: AtomicU64,
  started: Mutex<Vec<WorkflowReleaseContext>>,
}

impl LocalWorkflowService {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn started_contexts(&self) -> Vec<WorkflowReleaseContext> {
    self.started.lock().unwrap().clone()
  }
}

impl WorkflowService for LocalWorkflowService {
  fn resolve_workflow_id(&self, _context: &WorkflowReleaseContext) -> ConvoyResult<u64> {
    Ok(ID_WORKFLOW_SITE_RELEASE)
  }

  fn register(&self, context: &mut WorkflowReleaseContext) -> ConvoyResult<()> {
    context.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    Ok(())
  }

  fn start(&self, context: &WorkflowReleaseContext, workflow_id: u64) -> ConvoyResult<()> {
    let mut started = context.clone();
    started.workflow_id = Some(workflow_id);
    log::info!(
      "workflow {} started for site '{}' (context {})",
      workflow_id,
      started.site_artifact_id,
      started.id
    );
    self.started.lock().unwrap().push(started);
    Ok(())
  }
}

/// Terminal status of a dispatched release command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
  Ok,
  Error,
}

/// Captured outcome of one release command invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
  pub status: CommandStatus,
  pub log: String,
  pub error: Option<String>,
  pub begin: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

/// Release collaborator boundary: dispatch one component release, return a
/// pollable context id
pub trait ReleaseCommandRunner {
  fn release(&self, component: &Component, user: &str) -> ConvoyResult<ContextId>;

  /// Captured result of an earlier dispatch, if known
  fn result(&self, context_id: ContextId) -> Option<CommandResult>;
}

/// Runs the configured release command with `{artifact}`, `{group}`,
/// `{target}`, `{next}` and `{user}` substituted
pub struct CommandReleaseRunner {
  template: String,
  workdir: PathBuf,
  next_id: AtomicU64,
  results: Mutex<HashMap<ContextId, CommandResult>>,
}

impl CommandReleaseRunner {
  pub fn new(template: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
    Self {
      template: template.into(),
      workdir: workdir.into(),
      next_id: AtomicU64::new(0),
      results: Mutex::new(HashMap::new()),
    }
  }

  fn render(&self, component: &Component, user: &str) -> String {
    self
      .template
      .replace("{artifact}", &component.artifact_id)
      .replace("{group}", &component.group_id)
      .replace("{target}", component.target_version.as_deref().unwrap_or(""))
      .replace("{next}", component.next_snapshot_version.as_deref().unwrap_or(""))
      .replace("{user}", user)
  }
}

impl ReleaseCommandRunner for CommandReleaseRunner {
  fn release(&self, component: &Component, user: &str) -> ConvoyResult<ContextId> {
    if self.template.trim().is_empty() {
      return Err(ReleaseError::NoCommand.into());
    }

    let rendered = self.render(component, user);
    let mut parts = rendered.split_whitespace();
    let program = parts.next().ok_or(ReleaseError::NoCommand)?;

    let begin = Utc::now();
    let output = Command::new(program).args(parts).current_dir(&self.workdir).output();
    let end = Utc::now();

    let context_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let (result, outcome) = match output {
      Ok(output) => {
        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        if output.status.success() {
          (
            CommandResult {
              status: CommandStatus::Ok,
              log,
              error: None,
              begin,
              end,
            },
            Ok(context_id),
          )
        } else {
          let error = format!("exit status {}", output.status.code().unwrap_or(-1));
          (
            CommandResult {
              status: CommandStatus::Error,
              log: log.clone(),
              error: Some(error),
              begin,
              end,
            },
            Err(
              ReleaseError::CommandFailed {
                artifact_id: component.artifact_id.clone(),
                log,
              }
              .into(),
            ),
          )
        }
      }
      Err(err) => (
        CommandResult {
          status: CommandStatus::Error,
          log: String::new(),
          error: Some(err.to_string()),
          begin,
          end,
        },
        Err(
          ReleaseError::CommandFailed {
            artifact_id: component.artifact_id.clone(),
            log: err.to_string(),
          }
          .into(),
        ),
      ),
    };

    self.results.lock().unwrap().insert(context_id, result);
    outcome
  }

  fn result(&self, context_id: ContextId) -> Option<CommandResult> {
    self.results.lock().unwrap().get(&context_id).cloned()
  }
}
