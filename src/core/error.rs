//! Error types for convoy with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Every recoverable failure in the resolution
//! core (version parse, remote lookup, release dispatch) is represented here so
//! callers can decide whether to degrade or abort.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for convoy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (remote lookup, release command, I/O)
  System = 2,
  /// Validation failure (descriptor invariants, duplicate artifacts)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for convoy
#[derive(Debug)]
pub enum ConvoyError {
  /// Configuration errors
  Config(ConfigError),

  /// Version string parsing errors
  Version(VersionError),

  /// Remote metadata lookup errors
  Remote(RemoteError),

  /// Release dispatch errors
  Release(ReleaseError),

  /// Validation errors (descriptor invariants)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ConvoyError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ConvoyError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ConvoyError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ConvoyError::Message { message, context, help } => ConvoyError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ConvoyError::Config(_) => ExitCode::User,
      ConvoyError::Version(_) => ExitCode::User,
      ConvoyError::Remote(_) => ExitCode::System,
      ConvoyError::Release(_) => ExitCode::System,
      ConvoyError::Validation(_) => ExitCode::Validation,
      ConvoyError::Io(_) => ExitCode::System,
      ConvoyError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ConvoyError::Config(e) => e.help_message(),
      ConvoyError::Release(e) => e.help_message(),
      ConvoyError::Validation(e) => e.help_message(),
      ConvoyError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ConvoyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConvoyError::Config(e) => write!(f, "{}", e),
      ConvoyError::Version(e) => write!(f, "{}", e),
      ConvoyError::Remote(e) => write!(f, "{}", e),
      ConvoyError::Release(e) => write!(f, "{}", e),
      ConvoyError::Validation(e) => write!(f, "{}", e),
      ConvoyError::Io(e) => write!(f, "I/O error: {}", e),
      ConvoyError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ConvoyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ConvoyError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ConvoyError {
  fn from(err: io::Error) -> Self {
    ConvoyError::Io(err)
  }
}

impl From<String> for ConvoyError {
  fn from(msg: String) -> Self {
    ConvoyError::message(msg)
  }
}

impl From<&str> for ConvoyError {
  fn from(msg: &str) -> Self {
    ConvoyError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ConvoyError {
  fn from(err: toml_edit::TomlError) -> Self {
    ConvoyError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ConvoyError {
  fn from(err: toml_edit::de::Error) -> Self {
    ConvoyError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ConvoyError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ConvoyError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ConvoyError {
  fn from(err: serde_json::Error) -> Self {
    ConvoyError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ConvoyError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ConvoyError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<rayon::ThreadPoolBuildError> for ConvoyError {
  fn from(err: rayon::ThreadPoolBuildError) -> Self {
    ConvoyError::message(format!("Worker pool error: {}", err))
  }
}

/// Convert anyhow::Error to ConvoyError (test helpers and interop)
impl From<anyhow::Error> for ConvoyError {
  fn from(err: anyhow::Error) -> Self {
    ConvoyError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// convoy.toml not found
  NotFound { workspace_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Component not found in the site
  ComponentNotFound { artifact_id: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Create a convoy.toml next to your site descriptor.".to_string()),
      ConfigError::ComponentNotFound { artifact_id } => Some(format!(
        "List the site's components with `convoy status`. Is '{}' declared in the descriptor?",
        artifact_id
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No convoy configuration found.\nSearched from: {}",
          workspace_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::ComponentNotFound { artifact_id } => {
        write!(f, "Component '{}' not found in the site", artifact_id)
      }
    }
  }
}

/// Version string parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionError {
  pub text: String,
  pub reason: String,
}

impl VersionError {
  pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      reason: reason.into(),
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Cannot parse version '{}': {}", self.text, self.reason)
  }
}

impl std::error::Error for VersionError {}

impl From<VersionError> for ConvoyError {
  fn from(err: VersionError) -> Self {
    ConvoyError::Version(err)
  }
}

/// Remote metadata lookup errors
#[derive(Debug)]
pub enum RemoteError {
  /// No metadata published for the artifact
  NotFound { artifact_id: String },

  /// Metadata exists but cannot be read or decoded
  Unreadable { artifact_id: String, reason: String },
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteError::NotFound { artifact_id } => {
        write!(f, "No remote metadata for artifact '{}'", artifact_id)
      }
      RemoteError::Unreadable { artifact_id, reason } => {
        write!(f, "Unreadable remote metadata for '{}': {}", artifact_id, reason)
      }
    }
  }
}

impl From<RemoteError> for ConvoyError {
  fn from(err: RemoteError) -> Self {
    ConvoyError::Remote(err)
  }
}

/// Release dispatch errors
#[derive(Debug)]
pub enum ReleaseError {
  /// The external release command exited non-zero
  CommandFailed { artifact_id: String, log: String },

  /// No release command configured
  NoCommand,
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::NoCommand => {
        Some("Set `release.command` in convoy.toml, e.g. \"scripts/release.sh {artifact} {target} {next}\"".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::CommandFailed { artifact_id, log } => {
        write!(f, "Release command failed for '{}':\n{}", artifact_id, log)
      }
      ReleaseError::NoCommand => {
        write!(f, "No release command configured")
      }
    }
  }
}

impl From<ReleaseError> for ConvoyError {
  fn from(err: ReleaseError) -> Self {
    ConvoyError::Release(err)
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// The same artifact id appears twice in one site's dependency list
  DuplicateArtifact { artifact_id: String },

  /// Site descriptor failed an invariant check
  DescriptorInvalid { reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::DuplicateArtifact { artifact_id } => Some(format!(
        "Remove the duplicate [[dependencies]] entry for '{}' from the site descriptor.",
        artifact_id
      )),
      ValidationError::DescriptorInvalid { .. } => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::DuplicateArtifact { artifact_id } => {
        write!(f, "Duplicate artifact id '{}' in site dependencies", artifact_id)
      }
      ValidationError::DescriptorInvalid { reason } => {
        write!(f, "Invalid site descriptor: {}", reason)
      }
    }
  }
}

impl From<ValidationError> for ConvoyError {
  fn from(err: ValidationError) -> Self {
    ConvoyError::Validation(err)
  }
}

/// Result type alias for convoy
pub type ConvoyResult<T> = Result<T, ConvoyError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ConvoyResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ConvoyResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ConvoyError>,
{
  fn context(self, ctx: impl Into<String>) -> ConvoyResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ConvoyResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ConvoyError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
