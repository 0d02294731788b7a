mod commands;
mod core;
mod descriptor;
mod remote;
mod store;
mod ui;
mod workflow;

use clap::{Parser, Subcommand};
use crate::core::context::ReleaseContext;
use crate::core::error::{print_error, ConvoyError};

/// Coordinated release management for multi-component sites
#[derive(Parser)]
#[command(name = "convoy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ConvoyCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Inspection
  // ============================================================================
  /// Show the declared components of the site (no remote lookups)
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Fetch remote metadata and resolve target versions for every component
  Plan {
    /// Output the resolved site in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Interactive decisions
  // ============================================================================
  /// Pin a component to the latest upstream release
  Upgrade {
    /// Artifact id of the component
    artifact_id: String,
    /// Cancel a previous upgrade instead
    #[arg(long)]
    cancel: bool,
  },

  /// Move a snapshot component back to the upstream release and snapshot
  Downgrade {
    /// Artifact id of the component
    artifact_id: String,
    /// Cancel a previous downgrade instead
    #[arg(long)]
    cancel: bool,
  },

  /// Toggle whether a component is an internally managed project
  Project {
    /// Artifact id of the component
    artifact_id: String,
  },

  /// Cycle the next release version through the candidate series
  Cycle {
    /// Artifact id of a component (omit to cycle the site itself)
    artifact_id: Option<String>,
    /// Number of cycling steps
    #[arg(long, default_value_t = 1)]
    times: u32,
  },

  // ============================================================================
  // Release
  // ============================================================================
  /// Release eligible components and start the site workflow
  Release {
    /// Artifact id of a single component (omit to release the whole site)
    artifact_id: Option<String>,
    /// Actually dispatch the release (default: dry-run mode showing the plan)
    #[arg(long)]
    apply: bool,
    /// Output the plan or outcomes in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  env_logger::init();
  let cli = ConvoyCli::parse();

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Build the context once (config + collaborator wiring), pass by reference
  let ctx = match ReleaseContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => {
      handle_error(e);
    }
  };

  let result = match cli.command {
    Commands::Status { json } => commands::run_status(&ctx, json),
    Commands::Plan { json } => commands::run_plan(&ctx, json),
    Commands::Upgrade { artifact_id, cancel } => commands::run_upgrade(&ctx, artifact_id, cancel),
    Commands::Downgrade { artifact_id, cancel } => commands::run_downgrade(&ctx, artifact_id, cancel),
    Commands::Project { artifact_id } => commands::run_project(&ctx, artifact_id),
    Commands::Cycle { artifact_id, times } => commands::run_cycle(&ctx, artifact_id, times),
    Commands::Release {
      artifact_id,
      apply,
      json,
    } => commands::run_release(&ctx, artifact_id, apply, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ConvoyError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
