//
//  bitbucket-provider
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod apply;
mod auth;
mod plan;
mod schema;
mod session;
mod state;

pub use apply::{ApplyCommand, DestroyCommand, ImportCommand};
pub use auth::AuthCommand;
pub use plan::{PlanCommand, RefreshCommand, ValidateCommand};
pub use schema::SchemaCommand;
pub use session::Session;
pub use state::StateCommand;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Bitbucket Provider - Reconcile Bitbucket Cloud with a manifest
#[derive(Parser, Debug)]
#[command(
    name = "bbp",
    version,
    about = "Reconcile Bitbucket Cloud with a declarative manifest",
    long_about = "bbp reads a TOML manifest of Bitbucket Cloud projects, repositories,\n\
                  branches, keys and webhooks, and creates, updates or deletes remote\n\
                  objects until they match it.",
    propagate_version = true,
    after_help = "Use 'bbp <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Manifest file (default: bitbucket.toml)
    #[arg(long, short = 'f', global = true, env = "BBP_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// State file (default: bitbucket.tfstate.json)
    #[arg(long, global = true, env = "BBP_STATE")]
    pub state: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the manifest against the resource schemas
    Validate(ValidateCommand),

    /// Show the changes needed to match the manifest
    Plan(PlanCommand),

    /// Create, update and delete remote objects to match the manifest
    Apply(ApplyCommand),

    /// Delete every managed remote object
    Destroy(DestroyCommand),

    /// Bring an existing remote object under management
    Import(ImportCommand),

    /// Re-read managed objects and update the state file
    Refresh(RefreshCommand),

    /// Inspect and edit the state file
    State(StateCommand),

    /// Show resource and data source schemas
    Schema(SchemaCommand),

    /// Manage the token stored in the system keyring
    Auth(AuthCommand),

    /// Print version information
    Version,
}

/// The user declined a confirmation prompt.
#[derive(Error, Debug)]
#[error("{0} cancelled")]
pub struct Cancelled(pub &'static str);
