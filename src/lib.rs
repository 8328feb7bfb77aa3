//
//  bitbucket-provider
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Provider Library
//!
//! Declarative management of Bitbucket Cloud objects. A TOML manifest
//! describes the desired projects, repositories, branches, branching models,
//! deploy keys, webhooks, default reviewers and pipeline known hosts; the
//! reconcile engine diffs it against a state file and the live API, then
//! creates, updates, replaces or deletes remote objects to match.
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client for the Bitbucket Cloud 2.0 API
//! - [`auth`]: App passwords, OAuth tokens, client credentials, keyring
//! - [`schema`]: Attribute schemas, validation, diffing and `ResourceData`
//! - [`resource`]: Reconcilers for each managed object type
//! - [`data`]: Read-only data sources
//! - [`provider`]: Provider settings and the type registry
//! - [`reconcile`]: Manifest parsing, plan, apply, import and destroy
//! - [`state`]: The persisted state file
//! - [`config`]: User-level defaults and file helpers
//! - [`output`]: Table and JSON rendering
//! - [`interactive`]: Confirmation and password prompts
//! - [`cli`]: Command-line interface definitions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_provider::provider::Provider;
//! use bitbucket_provider::reconcile::{apply, plan, Manifest};
//! use bitbucket_provider::state::StateFile;
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("bitbucket.toml"))?;
//! let provider = Provider::configure(manifest.provider.clone().with_env()).await?;
//! let state_path = Path::new("bitbucket.tfstate.json");
//! let mut state = StateFile::load(state_path)?;
//!
//! let plan = plan(&provider, &manifest, &mut state).await?;
//! apply(&provider, &plan, &mut state, |s| s.save(state_path)).await?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the `bbp` commands, arguments, and subcommands defined using the
/// clap derive API.
pub mod cli;

/// API client for Bitbucket Cloud.
///
/// Handles authentication, request building, `next`-link pagination, and
/// turning error bodies into readable messages.
pub mod api;

/// Authentication and credential management.
pub mod auth;

/// User-level configuration and file helpers.
///
/// Defaults are read from platform-specific locations:
/// - Linux: `~/.config/bbp/config.toml`
/// - macOS: `~/Library/Application Support/bbp/config.toml`
/// - Windows: `%APPDATA%\bbp\config.toml`
pub mod config;

/// Read-only data sources.
pub mod data;

/// Interactive terminal prompts.
pub mod interactive;

/// Output formatting: tables for people, JSON for scripts.
pub mod output;

/// Provider settings and the registry of resource and data source types.
pub mod provider;

/// The plan/apply engine.
pub mod reconcile;

/// Reconcilers for managed object types.
pub mod resource;

/// Attribute schemas and the per-object working copy.
pub mod schema;

/// The persisted state file.
pub mod state;

pub use cli::Cli;
pub use config::Config;
pub use provider::{Provider, ProviderConfig};

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bbp";

/// Application version constant, derived from Cargo.toml at compile time.
///
/// ```rust
/// use bitbucket_provider::VERSION;
///
/// println!("bbp version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and invalid manifests
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `16-31`: Operation-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    use crate::api::ApiError;
    use crate::auth::AuthError;
    use crate::cli::Cancelled;
    use crate::resource::ProviderError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid arguments, manifest or provider settings.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed.
    ///
    /// Bitbucket rejected the credentials, or the OAuth token exchange
    /// failed.
    pub const AUTH_ERROR: i32 = 4;

    /// Object not found.
    ///
    /// A data source or import target does not exist, or the credentials
    /// cannot see it.
    pub const NOT_FOUND: i32 = 8;

    /// Operation cancelled by user at a confirmation prompt.
    pub const CANCELLED: i32 = 16;

    /// API rate limit exceeded.
    pub const RATE_LIMIT: i32 = 32;

    /// Picks the exit code for an error returned by a command.
    pub fn for_error(err: &anyhow::Error) -> i32 {
        for cause in err.chain() {
            if cause.downcast_ref::<Cancelled>().is_some() {
                return CANCELLED;
            }
            if let Some(e) = cause.downcast_ref::<ProviderError>() {
                return for_provider_error(e);
            }
            if let Some(e) = cause.downcast_ref::<ApiError>() {
                return for_api_error(e);
            }
            if cause.downcast_ref::<AuthError>().is_some() {
                return AUTH_ERROR;
            }
        }
        ERROR
    }

    fn for_provider_error(err: &ProviderError) -> i32 {
        match err {
            ProviderError::Api(e) => for_api_error(e),
            ProviderError::Auth(_) => AUTH_ERROR,
            ProviderError::NotFound(_) => NOT_FOUND,
            ProviderError::Schema(_) | ProviderError::InvalidId(_) | ProviderError::Config(_) => USAGE,
            ProviderError::Unsupported(_) | ProviderError::Decode(_) => ERROR,
        }
    }

    fn for_api_error(err: &ApiError) -> i32 {
        match err {
            ApiError::AuthFailed { .. } | ApiError::Forbidden { .. } => AUTH_ERROR,
            ApiError::NotFound { .. } => NOT_FOUND,
            ApiError::RateLimited { .. } => RATE_LIMIT,
            _ => ERROR,
        }
    }

}
