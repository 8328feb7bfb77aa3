//
//  bitbucket-provider
//  resource/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Managed Resources
//!
//! Each resource type maps a flat attribute block onto the Bitbucket Cloud
//! REST API through four reconciler entrypoints:
//!
//! | Entrypoint | Responsibility |
//! |------------|----------------|
//! | `create` | Expand attributes into a request, POST/PUT it, set the ID, then `read` |
//! | `read` | GET the remote object and flatten it back; 404 clears the ID |
//! | `update` | Apply configured changes in place, then `read` |
//! | `delete` | Remove the remote object |
//!
//! Import turns a user-supplied ID into something `read` understands. Most
//! types use their ID unchanged.
//!
//! ## Resource Types
//!
//! - `bitbucket_project` - [`project`]
//! - `bitbucket_repository` - [`repository`]
//! - `bitbucket_branch` - [`branch`]
//! - `bitbucket_branching_model` - [`branching_model`]
//! - `bitbucket_deploy_key` - [`deploy_key`]
//! - `bitbucket_hook` - [`hook`]
//! - `bitbucket_default_reviewers` - [`default_reviewers`]
//! - `bitbucket_pipeline_ssh_known_host` - [`pipeline_ssh_known_host`]

pub mod branch;
pub mod branching_model;
pub mod default_reviewers;
pub mod deploy_key;
pub mod hook;
pub mod pipeline_ssh_known_host;
pub mod project;
pub mod repository;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::api::{ApiError, BitbucketClient};
use crate::auth::AuthError;
use crate::schema::{ResourceData, Schema, SchemaError};

/// Errors raised by reconcilers, data sources and the provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The Bitbucket API answered with a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A configuration block failed schema validation.
    #[error("invalid configuration:\n  {}", join_errors(.0))]
    Schema(Vec<SchemaError>),

    /// A resource ID does not have the expected shape.
    #[error("{0}")]
    InvalidId(String),

    /// Provider settings are missing or inconsistent.
    #[error("{0}")]
    Config(String),

    /// Exchanging OAuth client credentials failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A data source could not resolve its object.
    #[error("{0}")]
    NotFound(String),

    /// The operation is not supported by this type.
    #[error("{0}")]
    Unsupported(String),

    #[error("Failed to decode: {0}")]
    Decode(#[from] serde_json::Error),
}

fn join_errors(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A managed Bitbucket object type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name used in manifests (e.g. `bitbucket_project`).
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()>;

    /// Refreshes `d` from the remote object. Clears the ID when it is gone.
    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()>;

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()>;

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()>;

    /// Prepares `d` (holding only the user-supplied ID) for a `read`.
    async fn import(&self, _client: &BitbucketClient, _d: &mut ResourceData) -> ProviderResult<()> {
        Ok(())
    }

    fn importable(&self) -> bool {
        true
    }
}

/// A read-only lookup of Bitbucket objects.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()>;
}

/// Splits a composite ID into exactly `N` parts.
///
/// ```rust
/// use bitbucket_provider::resource::split_id;
///
/// assert_eq!(split_id::<2>("acme/CORE", '/'), Some(["acme", "CORE"]));
/// assert_eq!(split_id::<3>("acme/widgets", '/'), None);
/// ```
pub fn split_id<const N: usize>(id: &str, separator: char) -> Option<[&str; N]> {
    let parts: Vec<&str> = id.split(separator).collect();
    parts.try_into().ok()
}

/// Logs the disappearance of a remote object and drops it from state.
pub(crate) fn remove_from_state(kind: &str, d: &mut ResourceData) {
    warn!("{} ({}) not found, removing from state", kind, d.id());
    d.set_id("");
}

/// Every resource type this crate manages.
pub fn all() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(project::ProjectResource),
        Box::new(repository::RepositoryResource),
        Box::new(branch::BranchResource),
        Box::new(branching_model::BranchingModelResource),
        Box::new(deploy_key::DeployKeyResource),
        Box::new(hook::HookResource),
        Box::new(default_reviewers::DefaultReviewersResource),
        Box::new(pipeline_ssh_known_host::PipelineSshKnownHostResource),
    ]
}
