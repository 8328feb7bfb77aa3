//
//  bitbucket-provider
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 payloads.
//!
//! Type-safe serde bindings for the parts of the Bitbucket Cloud REST API
//! that the reconcilers manage, organized by resource type.
//!
//! # Module Organization
//!
//! - [`projects`] - Workspace projects
//! - [`repositories`] - Repositories and their pipelines switch
//! - [`refs`] - Branches and the branching model
//! - [`deploy_keys`] - Repository access keys
//! - [`hooks`] - Repository webhooks
//! - [`pipelines`] - Pipelines SSH known hosts
//! - [`users`] - Accounts (current user, default reviewers)
//!
//! # Notes
//!
//! - UUIDs are returned with curly braces (e.g., `{123e4567-e89b-...}`)
//! - Request payloads omit absent optionals so Bitbucket keeps its defaults

pub mod deploy_keys;
pub mod hooks;
pub mod pipelines;
pub mod projects;
pub mod refs;
pub mod repositories;
pub mod users;

pub use deploy_keys::*;
pub use hooks::*;
pub use pipelines::*;
pub use projects::*;
pub use refs::*;
pub use repositories::*;
pub use users::*;
