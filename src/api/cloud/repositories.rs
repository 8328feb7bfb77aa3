//
//  bitbucket-provider
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud repository API types and data structures.
//!
//! This module provides the payloads for repositories, the project reference
//! a repository is filed under, and the per-repository pipelines switch.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_provider::api::cloud::repositories::{RepositoryRequest, ProjectKey};
//!
//! let request = RepositoryRequest {
//!     name: "backend-service".to_string(),
//!     scm: "git".to_string(),
//!     is_private: true,
//!     description: Some("Main backend microservice".to_string()),
//!     website: None,
//!     language: Some("rust".to_string()),
//!     has_issues: false,
//!     has_wiki: false,
//!     fork_policy: "no_public_forks".to_string(),
//!     project: Some(ProjectKey { key: "BACKEND".to_string() }),
//! };
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["project"]["key"], "BACKEND");
//! assert!(json.get("website").is_none());
//! ```
//!
//! # Notes
//!
//! - Repository slugs are URL-safe versions of repository names
//! - The `full_name` field follows the format `{workspace}/{repo_slug}`

use serde::{Deserialize, Serialize};

use crate::api::common::Link;

/// Represents a Bitbucket Cloud repository.
///
/// # Fields
///
/// * `uuid` - Unique identifier for the repository (includes curly braces)
/// * `name` - Human-readable name of the repository
/// * `full_name` - Full path in format `{workspace_slug}/{repo_slug}`
/// * `slug` - URL-safe identifier derived from the name
/// * `scm` - Version control system (`git`)
/// * `fork_policy` - One of `allow_forks`, `no_public_forks`, `no_forks`
/// * `mainbranch` - Reference to the main/default branch
/// * `project` - Optional project within the workspace
/// * `links` - Clone URLs and related links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    /// Unique identifier for the repository (e.g., `{123e4567-e89b-...}`).
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub scm: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    /// Primary programming language tag.
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub has_issues: bool,

    #[serde(default)]
    pub has_wiki: bool,

    #[serde(default)]
    pub fork_policy: String,

    /// Reference to the main/default branch of the repository.
    #[serde(default)]
    pub mainbranch: Option<MainBranch>,

    /// Optional project within the workspace that organizes this repository.
    #[serde(default)]
    pub project: Option<ProjectRef>,

    #[serde(default)]
    pub links: Option<RepositoryLinks>,
}

impl Repository {
    /// Returns the clone URL with the given protocol name (`https` or `ssh`).
    pub fn clone_url(&self, name: &str) -> Option<&str> {
        self.links
            .as_ref()?
            .clone
            .iter()
            .find(|link| link.name.as_deref() == Some(name))
            .map(|link| link.href.as_str())
    }
}

/// Reference to a repository's main branch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBranch {
    pub name: String,

    #[serde(rename = "type", default)]
    pub branch_type: Option<String>,
}

/// Links embedded in a repository. Only clone URLs are consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryLinks {
    #[serde(default)]
    pub clone: Vec<Link>,
}

/// A lightweight reference to a project within a workspace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub uuid: String,

    /// Short alphanumeric key for the project (typically uppercase).
    pub key: String,

    #[serde(default)]
    pub name: String,
}

/// Request payload for creating or updating a repository.
///
/// Optional strings are omitted when absent so Bitbucket keeps its own
/// defaults; booleans and enumerations are always sent.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRequest {
    /// The name for the repository.
    pub name: String,

    pub scm: String,

    pub is_private: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub has_issues: bool,

    pub has_wiki: bool,

    pub fork_policy: String,

    /// Optional project to organize the repository under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectKey>,
}

/// Project key for assigning a repository to a project.
///
/// # Notes
///
/// - Project keys are typically uppercase alphanumeric strings
/// - The project must exist in the workspace before assignment
#[derive(Debug, Clone, Serialize)]
pub struct ProjectKey {
    /// The short alphanumeric key identifying the project.
    pub key: String,
}

/// Repository pipelines configuration (`/pipelines_config`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelinesConfig {
    #[serde(default)]
    pub enabled: bool,
}
