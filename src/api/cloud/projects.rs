//
//  bitbucket-provider
//  api/cloud/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud project API types.
//!
//! Projects group repositories inside a workspace. They are addressed by
//! `/workspaces/{workspace}/projects/{key}`.

use serde::{Deserialize, Serialize};

use crate::api::common::Link;

/// A workspace project as returned by the API.
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::api::cloud::Project;
///
/// let json = r#"{
///     "type": "project",
///     "key": "CORE",
///     "uuid": "{d2b1e5b0-0000-0000-0000-000000000000}",
///     "name": "Core",
///     "is_private": true,
///     "has_publicly_visible_repos": false,
///     "links": {"avatar": {"href": "https://bitbucket.org/account/user/acme/projects/CORE/avatar/32"}}
/// }"#;
///
/// let project: Project = serde_json::from_str(json).unwrap();
/// assert_eq!(project.key, "CORE");
/// assert!(project.links.and_then(|l| l.avatar).is_some());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    /// Short key, unique within the workspace (e.g. `CORE`).
    #[serde(default)]
    pub key: String,

    /// Unique identifier (with curly braces).
    #[serde(default)]
    pub uuid: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    /// Whether any repository in a private project is public.
    #[serde(default)]
    pub has_publicly_visible_repos: bool,

    #[serde(default)]
    pub links: Option<ProjectLinks>,
}

/// Links attached to a project. Only the avatar is managed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Link>,
}

/// Request payload for creating or updating a project.
///
/// `links` is only ever sent on create; Bitbucket rejects avatar changes
/// through the project update endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRequest {
    pub name: String,
    pub key: String,
    pub is_private: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ProjectLinks>,
}
