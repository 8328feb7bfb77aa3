//
//  bitbucket-provider
//  api/cloud/hooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository webhook payloads.
//!
//! Hooks are addressed by UUID: `/repositories/{owner}/{repo}/hooks/{uuid}`.

use serde::{Deserialize, Serialize};

/// Events a repository webhook may subscribe to.
pub const HOOK_EVENTS: &[&str] = &[
    "issue:comment_created",
    "issue:created",
    "issue:updated",
    "project:updated",
    "pullrequest:approved",
    "pullrequest:changes_request_created",
    "pullrequest:changes_request_removed",
    "pullrequest:comment_created",
    "pullrequest:comment_deleted",
    "pullrequest:comment_reopened",
    "pullrequest:comment_resolved",
    "pullrequest:comment_updated",
    "pullrequest:created",
    "pullrequest:fulfilled",
    "pullrequest:push",
    "pullrequest:rejected",
    "pullrequest:unapproved",
    "pullrequest:updated",
    "repo:commit_comment_created",
    "repo:commit_status_created",
    "repo:commit_status_updated",
    "repo:created",
    "repo:deleted",
    "repo:fork",
    "repo:imported",
    "repo:push",
    "repo:transfer",
    "repo:updated",
];

/// A webhook as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hook {
    /// UUID with curly braces.
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub skip_cert_verification: bool,

    #[serde(default)]
    pub history_enabled: bool,

    /// Whether a signing secret is configured. The secret itself is never returned.
    #[serde(default)]
    pub secret_set: bool,

    #[serde(default)]
    pub events: Vec<String>,
}

/// Request payload for creating or updating a webhook.
///
/// `active` and `skip_cert_verification` are always serialized, even when
/// false, otherwise Bitbucket falls back to its own defaults.
///
/// ```rust
/// use bitbucket_provider::api::cloud::HookRequest;
///
/// let request = HookRequest {
///     url: "https://ci.example.com/hook".to_string(),
///     description: "ci".to_string(),
///     active: false,
///     skip_cert_verification: false,
///     history_enabled: false,
///     events: vec!["repo:push".to_string()],
///     secret: None,
/// };
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["active"], false);
/// assert_eq!(json["skip_cert_verification"], false);
/// assert!(json.get("secret").is_none());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HookRequest {
    pub url: String,
    pub description: String,
    pub active: bool,
    pub skip_cert_verification: bool,
    pub history_enabled: bool,
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}
