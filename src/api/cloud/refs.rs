//
//  bitbucket-provider
//  api/cloud/refs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch and branching-model payloads.

use serde::{Deserialize, Serialize};

/// A branch ref (`/refs/branches/{name}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Branch {
    pub name: String,

    /// Ref type, `branch` for regular branches.
    #[serde(rename = "type", default)]
    pub ref_type: String,

    #[serde(default)]
    pub target: Option<Commit>,

    #[serde(default)]
    pub default_merge_strategy: Option<String>,

    #[serde(default)]
    pub merge_strategies: Vec<String>,
}

/// The commit a branch points at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub hash: String,
}

/// Request payload for creating a branch.
///
/// ```rust
/// use bitbucket_provider::api::cloud::{BranchRequest, Commit};
///
/// let request = BranchRequest {
///     name: "release/1.0".to_string(),
///     target: Commit { hash: "main".to_string() },
/// };
/// assert_eq!(
///     serde_json::to_string(&request).unwrap(),
///     r#"{"name":"release/1.0","target":{"hash":"main"}}"#
/// );
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BranchRequest {
    pub name: String,
    pub target: Commit,
}

/// Repository branching model.
///
/// Returned by `/branching-model` and accepted by `/branching-model/settings`.
/// Boolean flags are omitted when false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchingModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development: Option<BranchModel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<BranchModel>,
}

/// One side (development or production) of a branching model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchModel {
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub use_mainbranch: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub branch_does_not_exist: bool,

    /// Only meaningful for the production branch.
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}
