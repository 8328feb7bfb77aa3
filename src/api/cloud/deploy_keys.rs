//
//  bitbucket-provider
//  api/cloud/deploy_keys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository deploy (access) keys.

use serde::{Deserialize, Serialize};

/// A deploy key as returned by `/repositories/{ws}/{repo}/deploy-keys`.
///
/// Bitbucket strips the trailing comment from `key` and reports it
/// separately in `comment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployKey {
    /// Numeric key identifier.
    pub id: u64,

    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub comment: String,
}

/// Request payload for adding or updating a deploy key.
#[derive(Debug, Clone, Serialize)]
pub struct DeployKeyRequest {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
