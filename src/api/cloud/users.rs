//
//  bitbucket-provider
//  api/cloud/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Account payloads, used by `/user` and the default reviewers listing.

use serde::Deserialize;

/// A Bitbucket account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    /// Account UUID with curly braces.
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,
}
