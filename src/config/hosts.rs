//
//  bitbucket-provider
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Hosts
//!
//! Tokens in the keyring are stored per API host, so a token saved for
//! `api.bitbucket.org` is never sent to a proxy configured via `base_url`.
//!
//! ```rust
//! use bitbucket_provider::config::{api_host, normalize_host};
//!
//! assert_eq!(api_host("https://api.bitbucket.org/2.0"), "api.bitbucket.org");
//! assert_eq!(normalize_host("https://API.Bitbucket.org/"), "api.bitbucket.org");
//! ```

use url::Url;

/// Host of the Bitbucket Cloud REST API.
pub const BITBUCKET_API: &str = "api.bitbucket.org";

/// Lowercases a host and strips any scheme and trailing slash.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}

/// Host (with port, if any) of an API base URL. Falls back to
/// [`normalize_host`] when the URL does not parse.
pub fn api_host(base_url: &str) -> String {
    match Url::parse(base_url) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host.to_lowercase(), port),
            (Some(host), None) => host.to_lowercase(),
            (None, _) => normalize_host(base_url),
        },
        Err(_) => normalize_host(base_url),
    }
}
