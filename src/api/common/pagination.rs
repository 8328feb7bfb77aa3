//
//  bitbucket-provider
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket Cloud Responses
//!
//! Bitbucket Cloud uses cursor-based pagination: every list response carries
//! a `next` URL which is absent (or empty) on the last page. The traversal
//! itself lives in [`BitbucketClient::get_all`](crate::api::BitbucketClient::get_all).

use serde::{Deserialize, Serialize};

/// Paginated response from Bitbucket Cloud API.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `values` | `Vec<T>` | Array of items in the current page |
/// | `page` | `Option<u32>` | Current page number (1-indexed) |
/// | `pagelen` | `Option<u32>` | Number of items per page |
/// | `size` | `Option<u32>` | Total number of items across all pages |
/// | `next` | `Option<String>` | URL to fetch the next page |
/// | `previous` | `Option<String>` | URL to fetch the previous page |
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::api::common::PaginatedResponse;
/// use serde::Deserialize;
///
/// #[derive(Clone, Deserialize)]
/// struct Project {
///     key: String,
/// }
///
/// let json = r#"{
///     "values": [{"key": "CORE"}],
///     "page": 1,
///     "pagelen": 10,
///     "next": "https://api.bitbucket.org/2.0/workspaces/acme/projects?page=2"
/// }"#;
///
/// let response: PaginatedResponse<Project> = serde_json::from_str(json).unwrap();
/// assert!(response.has_next());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Array of items in the current page. May be empty.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of items per page.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when the endpoint reports it.
    #[serde(default)]
    pub size: Option<u32>,

    /// Absolute URL of the next page; absent or empty on the last page.
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Checks if there are more pages of results available.
    ///
    /// An empty `next` string is treated the same as an absent one.
    pub fn has_next(&self) -> bool {
        self.next_url().is_some()
    }

    /// Returns the URL for the next page of results.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref().filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_next_is_last_page() {
        let page: PaginatedResponse<u32> =
            serde_json::from_str(r#"{"values": [1, 2], "next": ""}"#).unwrap();
        assert!(!page.has_next());
        assert_eq!(page.next_url(), None);
    }

    #[test]
    fn test_missing_values_defaults_to_empty() {
        let page: PaginatedResponse<u32> = serde_json::from_str(r#"{"pagelen": 10}"#).unwrap();
        assert!(page.values.is_empty());
        assert!(!page.has_next());
    }
}
