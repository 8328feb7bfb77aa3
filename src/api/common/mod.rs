//
//  bitbucket-provider
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for Bitbucket Cloud
//!
//! This module provides shared types used across every Bitbucket Cloud
//! resource binding: the unified [`ApiError`], the cursor-paginated page
//! wrapper and the HATEOAS [`Link`] type.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_provider::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(e) if e.is_not_found() => println!("Gone, dropping from state"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Every HTTP error variant renders as `"<status line>: <message>"`, where the
//!   message is extracted from the heterogeneous Bitbucket error bodies by
//!   [`extract_error_message`](crate::api::client::extract_error_message)
//! - Serialization/deserialization is handled via `serde`

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::extract_error_message;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `AuthFailed` | Invalid or expired credentials | 401 |
/// | `Forbidden` | Insufficient permissions or OAuth scopes | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `BadRequest` | Invalid request payload | 400 |
/// | `RateLimited` | Too many requests | 429 |
/// | `ServerError` | Internal server error | 5xx |
/// | `Status` | Any other error status | >= 400 |
/// | `Network` | Transport-level failure | N/A |
/// | `Decode` | Response body was not the expected JSON | N/A |
///
/// # Notes
///
/// - The `Network` variant automatically converts from `reqwest::Error`
/// - Reconcilers branch on [`is_not_found`](Self::is_not_found) to drop a
///   resource from state instead of failing
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed due to invalid or expired credentials.
    #[error("{status}: {message}")]
    AuthFailed { status: StatusCode, message: String },

    /// The authenticated principal lacks permission or OAuth scopes.
    #[error("{status}: {message}")]
    Forbidden { status: StatusCode, message: String },

    /// The requested resource was not found.
    #[error("{status}: {message}")]
    NotFound { status: StatusCode, message: String },

    /// The request was rejected as malformed.
    #[error("{status}: {message}")]
    BadRequest { status: StatusCode, message: String },

    /// API rate limit has been exceeded.
    #[error("{status}: {message}")]
    RateLimited { status: StatusCode, message: String },

    /// The server failed to process the request (5xx).
    #[error("{status}: {message}")]
    ServerError { status: StatusCode, message: String },

    /// Any other error status.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Builds the error variant for a failed response.
    ///
    /// The body is passed through [`extract_error_message`] so the resulting
    /// message is the human-readable part of whichever error shape Bitbucket
    /// returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_provider::api::common::ApiError;
    /// use reqwest::StatusCode;
    ///
    /// let err = ApiError::from_response(
    ///     StatusCode::NOT_FOUND,
    ///     r#"{"type": "error", "error": {"message": "Repository not found"}}"#,
    /// );
    /// assert!(err.is_not_found());
    /// assert_eq!(err.to_string(), "404 Not Found: Repository not found");
    /// ```
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => Self::AuthFailed { status, message },
            StatusCode::FORBIDDEN => Self::Forbidden { status, message },
            StatusCode::NOT_FOUND => Self::NotFound { status, message },
            StatusCode::BAD_REQUEST => Self::BadRequest { status, message },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { status, message },
            s if s.is_server_error() => Self::ServerError { status, message },
            _ => Self::Status { status, message },
        }
    }

    /// Returns `true` for a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The HTTP status of the failed response, if the error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AuthFailed { status, .. }
            | Self::Forbidden { status, .. }
            | Self::NotFound { status, .. }
            | Self::BadRequest { status, .. }
            | Self::RateLimited { status, .. }
            | Self::ServerError { status, .. }
            | Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            Self::Decode(_) => None,
        }
    }
}

/// HATEOAS-style link for API resource navigation.
///
/// Common link names include `self`, `html`, `avatar` and `clone`. Clone
/// links carry a `name` of `https` or `ssh`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    #[serde(default)]
    pub href: String,

    /// Optional descriptive name for the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
