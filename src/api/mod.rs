//
//  bitbucket-provider
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client and wire types for the Bitbucket Cloud
//! REST API v2.0 at `api.bitbucket.org`.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with authentication, error decoding and pagination
//! - [`cloud`]: Request/response payloads per resource (projects, repositories, refs,
//!   deploy keys, hooks, pipelines config, users)
//! - [`common`]: Shared types (errors, pagination, links)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_provider::api::BitbucketClient;
//! use bitbucket_provider::auth::AuthCredential;
//!
//! let client = BitbucketClient::cloud()
//!     .expect("Failed to create client")
//!     .with_auth(AuthCredential::bearer("your-token"));
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] variants. Reconcilers treat
//! `NotFound` (404) as "the object is gone" and every other status >= 400 as a
//! failure carrying the extracted error message.

/// Core HTTP client wrapper for the Bitbucket Cloud API.
pub mod client;

/// Bitbucket Cloud API v2.0 payload types.
pub mod cloud;

/// Common types: [`ApiError`], [`PaginatedResponse`](common::PaginatedResponse), [`Link`](common::Link).
pub mod common;

pub use client::{api_path, BitbucketClient};
pub use common::ApiError;
