//
//  bitbucket-provider
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Client Credentials
//!
//! Exchanges an OAuth consumer's key and secret for an access token using
//! the `client_credentials` grant. The consumer must be marked private
//! ("This is a private consumer") in the workspace settings.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_provider::auth::{client_credentials_token, AuthCredential};
//!
//! async fn authenticate() -> Result<AuthCredential, bitbucket_provider::auth::AuthError> {
//!     let token = client_credentials_token("consumer-key", "consumer-secret").await?;
//!     Ok(AuthCredential::bearer(token))
//! }
//! ```

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Bitbucket Cloud OAuth token endpoint.
pub const TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";

/// Errors from the OAuth token endpoint.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The token endpoint rejected the exchange.
    #[error("{status}: {description}")]
    Token {
        status: StatusCode,
        description: String,
    },

    /// A network-level error occurred during the exchange.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Internal struct for deserializing token responses from Bitbucket.
#[derive(Deserialize)]
struct TokenResponseRaw {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Token endpoint error body (RFC 6749 section 5.2).
#[derive(Deserialize)]
struct TokenErrorRaw {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Obtains an access token with the `client_credentials` grant.
///
/// # Errors
///
/// Returns [`AuthError::Token`] rendered as `"<status>: <error_description>"`
/// when the endpoint answers with a failure status.
pub async fn client_credentials_token(
    client_id: &str,
    client_secret: &str,
) -> Result<String, AuthError> {
    client_credentials_token_at(TOKEN_URL, client_id, client_secret).await
}

/// Same as [`client_credentials_token`] against an explicit token endpoint.
pub async fn client_credentials_token_at(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, AuthError> {
    let response = Client::new()
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let description = match serde_json::from_str::<TokenErrorRaw>(&body) {
            Ok(raw) => raw.error_description.unwrap_or(raw.error),
            Err(_) => body,
        };
        return Err(AuthError::Token {
            status,
            description,
        });
    }

    let token: TokenResponseRaw = response.json().await?;
    debug!(
        "Obtained OAuth access token (expires in {:?}s)",
        token.expires_in
    );
    Ok(token.access_token)
}
