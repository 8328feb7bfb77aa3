//
//  bitbucket-provider
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials for Bitbucket Cloud API requests.
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth 2.0 access token**: supplied directly, or obtained with the
//!   client-credentials grant from an OAuth consumer's key and secret.
//! - **App Password**: username plus app password, sent as HTTP Basic.
//!
//! ## Module Structure
//!
//! - [`oauth`]: OAuth 2.0 client-credentials exchange
//! - [`keyring`]: Secure token storage using the system keyring
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_provider::auth::AuthCredential;
//!
//! let credential = AuthCredential::app_password("jdoe", "app-password");
//! assert_eq!(credential.kind(), "app password");
//! ```

mod keyring;
mod oauth;

pub use keyring::*;
pub use oauth::*;

use reqwest::RequestBuilder;

/// Authentication credentials attached to every API request.
///
/// # Variants
///
/// - `AppPassword`: Username and app password combination (HTTP Basic).
/// - `Bearer`: OAuth 2.0 access token, either supplied directly or obtained
///   through [`client_credentials_token`].
///
/// # Notes
///
/// - The `Debug` output never includes the secret part of a credential.
#[derive(Clone)]
pub enum AuthCredential {
    /// App password authentication for Bitbucket Cloud.
    AppPassword {
        /// The Bitbucket username.
        username: String,
        /// The app password generated from Bitbucket settings.
        password: String,
    },
    /// OAuth 2.0 bearer token.
    Bearer {
        /// The access token.
        token: String,
    },
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AppPassword { username, .. } => f
                .debug_struct("AppPassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

impl AuthCredential {
    /// Creates a username/app password credential.
    pub fn app_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::AppPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Short description of the credential type, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AppPassword { .. } => "app password",
            Self::Bearer { .. } => "oauth token",
        }
    }

    /// Applies the authentication credential to an HTTP request.
    ///
    /// - Bearer tokens use `Authorization: Bearer <token>`
    /// - App passwords use HTTP Basic authentication
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_provider::auth::AuthCredential;
    /// use reqwest::Client;
    ///
    /// async fn make_authenticated_request(credential: &AuthCredential) {
    ///     let client = Client::new();
    ///     let request = client.get("https://api.bitbucket.org/2.0/user");
    ///     let authenticated_request = credential.apply_to_request(request);
    ///     let response = authenticated_request.send().await;
    /// }
    /// ```
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::AppPassword { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Self::Bearer { token } => request.bearer_auth(token),
        }
    }
}
