//
//  bitbucket-provider
//  provider.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Provider
//!
//! The provider turns its settings into an authenticated [`BitbucketClient`]
//! and owns the registry of resource and data-source implementations.
//!
//! ## Settings Resolution
//!
//! Each setting is taken from the first source that has it:
//!
//! | Setting | Manifest key | Environment variable |
//! |---------|--------------|----------------------|
//! | Username | `username` | `BITBUCKET_USERNAME` |
//! | App password | `password` | `BITBUCKET_PASSWORD` |
//! | OAuth client ID | `oauth_client_id` | `BITBUCKET_OAUTH_CLIENT_ID` |
//! | OAuth client secret | `oauth_client_secret` | `BITBUCKET_OAUTH_CLIENT_SECRET` |
//! | OAuth token | `oauth_token` | `BITBUCKET_OAUTH_TOKEN` |
//! | API root | `base_url` | `BITBUCKET_API_URL` |
//!
//! When no credential is found at all, an OAuth token stored with
//! `bbp auth store-token` is read from the system keyring.
//!
//! ## Authentication Precedence
//!
//! 1. OAuth token
//! 2. OAuth client credentials, exchanged for a token
//! 3. Username and app password
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_provider::provider::{Provider, ProviderConfig};
//!
//! # async fn example() -> Result<(), bitbucket_provider::resource::ProviderError> {
//! let config = ProviderConfig {
//!     username: Some("jdoe".into()),
//!     password: Some("app-password".into()),
//!     ..Default::default()
//! };
//! let provider = Provider::configure(config).await?;
//! let project = provider.resource("bitbucket_project")?;
//! assert_eq!(project.type_name(), "bitbucket_project");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::DEFAULT_BASE_URL;
use crate::api::BitbucketClient;
use crate::auth::{client_credentials_token_at, AuthCredential, KeyringStore, TOKEN_URL};
use crate::config::api_host;
use crate::resource::{DataSource, ProviderError, ProviderResult, Resource};

/// Provider settings, as written in the manifest's `[provider]` table.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,

    /// API root, e.g. `https://api.bitbucket.org/2.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// OAuth token endpoint used for the client-credentials grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderConfig")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("oauth_client_id", &self.oauth_client_id)
            .field("oauth_client_secret", &redact(&self.oauth_client_secret))
            .field("oauth_token", &redact(&self.oauth_token))
            .field("base_url", &self.base_url)
            .field("oauth_token_url", &self.oauth_token_url)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Fills unset settings from the process environment.
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    /// Fills unset settings from `lookup`, which maps an environment
    /// variable name to its value.
    pub fn with_lookup(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |value: Option<String>, var: &str| non_empty(value).or_else(|| non_empty(lookup(var)));
        Self {
            username: pick(self.username, "BITBUCKET_USERNAME"),
            password: pick(self.password, "BITBUCKET_PASSWORD"),
            oauth_client_id: pick(self.oauth_client_id, "BITBUCKET_OAUTH_CLIENT_ID"),
            oauth_client_secret: pick(self.oauth_client_secret, "BITBUCKET_OAUTH_CLIENT_SECRET"),
            oauth_token: pick(self.oauth_token, "BITBUCKET_OAUTH_TOKEN"),
            base_url: pick(self.base_url, "BITBUCKET_API_URL"),
            oauth_token_url: non_empty(self.oauth_token_url),
        }
    }

    /// The API root requests go to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn has_credentials(&self) -> bool {
        self.oauth_token.is_some()
            || (self.oauth_client_id.is_some() && self.oauth_client_secret.is_some())
            || (self.username.is_some() && self.password.is_some())
    }

    /// Falls back to a token stored in the keyring for this API host when no
    /// other credential is configured. Keyring failures are not fatal.
    pub fn with_keyring(mut self, store: &KeyringStore) -> Self {
        if self.has_credentials() {
            return self;
        }
        match store.get(&api_host(self.base_url())) {
            Ok(token) => self.oauth_token = non_empty(token),
            Err(e) => debug!("Keyring lookup failed: {}", e),
        }
        self
    }

    /// Resolves the credential to authenticate with, exchanging OAuth client
    /// credentials for a token when needed.
    pub async fn credential(&self) -> ProviderResult<AuthCredential> {
        if let Some(token) = &self.oauth_token {
            debug!("Authenticating with an OAuth token");
            return Ok(AuthCredential::bearer(token));
        }

        match (&self.oauth_client_id, &self.oauth_client_secret) {
            (Some(id), Some(secret)) => {
                debug!("Exchanging OAuth client credentials for {}", id);
                let token_url = self.oauth_token_url.as_deref().unwrap_or(TOKEN_URL);
                let token = client_credentials_token_at(token_url, id, secret).await?;
                return Ok(AuthCredential::bearer(token));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ProviderError::Config(
                    "oauth_client_id and oauth_client_secret must be set together".to_string(),
                ));
            }
            (None, None) => {}
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                debug!("Authenticating as {} with an app password", username);
                Ok(AuthCredential::app_password(username, password))
            }
            _ => Err(ProviderError::Config(
                "no credentials configured: set oauth_token, oauth_client_id and \
                 oauth_client_secret, or username and password"
                    .to_string(),
            )),
        }
    }
}

/// A configured provider: an authenticated client plus the type registry.
pub struct Provider {
    client: BitbucketClient,
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("client", &self.client)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Provider {
    /// Resolves credentials and builds the API client.
    ///
    /// `config` is used as given; call [`ProviderConfig::with_env`] and
    /// [`ProviderConfig::with_keyring`] first to fill it from the environment.
    pub async fn configure(config: ProviderConfig) -> ProviderResult<Self> {
        let credential = config.credential().await?;
        let client = BitbucketClient::cloud()?
            .with_base_url(config.base_url())
            .with_auth(credential);
        Ok(Self::with_client(client))
    }

    /// A provider around an existing client.
    pub fn with_client(client: BitbucketClient) -> Self {
        Self {
            client,
            resources: crate::resource::all()
                .into_iter()
                .map(|r| (r.type_name(), r))
                .collect(),
            data_sources: crate::data::all()
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    pub fn client(&self) -> &BitbucketClient {
        &self.client
    }

    /// Looks up a resource implementation by type name.
    pub fn resource(&self, type_name: &str) -> ProviderResult<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(Box::as_ref)
            .ok_or_else(|| ProviderError::Unsupported(format!("unknown resource type {:?}", type_name)))
    }

    /// Looks up a data source implementation by type name.
    pub fn data_source(&self, type_name: &str) -> ProviderResult<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(Box::as_ref)
            .ok_or_else(|| {
                ProviderError::Unsupported(format!("unknown data source type {:?}", type_name))
            })
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }
}
