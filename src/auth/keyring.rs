//
//  bitbucket-provider
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Stores an OAuth access token in the system's native keyring so manifests
//! and environments do not have to carry it.
//!
//! ## Platform Support
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: Application identifier (`bitbucket-provider`)
//! - **Username/Key**: The API host (e.g. `api.bitbucket.org`)
//! - **Password/Value**: The OAuth access token

use anyhow::Result;
use keyring::Entry;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "bitbucket-provider";

/// Secure token storage using the system's native keyring service.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_provider::auth::KeyringStore;
///
/// fn example() -> anyhow::Result<()> {
///     let store = KeyringStore::new();
///     store.store("api.bitbucket.org", "oauth_token")?;
///
///     if let Some(token) = store.get("api.bitbucket.org")? {
///         println!("Using stored token ({} chars)", token.len());
///     }
///
///     store.delete("api.bitbucket.org")?;
///     Ok(())
/// }
/// ```
///
/// # Notes
///
/// - The keyring may require user interaction on first access.
/// - On Linux, a secret service daemon must be running.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a keyring store with the default service name.
    ///
    /// No keyring access occurs during construction.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores a token for `host`, replacing any existing entry.
    pub fn store(&self, host: &str, token: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry.set_password(token)?;
        Ok(())
    }

    /// Retrieves the token stored for `host`.
    ///
    /// Returns `Ok(None)` when no entry exists.
    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the token stored for `host`. Deleting a missing entry succeeds.
    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
