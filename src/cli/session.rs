//
//  bitbucket-provider
//  cli/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Paths, output and provider setup shared by every command.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::api::BitbucketClient;
use crate::auth::KeyringStore;
use crate::config::Config;
use crate::interactive::{is_interactive, prompt_confirm_with_default};
use crate::output::{OutputFormat, OutputWriter};
use crate::provider::Provider;
use crate::reconcile::Manifest;
use crate::state::StateFile;

use super::{Cancelled, GlobalOptions};

/// Resolved paths and output settings for one invocation.
pub struct Session {
    pub manifest_path: PathBuf,
    pub state_path: PathBuf,
    pub writer: OutputWriter,
}

impl Session {
    pub fn new(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let format = if global.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        };

        let session = Self {
            manifest_path: config.manifest_path(global.manifest.as_deref()),
            state_path: config.state_path(global.state.as_deref()),
            writer: OutputWriter::new(format),
        };
        debug!(
            "Manifest {}, state {}",
            session.manifest_path.display(),
            session.state_path.display()
        );
        Ok(session)
    }

    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.manifest_path)
    }

    pub fn state(&self) -> Result<StateFile> {
        StateFile::load(&self.state_path)
    }

    pub fn save_state(&self, state: &mut StateFile) -> Result<()> {
        state.save(&self.state_path)
    }

    /// An authenticated provider built from the manifest's `[provider]`
    /// table, the environment and the keyring.
    pub async fn provider(&self, manifest: &Manifest) -> Result<Provider> {
        let config = manifest
            .provider
            .clone()
            .with_env()
            .with_keyring(&KeyringStore::new());
        Ok(Provider::configure(config).await?)
    }
}

/// A provider that never talks to Bitbucket, for schema lookups.
pub fn offline_provider() -> Result<Provider> {
    Ok(Provider::with_client(BitbucketClient::cloud()?))
}

/// Asks before a destructive step unless `auto_approve` is set.
pub fn confirm(auto_approve: bool, action: &'static str, message: &str) -> Result<()> {
    if auto_approve {
        return Ok(());
    }
    if !is_interactive() {
        anyhow::bail!(
            "{} needs confirmation; pass --auto-approve to run without a terminal",
            action
        );
    }
    if !prompt_confirm_with_default(message, false)? {
        return Err(Cancelled(action).into());
    }
    Ok(())
}
