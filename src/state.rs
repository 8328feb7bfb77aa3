//
//  bitbucket-provider
//  state.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # State File
//!
//! The state file records every managed resource: its address in the
//! manifest, the remote ID, and the attributes last read back from
//! Bitbucket. Data-source results from the last plan are kept alongside
//! under `data.<type>.<name>` addresses.
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "serial": 4,
//!   "lineage": "5f0c2e4a-...",
//!   "updated_at": "2026-01-12T10:00:00Z",
//!   "resources": [
//!     {
//!       "type": "bitbucket_project",
//!       "name": "core",
//!       "id": "acme/CORE",
//!       "attributes": { "key": "CORE", "owner": "acme", "name": "Core" }
//!     }
//!   ],
//!   "data": []
//! }
//! ```
//!
//! `serial` increases on every save; `lineage` is fixed when the state is
//! first created.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{config_exists, read_config_file, write_file_atomic};

/// Version of the state file format written by this crate.
pub const STATE_VERSION: u32 = 1;

/// One managed resource or data-source result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    pub id: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceState {
    /// `type.name`, as written in the manifest.
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }
}

/// Splits an address into type and name.
///
/// ```rust
/// use bitbucket_provider::state::parse_address;
///
/// assert_eq!(parse_address("bitbucket_project.core"), Some(("bitbucket_project", "core")));
/// assert_eq!(parse_address("bitbucket_project"), None);
/// ```
pub fn parse_address(address: &str) -> Option<(&str, &str)> {
    address
        .split_once('.')
        .filter(|(type_name, name)| !type_name.is_empty() && !name.is_empty())
}

/// The persisted state of a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,

    #[serde(default)]
    pub serial: u64,

    pub lineage: String,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub resources: Vec<ResourceState>,

    #[serde(default)]
    pub data: Vec<ResourceState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

impl StateFile {
    /// An empty state with a fresh lineage.
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            serial: 0,
            lineage: uuid::Uuid::new_v4().to_string(),
            updated_at: None,
            resources: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Loads state from `path`. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            debug!("No state at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = read_config_file(path)?;
        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;

        if state.version > STATE_VERSION {
            anyhow::bail!(
                "state file {} has version {}, this build supports up to {}",
                path.display(),
                state.version,
                STATE_VERSION
            );
        }
        Ok(state)
    }

    /// Writes state to `path`, bumping `serial` and `updated_at`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.serial += 1;
        self.updated_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(self)?;
        write_file_atomic(path, &content)?;
        debug!("Saved state serial {} to {}", self.serial, path.display());
        Ok(())
    }

    pub fn find(&self, address: &str) -> Option<&ResourceState> {
        self.resources.iter().find(|r| r.address() == address)
    }

    /// Replaces the entry with the same address, or appends a new one.
    pub fn upsert(&mut self, entry: ResourceState) {
        upsert_into(&mut self.resources, entry);
    }

    pub fn remove(&mut self, address: &str) -> Option<ResourceState> {
        let index = self.resources.iter().position(|r| r.address() == address)?;
        Some(self.resources.remove(index))
    }

    /// Records a data-source result.
    pub fn upsert_data(&mut self, entry: ResourceState) {
        upsert_into(&mut self.data, entry);
    }

    /// Looks up a data-source result by `data.<type>.<name>`.
    pub fn find_data(&self, address: &str) -> Option<&ResourceState> {
        let address = address.strip_prefix("data.")?;
        self.data.iter().find(|r| r.address() == address)
    }
}

fn upsert_into(entries: &mut Vec<ResourceState>, entry: ResourceState) {
    let address = entry.address();
    match entries.iter_mut().find(|r| r.address() == address) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}
