//
//  bitbucket-provider
//  reconcile/manifest.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The TOML manifest describing desired state.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::read_config_file;
use crate::provider::ProviderConfig;

/// One `[[resource]]` or `[[data]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    #[serde(default)]
    pub config: toml::Table,
}

impl Block {
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }

    /// The attribute values as a JSON object.
    pub fn config_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(&self.config)? {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("{}: config must be a table", self.address()),
        }
    }
}

/// A parsed manifest.
///
/// ```toml
/// [provider]
/// username = "jdoe"
///
/// [[resource]]
/// type = "bitbucket_project"
/// name = "core"
/// config = { owner = "acme", key = "CORE", name = "Core" }
///
/// [[data]]
/// type = "bitbucket_current_user"
/// name = "me"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default, rename = "resource")]
    pub resources: Vec<Block>,

    #[serde(default)]
    pub data: Vec<Block>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Parses manifest text and checks that addresses are unique.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;

        let mut seen = HashSet::new();
        for block in &manifest.resources {
            if !seen.insert(block.address()) {
                anyhow::bail!("duplicate resource address {:?}", block.address());
            }
        }
        let mut seen = HashSet::new();
        for block in &manifest.data {
            if !seen.insert(block.address()) {
                anyhow::bail!("duplicate data address {:?}", format!("data.{}", block.address()));
            }
        }
        Ok(manifest)
    }

    pub fn resource(&self, address: &str) -> Option<&Block> {
        self.resources.iter().find(|b| b.address() == address)
    }
}
