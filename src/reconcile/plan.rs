//
//  bitbucket-provider
//  reconcile/plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Validation, refresh and change planning.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::manifest::{Block, Manifest};
use crate::provider::Provider;
use crate::resource::ProviderError;
use crate::schema::{AttributeChange, ResourceData, SchemaError};
use crate::state::{ResourceState, StateFile};

/// A manifest block that passed validation, with defaults applied.
#[derive(Debug, Clone)]
pub struct DesiredBlock {
    pub type_name: String,
    pub name: String,
    pub config: Map<String, Value>,
}

impl DesiredBlock {
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }
}

/// Every block of a manifest, validated.
#[derive(Debug, Clone, Default)]
pub struct Desired {
    pub resources: Vec<DesiredBlock>,
    pub data: Vec<DesiredBlock>,
}

/// What applying a change will do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Create,
    Update { changed: Vec<AttributeChange> },
    /// Some changed attribute cannot be updated in place.
    Replace { changed: Vec<AttributeChange> },
    Delete,
    NoOp,
}

impl Action {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update { .. } => "~",
            Self::Replace { .. } => "-/+",
            Self::Delete => "-",
            Self::NoOp => " ",
        }
    }
}

/// One planned step.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub address: String,

    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    #[serde(flatten)]
    pub action: Action,

    /// Desired configuration; empty for deletes.
    #[serde(skip)]
    pub config: Map<String, Value>,
}

/// The ordered changes that bring remote objects in line with a manifest.
///
/// Creates, updates and replacements come first in manifest order, then
/// deletes in reverse state order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub changes: Vec<Change>,

    /// Addresses dropped from state because the remote object is gone.
    pub dropped: Vec<String>,
}

impl Plan {
    /// Counts of objects to add, change and destroy. A replacement counts as
    /// one add and one destroy.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.changes
            .iter()
            .fold((0, 0, 0), |(add, change, destroy), c| match c.action {
                Action::Create => (add + 1, change, destroy),
                Action::Update { .. } => (add, change + 1, destroy),
                Action::Replace { .. } => (add + 1, change, destroy + 1),
                Action::Delete => (add, change, destroy + 1),
                Action::NoOp => (add, change, destroy),
            })
    }

    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.action != Action::NoOp)
    }
}

/// Validates every block of `manifest`, reporting all schema errors together.
///
/// Unknown types fail immediately. Defaults are applied to blocks that pass.
pub fn validate(provider: &Provider, manifest: &Manifest) -> Result<Desired> {
    let mut errors: Vec<SchemaError> = Vec::new();
    let mut desired = Desired::default();

    for block in &manifest.resources {
        let resource = provider.resource(&block.type_name)?;
        let schema = resource.schema();
        if let Some(config) = check_block(block, &schema, &block.address(), &mut errors)? {
            desired.resources.push(config);
        }
    }

    for block in &manifest.data {
        let source = provider.data_source(&block.type_name)?;
        let schema = source.schema();
        let address = format!("data.{}", block.address());
        if let Some(config) = check_block(block, &schema, &address, &mut errors)? {
            desired.data.push(config);
        }
    }

    if !errors.is_empty() {
        return Err(ProviderError::Schema(errors).into());
    }
    Ok(desired)
}

fn check_block(
    block: &Block,
    schema: &crate::schema::Schema,
    address: &str,
    errors: &mut Vec<SchemaError>,
) -> Result<Option<DesiredBlock>> {
    let mut config = block.config_map()?;
    let found = schema.validate(&config);
    if !found.is_empty() {
        errors.extend(found.into_iter().map(|e| e.with_prefix(address)));
        return Ok(None);
    }

    schema.apply_defaults(&mut config);
    Ok(Some(DesiredBlock {
        type_name: block.type_name.clone(),
        name: block.name.clone(),
        config,
    }))
}

/// Re-reads every managed resource, dropping those whose remote object is
/// gone. Returns the dropped addresses.
pub async fn refresh(provider: &Provider, state: &mut StateFile) -> Result<Vec<String>> {
    let mut dropped = Vec::new();

    for entry in state.resources.clone() {
        let address = entry.address();
        let resource = provider.resource(&entry.type_name)?;

        let mut d = ResourceData::from_state(entry.id.as_str(), entry.attributes);
        resource
            .read(provider.client(), &mut d)
            .await
            .with_context(|| format!("{}: refresh failed", address))?;

        if d.id().is_empty() {
            info!("{} no longer exists remotely", address);
            state.remove(&address);
            dropped.push(address);
            continue;
        }

        let (id, attributes) = d.into_parts();
        state.upsert(ResourceState {
            type_name: entry.type_name,
            name: entry.name,
            id,
            attributes,
        });
    }

    Ok(dropped)
}

/// Reads every data block and records the results in `state`.
pub async fn read_data(provider: &Provider, desired: &Desired, state: &mut StateFile) -> Result<()> {
    for block in &desired.data {
        let address = format!("data.{}", block.address());
        let source = provider.data_source(&block.type_name)?;

        let mut d = ResourceData::for_create(block.config.clone());
        source
            .read(provider.client(), &mut d)
            .await
            .with_context(|| format!("{}: read failed", address))?;
        debug!("{} read with ID {:?}", address, d.id());

        let (id, attributes) = d.into_parts();
        state.upsert_data(ResourceState {
            type_name: block.type_name.clone(),
            name: block.name.clone(),
            id,
            attributes,
        });
    }
    Ok(())
}

/// Computes the changes for already-validated blocks against refreshed state.
pub fn diff(provider: &Provider, desired: &Desired, state: &StateFile) -> Result<Vec<Change>> {
    let mut changes = Vec::new();

    for block in &desired.resources {
        let address = block.address();
        let resource = provider.resource(&block.type_name)?;

        let action = match state.find(&address) {
            None => Action::Create,
            Some(existing) => {
                let changed = resource.schema().diff(&block.config, &existing.attributes);
                if changed.is_empty() {
                    Action::NoOp
                } else if changed.iter().any(|c| c.force_new) {
                    Action::Replace { changed }
                } else {
                    Action::Update { changed }
                }
            }
        };

        changes.push(Change {
            address,
            type_name: block.type_name.clone(),
            name: block.name.clone(),
            action,
            config: block.config.clone(),
        });
    }

    for entry in state.resources.iter().rev() {
        let address = entry.address();
        if desired.resources.iter().any(|b| b.address() == address) {
            continue;
        }
        changes.push(Change {
            address,
            type_name: entry.type_name.clone(),
            name: entry.name.clone(),
            action: Action::Delete,
            config: Map::new(),
        });
    }

    Ok(changes)
}

/// Validates, refreshes, reads data sources and computes the plan.
///
/// `state` is refreshed in memory; callers decide whether to persist it.
pub async fn plan(provider: &Provider, manifest: &Manifest, state: &mut StateFile) -> Result<Plan> {
    let desired = validate(provider, manifest)?;
    let dropped = refresh(provider, state).await?;
    read_data(provider, &desired, state).await?;
    let changes = diff(provider, &desired, state)?;
    Ok(Plan { changes, dropped })
}
