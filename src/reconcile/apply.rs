//
//  bitbucket-provider
//  reconcile/apply.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Executing plans, imports and destroys.
//!
//! Every function that changes remote objects takes a `persist` callback and
//! calls it after each successful step, so a failure halfway through keeps
//! the work already done.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::manifest::Manifest;
use super::plan::{Action, Change, Plan};
use crate::provider::Provider;
use crate::resource::{ProviderError, Resource};
use crate::schema::ResourceData;
use crate::state::{parse_address, ResourceState, StateFile};

/// What an apply or destroy did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub added: usize,
    pub changed: usize,
    pub destroyed: usize,
}

async fn create(
    provider: &Provider,
    resource: &dyn Resource,
    change: &Change,
) -> Result<ResourceState> {
    let mut d = ResourceData::for_create(change.config.clone());
    resource.create(provider.client(), &mut d).await?;

    if d.id().is_empty() {
        anyhow::bail!("the object was created but could not be read back");
    }

    let (id, attributes) = d.into_parts();
    Ok(ResourceState {
        type_name: change.type_name.clone(),
        name: change.name.clone(),
        id,
        attributes,
    })
}

async fn update(
    provider: &Provider,
    resource: &dyn Resource,
    change: &Change,
    prior: &ResourceState,
) -> Result<Option<ResourceState>> {
    let mut config = change.config.clone();
    resource.schema().fill_unset(&mut config);

    let mut d = ResourceData::for_update(prior.id.as_str(), prior.attributes.clone(), config);
    resource.update(provider.client(), &mut d).await?;

    if d.id().is_empty() {
        return Ok(None);
    }
    let (id, attributes) = d.into_parts();
    Ok(Some(ResourceState {
        type_name: change.type_name.clone(),
        name: change.name.clone(),
        id,
        attributes,
    }))
}

async fn delete(provider: &Provider, resource: &dyn Resource, entry: &ResourceState) -> Result<()> {
    let mut d = ResourceData::from_state(entry.id.as_str(), entry.attributes.clone());
    resource.delete(provider.client(), &mut d).await?;
    Ok(())
}

/// Executes `plan` against `state`.
pub async fn apply<F>(
    provider: &Provider,
    plan: &Plan,
    state: &mut StateFile,
    mut persist: F,
) -> Result<ApplySummary>
where
    F: FnMut(&mut StateFile) -> Result<()>,
{
    let mut summary = ApplySummary::default();

    for change in &plan.changes {
        let resource = provider.resource(&change.type_name)?;
        let address = change.address.as_str();

        match &change.action {
            Action::NoOp => continue,
            Action::Create => {
                let entry = create(provider, resource, change)
                    .await
                    .with_context(|| format!("{}: create failed", address))?;
                info!("{}: created with ID {}", address, entry.id);
                state.upsert(entry);
                summary.added += 1;
            }
            Action::Update { changed } => {
                let prior = state
                    .find(address)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("{}: not in state", address))?;
                let names: Vec<&str> = changed.iter().map(|c| c.name.as_str()).collect();

                match update(provider, resource, change, &prior)
                    .await
                    .with_context(|| format!("{}: update failed", address))?
                {
                    Some(entry) => {
                        info!("{}: updated {}", address, names.join(", "));
                        state.upsert(entry);
                    }
                    None => {
                        info!("{}: gone after update, removing from state", address);
                        state.remove(address);
                    }
                }
                summary.changed += 1;
            }
            Action::Replace { .. } => {
                if let Some(prior) = state.find(address).cloned() {
                    delete(provider, resource, &prior)
                        .await
                        .with_context(|| format!("{}: delete before replace failed", address))?;
                    info!("{}: destroyed {} for replacement", address, prior.id);
                    state.remove(address);
                    persist(state)?;
                    summary.destroyed += 1;
                }

                let entry = create(provider, resource, change)
                    .await
                    .with_context(|| format!("{}: create after replace failed", address))?;
                info!("{}: created with ID {}", address, entry.id);
                state.upsert(entry);
                summary.added += 1;
            }
            Action::Delete => {
                let Some(prior) = state.find(address).cloned() else {
                    continue;
                };
                delete(provider, resource, &prior)
                    .await
                    .with_context(|| format!("{}: delete failed", address))?;
                info!("{}: destroyed {}", address, prior.id);
                state.remove(address);
                summary.destroyed += 1;
            }
        }

        persist(state)?;
    }

    Ok(summary)
}

/// Deletes every managed resource, newest first.
pub async fn destroy<F>(provider: &Provider, state: &mut StateFile, mut persist: F) -> Result<ApplySummary>
where
    F: FnMut(&mut StateFile) -> Result<()>,
{
    let mut summary = ApplySummary::default();

    for entry in state.resources.clone().iter().rev() {
        let address = entry.address();
        let resource = provider.resource(&entry.type_name)?;

        delete(provider, resource, entry)
            .await
            .with_context(|| format!("{}: delete failed", address))?;
        info!("{}: destroyed {}", address, entry.id);

        state.remove(&address);
        summary.destroyed += 1;
        persist(state)?;
    }

    state.data.clear();
    Ok(summary)
}

/// Brings an existing remote object under management at `address`.
///
/// The address must be declared in the manifest and not yet in state.
pub async fn import(
    provider: &Provider,
    manifest: &Manifest,
    state: &mut StateFile,
    address: &str,
    id: &str,
) -> Result<ResourceState> {
    let (type_name, name) = parse_address(address)
        .ok_or_else(|| anyhow::anyhow!("invalid resource address {:?}, expected TYPE.NAME", address))?;

    if manifest.resource(address).is_none() {
        anyhow::bail!("resource {:?} is not declared in the manifest", address);
    }
    if let Some(existing) = state.find(address) {
        anyhow::bail!(
            "resource {:?} is already managed with ID {:?}",
            address,
            existing.id
        );
    }

    let resource = provider.resource(type_name)?;
    if !resource.importable() {
        return Err(ProviderError::Unsupported(format!(
            "resource type {:?} does not support import",
            type_name
        ))
        .into());
    }

    let mut d = ResourceData::for_import(id);
    resource
        .import(provider.client(), &mut d)
        .await
        .with_context(|| format!("{}: import failed", address))?;
    resource
        .read(provider.client(), &mut d)
        .await
        .with_context(|| format!("{}: import failed", address))?;

    if d.id().is_empty() {
        anyhow::bail!("cannot import non-existent remote object");
    }

    let (id, attributes) = d.into_parts();
    let entry = ResourceState {
        type_name: type_name.to_string(),
        name: name.to_string(),
        id,
        attributes,
    };
    info!("{}: imported {}", address, entry.id);
    state.upsert(entry.clone());
    Ok(entry)
}
