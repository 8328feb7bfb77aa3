//
//  bitbucket-provider
//  resource/default_reviewers.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_default_reviewers`: the set of accounts added to every new
//! pull request of a repository.
//!
//! ID format: `owner/repository`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::User;
use crate::api::{api_path, BitbucketClient};
use crate::schema::{Attribute, ResourceData, Schema, ValueType};

pub struct DefaultReviewersResource;

fn reviewers_path(owner: &str, repository: &str) -> String {
    api_path(&["repositories", owner, repository, "default-reviewers"])
}

fn reviewer_path(owner: &str, repository: &str, uuid: &str) -> String {
    api_path(&["repositories", owner, repository, "default-reviewers", uuid])
}

fn reviewer_set(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

async fn add_reviewers(
    client: &BitbucketClient,
    owner: &str,
    repository: &str,
    reviewers: impl IntoIterator<Item = &String>,
) -> ProviderResult<()> {
    for uuid in reviewers {
        debug!("Adding default reviewer {} to {}/{}", uuid, owner, repository);
        let _: Value = client
            .put(&reviewer_path(owner, repository, uuid), &json!({}))
            .await?;
    }
    Ok(())
}

async fn remove_reviewers(
    client: &BitbucketClient,
    owner: &str,
    repository: &str,
    reviewers: impl IntoIterator<Item = &String>,
) -> ProviderResult<()> {
    for uuid in reviewers {
        debug!("Removing default reviewer {} from {}/{}", uuid, owner, repository);
        client.delete(&reviewer_path(owner, repository, uuid)).await?;
    }
    Ok(())
}

#[async_trait]
impl Resource for DefaultReviewersResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_default_reviewers"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("owner", Attribute::required(ValueType::String).force_new())
            .attr(
                "repository",
                Attribute::required(ValueType::String).force_new(),
            )
            .attr(
                "reviewers",
                Attribute::required(ValueType::StringSet).describe("Account UUIDs"),
            )
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let repository = d.get_str("repository").to_string();
        let reviewers = reviewer_set(d.get("reviewers"));

        add_reviewers(client, &owner, &repository, &reviewers).await?;

        d.set_id(format!("{}/{}", owner, repository));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, repository] = split_id::<2>(d.id(), '/').ok_or_else(|| {
            ProviderError::InvalidId(
                "incorrect ID format, should match `owner/repository`".to_string(),
            )
        })?;
        let (owner, repository) = (owner.to_string(), repository.to_string());

        let reviewers = match client.get_all::<User>(&reviewers_path(&owner, &repository)).await {
            Ok(users) => users,
            Err(e) if e.is_not_found() => {
                remove_from_state("Default reviewers", d);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let uuids: BTreeSet<String> = reviewers.into_iter().map(|u| u.uuid).collect();
        d.set("owner", owner);
        d.set("repository", repository);
        d.set("reviewers", json!(uuids));
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let repository = d.get_str("repository").to_string();
        let old = reviewer_set(d.prior("reviewers"));
        let new = reviewer_set(d.get("reviewers"));

        add_reviewers(client, &owner, &repository, new.difference(&old)).await?;
        remove_reviewers(client, &owner, &repository, old.difference(&new)).await?;

        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let repository = d.get_str("repository").to_string();
        let reviewers = reviewer_set(d.get("reviewers"));

        remove_reviewers(client, &owner, &repository, &reviewers).await
    }
}
