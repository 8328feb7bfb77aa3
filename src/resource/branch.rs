//
//  bitbucket-provider
//  resource/branch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_branch`: a branch ref.
//!
//! ID format: `owner:repo_slug:branch_name`. Branches are immutable refs,
//! so an update deletes and recreates the branch.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{Branch, BranchRequest, Commit, Repository};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{Attribute, ResourceData, Schema, Validation, ValueType};

/// Target value meaning "the repository's main branch".
const DEFAULT_TARGET: &str = "default";

pub struct BranchResource;

fn branches_path(owner: &str, repo_slug: &str) -> String {
    api_path(&["repositories", owner, repo_slug, "refs", "branches"])
}

fn branch_path(owner: &str, repo_slug: &str, name: &str) -> String {
    api_path(&["repositories", owner, repo_slug, "refs", "branches", name])
}

fn parse_id(id: &str) -> ProviderResult<[&str; 3]> {
    split_id::<3>(id, ':').ok_or_else(|| {
        ProviderError::InvalidId(
            "incorrect ID format, should match `owner:repo_slug:branch_name`".to_string(),
        )
    })
}

/// Resolves the `target` attribute to something Bitbucket accepts as a hash.
async fn resolve_target(
    client: &BitbucketClient,
    owner: &str,
    repo_slug: &str,
    target: &str,
) -> ProviderResult<String> {
    if !target.is_empty() && target != DEFAULT_TARGET {
        return Ok(target.to_string());
    }

    let repo: Repository = client
        .get(&api_path(&["repositories", owner, repo_slug]))
        .await?;
    repo.mainbranch.map(|b| b.name).ok_or_else(|| {
        ProviderError::Config(format!(
            "repository {}/{} has no main branch to branch from",
            owner, repo_slug
        ))
    })
}

fn flatten(d: &mut ResourceData, branch: &Branch) {
    d.set("type", branch.ref_type.as_str());
    d.set(
        "target_hash",
        branch
            .target
            .as_ref()
            .map(|t| t.hash.clone())
            .unwrap_or_default(),
    );
    d.set(
        "default_merge_strategy",
        branch.default_merge_strategy.clone().unwrap_or_default(),
    );
    d.set("merge_strategies", json!(branch.merge_strategies));
}

#[async_trait]
impl Resource for BranchResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_branch"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "owner",
                Attribute::required(ValueType::String)
                    .validate(Validation::NotEmpty)
                    .force_new(),
            )
            .attr(
                "repo_slug",
                Attribute::required(ValueType::String)
                    .validate(Validation::NotEmpty)
                    .force_new(),
            )
            .attr(
                "branch_name",
                Attribute::required(ValueType::String)
                    .validate(Validation::NotEmpty)
                    .force_new(),
            )
            .attr(
                "target",
                Attribute::optional(ValueType::String)
                    .default_value(json!(DEFAULT_TARGET))
                    .force_new()
                    .describe("Commit hash or branch to start from; `default` is the main branch"),
            )
            .attr("type", Attribute::computed(ValueType::String))
            .attr("target_hash", Attribute::computed(ValueType::String))
            .attr(
                "default_merge_strategy",
                Attribute::optional(ValueType::String).or_computed(),
            )
            .attr(
                "merge_strategies",
                Attribute::optional(ValueType::StringList).or_computed(),
            )
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let repo_slug = d.get_str("repo_slug").to_string();
        let branch_name = d.get_str("branch_name").to_string();

        let hash = resolve_target(client, &owner, &repo_slug, d.get_str("target")).await?;
        let request = BranchRequest {
            name: branch_name.clone(),
            target: Commit { hash },
        };
        debug!("Branch Create Body: {:?}", request);

        let _: Value = client.post(&branches_path(&owner, &repo_slug), &request).await?;

        d.set_id(format!("{}:{}:{}", owner, repo_slug, branch_name));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        if !d.id().is_empty() {
            let [owner, repo_slug, branch_name] = parse_id(d.id())?;
            let parts = [owner.to_string(), repo_slug.to_string(), branch_name.to_string()];
            let [owner, repo_slug, branch_name] = parts;
            d.set("owner", owner);
            d.set("repo_slug", repo_slug);
            d.set("branch_name", branch_name);
        }

        let path = branch_path(
            d.get_str("owner"),
            d.get_str("repo_slug"),
            d.get_str("branch_name"),
        );
        match client.get_optional::<Branch>(&path).await? {
            Some(branch) => flatten(d, &branch),
            None => remove_from_state("Branch", d),
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        self.delete(client, d).await?;
        self.create(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let path = branch_path(
            d.get_str("owner"),
            d.get_str("repo_slug"),
            d.get_str("branch_name"),
        );
        client.delete(&path).await?;
        Ok(())
    }
}
