//
//  bitbucket-provider
//  resource/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_repository`: a repository, optionally filed under a project,
//! with its pipelines switch.
//!
//! ID format: `owner/slug`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{PipelinesConfig, ProjectKey, Repository, RepositoryRequest};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{Attribute, ResourceData, Schema, Validation, ValueType};

const FORK_POLICIES: &[&str] = &["allow_forks", "no_public_forks", "no_forks"];

pub struct RepositoryResource;

fn repository_path(owner: &str, slug: &str) -> String {
    api_path(&["repositories", owner, slug])
}

fn pipelines_config_path(owner: &str, slug: &str) -> String {
    api_path(&["repositories", owner, slug, "pipelines_config"])
}

fn parse_id(id: &str) -> ProviderResult<[&str; 2]> {
    split_id::<2>(id, '/').ok_or_else(|| {
        ProviderError::InvalidId("incorrect ID format, should match `owner/slug`".to_string())
    })
}

/// The configured slug, or the lower-cased name when none is set.
fn slug(d: &ResourceData) -> String {
    d.get_opt_str("slug")
        .unwrap_or_else(|| d.get_str("name").to_lowercase())
}

fn expand(d: &ResourceData) -> RepositoryRequest {
    RepositoryRequest {
        name: d.get_str("name").to_string(),
        scm: d.get_str("scm").to_string(),
        is_private: d.get_bool("is_private"),
        description: d.get_opt_str("description"),
        website: d.get_opt_str("website"),
        language: d.get_opt_str("language"),
        has_issues: d.get_bool("has_issues"),
        has_wiki: d.get_bool("has_wiki"),
        fork_policy: d.get_str("fork_policy").to_string(),
        project: d.get_opt_str("project_key").map(|key| ProjectKey { key }),
    }
}

fn flatten(d: &mut ResourceData, repo: &Repository) {
    d.set("name", repo.name.as_str());
    d.set("slug", repo.slug.as_str());
    d.set("scm", repo.scm.as_str());
    d.set("is_private", repo.is_private);
    d.set("description", repo.description.clone().unwrap_or_default());
    d.set("website", repo.website.clone().unwrap_or_default());
    d.set("language", repo.language.clone().unwrap_or_default());
    d.set("has_issues", repo.has_issues);
    d.set("has_wiki", repo.has_wiki);
    d.set("fork_policy", repo.fork_policy.as_str());
    d.set("uuid", repo.uuid.as_str());
    d.set(
        "project_key",
        repo.project.as_ref().map(|p| p.key.clone()).unwrap_or_default(),
    );
    d.set("clone_https", repo.clone_url("https").unwrap_or_default());
    d.set("clone_ssh", repo.clone_url("ssh").unwrap_or_default());
}

async fn put_pipelines_config(
    client: &BitbucketClient,
    owner: &str,
    slug: &str,
    enabled: bool,
) -> ProviderResult<()> {
    let _: Value = client
        .put(&pipelines_config_path(owner, slug), &PipelinesConfig { enabled })
        .await?;
    Ok(())
}

#[async_trait]
impl Resource for RepositoryResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_repository"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "owner",
                Attribute::required(ValueType::String)
                    .force_new()
                    .validate(Validation::NotEmpty),
            )
            .attr(
                "name",
                Attribute::required(ValueType::String).validate(Validation::NotEmpty),
            )
            .attr(
                "slug",
                Attribute::optional(ValueType::String)
                    .or_computed()
                    .force_new()
                    .describe("Defaults to the lower-cased name"),
            )
            .attr(
                "scm",
                Attribute::optional(ValueType::String)
                    .default_value(json!("git"))
                    .force_new()
                    .validate(Validation::OneOf(&["git", "hg"])),
            )
            .attr(
                "is_private",
                Attribute::optional(ValueType::Bool).default_value(json!(true)),
            )
            .attr("description", Attribute::optional(ValueType::String))
            .attr("website", Attribute::optional(ValueType::String))
            .attr("language", Attribute::optional(ValueType::String))
            .attr(
                "has_issues",
                Attribute::optional(ValueType::Bool).default_value(json!(false)),
            )
            .attr(
                "has_wiki",
                Attribute::optional(ValueType::Bool).default_value(json!(false)),
            )
            .attr(
                "fork_policy",
                Attribute::optional(ValueType::String)
                    .default_value(json!("allow_forks"))
                    .validate(Validation::OneOf(FORK_POLICIES)),
            )
            .attr(
                "project_key",
                Attribute::optional(ValueType::String)
                    .or_computed()
                    .describe("Defaults to the workspace's default project"),
            )
            .attr(
                "pipelines_enabled",
                Attribute::optional(ValueType::Bool)
                    .describe("Enables Bitbucket Pipelines for the repository"),
            )
            .attr("uuid", Attribute::computed(ValueType::String))
            .attr("clone_ssh", Attribute::computed(ValueType::String))
            .attr("clone_https", Attribute::computed(ValueType::String))
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let slug = slug(d);
        let repo = expand(d);
        debug!("Repository Create Body: {:?}", repo);

        let _: Repository = client.post(&repository_path(&owner, &slug), &repo).await?;
        d.set_id(format!("{}/{}", owner, slug));

        if let Some(enabled) = d.get("pipelines_enabled").and_then(Value::as_bool) {
            put_pipelines_config(client, &owner, &slug, enabled).await?;
        }

        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, slug] = parse_id(d.id())?;
        let (owner, slug) = (owner.to_string(), slug.to_string());

        let repo = match client
            .get_optional::<Repository>(&repository_path(&owner, &slug))
            .await?
        {
            Some(repo) => repo,
            None => {
                remove_from_state("Repository", d);
                return Ok(());
            }
        };

        d.set("owner", owner.as_str());
        flatten(d, &repo);

        let tracked = d.get("pipelines_enabled").is_some_and(|v| !v.is_null());
        if tracked {
            let config = client
                .get_optional::<PipelinesConfig>(&pipelines_config_path(&owner, &slug))
                .await?
                .unwrap_or_default();
            d.set("pipelines_enabled", config.enabled);
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, slug] = parse_id(d.id())?;
        let (owner, slug) = (owner.to_string(), slug.to_string());

        let repo = expand(d);
        debug!("Repository Update Body: {:?}", repo);
        let _: Repository = client.put(&repository_path(&owner, &slug), &repo).await?;

        if d.has_change("pipelines_enabled") {
            let enabled = d.get_bool("pipelines_enabled");
            put_pipelines_config(client, &owner, &slug, enabled).await?;
        }

        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, slug] = parse_id(d.id())?;
        client.delete(&repository_path(owner, slug)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(config: Value) -> ResourceData {
        ResourceData::for_create(config.as_object().cloned().unwrap())
    }

    #[test]
    fn test_slug_defaults_to_lowercase_name() {
        assert_eq!(slug(&data(json!({"name": "Widgets"}))), "widgets");
        assert_eq!(
            slug(&data(json!({"name": "Widgets", "slug": "gadgets"}))),
            "gadgets"
        );
    }

    #[test]
    fn test_expand_omits_unset_optionals() {
        let d = data(json!({
            "owner": "acme",
            "name": "widgets",
            "scm": "git",
            "is_private": true,
            "fork_policy": "no_forks",
            "project_key": "CORE",
            "description": ""
        }));
        let body = serde_json::to_value(expand(&d)).unwrap();
        assert_eq!(body["project"], json!({"key": "CORE"}));
        assert_eq!(body["fork_policy"], json!("no_forks"));
        assert!(body.get("description").is_none());
        assert!(body.get("website").is_none());
    }
}
