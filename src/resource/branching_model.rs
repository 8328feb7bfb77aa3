//
//  bitbucket-provider
//  resource/branching_model.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_branching_model`: development and production branch settings
//! of a repository.
//!
//! The model always exists remotely; "deleting" it resets the settings.
//! ID format: `owner/repository`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{remove_from_state, ProviderResult, Resource};
use crate::api::cloud::{BranchModel, BranchingModel};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{block_bool, block_str, Attribute, ResourceData, Schema, ValueType};

pub struct BranchingModelResource;

fn branch_model_schema(production: bool) -> Schema {
    let schema = Schema::new()
        .attr("is_valid", Attribute::optional(ValueType::Bool).or_computed())
        .attr("name", Attribute::optional(ValueType::String))
        .attr("use_mainbranch", Attribute::optional(ValueType::Bool))
        .attr("branch_does_not_exist", Attribute::optional(ValueType::Bool));
    if production {
        schema.attr("enabled", Attribute::optional(ValueType::Bool))
    } else {
        schema
    }
}

fn settings_path(owner: &str, repository: &str) -> String {
    api_path(&["repositories", owner, repository, "branching-model", "settings"])
}

fn expand_branch_model(block: Option<&Map<String, Value>>) -> Option<BranchModel> {
    let block = block?;
    Some(BranchModel {
        is_valid: false,
        name: block_str(block, "name").to_string(),
        use_mainbranch: block_bool(block, "use_mainbranch"),
        branch_does_not_exist: block_bool(block, "branch_does_not_exist"),
        enabled: block_bool(block, "enabled"),
    })
}

fn expand(d: &ResourceData) -> BranchingModel {
    BranchingModel {
        development: expand_branch_model(d.get_block("development")),
        production: expand_branch_model(d.get_block("production")),
    }
}

fn flatten_branch_model(model: Option<&BranchModel>, production: bool) -> Value {
    let Some(model) = model else {
        return json!([]);
    };
    let mut block = json!({
        "branch_does_not_exist": model.branch_does_not_exist,
        "is_valid": model.is_valid,
        "use_mainbranch": model.use_mainbranch,
        "name": model.name,
    });
    if production {
        block["enabled"] = json!(model.enabled);
    }
    json!([block])
}

#[async_trait]
impl Resource for BranchingModelResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_branching_model"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("owner", Attribute::required(ValueType::String).force_new())
            .attr(
                "repository",
                Attribute::required(ValueType::String).force_new(),
            )
            .attr(
                "development",
                Attribute::optional(ValueType::Block(branch_model_schema(false))).max_items(1),
            )
            .attr(
                "production",
                Attribute::optional(ValueType::Block(branch_model_schema(true))).max_items(1),
            )
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let repository = d.get_str("repository").to_string();
        let model = expand(d);
        debug!("Branching Model Body: {:?}", model);

        let _: Value = client.put(&settings_path(&owner, &repository), &model).await?;

        d.set_id(format!("{}/{}", owner, repository));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let path = api_path(&[
            "repositories",
            d.get_str("owner"),
            d.get_str("repository"),
            "branching-model",
        ]);

        match client.get_optional::<BranchingModel>(&path).await? {
            Some(model) => {
                d.set(
                    "development",
                    flatten_branch_model(model.development.as_ref(), false),
                );
                d.set(
                    "production",
                    flatten_branch_model(model.production.as_ref(), true),
                );
            }
            None => remove_from_state("Branching model", d),
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        self.create(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        client
            .put_empty(&settings_path(d.get_str("owner"), d.get_str("repository")))
            .await?;
        Ok(())
    }

    fn importable(&self) -> bool {
        false
    }
}
