//
//  bitbucket-provider
//  resource/deploy_key.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_deploy_key`: a read-only access key on a repository.
//!
//! ID format: `workspace/repository/key_id`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{DeployKey, DeployKeyRequest};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{Attribute, ResourceData, Schema, Validation, ValueType};

static PUBLIC_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(ssh-(rsa|dss|ed25519)|ecdsa-sha2-nistp(256|384|521)|sk-[a-z0-9@.-]+) [A-Za-z0-9+/]+={0,3}( .*)?$")
        .unwrap()
});

pub struct DeployKeyResource;

fn keys_path(workspace: &str, repository: &str) -> String {
    api_path(&["repositories", workspace, repository, "deploy-keys"])
}

fn key_path(workspace: &str, repository: &str, key_id: &str) -> String {
    api_path(&["repositories", workspace, repository, "deploy-keys", key_id])
}

/// Splits `workspace/repository/key_id`.
pub fn deploy_key_id(id: &str) -> ProviderResult<[&str; 3]> {
    split_id::<3>(id, '/').ok_or_else(|| {
        ProviderError::InvalidId(format!(
            "unexpected format of ID ({:?}), expected WORKSPACE/REPO/KEY-ID",
            id
        ))
    })
}

fn expand(d: &ResourceData) -> DeployKeyRequest {
    DeployKeyRequest {
        key: d.get_str("key").to_string(),
        label: d.get_opt_str("label"),
    }
}

#[async_trait]
impl Resource for DeployKeyResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_deploy_key"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("workspace", Attribute::required(ValueType::String).force_new())
            .attr(
                "repository",
                Attribute::required(ValueType::String).force_new(),
            )
            .attr(
                "key",
                Attribute::required(ValueType::String)
                    .force_new()
                    .validate(Validation::Matches(&PUBLIC_KEY, "an OpenSSH public key"))
                    .describe("Public key in OpenSSH format, optionally followed by a comment"),
            )
            .attr("label", Attribute::optional(ValueType::String))
            .attr("key_id", Attribute::computed(ValueType::String))
            .attr("comment", Attribute::computed(ValueType::String))
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let workspace = d.get_str("workspace").to_string();
        let repository = d.get_str("repository").to_string();

        let key: DeployKey = client
            .post(&keys_path(&workspace, &repository), &expand(d))
            .await?;

        d.set_id(format!("{}/{}/{}", workspace, repository, key.id));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, key_id] = deploy_key_id(d.id())?;
        let (workspace, repository, key_id) =
            (workspace.to_string(), repository.to_string(), key_id.to_string());

        let key = match client
            .get_optional::<DeployKey>(&key_path(&workspace, &repository, &key_id))
            .await?
        {
            Some(key) => key,
            None => {
                remove_from_state("Deploy Key", d);
                return Ok(());
            }
        };

        d.set("workspace", workspace);
        d.set("repository", repository);
        d.set("key_id", key.id.to_string());
        d.set("label", key.label);
        d.set("comment", key.comment);
        // The API drops the comment from the key; only an import fills it in.
        if d.get_str("key").is_empty() {
            d.set("key", key.key);
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, key_id] = deploy_key_id(d.id())?;
        let path = key_path(workspace, repository, key_id);

        let _: DeployKey = client.put(&path, &expand(d)).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, key_id] = deploy_key_id(d.id())?;
        client
            .delete(&key_path(workspace, repository, key_id))
            .await?;
        Ok(())
    }
}
