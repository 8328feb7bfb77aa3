//
//  bitbucket-provider
//  resource/pipeline_ssh_known_host.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_pipeline_ssh_known_host`: a host Pipelines trusts over SSH.
//!
//! ID format: `workspace/repository/uuid`.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{PipelineKnownHost, PipelineSshPublicKey, KNOWN_HOST_KEY_TYPES};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{block_str, Attribute, ResourceData, Schema, Validation, ValueType};

pub struct PipelineSshKnownHostResource;

fn known_hosts_path(workspace: &str, repository: &str) -> String {
    api_path(&[
        "repositories",
        workspace,
        repository,
        "pipelines_config",
        "ssh",
        "known_hosts",
        "",
    ])
}

fn known_host_path(workspace: &str, repository: &str, uuid: &str) -> String {
    api_path(&[
        "repositories",
        workspace,
        repository,
        "pipelines_config",
        "ssh",
        "known_hosts",
        uuid,
    ])
}

/// Splits `workspace/repository/uuid`.
pub fn known_host_id(id: &str) -> ProviderResult<[&str; 3]> {
    split_id::<3>(id, '/').ok_or_else(|| {
        ProviderError::InvalidId(format!(
            "unexpected format of ID ({:?}), expected WORKSPACE-ID/REPO-ID/UUID",
            id
        ))
    })
}

fn expand(d: &ResourceData) -> PipelineKnownHost {
    let public_key = d
        .get_block("public_key")
        .map(|block| PipelineSshPublicKey {
            key_type: block_str(block, "key_type").to_string(),
            key: block_str(block, "key").to_string(),
            ..Default::default()
        })
        .unwrap_or_default();

    PipelineKnownHost {
        uuid: String::new(),
        hostname: d.get_str("hostname").to_string(),
        public_key,
    }
}

fn flatten_public_key(key: &PipelineSshPublicKey) -> serde_json::Value {
    json!([{
        "key_type": key.key_type,
        "key": key.key,
        "md5_fingerprint": key.md5_fingerprint,
        "sha256_fingerprint": key.sha256_fingerprint,
    }])
}

#[async_trait]
impl Resource for PipelineSshKnownHostResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_pipeline_ssh_known_host"
    }

    fn schema(&self) -> Schema {
        let public_key = Schema::new()
            .attr(
                "key_type",
                Attribute::required(ValueType::String)
                    .validate(Validation::OneOf(KNOWN_HOST_KEY_TYPES)),
            )
            .attr("key", Attribute::required(ValueType::String))
            .attr("md5_fingerprint", Attribute::computed(ValueType::String))
            .attr("sha256_fingerprint", Attribute::computed(ValueType::String));

        Schema::new()
            .attr("workspace", Attribute::required(ValueType::String).force_new())
            .attr(
                "repository",
                Attribute::required(ValueType::String).force_new(),
            )
            .attr("hostname", Attribute::optional(ValueType::String))
            .attr(
                "public_key",
                Attribute::required(ValueType::Block(public_key)).max_items(1),
            )
            .attr("uuid", Attribute::computed(ValueType::String))
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let workspace = d.get_str("workspace").to_string();
        let repository = d.get_str("repository").to_string();
        let host = expand(d);
        debug!("Pipeline Ssh Known Host Request: {:?}", host);

        let created: PipelineKnownHost = client
            .post(&known_hosts_path(&workspace, &repository), &host)
            .await?;

        d.set_id(format!("{}/{}/{}", workspace, repository, created.uuid));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, uuid] = known_host_id(d.id())?;
        let (workspace, repository) = (workspace.to_string(), repository.to_string());
        let path = known_host_path(&workspace, &repository, uuid);

        let host = match client.get_optional::<PipelineKnownHost>(&path).await? {
            Some(host) => host,
            None => {
                remove_from_state("Pipeline Ssh known host", d);
                return Ok(());
            }
        };

        d.set("workspace", workspace);
        d.set("repository", repository);
        d.set("hostname", host.hostname.as_str());
        d.set("uuid", host.uuid.as_str());
        d.set("public_key", flatten_public_key(&host.public_key));
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, uuid] = known_host_id(d.id())?;
        let path = known_host_path(workspace, repository, uuid);
        let host = expand(d);
        debug!("Pipeline Ssh Known Host Request: {:?}", host);

        let _: PipelineKnownHost = client.put(&path, &host).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [workspace, repository, uuid] = known_host_id(d.id())?;
        client
            .delete(&known_host_path(workspace, repository, uuid))
            .await?;
        Ok(())
    }
}
