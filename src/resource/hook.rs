//
//  bitbucket-provider
//  resource/hook.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_hook`: a repository webhook.
//!
//! The ID is the hook UUID; `owner` and `repository` come from the
//! attributes. Import accepts `owner/repository/uuid`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{Hook, HookRequest, HOOK_EVENTS};
use crate::api::{api_path, BitbucketClient};
use crate::schema::{Attribute, ResourceData, Schema, Validation, ValueType};

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").unwrap());

pub struct HookResource;

fn hooks_path(owner: &str, repository: &str) -> String {
    api_path(&["repositories", owner, repository, "hooks"])
}

fn hook_path(owner: &str, repository: &str, uuid: &str) -> String {
    api_path(&["repositories", owner, repository, "hooks", uuid])
}

fn expand(d: &ResourceData) -> HookRequest {
    let mut events = d.get_strings("events");
    events.sort_unstable();

    HookRequest {
        url: d.get_str("url").to_string(),
        description: d.get_str("description").to_string(),
        active: d.get_bool("active"),
        skip_cert_verification: d.get_bool("skip_cert_verification"),
        history_enabled: d.get_bool("history_enabled"),
        events,
        secret: if d.has_change("secret") {
            Some(d.get_str("secret").to_string())
        } else {
            None
        },
    }
}

fn flatten(d: &mut ResourceData, hook: &Hook) {
    let mut events = hook.events.clone();
    events.sort_unstable();

    d.set("uuid", hook.uuid.as_str());
    d.set("url", hook.url.as_str());
    d.set("description", hook.description.as_str());
    d.set("active", hook.active);
    d.set("skip_cert_verification", hook.skip_cert_verification);
    d.set("history_enabled", hook.history_enabled);
    d.set("secret_set", hook.secret_set);
    d.set("events", json!(events));
}

#[async_trait]
impl Resource for HookResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_hook"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("owner", Attribute::required(ValueType::String).force_new())
            .attr(
                "repository",
                Attribute::required(ValueType::String).force_new(),
            )
            .attr(
                "url",
                Attribute::required(ValueType::String)
                    .validate(Validation::Matches(&HTTP_URL, "an http(s) URL")),
            )
            .attr("description", Attribute::required(ValueType::String))
            .attr(
                "events",
                Attribute::required(ValueType::StringSet).validate(Validation::OneOf(HOOK_EVENTS)),
            )
            .attr(
                "active",
                Attribute::optional(ValueType::Bool).default_value(json!(true)),
            )
            .attr(
                "skip_cert_verification",
                Attribute::optional(ValueType::Bool).default_value(json!(true)),
            )
            .attr(
                "history_enabled",
                Attribute::optional(ValueType::Bool).default_value(json!(false)),
            )
            .attr(
                "secret",
                Attribute::optional(ValueType::String)
                    .sensitive()
                    .describe("Signing secret; Bitbucket never returns it"),
            )
            .attr("secret_set", Attribute::computed(ValueType::Bool))
            .attr("uuid", Attribute::computed(ValueType::String))
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let hook = expand(d);
        debug!(
            "Hook Create: url={} events={:?} secret={}",
            hook.url,
            hook.events,
            hook.secret.is_some()
        );

        let created: Hook = client
            .post(&hooks_path(d.get_str("owner"), d.get_str("repository")), &hook)
            .await?;

        d.set_id(created.uuid);
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let path = hook_path(d.get_str("owner"), d.get_str("repository"), d.id());
        match client.get_optional::<Hook>(&path).await? {
            Some(hook) => flatten(d, &hook),
            None => remove_from_state("Hook", d),
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let hook = expand(d);
        debug!(
            "Hook Update: url={} events={:?} secret changed={}",
            hook.url,
            hook.events,
            hook.secret.is_some()
        );

        let path = hook_path(d.get_str("owner"), d.get_str("repository"), d.id());
        let _: Hook = client.put(&path, &hook).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let path = hook_path(d.get_str("owner"), d.get_str("repository"), d.id());
        client.delete(&path).await?;
        Ok(())
    }

    async fn import(&self, _client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, repository, uuid] = split_id::<3>(d.id(), '/').ok_or_else(|| {
            ProviderError::InvalidId(format!(
                "unexpected format of ID ({:?}), expected OWNER/REPO/UUID",
                d.id()
            ))
        })?;
        let (owner, repository, uuid) = (owner.to_string(), repository.to_string(), uuid.to_string());

        d.set("owner", owner);
        d.set("repository", repository);
        d.set_id(uuid);
        Ok(())
    }
}
