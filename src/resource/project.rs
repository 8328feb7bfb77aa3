//
//  bitbucket-provider
//  resource/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_project`: a project inside a workspace.
//!
//! ID format: `owner/key`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{remove_from_state, split_id, ProviderError, ProviderResult, Resource};
use crate::api::cloud::{Project, ProjectLinks, ProjectRequest};
use crate::api::common::Link;
use crate::api::{api_path, BitbucketClient};
use crate::schema::{block_str, Attribute, DiffSuppress, ResourceData, Schema, Validation, ValueType};

/// Avatar URLs Bitbucket generates for uploaded images.
const GENERATED_AVATAR_PREFIX: &str = "https://bitbucket.org/account/user";

pub struct ProjectResource;

/// Schema of the `link` block, shared with the project data source.
pub(crate) fn link_schema() -> Schema {
    Schema::new().attr(
        "avatar",
        Attribute::optional(ValueType::Block(Schema::new().attr(
            "href",
            Attribute::optional(ValueType::String)
                .diff_suppress(DiffSuppress::OldHasPrefix(GENERATED_AVATAR_PREFIX)),
        )))
        .max_items(1),
    )
}

pub(crate) fn expand_links(link: &[Value]) -> Option<ProjectLinks> {
    let link = link.first()?.as_object()?;
    let avatar = link
        .get("avatar")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_object)
        .map(|avatar| Link {
            href: block_str(avatar, "href").to_string(),
            name: None,
        });
    Some(ProjectLinks { avatar })
}

pub(crate) fn flatten_links(links: Option<&ProjectLinks>) -> Value {
    match links {
        None => json!([]),
        Some(links) => {
            let avatar = match &links.avatar {
                Some(avatar) => json!([{"href": avatar.href}]),
                None => json!([]),
            };
            json!([{"avatar": avatar}])
        }
    }
}

fn project_path(owner: &str, key: &str) -> String {
    api_path(&["workspaces", owner, "projects", key])
}

fn parse_id(id: &str) -> ProviderResult<[&str; 2]> {
    split_id::<2>(id, '/').ok_or_else(|| {
        ProviderError::InvalidId("incorrect ID format, should match `owner/key`".to_string())
    })
}

fn expand(d: &ResourceData) -> ProjectRequest {
    ProjectRequest {
        name: d.get_str("name").to_string(),
        key: d.get_str("key").to_string(),
        is_private: d.get_bool("is_private"),
        description: d.get_str("description").to_string(),
        links: if d.is_new_resource() {
            expand_links(d.get_list("link"))
        } else {
            None
        },
    }
}

/// Writes the remote project into `d`.
pub(crate) fn flatten(d: &mut ResourceData, project: &Project) {
    d.set("key", project.key.as_str());
    d.set("is_private", project.is_private);
    d.set("name", project.name.as_str());
    d.set("description", project.description.clone().unwrap_or_default());
    d.set("has_publicly_visible_repos", project.has_publicly_visible_repos);
    d.set("uuid", project.uuid.as_str());
    d.set("link", flatten_links(project.links.as_ref()));
}

#[async_trait]
impl Resource for ProjectResource {
    fn type_name(&self) -> &'static str {
        "bitbucket_project"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "key",
                Attribute::required(ValueType::String)
                    .validate(Validation::NotEmpty)
                    .describe("Project key, unique within the workspace"),
            )
            .attr(
                "owner",
                Attribute::required(ValueType::String)
                    .validate(Validation::NotEmpty)
                    .describe("Workspace slug"),
            )
            .attr(
                "name",
                Attribute::required(ValueType::String).validate(Validation::NotEmpty),
            )
            .attr(
                "is_private",
                Attribute::optional(ValueType::Bool).default_value(json!(true)),
            )
            .attr("description", Attribute::optional(ValueType::String))
            .attr(
                "has_publicly_visible_repos",
                Attribute::computed(ValueType::Bool),
            )
            .attr("uuid", Attribute::computed(ValueType::String))
            .attr(
                "link",
                Attribute::optional(ValueType::Block(link_schema()))
                    .or_computed()
                    .max_items(1)
                    .describe("Avatar link; only applied when the project is created"),
            )
    }

    async fn create(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let project = expand(d);
        debug!("Project Create Body: {:?}", project);

        let created: Project = client
            .post(&api_path(&["workspaces", &owner, "projects"]), &project)
            .await?;

        d.set_id(format!("{}/{}", owner, created.key));
        self.read(client, d).await
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        if !d.id().is_empty() {
            let [owner, key] = parse_id(d.id())?;
            let (owner, key) = (owner.to_string(), key.to_string());
            d.set("owner", owner);
            d.set("key", key);
        }

        let path = project_path(d.get_str("owner"), d.get_str("key"));
        match client.get_optional::<Project>(&path).await? {
            Some(project) => flatten(d, &project),
            None => remove_from_state("Project", d),
        }
        Ok(())
    }

    async fn update(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, old_key] = parse_id(d.id())?;
        let path = project_path(owner, old_key);
        let owner = owner.to_string();

        let project = expand(d);
        debug!("Project Update Body: {:?}", project);
        let updated: Project = client.put(&path, &project).await?;

        d.set_id(format!("{}/{}", owner, updated.key));
        self.read(client, d).await
    }

    async fn delete(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let [owner, key] = parse_id(d.id())?;
        client.delete(&project_path(owner, key)).await?;
        Ok(())
    }
}

/// Attribute map of a project, used by the projects data source.
pub(crate) fn project_summary(project: &Project) -> Map<String, Value> {
    let mut summary = Map::new();
    summary.insert("key".into(), json!(project.key));
    summary.insert("name".into(), json!(project.name));
    summary.insert("is_private".into(), json!(project.is_private));
    summary.insert(
        "description".into(),
        json!(project.description.clone().unwrap_or_default()),
    );
    summary.insert(
        "has_publicly_visible_repos".into(),
        json!(project.has_publicly_visible_repos),
    );
    summary.insert("uuid".into(), json!(project.uuid));
    summary
}
