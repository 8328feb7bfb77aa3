//
//  bitbucket-provider
//  data/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bitbucket_projects`: every project of a workspace.
//!
//! The workspace listing is paginated; all pages are collected before the
//! set is written.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::cloud::Project;
use crate::api::{api_path, BitbucketClient};
use crate::resource::project::project_summary;
use crate::resource::{DataSource, ProviderResult};
use crate::schema::{Attribute, ResourceData, Schema, ValueType};

pub struct ProjectsData;

fn project_schema() -> Schema {
    Schema::new()
        .attr("key", Attribute::computed(ValueType::String))
        .attr("name", Attribute::computed(ValueType::String))
        .attr("is_private", Attribute::computed(ValueType::Bool))
        .attr("description", Attribute::computed(ValueType::String))
        .attr(
            "has_publicly_visible_repos",
            Attribute::computed(ValueType::Bool),
        )
        .attr("uuid", Attribute::computed(ValueType::String))
}

#[async_trait]
impl DataSource for ProjectsData {
    fn type_name(&self) -> &'static str {
        "bitbucket_projects"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("owner", Attribute::required(ValueType::String))
            .attr(
                "projects",
                Attribute::computed(ValueType::Block(project_schema())),
            )
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let path = api_path(&["workspaces", &owner, "projects"]);

        let projects = match client.get_all::<Project>(&path).await {
            Ok(projects) => projects,
            Err(e) if e.is_not_found() => {
                warn!("Projects ({}) not found, removing from state", owner);
                d.set_id("");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Read {} projects from {}", projects.len(), owner);

        let summaries: Vec<Value> = projects
            .iter()
            .map(|p| Value::Object(project_summary(p)))
            .collect();
        d.set("projects", summaries);
        d.set_id(owner);
        Ok(())
    }
}
