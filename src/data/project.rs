//
//  bitbucket-provider
//  data/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use async_trait::async_trait;

use crate::api::cloud::Project;
use crate::api::{api_path, BitbucketClient};
use crate::resource::project::{flatten, link_schema};
use crate::resource::{remove_from_state, DataSource, ProviderResult};
use crate::schema::{Attribute, ResourceData, Schema, ValueType};

/// `bitbucket_project`: looks up a project by workspace and key.
pub struct ProjectData;

#[async_trait]
impl DataSource for ProjectData {
    fn type_name(&self) -> &'static str {
        "bitbucket_project"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("key", Attribute::required(ValueType::String))
            .attr("owner", Attribute::required(ValueType::String))
            .attr("name", Attribute::computed(ValueType::String))
            .attr("is_private", Attribute::computed(ValueType::Bool))
            .attr("description", Attribute::computed(ValueType::String))
            .attr(
                "has_publicly_visible_repos",
                Attribute::computed(ValueType::Bool),
            )
            .attr("uuid", Attribute::computed(ValueType::String))
            .attr("link", Attribute::computed(ValueType::Block(link_schema())))
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let owner = d.get_str("owner").to_string();
        let key = d.get_str("key").to_string();
        let path = api_path(&["workspaces", &owner, "projects", &key]);

        match client.get_optional::<Project>(&path).await? {
            Some(project) => {
                d.set_id(format!("{}/{}", owner, key));
                flatten(d, &project);
            }
            None => {
                d.set_id(format!("{}/{}", owner, key));
                remove_from_state("Project", d);
            }
        }
        Ok(())
    }
}
