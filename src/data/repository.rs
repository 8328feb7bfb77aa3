//
//  bitbucket-provider
//  data/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::cloud::Repository;
use crate::api::{api_path, ApiError, BitbucketClient};
use crate::resource::{DataSource, ProviderError, ProviderResult};
use crate::schema::{Attribute, ResourceData, Schema, ValueType};

/// `bitbucket_repository`: resolves a repository's UUID from its slug.
///
/// Unlike the other lookups, a missing repository is an error.
pub struct RepositoryData;

#[async_trait]
impl DataSource for RepositoryData {
    fn type_name(&self) -> &'static str {
        "bitbucket_repository"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("workspace", Attribute::required(ValueType::String))
            .attr("slug", Attribute::required(ValueType::String))
            .attr("uuid", Attribute::computed(ValueType::String))
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let workspace = d.get_str("workspace").to_string();
        let slug = d.get_str("slug").to_string();
        let path = api_path(&["repositories", &workspace, &slug]);

        let repository: Repository = client.get(&path).await.map_err(|e| match e {
            ApiError::NotFound { .. } => ProviderError::NotFound("repository not found".into()),
            e if e.status() == Some(StatusCode::INTERNAL_SERVER_ERROR) => {
                ProviderError::NotFound("internal server error fetching repository".into())
            }
            e => e.into(),
        })?;

        d.set_id(format!("{}/{}", workspace, slug));
        d.set("uuid", repository.uuid);
        Ok(())
    }
}
