//
//  bitbucket-provider
//  data/current_user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use async_trait::async_trait;

use crate::api::cloud::User;
use crate::api::BitbucketClient;
use crate::resource::{DataSource, ProviderResult};
use crate::schema::{Attribute, ResourceData, Schema, ValueType};

/// `bitbucket_current_user`: the account the provider authenticates as.
pub struct CurrentUserData;

#[async_trait]
impl DataSource for CurrentUserData {
    fn type_name(&self) -> &'static str {
        "bitbucket_current_user"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("uuid", Attribute::computed(ValueType::String))
            .attr("username", Attribute::computed(ValueType::String))
            .attr("display_name", Attribute::computed(ValueType::String))
    }

    async fn read(&self, client: &BitbucketClient, d: &mut ResourceData) -> ProviderResult<()> {
        let user: User = client.get("/user").await?;

        d.set_id(user.uuid.as_str());
        d.set("uuid", user.uuid);
        d.set("username", user.username.unwrap_or_default());
        d.set("display_name", user.display_name);
        Ok(())
    }
}
