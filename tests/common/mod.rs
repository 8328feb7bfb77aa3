//
//  bitbucket-provider
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

#![allow(dead_code)]

use bitbucket_provider::api::BitbucketClient;
use bitbucket_provider::auth::AuthCredential;
use bitbucket_provider::provider::Provider;
use bitbucket_provider::schema::Schema;
use mockito::ServerGuard;
use serde_json::{Map, Value};

/// A client pointed at the mock server, authenticated with a bearer token.
pub fn client(server: &ServerGuard) -> BitbucketClient {
    BitbucketClient::cloud()
        .unwrap()
        .with_base_url(format!("{}/2.0", server.url()))
        .with_auth(AuthCredential::bearer("test-token"))
}

pub fn provider(server: &ServerGuard) -> Provider {
    Provider::with_client(client(server))
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

/// A configuration block with schema defaults filled in, as the planner
/// hands it to `create`.
pub fn config(schema: &Schema, value: Value) -> Map<String, Value> {
    let mut config = object(value);
    schema.apply_defaults(&mut config);
    config
}
