//
//  bitbucket-provider
//  tests/data_sources.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

mod common;

use bitbucket_provider::data::current_user::CurrentUserData;
use bitbucket_provider::data::project::ProjectData;
use bitbucket_provider::data::projects::ProjectsData;
use bitbucket_provider::data::repository::RepositoryData;
use bitbucket_provider::resource::{DataSource, ProviderError};
use bitbucket_provider::schema::ResourceData;
use mockito::Server;
use serde_json::json;

use common::{client, object};

#[tokio::test]
async fn test_projects_collects_every_page() {
    let mut server = Server::new_async().await;
    let next = format!("{}/2.0/workspaces/acme/projects?page=2", server.url());
    server
        .mock("GET", "/2.0/workspaces/acme/projects")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "values": [{"key": "CORE", "name": "Core", "uuid": "{p-1}", "is_private": true}],
                "next": next
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects?page=2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"values": [{"key": "WEB", "name": "Web", "uuid": "{p-2}"}], "next": ""}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"owner": "acme"})));
    ProjectsData.read(&client(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "acme");
    let projects = d.get_list("projects");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["key"], json!("CORE"));
    assert_eq!(projects[1]["name"], json!("Web"));
    assert_eq!(projects[1]["description"], json!(""));
}

#[tokio::test]
async fn test_projects_missing_workspace_clears_id() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/nobody/projects")
        .with_status(404)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"owner": "nobody"})));
    ProjectsData.read(&client(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "");
}

#[tokio::test]
async fn test_project_lookup() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"key": "CORE", "name": "Core", "uuid": "{p-1}", "is_private": false}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"owner": "acme", "key": "CORE"})));
    ProjectData.read(&client(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "acme/CORE");
    assert_eq!(d.get_str("name"), "Core");
    assert!(!d.get_bool("is_private"));
}

#[tokio::test]
async fn test_project_missing_clears_id() {
    let mut server = Server::new_async().await;
    let lookup = server
        .mock("GET", "/2.0/workspaces/acme/projects/GONE")
        .with_status(404)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"owner": "acme", "key": "GONE"})));
    ProjectData.read(&client(&server), &mut d).await.unwrap();

    lookup.assert_async().await;
    assert_eq!(d.id(), "");
    assert_eq!(d.get_str("name"), "");
}

#[tokio::test]
async fn test_repository_lookup() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"uuid": "{r-1}", "slug": "widgets"}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"workspace": "acme", "slug": "widgets"})));
    RepositoryData.read(&client(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "acme/widgets");
    assert_eq!(d.get_str("uuid"), "{r-1}");
}

#[tokio::test]
async fn test_repository_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/missing")
        .with_status(404)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"workspace": "acme", "slug": "missing"})));
    let err = RepositoryData
        .read(&client(&server), &mut d)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NotFound(_)));
    assert_eq!(err.to_string(), "repository not found");
}

#[tokio::test]
async fn test_repository_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/broken")
        .with_status(500)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"workspace": "acme", "slug": "broken"})));
    let err = RepositoryData
        .read(&client(&server), &mut d)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "internal server error fetching repository");
}

#[tokio::test]
async fn test_repository_other_errors_pass_through() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/secret")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "error", "error": {"message": "Access denied"}}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({"workspace": "acme", "slug": "secret"})));
    let err = RepositoryData
        .read(&client(&server), &mut d)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Api(_)));
    assert_eq!(err.to_string(), "403 Forbidden: Access denied");
}

#[tokio::test]
async fn test_current_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/2.0/user")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"uuid": "{u-1}", "username": "jdoe", "display_name": "Jane Doe"}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_create(Default::default());
    CurrentUserData.read(&client(&server), &mut d).await.unwrap();

    mock.assert_async().await;
    assert_eq!(d.id(), "{u-1}");
    assert_eq!(d.get_str("username"), "jdoe");
    assert_eq!(d.get_str("display_name"), "Jane Doe");
}
