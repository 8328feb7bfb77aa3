//
//  bitbucket-provider
//  tests/resources.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Resource CRUD against a mock Bitbucket API.

mod common;

use bitbucket_provider::resource::branch::BranchResource;
use bitbucket_provider::resource::branching_model::BranchingModelResource;
use bitbucket_provider::resource::default_reviewers::DefaultReviewersResource;
use bitbucket_provider::resource::deploy_key::DeployKeyResource;
use bitbucket_provider::resource::hook::HookResource;
use bitbucket_provider::resource::pipeline_ssh_known_host::PipelineSshKnownHostResource;
use bitbucket_provider::resource::project::ProjectResource;
use bitbucket_provider::resource::repository::RepositoryResource;
use bitbucket_provider::resource::Resource;
use bitbucket_provider::schema::ResourceData;
use mockito::{Matcher, Server};
use serde_json::json;

use common::{client, config, object};

const PROJECT_JSON: &str = r#"{
    "key": "CORE",
    "uuid": "{p-1}",
    "name": "Core",
    "description": "Core services",
    "is_private": true,
    "has_publicly_visible_repos": false
}"#;

#[tokio::test]
async fn test_project_create_then_read() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/2.0/workspaces/acme/projects")
        .match_body(Matcher::PartialJson(json!({
            "key": "CORE",
            "name": "Core",
            "is_private": true
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(PROJECT_JSON)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PROJECT_JSON)
        .create_async()
        .await;

    let resource = ProjectResource;
    let mut d = ResourceData::for_create(config(
        &resource.schema(),
        json!({"owner": "acme", "key": "CORE", "name": "Core", "description": "Core services"}),
    ));
    resource.create(&client(&server), &mut d).await.unwrap();

    create.assert_async().await;
    read.assert_async().await;
    assert_eq!(d.id(), "acme/CORE");
    assert_eq!(d.get_str("uuid"), "{p-1}");
    assert!(!d.get_bool("has_publicly_visible_repos"));
}

#[tokio::test]
async fn test_project_update_uses_old_key() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/2.0/workspaces/acme/projects/OLD")
        .match_body(Matcher::PartialJson(json!({"key": "CORE"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PROJECT_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PROJECT_JSON)
        .create_async()
        .await;

    let resource = ProjectResource;
    let prior = object(json!({"owner": "acme", "key": "OLD", "name": "Core", "is_private": true}));
    let mut d = ResourceData::for_update(
        "acme/OLD",
        prior,
        object(json!({"owner": "acme", "key": "CORE", "name": "Core", "is_private": true})),
    );
    resource.update(&client(&server), &mut d).await.unwrap();

    update.assert_async().await;
    assert_eq!(d.id(), "acme/CORE");
}

#[tokio::test]
async fn test_read_missing_project_clears_id() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/GONE")
        .with_status(404)
        .with_body(r#"{"type": "error", "error": {"message": "Project not found"}}"#)
        .create_async()
        .await;

    let mut d = ResourceData::from_state("acme/GONE", object(json!({"owner": "acme", "key": "GONE"})));
    ProjectResource.read(&client(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "");
}

#[tokio::test]
async fn test_repository_create_enables_pipelines() {
    let mut server = Server::new_async().await;
    let repo_json = json!({
        "uuid": "{r-1}",
        "name": "Widgets",
        "slug": "widgets",
        "scm": "git",
        "is_private": true,
        "fork_policy": "no_public_forks",
        "project": {"key": "CORE"},
        "links": {"clone": [
            {"name": "https", "href": "https://bitbucket.org/acme/widgets.git"},
            {"name": "ssh", "href": "git@bitbucket.org:acme/widgets.git"}
        ]}
    })
    .to_string();

    let create = server
        .mock("POST", "/2.0/repositories/acme/widgets")
        .match_body(Matcher::PartialJson(json!({
            "name": "Widgets",
            "scm": "git",
            "fork_policy": "no_public_forks",
            "project": {"key": "CORE"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(&repo_json)
        .create_async()
        .await;
    let pipelines = server
        .mock("PUT", "/2.0/repositories/acme/widgets/pipelines_config")
        .match_body(Matcher::Json(json!({"enabled": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"enabled": true}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(&repo_json)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/pipelines_config")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"enabled": true}"#)
        .create_async()
        .await;

    let resource = RepositoryResource;
    let mut d = ResourceData::for_create(config(
        &resource.schema(),
        json!({
            "owner": "acme",
            "name": "Widgets",
            "fork_policy": "no_public_forks",
            "project_key": "CORE",
            "pipelines_enabled": true
        }),
    ));
    resource.create(&client(&server), &mut d).await.unwrap();

    create.assert_async().await;
    pipelines.assert_async().await;
    assert_eq!(d.id(), "acme/widgets");
    assert_eq!(d.get_str("clone_ssh"), "git@bitbucket.org:acme/widgets.git");
    assert!(d.get_bool("pipelines_enabled"));
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2.0/repositories/acme/widgets/deploy-keys")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "error", "error": {"message": "Someone has already added that SSH key."}}"#)
        .create_async()
        .await;

    let resource = DeployKeyResource;
    let mut d = ResourceData::for_create(object(json!({
        "workspace": "acme",
        "repository": "widgets",
        "key": "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIKqP3Cr632C2dNhhgKVcon4ldUSAeKiku2yP9O9/bDtY"
    })));
    let err = resource.create(&client(&server), &mut d).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "400 Bad Request: Someone has already added that SSH key."
    );
    assert_eq!(d.id(), "");
}

#[tokio::test]
async fn test_deploy_key_import_fills_key() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/deploy-keys/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": 7, "key": "ssh-ed25519 AAAAC3Nza", "label": "ci", "comment": "ci@example.com"}"#,
        )
        .create_async()
        .await;

    let resource = DeployKeyResource;
    let mut d = ResourceData::for_import("acme/widgets/7");
    resource.import(&client(&server), &mut d).await.unwrap();
    resource.read(&client(&server), &mut d).await.unwrap();

    assert_eq!(d.get_str("key"), "ssh-ed25519 AAAAC3Nza");
    assert_eq!(d.get_str("key_id"), "7");
    assert_eq!(d.get_str("comment"), "ci@example.com");
}

#[tokio::test]
async fn test_branch_default_target_uses_mainbranch() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"slug": "widgets", "name": "widgets", "mainbranch": {"name": "main"}}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/2.0/repositories/acme/widgets/refs/branches")
        .match_body(Matcher::Json(json!({"name": "release", "target": {"hash": "main"}})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "release", "type": "branch", "target": {"hash": "abc123"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/refs/branches/release")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"name": "release", "type": "branch", "target": {"hash": "abc123"},
                "default_merge_strategy": "squash", "merge_strategies": ["merge_commit", "squash"]}"#,
        )
        .create_async()
        .await;

    let resource = BranchResource;
    let mut d = ResourceData::for_create(config(
        &resource.schema(),
        json!({"owner": "acme", "repo_slug": "widgets", "branch_name": "release"}),
    ));
    resource.create(&client(&server), &mut d).await.unwrap();

    create.assert_async().await;
    assert_eq!(d.id(), "acme:widgets:release");
    assert_eq!(d.get_str("target_hash"), "abc123");
    assert_eq!(d.get_str("default_merge_strategy"), "squash");
}

#[tokio::test]
async fn test_hook_create_sends_secret_once() {
    let mut server = Server::new_async().await;
    let hook_json = r#"{
        "uuid": "{h-1}",
        "url": "https://ci.example.com/hook",
        "description": "CI",
        "active": true,
        "skip_cert_verification": true,
        "history_enabled": false,
        "secret_set": true,
        "events": ["repo:push", "pullrequest:created"]
    }"#;

    let create = server
        .mock("POST", "/2.0/repositories/acme/widgets/hooks")
        .match_body(Matcher::PartialJson(json!({
            "events": ["pullrequest:created", "repo:push"],
            "secret": "s3cret",
            "skip_cert_verification": true
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(hook_json)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/hooks/%7Bh-1%7D")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hook_json)
        .create_async()
        .await;

    let resource = HookResource;
    let mut d = ResourceData::for_create(config(
        &resource.schema(),
        json!({
            "owner": "acme",
            "repository": "widgets",
            "url": "https://ci.example.com/hook",
            "description": "CI",
            "events": ["repo:push", "pullrequest:created"],
            "secret": "s3cret"
        }),
    ));
    resource.create(&client(&server), &mut d).await.unwrap();

    create.assert_async().await;
    assert_eq!(d.id(), "{h-1}");
    assert!(d.get_bool("secret_set"));
    assert_eq!(d.get_str("secret"), "s3cret");
    assert_eq!(d.get("events"), Some(&json!(["pullrequest:created", "repo:push"])));
}

#[tokio::test]
async fn test_default_reviewers_follow_next_links() {
    let mut server = Server::new_async().await;
    let next = format!(
        "{}/2.0/repositories/acme/widgets/default-reviewers?page=2",
        server.url()
    );
    let first = server
        .mock("GET", "/2.0/repositories/acme/widgets/default-reviewers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"values": [{"uuid": "{u-1}", "display_name": "One"}], "next": next}).to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/2.0/repositories/acme/widgets/default-reviewers?page=2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"values": [{"uuid": "{u-2}", "display_name": "Two"}]}"#)
        .create_async()
        .await;

    let mut d = ResourceData::from_state("acme/widgets", Default::default());
    DefaultReviewersResource
        .read(&client(&server), &mut d)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(d.get("reviewers"), Some(&json!(["{u-1}", "{u-2}"])));
}

#[tokio::test]
async fn test_default_reviewers_update_diffs_sets() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("PUT", "/2.0/repositories/acme/widgets/default-reviewers/%7Bu-3%7D")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"uuid": "{u-3}", "display_name": "Three"}"#)
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/2.0/repositories/acme/widgets/default-reviewers/%7Bu-1%7D")
        .with_status(204)
        .create_async()
        .await;
    let untouched = server
        .mock("PUT", "/2.0/repositories/acme/widgets/default-reviewers/%7Bu-2%7D")
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/default-reviewers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"values": [{"uuid": "{u-2}"}, {"uuid": "{u-3}"}]}"#)
        .create_async()
        .await;

    let prior = object(json!({
        "owner": "acme",
        "repository": "widgets",
        "reviewers": ["{u-1}", "{u-2}"]
    }));
    let mut d = ResourceData::for_update(
        "acme/widgets",
        prior,
        object(json!({"owner": "acme", "repository": "widgets", "reviewers": ["{u-2}", "{u-3}"]})),
    );
    DefaultReviewersResource
        .update(&client(&server), &mut d)
        .await
        .unwrap();

    add.assert_async().await;
    remove.assert_async().await;
    untouched.assert_async().await;
    assert_eq!(d.get("reviewers"), Some(&json!(["{u-2}", "{u-3}"])));
}

#[tokio::test]
async fn test_known_host_create() {
    let mut server = Server::new_async().await;
    let host_json = r#"{
        "uuid": "{k-1}",
        "hostname": "example.com:22",
        "public_key": {"key_type": "ssh-ed25519", "key": "AAAAC3Nza", "md5_fingerprint": "md5:aa", "sha256_fingerprint": "SHA256:bb"}
    }"#;

    let create = server
        .mock("POST", "/2.0/repositories/acme/widgets/pipelines_config/ssh/known_hosts/")
        .match_body(Matcher::PartialJson(json!({
            "hostname": "example.com:22",
            "public_key": {"key_type": "ssh-ed25519", "key": "AAAAC3Nza"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(host_json)
        .create_async()
        .await;
    server
        .mock(
            "GET",
            "/2.0/repositories/acme/widgets/pipelines_config/ssh/known_hosts/%7Bk-1%7D",
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(host_json)
        .create_async()
        .await;

    let resource = PipelineSshKnownHostResource;
    let mut d = ResourceData::for_create(config(
        &resource.schema(),
        json!({
            "workspace": "acme",
            "repository": "widgets",
            "hostname": "example.com:22",
            "public_key": [{"key_type": "ssh-ed25519", "key": "AAAAC3Nza"}]
        }),
    ));
    resource.create(&client(&server), &mut d).await.unwrap();

    create.assert_async().await;
    assert_eq!(d.id(), "acme/widgets/{k-1}");
    let public_key = d.get_block("public_key").unwrap();
    assert_eq!(public_key["sha256_fingerprint"], json!("SHA256:bb"));
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/2.0/repositories/acme/widgets")
        .with_status(204)
        .create_async()
        .await;

    let mut d = ResourceData::from_state("acme/widgets", object(json!({"owner": "acme"})));
    RepositoryResource
        .delete(&client(&server), &mut d)
        .await
        .unwrap();
    delete.assert_async().await;
}

fn widgets_state() -> serde_json::Map<String, serde_json::Value> {
    object(json!({
        "owner": "acme",
        "name": "widgets",
        "slug": "widgets",
        "scm": "git",
        "is_private": true,
        "has_issues": false,
        "has_wiki": false,
        "fork_policy": "allow_forks",
        "pipelines_enabled": false
    }))
}

const WIDGETS_JSON: &str = r#"{
    "uuid": "{r-1}",
    "name": "widgets",
    "slug": "widgets",
    "scm": "git",
    "is_private": true,
    "fork_policy": "allow_forks",
    "description": "Widget service"
}"#;

#[tokio::test]
async fn test_repository_update_puts_pipelines_config_on_change() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/2.0/repositories/acme/widgets")
        .match_body(Matcher::PartialJson(json!({"description": "Widget service"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WIDGETS_JSON)
        .create_async()
        .await;
    let pipelines = server
        .mock("PUT", "/2.0/repositories/acme/widgets/pipelines_config")
        .match_body(Matcher::Json(json!({"enabled": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"enabled": true}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WIDGETS_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/pipelines_config")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"enabled": true}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_update(
        "acme/widgets",
        widgets_state(),
        object(json!({"description": "Widget service", "pipelines_enabled": true})),
    );
    RepositoryResource.update(&client(&server), &mut d).await.unwrap();

    update.assert_async().await;
    pipelines.assert_async().await;
    assert!(d.get_bool("pipelines_enabled"));
    assert_eq!(d.get_str("description"), "Widget service");
}

#[tokio::test]
async fn test_repository_update_leaves_pipelines_config_alone() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WIDGETS_JSON)
        .create_async()
        .await;
    let pipelines = server
        .mock("PUT", "/2.0/repositories/acme/widgets/pipelines_config")
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WIDGETS_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/pipelines_config")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"enabled": false}"#)
        .create_async()
        .await;

    let mut d = ResourceData::for_update(
        "acme/widgets",
        widgets_state(),
        object(json!({"description": "Widget service"})),
    );
    RepositoryResource.update(&client(&server), &mut d).await.unwrap();

    update.assert_async().await;
    pipelines.assert_async().await;
}

#[tokio::test]
async fn test_repository_missing_pipelines_config_reads_as_disabled() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WIDGETS_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/pipelines_config")
        .with_status(404)
        .create_async()
        .await;

    let mut state = widgets_state();
    state.insert("pipelines_enabled".into(), json!(true));
    let mut d = ResourceData::from_state("acme/widgets", state);
    RepositoryResource.read(&client(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "acme/widgets");
    assert_eq!(d.get("pipelines_enabled"), Some(&json!(false)));
}

#[tokio::test]
async fn test_branch_update_deletes_then_recreates() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/2.0/repositories/acme/widgets/refs/branches/release")
        .with_status(204)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/2.0/repositories/acme/widgets/refs/branches")
        .match_body(Matcher::PartialJson(json!({
            "name": "release",
            "target": {"hash": "def456"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "release", "type": "branch", "target": {"hash": "def456"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/refs/branches/release")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "release", "type": "branch", "target": {"hash": "def456"}}"#)
        .create_async()
        .await;

    let prior = object(json!({
        "owner": "acme",
        "repo_slug": "widgets",
        "branch_name": "release",
        "target": "abc123",
        "target_hash": "abc123"
    }));
    let mut d = ResourceData::for_update("acme:widgets:release", prior, object(json!({"target": "def456"})));
    BranchResource.update(&client(&server), &mut d).await.unwrap();

    delete.assert_async().await;
    create.assert_async().await;
    assert_eq!(d.id(), "acme:widgets:release");
    assert_eq!(d.get_str("target_hash"), "def456");
}

#[tokio::test]
async fn test_branching_model_create_then_read() {
    let mut server = Server::new_async().await;
    let settings = server
        .mock("PUT", "/2.0/repositories/acme/widgets/branching-model/settings")
        .match_body(Matcher::Json(json!({
            "development": {"name": "develop"},
            "production": {"use_mainbranch": true, "enabled": true}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;
    let read = server
        .mock("GET", "/2.0/repositories/acme/widgets/branching-model")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"development": {"name": "develop", "is_valid": true},
                "production": {"name": "main", "use_mainbranch": true, "enabled": true, "is_valid": true}}"#,
        )
        .create_async()
        .await;

    let mut d = ResourceData::for_create(object(json!({
        "owner": "acme",
        "repository": "widgets",
        "development": [{"name": "develop"}],
        "production": [{"use_mainbranch": true, "enabled": true}]
    })));
    BranchingModelResource.create(&client(&server), &mut d).await.unwrap();

    settings.assert_async().await;
    read.assert_async().await;
    assert_eq!(d.id(), "acme/widgets");
    assert_eq!(d.get_list("development")[0]["is_valid"], json!(true));
    assert_eq!(d.get_list("production")[0]["name"], json!("main"));
    assert_eq!(d.get_list("production")[0]["enabled"], json!(true));
}

#[tokio::test]
async fn test_branching_model_missing_repository_clears_id() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/gone/branching-model")
        .with_status(404)
        .create_async()
        .await;

    let mut d = ResourceData::from_state(
        "acme/gone",
        object(json!({"owner": "acme", "repository": "gone"})),
    );
    BranchingModelResource.read(&client(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "");
}

#[tokio::test]
async fn test_branching_model_delete_resets_settings() {
    let mut server = Server::new_async().await;
    let reset = server
        .mock("PUT", "/2.0/repositories/acme/widgets/branching-model/settings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let mut d = ResourceData::from_state(
        "acme/widgets",
        object(json!({"owner": "acme", "repository": "widgets"})),
    );
    BranchingModelResource.delete(&client(&server), &mut d).await.unwrap();
    reset.assert_async().await;
}
