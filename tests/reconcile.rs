//
//  bitbucket-provider
//  tests/reconcile.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan, apply, import and destroy against a mock Bitbucket API.

mod common;

use bitbucket_provider::reconcile::{apply, destroy, import, plan, validate, Action, Manifest};
use bitbucket_provider::resource::ProviderError;
use bitbucket_provider::state::{ResourceState, StateFile};
use mockito::{Matcher, Server};
use serde_json::json;

use common::{object, provider};

const MANIFEST: &str = r#"
[[resource]]
type = "bitbucket_project"
name = "core"
config = { owner = "acme", key = "CORE", name = "Core" }
"#;

fn project_body(name: &str) -> String {
    json!({"key": "CORE", "uuid": "{p-1}", "name": name, "is_private": true}).to_string()
}

fn managed_project(name: &str) -> ResourceState {
    ResourceState {
        type_name: "bitbucket_project".into(),
        name: "core".into(),
        id: "acme/CORE".into(),
        attributes: object(json!({
            "owner": "acme",
            "key": "CORE",
            "name": name,
            "is_private": true,
            "description": "",
            "uuid": "{p-1}"
        })),
    }
}

#[tokio::test]
async fn test_plan_and_apply_create() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/2.0/workspaces/acme/projects")
        .match_body(Matcher::PartialJson(json!({"key": "CORE", "is_private": true})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut state = StateFile::new();

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.changes[0].action, Action::Create);
    assert_eq!(plan.counts(), (1, 0, 0));

    let mut saves = 0;
    let summary = apply(&provider, &plan, &mut state, |_| {
        saves += 1;
        Ok(())
    })
    .await
    .unwrap();

    create.assert_async().await;
    assert_eq!(summary.added, 1);
    assert_eq!(saves, 1);
    let entry = state.find("bitbucket_project.core").unwrap();
    assert_eq!(entry.id, "acme/CORE");
    assert_eq!(entry.attributes["uuid"], json!("{p-1}"));
}

#[tokio::test]
async fn test_plan_is_noop_when_remote_matches() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert!(!plan.has_changes());
}

#[tokio::test]
async fn test_drift_is_planned_as_update() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Renamed by hand"))
        .expect_at_least(1)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/2.0/workspaces/acme/projects/CORE")
        .match_body(Matcher::PartialJson(json!({"name": "Core"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    match &plan.changes[0].action {
        Action::Update { changed } => {
            assert_eq!(changed.len(), 1);
            assert_eq!(changed[0].name, "name");
            assert_eq!(changed[0].old, json!("Renamed by hand"));
        }
        other => panic!("expected update, got {:?}", other),
    }

    let summary = apply(&provider, &plan, &mut state, |_| Ok(())).await.unwrap();
    update.assert_async().await;
    assert_eq!(summary.changed, 1);
}

#[tokio::test]
async fn test_remote_deletion_is_dropped_and_recreated() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(404)
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert_eq!(plan.dropped, vec!["bitbucket_project.core".to_string()]);
    assert_eq!(plan.changes[0].action, Action::Create);
    assert!(state.find("bitbucket_project.core").is_none());
}

#[tokio::test]
async fn test_removed_block_is_deleted() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/2.0/workspaces/acme/projects/CORE")
        .with_status(204)
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse("").unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert_eq!(plan.changes[0].action, Action::Delete);

    let summary = apply(&provider, &plan, &mut state, |_| Ok(())).await.unwrap();
    delete.assert_async().await;
    assert_eq!(summary.destroyed, 1);
    assert!(state.resources.is_empty());
}

#[tokio::test]
async fn test_failed_step_keeps_completed_work() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2.0/workspaces/acme/projects")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_body("Core"))
        .create_async()
        .await;
    server
        .mock("POST", "/2.0/repositories/acme/widgets")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "error", "error": {"message": "Repository with this Slug and Owner already exists."}}"#)
        .create_async()
        .await;

    let manifest = Manifest::parse(
        r#"
[[resource]]
type = "bitbucket_project"
name = "core"
config = { owner = "acme", key = "CORE", name = "Core" }

[[resource]]
type = "bitbucket_repository"
name = "widgets"
config = { owner = "acme", name = "widgets", project_key = "CORE" }
"#,
    )
    .unwrap();

    let provider = provider(&server);
    let mut state = StateFile::new();
    let plan = plan(&provider, &manifest, &mut state).await.unwrap();

    let mut persisted = Vec::new();
    let err = apply(&provider, &plan, &mut state, |s| {
        persisted.push(s.resources.len());
        Ok(())
    })
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("already exists"));
    assert_eq!(persisted, vec![1]);
    assert!(state.find("bitbucket_project.core").is_some());
    assert!(state.find("bitbucket_repository.widgets").is_none());
}

#[tokio::test]
async fn test_validation_reports_every_error() {
    let server = Server::new_async().await;
    let manifest = Manifest::parse(
        r#"
[[resource]]
type = "bitbucket_project"
name = "core"
config = { owner = "acme", colour = "blue" }

[[resource]]
type = "bitbucket_repository"
name = "widgets"
config = { owner = "acme", name = "widgets", fork_policy = "sometimes" }
"#,
    )
    .unwrap();

    let err = validate(&provider(&server), &manifest).unwrap_err();
    let Some(ProviderError::Schema(errors)) = err.downcast_ref::<ProviderError>() else {
        panic!("expected schema errors, got {:#}", err);
    };
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();

    assert!(messages.iter().any(|m| m.starts_with("bitbucket_project.core.key")));
    assert!(messages.iter().any(|m| m.starts_with("bitbucket_project.core.colour")));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("bitbucket_repository.widgets.fork_policy")));
}

#[tokio::test]
async fn test_import_then_plan_is_clean() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets/hooks/%7Bh-1%7D")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"uuid": "{h-1}", "url": "https://ci.example.com/hook", "description": "CI",
                "active": true, "skip_cert_verification": true, "history_enabled": false,
                "events": ["repo:push"]}"#,
        )
        .expect_at_least(1)
        .create_async()
        .await;

    let manifest = Manifest::parse(
        r#"
[[resource]]
type = "bitbucket_hook"
name = "ci"

[resource.config]
owner = "acme"
repository = "widgets"
url = "https://ci.example.com/hook"
description = "CI"
events = ["repo:push"]
"#,
    )
    .unwrap();

    let provider = provider(&server);
    let mut state = StateFile::new();
    let entry = import(&provider, &manifest, &mut state, "bitbucket_hook.ci", "acme/widgets/{h-1}")
        .await
        .unwrap();

    assert_eq!(entry.id, "{h-1}");
    assert_eq!(entry.attributes["owner"], json!("acme"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert!(!plan.has_changes(), "unexpected changes: {:?}", plan.changes);
}

#[tokio::test]
async fn test_import_of_missing_object_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/GONE")
        .with_status(404)
        .create_async()
        .await;

    let manifest = Manifest::parse(
        r#"
[[resource]]
type = "bitbucket_project"
name = "gone"
config = { owner = "acme", key = "GONE", name = "Gone" }
"#,
    )
    .unwrap();

    let mut state = StateFile::new();
    let err = import(&provider(&server), &manifest, &mut state, "bitbucket_project.gone", "acme/GONE")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "cannot import non-existent remote object");
    assert!(state.resources.is_empty());
}

#[tokio::test]
async fn test_import_requires_manifest_block() {
    let server = Server::new_async().await;
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut state = StateFile::new();

    let err = import(&provider(&server), &manifest, &mut state, "bitbucket_project.other", "acme/X")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not declared in the manifest"));
}

#[tokio::test]
async fn test_destroy_deletes_newest_first() {
    let mut server = Server::new_async().await;
    let repo = server
        .mock("DELETE", "/2.0/repositories/acme/widgets")
        .with_status(204)
        .create_async()
        .await;
    let project = server
        .mock("DELETE", "/2.0/workspaces/acme/projects/CORE")
        .with_status(204)
        .create_async()
        .await;

    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));
    state.upsert(ResourceState {
        type_name: "bitbucket_repository".into(),
        name: "widgets".into(),
        id: "acme/widgets".into(),
        attributes: object(json!({"owner": "acme", "name": "widgets"})),
    });

    let mut remaining = Vec::new();
    let summary = destroy(&provider(&server), &mut state, |s| {
        remaining.push(s.resources.iter().map(|r| r.address()).collect::<Vec<_>>());
        Ok(())
    })
    .await
    .unwrap();

    repo.assert_async().await;
    project.assert_async().await;
    assert_eq!(summary.destroyed, 2);
    assert_eq!(
        remaining,
        vec![vec!["bitbucket_project.core".to_string()], Vec::new()]
    );
}

#[tokio::test]
async fn test_imported_repository_without_project_key_plans_clean() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/repositories/acme/widgets")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"uuid": "{r-1}", "name": "widgets", "slug": "widgets", "scm": "git",
                "is_private": true, "fork_policy": "allow_forks", "project": {"key": "PROJ"}}"#,
        )
        .expect_at_least(2)
        .create_async()
        .await;

    let manifest = Manifest::parse(
        r#"
[[resource]]
type = "bitbucket_repository"
name = "w"
config = { owner = "acme", name = "widgets" }
"#,
    )
    .unwrap();

    let provider = provider(&server);
    let mut state = StateFile::new();
    let entry = import(&provider, &manifest, &mut state, "bitbucket_repository.w", "acme/widgets")
        .await
        .unwrap();
    assert_eq!(entry.attributes["project_key"], json!("PROJ"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert!(!plan.has_changes(), "unexpected changes: {:?}", plan.changes);
}

const AVATAR_MANIFEST: &str = r#"
[[resource]]
type = "bitbucket_project"
name = "core"

[resource.config]
owner = "acme"
key = "CORE"
name = "Core"
link = [{ avatar = [{ href = "https://example.com/logo.png" }] }]
"#;

fn project_with_avatar(href: &str) -> String {
    json!({
        "key": "CORE",
        "uuid": "{p-1}",
        "name": "Core",
        "is_private": true,
        "links": {"avatar": {"href": href}}
    })
    .to_string()
}

#[tokio::test]
async fn test_generated_avatar_link_is_not_drift() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_with_avatar(
            "https://bitbucket.org/account/user/acme/projects/CORE/avatar/32",
        ))
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(AVATAR_MANIFEST).unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert!(!plan.has_changes(), "unexpected changes: {:?}", plan.changes);
}

#[tokio::test]
async fn test_custom_avatar_link_change_is_planned() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/2.0/workspaces/acme/projects/CORE")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_with_avatar("https://cdn.example.com/old.png"))
        .create_async()
        .await;

    let provider = provider(&server);
    let manifest = Manifest::parse(AVATAR_MANIFEST).unwrap();
    let mut state = StateFile::new();
    state.upsert(managed_project("Core"));

    let plan = plan(&provider, &manifest, &mut state).await.unwrap();
    assert_eq!(plan.changes.len(), 1);
    match &plan.changes[0].action {
        Action::Update { changed } => {
            assert_eq!(changed.len(), 1);
            assert_eq!(changed[0].name, "link");
        }
        other => panic!("expected an update, got {:?}", other),
    }
}
