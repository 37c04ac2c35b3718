/// Integration tests for the sprint endpoints

mod common;

use axum::http::StatusCode;
use common::{TestContext, TestUser};
use serde_json::{json, Value};

async fn seed(ctx: &TestContext) -> (TestUser, Value) {
    let owner = ctx.signup("owner").await;
    ctx.create_team(&owner, "t1", &["owner"]).await;
    let project = ctx.create_project(&owner, "apollo", &["t1"]).await;
    (owner, project)
}

fn sprint_body(name: &str, project: &str, start: &str, end: &str) -> Value {
    json!({
        "sprint_name": name,
        "project_name": project,
        "start_date": start,
        "end_date": end,
        "description": "iteration",
    })
}

#[tokio::test]
async fn test_create_and_read_sprint() {
    let ctx = TestContext::new().await;
    let (owner, project) = seed(&ctx).await;

    let created = ctx
        .post(
            "/sprints",
            Some(&owner.token),
            sprint_body("s1", "apollo", "2024-05-01", "2024-05-14"),
        )
        .await;

    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["sprint_name"], "s1");
    assert_eq!(created.body["project_name"], "apollo");
    assert_eq!(created.body["project_id"], project["id"]);
    assert_eq!(created.body["start_date"], "2024-05-01");
    assert_eq!(created.body["end_date"], "2024-05-14");

    let fetched = ctx
        .get(&format!("/sprints/{}", created.body["id"]), Some(&owner.token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn test_create_sprint_errors() {
    let ctx = TestContext::new().await;
    let (owner, _) = seed(&ctx).await;

    let backwards = ctx
        .post(
            "/sprints",
            Some(&owner.token),
            sprint_body("s1", "apollo", "2024-05-14", "2024-05-01"),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(backwards.body["fields"][0]["field"], "end_date");

    let unknown = ctx
        .post(
            "/sprints",
            Some(&owner.token),
            sprint_body("s1", "gemini", "2024-05-01", "2024-05-14"),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["detail"], "Project not found");

    let bad_date = ctx
        .post(
            "/sprints",
            Some(&owner.token),
            sprint_body("s1", "apollo", "May 1st", "2024-05-14"),
        )
        .await;
    assert_eq!(bad_date.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_sprints() {
    let ctx = TestContext::new().await;
    let (owner, project) = seed(&ctx).await;

    for (name, start, end) in [("late", "2024-06-01", "2024-06-14"), ("early", "2024-05-01", "2024-05-14")] {
        let response = ctx
            .post("/sprints", Some(&owner.token), sprint_body(name, "apollo", start, end))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let all = ctx.get("/sprints", Some(&owner.token)).await;
    let names: Vec<_> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["sprint_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["early", "late"]);

    let by_project = ctx
        .get(&format!("/sprints?project_id={}", project["id"]), Some(&owner.token))
        .await;
    assert_eq!(by_project.body.as_array().unwrap().len(), 2);

    let other = ctx.get("/sprints?project_id=999", Some(&owner.token)).await;
    assert_eq!(other.status, StatusCode::OK);
    assert_eq!(other.body, json!([]));
}

#[tokio::test]
async fn test_delete_sprint() {
    let ctx = TestContext::new().await;
    let (owner, _) = seed(&ctx).await;
    let other = ctx.signup("other").await;

    let created = ctx
        .post(
            "/sprints",
            Some(&owner.token),
            sprint_body("s1", "apollo", "2024-05-01", "2024-05-14"),
        )
        .await;
    let uri = format!("/sprints/{}", created.body["id"]);

    let forbidden = ctx.delete(&uri, &other.token).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let deleted = ctx.delete(&uri, &owner.token).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = ctx.get(&uri, Some(&owner.token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["detail"], "Sprint not found");
}
