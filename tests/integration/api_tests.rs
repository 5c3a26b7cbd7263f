// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use harvestrs::domain::models::scraping_job::JobStatus;
use harvestrs::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use serde_json::{json, Value};
use uuid::Uuid;

/// 健康检查和版本端点无需任何依赖即可访问
#[tokio::test]
async fn test_health_and_version() {
    let app = create_test_app().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let version = app.server.get("/v1/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

/// 创建任务立即返回 202，任务在后台运行至完成
#[tokio::test]
async fn test_create_job_runs_in_background() {
    let app = create_test_app().await;
    app.seed_site("bakes", &["pie"]).await;
    app.mount_search("pie", &["/recipes/apple-pie"]).await;
    app.mount_recipe("/recipes/apple-pie", "Apple Pie", &["4 apples", "300g shortcrust pastry"])
        .await;

    let response = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "site_name": "bakes", "max_pages_per_category": 1 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let created: Value = response.json();
    let job_id = created["id"].as_str().unwrap().to_string();
    assert!(created["site_id"].is_string());

    let finished = app.wait_for_job(&job_id).await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["urls_discovered"], 1);
    assert_eq!(finished["urls_succeeded"], 1);
    assert!(finished["completed_at"].is_string());
}

#[tokio::test]
async fn test_create_job_for_unknown_site_is_not_found() {
    let app = create_test_app().await;
    app.seed_site("bakes", &["pie"]).await;

    let response = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "site_name": "missing" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let (jobs, total) = app.job_repo.list(None, 10, 0).await.unwrap();
    assert!(jobs.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_create_job_without_active_sites_is_rejected() {
    let app = create_test_app().await;

    let response = app.server.post("/v1/jobs").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_job_rejects_invalid_payloads() {
    let app = create_test_app().await;
    app.seed_site("bakes", &["pie"]).await;

    let malformed = app.server.post("/v1/jobs").text("{not json").await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    let out_of_range = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "max_pages_per_category": 0 }))
        .await;
    assert_eq!(out_of_range.status_code(), StatusCode::BAD_REQUEST);

    let empty_category = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "category": "" }))
        .await;
    assert_eq!(empty_category.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_job_is_not_found() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/v1/jobs/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_jobs_filters_by_status() {
    let app = create_test_app().await;
    let pending = app.insert_pending_job().await;
    let cancelled = app.insert_pending_job().await;
    app.job_repo.cancel(cancelled.id, "test").await.unwrap();

    let all: Value = app.server.get("/v1/jobs").await.json();
    assert_eq!(all["total"], 2);
    assert_eq!(all["jobs"].as_array().unwrap().len(), 2);

    let response = app
        .server
        .get("/v1/jobs")
        .add_query_param("status", "pending")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["jobs"][0]["id"], pending.id.to_string());

    let page: Value = app
        .server
        .get("/v1/jobs")
        .add_query_param("limit", 1)
        .add_query_param("offset", 1)
        .await
        .json();
    assert_eq!(page["total"], 2);
    assert_eq!(page["jobs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_jobs_rejects_bad_queries() {
    let app = create_test_app().await;

    let bad_status = app
        .server
        .get("/v1/jobs")
        .add_query_param("status", "cancelled")
        .await;
    assert_eq!(bad_status.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = bad_status.json();
    assert!(body["error"].as_str().unwrap().contains("cancelled"));

    let bad_limit = app
        .server
        .get("/v1/jobs")
        .add_query_param("limit", 0)
        .await;
    assert_eq!(bad_limit.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_job_transitions() {
    let app = create_test_app().await;
    let job = app.insert_pending_job().await;

    let cancelled = app
        .server
        .delete(&format!("/v1/jobs/{}", job.id))
        .await;
    assert_eq!(cancelled.status_code(), StatusCode::NO_CONTENT);

    let stored = app.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.completed_at.is_some());

    let again = app
        .server
        .delete(&format!("/v1/jobs/{}", job.id))
        .await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);

    let unknown = app
        .server
        .delete(&format!("/v1/jobs/{}", Uuid::new_v4()))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}
