// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use harvestrs::domain::models::allergen::AllergenCategory;
use harvestrs::domain::models::master_recipe::NutritionSource;
use harvestrs::domain::repositories::master_recipe_repository::MasterRecipeRepository;
use harvestrs::domain::services::recipe_importer::ALREADY_IMPORTED;
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// 同一URL导入两次：第二次跳过，数据库中只有一条记录
#[tokio::test]
async fn test_import_is_idempotent_per_source_url() {
    let app = create_test_app().await;
    let site = app.seed_site("bakes", &["pancake"]).await;
    app.mount_recipe(
        "/recipes/pancakes",
        "Pancakes",
        &["4 large eggs", "200ml whole milk", "300g plain flour"],
    )
    .await;
    let url = app.url("/recipes/pancakes");

    let first = app.importer.import_url(&url, &site).await;
    assert!(first.success);
    assert!(!first.skipped);
    let recipe_id = first.recipe_id.unwrap();

    let second = app.importer.import_url(&url, &site).await;
    assert!(second.success);
    assert!(second.skipped);
    assert_eq!(second.reason.as_deref(), Some(ALREADY_IMPORTED));
    assert!(second.recipe_id.is_none());

    assert_eq!(app.recipe_repo.count_by_site(site.id).await.unwrap(), 1);

    let stored = app.recipe_repo.find_by_id(recipe_id).await.unwrap().unwrap();
    assert_eq!(stored.source_url, url);
    assert_eq!(stored.name, "Pancakes");
    assert_eq!(stored.servings, Some(4));
    assert_eq!(stored.total_time_minutes, Some(60));
    assert_eq!(stored.nutrition.calories, Some(420.0));
    assert_eq!(stored.nutrition_source, NutritionSource::SourceSite);
    assert_eq!(
        stored.allergens,
        BTreeSet::from([
            AllergenCategory::Dairy,
            AllergenCategory::Eggs,
            AllergenCategory::Gluten
        ])
    );
    assert_eq!(stored.quality_score, 90);
    assert!(stored.is_active);
    assert_eq!(stored.instructions.len(), 2);
    assert_eq!(stored.instructions[1].step, 2);
}

/// 通过管理接口连续运行两次采集：第二次全部跳过
#[tokio::test]
async fn test_repeated_jobs_only_import_new_recipes() {
    let app = create_test_app().await;
    let site = app.seed_site("bakes", &["pie", "tart"]).await;
    app.mount_search("pie", &["/recipes/apple-pie", "/recipes/collection/pies"])
        .await;
    app.mount_search("tart", &["/recipes/lemon-tart", "/recipes/apple-pie"])
        .await;
    app.mount_recipe("/recipes/apple-pie", "Apple Pie", &["4 apples", "1 lemon"])
        .await;
    app.mount_recipe(
        "/recipes/lemon-tart",
        "Lemon Tart",
        &["3 lemons", "150g butter", "200g sweet pastry"],
    )
    .await;

    let first: Value = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "site_name": "bakes" }))
        .await
        .json();
    let first = app.wait_for_job(first["id"].as_str().unwrap()).await;

    assert_eq!(first["status"], "completed");
    assert_eq!(first["urls_discovered"], 3);
    assert_eq!(first["urls_processed"], 3);
    assert_eq!(first["urls_succeeded"], 2);
    assert_eq!(first["urls_skipped"], 1);
    assert_eq!(first["urls_failed"], 0);
    assert_eq!(app.recipe_repo.count_by_site(site.id).await.unwrap(), 2);

    let response = app
        .server
        .post("/v1/jobs")
        .json(&json!({ "site_name": "bakes", "category": "tart" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let second: Value = response.json();
    assert_eq!(second["category"], "tart");
    let second = app.wait_for_job(second["id"].as_str().unwrap()).await;

    assert_eq!(second["status"], "completed");
    assert_eq!(second["urls_discovered"], 2);
    assert_eq!(second["urls_succeeded"], 0);
    assert_eq!(second["urls_skipped"], 2);
    assert_eq!(app.recipe_repo.count_by_site(site.id).await.unwrap(), 2);

    let listed: Value = app
        .server
        .get("/v1/jobs")
        .add_query_param("status", "completed")
        .await
        .json();
    assert_eq!(listed["total"], 2);
}

/// 缺少配料的页面计为失败，错误写入任务日志
#[tokio::test]
async fn test_broken_recipe_is_logged_on_the_job() {
    let app = create_test_app().await;
    app.seed_site("bakes", &["soup"]).await;
    app.mount_search("soup", &["/recipes/empty-soup"]).await;
    app.mount_recipe("/recipes/empty-soup", "Empty Soup", &[]).await;

    let created: Value = app
        .server
        .post("/v1/jobs")
        .json(&json!({}))
        .await
        .json();
    let finished = app.wait_for_job(created["id"].as_str().unwrap()).await;

    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["urls_failed"], 1);
    let errors = finished["error_log"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        format!("{}: Missing ingredients", app.url("/recipes/empty-soup"))
    );
}
