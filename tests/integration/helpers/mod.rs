// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use harvestrs::config::settings::Settings;
use harvestrs::domain::models::scraping_job::ScrapingJob;
use harvestrs::domain::models::source_site::SourceSite;
use harvestrs::domain::repositories::source_site_repository::SourceSiteRepository;
use harvestrs::domain::services::job_orchestrator::JobOrchestrator;
use harvestrs::domain::services::recipe_importer::RecipeImporter;
use harvestrs::domain::services::recipe_parser::JsonLdRecipeParser;
use harvestrs::domain::services::url_discoverer::UrlDiscoverer;
use harvestrs::engines::reqwest_engine::ReqwestEngine;
use harvestrs::infrastructure::database::connection;
use harvestrs::infrastructure::repositories::master_recipe_repo_impl::MasterRecipeRepositoryImpl;
use harvestrs::infrastructure::repositories::scraping_job_repo_impl::ScrapingJobRepositoryImpl;
use harvestrs::infrastructure::repositories::source_site_repo_impl::SourceSiteRepositoryImpl;
use harvestrs::presentation::routes;
use harvestrs::utils::retry_policy::RetryPolicy;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub site_server: MockServer,
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<JobOrchestrator>,
    pub importer: Arc<RecipeImporter>,
    pub site_repo: Arc<SourceSiteRepositoryImpl>,
    pub job_repo: Arc<ScrapingJobRepositoryImpl>,
    pub recipe_repo: Arc<MasterRecipeRepositoryImpl>,
}

/// 测试配置：内存数据库，所有节奏延迟为零
pub fn test_settings() -> Settings {
    Settings::builder()
        .unwrap()
        .set_override("database.url", "sqlite::memory:")
        .unwrap()
        .set_override("scraping.delay_between_pages_ms", 0)
        .unwrap()
        .set_override("scraping.delay_between_urls_ms", 0)
        .unwrap()
        .set_override("scraping.delay_between_categories_ms", 0)
        .unwrap()
        .set_override("scraping.retry_base_delay_ms", 1)
        .unwrap()
        .set_override("scraping.fetch_timeout_secs", 5)
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

pub async fn create_test_app() -> TestApp {
    let settings = Arc::new(test_settings());
    let db = Arc::new(
        connection::connect_and_migrate(&settings.database)
            .await
            .expect("Failed to prepare database"),
    );

    let site_repo = Arc::new(SourceSiteRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(ScrapingJobRepositoryImpl::new(db.clone()));
    let recipe_repo = Arc::new(MasterRecipeRepositoryImpl::new(db));

    let engine = Arc::new(ReqwestEngine::from_settings(&settings.scraping).unwrap());
    let discoverer = Arc::new(UrlDiscoverer::new(
        engine.clone(),
        RetryPolicy::new(
            settings.scraping.retry_attempts,
            settings.scraping.retry_base_delay(),
        ),
        settings.scraping.fetch_timeout(),
    ));
    let importer = Arc::new(RecipeImporter::new(
        engine,
        Arc::new(JsonLdRecipeParser::new()),
        recipe_repo.clone(),
        settings.scraping.fetch_timeout(),
    ));
    let orchestrator = Arc::new(JobOrchestrator::new(
        site_repo.clone(),
        job_repo.clone(),
        discoverer,
        importer.clone(),
    ));

    let server = TestServer::new(routes::app(orchestrator.clone(), settings.clone()))
        .expect("Failed to start test server");

    TestApp {
        server,
        site_server: MockServer::start().await,
        settings,
        orchestrator,
        importer,
        site_repo,
        job_repo,
        recipe_repo,
    }
}

impl TestApp {
    /// 注册一个指向模拟站点的来源站点
    pub async fn seed_site(&self, name: &str, categories: &[&str]) -> SourceSite {
        let base = self.site_server.uri();
        let site = SourceSite::new(
            name,
            name,
            base.as_str(),
            format!("{}/search?q={{query}}&page={{page}}", base),
            categories.iter().map(|c| c.to_string()).collect(),
        );
        self.site_repo.upsert_by_name(&site).await.unwrap()
    }

    /// 模拟站点的搜索结果页
    pub async fn mount_search(&self, query: &str, links: &[&str]) {
        let anchors: Vec<String> = links
            .iter()
            .map(|l| format!(r#"<a href="{}">recipe</a>"#, l))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", query))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", anchors.join(""))),
            )
            .mount(&self.site_server)
            .await;
    }

    /// 模拟带 JSON-LD 的食谱页
    pub async fn mount_recipe(&self, recipe_path: &str, name: &str, ingredients: &[&str]) {
        let ld = json!({
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": name,
            "description": format!("A reliable {}", name.to_lowercase()),
            "image": "https://img.example.com/recipe.jpg",
            "recipeYield": "4 servings",
            "prepTime": "PT15M",
            "cookTime": "PT45M",
            "recipeCuisine": "British",
            "recipeCategory": "Dinner",
            "recipeIngredient": ingredients,
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Prepare the filling."},
                {"@type": "HowToStep", "text": "Bake until golden."}
            ],
            "nutrition": {
                "@type": "NutritionInformation",
                "calories": "420 kcal",
                "proteinContent": "18 g",
                "carbohydrateContent": "40 g",
                "fatContent": "20 g"
            }
        });
        Mock::given(method("GET"))
            .and(path(recipe_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<html><head><script type="application/ld+json">{}</script></head><body></body></html>"#,
                ld
            )))
            .mount(&self.site_server)
            .await;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.site_server.uri(), path)
    }

    /// 轮询任务直到进入终态
    pub async fn wait_for_job(&self, job_id: &str) -> serde_json::Value {
        for _ in 0..100 {
            let body: serde_json::Value = self
                .server
                .get(&format!("/v1/jobs/{}", job_id))
                .await
                .json();
            if matches!(body["status"].as_str(), Some("completed") | Some("failed")) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("Job {} did not finish in time", job_id);
    }

    /// 直接写入一条待处理任务
    pub async fn insert_pending_job(&self) -> ScrapingJob {
        use harvestrs::domain::repositories::scraping_job_repository::ScrapingJobRepository;
        self.job_repo
            .create(&ScrapingJob::new(None, None))
            .await
            .unwrap()
    }
}
