// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use harvestrs::config::settings::Settings;
use harvestrs::domain::services::job_orchestrator::JobOrchestrator;
use harvestrs::domain::services::llm_service::LLMService;
use harvestrs::domain::services::recipe_importer::RecipeImporter;
use harvestrs::domain::services::recipe_parser::{FallbackRecipeParser, JsonLdRecipeParser};
use harvestrs::domain::services::url_discoverer::UrlDiscoverer;
use harvestrs::engines::reqwest_engine::ReqwestEngine;
use harvestrs::infrastructure::database::{connection, seed};
use harvestrs::infrastructure::repositories::master_recipe_repo_impl::MasterRecipeRepositoryImpl;
use harvestrs::infrastructure::repositories::scraping_job_repo_impl::ScrapingJobRepositoryImpl;
use harvestrs::infrastructure::repositories::source_site_repo_impl::SourceSiteRepositoryImpl;
use harvestrs::presentation::routes;
use harvestrs::utils::retry_policy::RetryPolicy;
use harvestrs::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动管理接口
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting harvestrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database and apply migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 4. Repositories
    let site_repo = Arc::new(SourceSiteRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(ScrapingJobRepositoryImpl::new(db.clone()));
    let recipe_repo = Arc::new(MasterRecipeRepositoryImpl::new(db.clone()));

    let seeded = seed::seed_source_sites(site_repo.as_ref(), &settings.sites).await?;
    info!("Seeded {} source sites", seeded);

    // 5. Pipeline services
    let scraping = &settings.scraping;
    let engine = Arc::new(ReqwestEngine::from_settings(scraping)?);

    let discoverer = Arc::new(UrlDiscoverer::new(
        engine.clone(),
        RetryPolicy::new(scraping.retry_attempts, scraping.retry_base_delay()),
        scraping.fetch_timeout(),
    ));

    let llm = Arc::new(LLMService::new(&settings.llm)?);
    if !llm.is_configured() {
        warn!("LLM API key not set; pages without JSON-LD will fail to import");
    }
    let parser = Arc::new(FallbackRecipeParser::new(
        Arc::new(JsonLdRecipeParser::new()),
        llm.clone(),
    ));

    let importer = Arc::new(
        RecipeImporter::new(engine, parser, recipe_repo, scraping.fetch_timeout())
            .with_estimator(llm),
    );

    let orchestrator = Arc::new(JobOrchestrator::new(
        site_repo, job_repo, discoverer, importer,
    ));

    // 6. Start HTTP server
    let app = routes::app(orchestrator, settings.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
