// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapingSettings;
use crate::domain::models::scraping_job::{JobProgress, JobStatus, ScrapingJob, ScrapingJobResult};
use crate::domain::models::source_site::SourceSite;
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::repositories::source_site_repository::SourceSiteRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::recipe_importer::RecipeImporter;
use crate::domain::services::url_discoverer::UrlDiscoverer;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 用户取消任务时写入错误日志的原因
pub const CANCELLED_BY_USER: &str = "Cancelled by user";

/// 编排错误
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Unknown source site: {0}")]
    UnknownSite(String),
    #[error("No active source sites to scrape")]
    NoActiveSites,
    #[error("Scraping job not found: {0}")]
    JobNotFound(Uuid),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 一次采集运行的参数
#[derive(Debug, Clone, PartialEq)]
pub struct JobOptions {
    /// 只采集该名称的站点
    pub site_name: Option<String>,
    /// 只采集该分类；为空时遍历站点的全部分类
    pub category: Option<String>,
    pub max_pages_per_category: u32,
    pub delay_between_pages: Duration,
    pub delay_between_urls: Duration,
    pub delay_between_categories: Duration,
}

impl JobOptions {
    /// 以配置中的节奏参数构建运行参数
    pub fn from_settings(settings: &ScrapingSettings) -> Self {
        Self {
            site_name: None,
            category: None,
            max_pages_per_category: settings.max_pages_per_category,
            delay_between_pages: Duration::from_millis(settings.delay_between_pages_ms),
            delay_between_urls: Duration::from_millis(settings.delay_between_urls_ms),
            delay_between_categories: Duration::from_millis(settings.delay_between_categories_ms),
        }
    }
}

/// 已创建但尚未执行的任务
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub job: ScrapingJob,
    pub sites: Vec<SourceSite>,
}

enum SweepOutcome {
    Finished,
    Cancelled,
}

/// 站点与分类的遍历计划：先站点，再每个站点的分类
fn sweep_plan<'a>(
    sites: &'a [SourceSite],
    category: Option<&'a str>,
) -> impl Iterator<Item = (&'a SourceSite, Vec<&'a str>)> + 'a {
    sites.iter().map(move |site| {
        let categories = match category {
            Some(c) => vec![c],
            None => site.categories.iter().map(String::as_str).collect(),
        };
        (site, categories)
    })
}

/// 任务编排器
///
/// 顺序遍历站点 × 分类，发现URL后逐个导入，并在检查点持久化进度。
/// 同一时刻只处理一个站点、一个分类、一个URL。
pub struct JobOrchestrator {
    sites: Arc<dyn SourceSiteRepository>,
    jobs: Arc<dyn ScrapingJobRepository>,
    discoverer: Arc<UrlDiscoverer>,
    importer: Arc<RecipeImporter>,
}

impl JobOrchestrator {
    pub fn new(
        sites: Arc<dyn SourceSiteRepository>,
        jobs: Arc<dyn ScrapingJobRepository>,
        discoverer: Arc<UrlDiscoverer>,
        importer: Arc<RecipeImporter>,
    ) -> Self {
        Self {
            sites,
            jobs,
            discoverer,
            importer,
        }
    }

    /// 运行一次完整的采集任务
    ///
    /// # 参数
    ///
    /// * `options` - 站点/分类过滤和节奏参数
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapingJobResult)` - 任务的最终状态和计数
    /// * `Err(OrchestratorError::UnknownSite)` - 站点过滤无法解析，未创建任务
    /// * `Err(OrchestratorError::NoActiveSites)` - 没有可采集的站点，未创建任务
    pub async fn run_job(&self, options: &JobOptions) -> Result<ScrapingJobResult, OrchestratorError> {
        let prepared = self.prepare_job(options).await?;
        self.execute(prepared, options).await
    }

    /// 解析过滤条件并创建待处理任务
    ///
    /// 配置错误在创建任务记录之前返回。
    pub async fn prepare_job(&self, options: &JobOptions) -> Result<PreparedJob, OrchestratorError> {
        let site_id = match options.site_name.as_deref() {
            Some(name) => {
                let site = self
                    .sites
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| OrchestratorError::UnknownSite(name.to_string()))?;
                Some(site.id)
            }
            None => None,
        };

        let sites = self.sites.find_active(site_id).await?;
        if sites.is_empty() {
            return Err(OrchestratorError::NoActiveSites);
        }

        let job = self
            .jobs
            .create(&ScrapingJob::new(site_id, options.category.clone()))
            .await?;
        info!(job_id = %job.id, sites = sites.len(), "Scraping job created");

        Ok(PreparedJob { job, sites })
    }

    /// 执行已创建的任务直到结束或被取消
    #[instrument(skip(self, prepared, options), fields(job_id = %prepared.job.id))]
    pub async fn execute(
        &self,
        prepared: PreparedJob,
        options: &JobOptions,
    ) -> Result<ScrapingJobResult, OrchestratorError> {
        let job_id = prepared.job.id;
        if !self.jobs.mark_running(job_id).await? {
            warn!("Job is no longer pending, not starting");
            let job = self.get_job_status(job_id).await?;
            return Ok(ScrapingJobResult::from_job(job, true));
        }

        let mut progress = JobProgress::default();
        let cancelled = match self.sweep(job_id, &prepared.sites, options, &mut progress).await {
            Ok(SweepOutcome::Finished) => {
                !self.jobs.finalize(job_id, JobStatus::Completed, &progress).await?
            }
            Ok(SweepOutcome::Cancelled) => true,
            Err(e) => {
                warn!(error = %e, "Scraping job failed");
                progress.push_terminal_error(e.to_string());
                !self.jobs.finalize(job_id, JobStatus::Failed, &progress).await?
            }
        };

        let job = self.get_job_status(job_id).await?;
        info!(
            status = %job.status,
            cancelled,
            processed = job.urls_processed,
            succeeded = job.urls_succeeded,
            failed = job.urls_failed,
            skipped = job.urls_skipped,
            "Scraping job finished"
        );
        Ok(ScrapingJobResult::from_job(job, cancelled))
    }

    async fn sweep(
        &self,
        job_id: Uuid,
        sites: &[SourceSite],
        options: &JobOptions,
        progress: &mut JobProgress,
    ) -> Result<SweepOutcome, OrchestratorError> {
        let plan: Vec<_> = sweep_plan(sites, options.category.as_deref()).collect();
        let last = plan.len().saturating_sub(1);

        for (index, (site, categories)) in plan.into_iter().enumerate() {
            for category in categories {
                let outcome = self
                    .process_category(job_id, site, category, options, progress)
                    .await?;
                if let SweepOutcome::Cancelled = outcome {
                    return Ok(outcome);
                }
            }

            self.sites.touch_last_scraped(site.id).await?;
            if index < last && !options.delay_between_categories.is_zero() {
                tokio::time::sleep(options.delay_between_categories).await;
            }
        }

        Ok(SweepOutcome::Finished)
    }

    #[instrument(skip(self, site, options, progress), fields(site = %site.name))]
    async fn process_category(
        &self,
        job_id: Uuid,
        site: &SourceSite,
        category: &str,
        options: &JobOptions,
        progress: &mut JobProgress,
    ) -> Result<SweepOutcome, OrchestratorError> {
        let discovery = self
            .discoverer
            .discover(
                site,
                category,
                options.max_pages_per_category,
                options.delay_between_pages,
            )
            .await;

        progress.add_discovered(discovery.urls.len());
        if let Some(error) = &discovery.error {
            progress.push_error(format!("Discovery {}/{}: {}", site.name, category, error));
        }
        if !self.jobs.update_progress(job_id, progress).await? {
            return Ok(SweepOutcome::Cancelled);
        }

        for url in &discovery.urls {
            if self.is_cancelled(job_id).await? {
                info!("Job cancelled, stopping");
                return Ok(SweepOutcome::Cancelled);
            }

            let checkpoint = progress.begin_url();
            if self.importer.is_imported(url).await? {
                debug!(url = %url, "Skipping known URL");
                progress.record_skip();
            } else {
                let result = self.importer.import_url(url, site).await;
                if result.skipped {
                    progress.record_skip();
                } else if result.success {
                    progress.record_success();
                } else {
                    let error = result.error.as_deref().unwrap_or("Unknown error");
                    progress.record_failure(url, error);
                }

                if !result.skipped && !options.delay_between_urls.is_zero() {
                    tokio::time::sleep(options.delay_between_urls).await;
                }
            }

            if checkpoint && !self.jobs.update_progress(job_id, progress).await? {
                return Ok(SweepOutcome::Cancelled);
            }
        }

        Ok(SweepOutcome::Finished)
    }

    async fn is_cancelled(&self, job_id: Uuid) -> Result<bool, OrchestratorError> {
        let job = self.get_job_status(job_id).await?;
        Ok(job.status.is_terminal())
    }

    /// 执行异常中止后尽力把任务标记为失败
    ///
    /// 返回是否有记录被更新；已结束的任务保持不变。
    pub async fn abort_job(&self, job_id: Uuid, reason: &str) -> Result<bool, OrchestratorError> {
        let job = self.get_job_status(job_id).await?;
        let mut progress = job.progress();
        progress.push_terminal_error(reason);
        Ok(self.jobs.finalize(job_id, JobStatus::Failed, &progress).await?)
    }

    /// 查询任务状态
    pub async fn get_job_status(&self, job_id: Uuid) -> Result<ScrapingJob, OrchestratorError> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or(OrchestratorError::JobNotFound(job_id))
    }

    /// 分页列出任务及总数
    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ScrapingJob>, u64), OrchestratorError> {
        Ok(self.jobs.list(status, limit, offset).await?)
    }

    /// 尽力取消任务
    ///
    /// 未结束的任务被标记为 failed 并记录取消原因；运行中的编排循环
    /// 会在处理下一个URL之前发现并退出。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 任务被取消
    /// * `Ok(false)` - 任务已经结束，未做任何修改
    /// * `Err(OrchestratorError::JobNotFound)` - 任务不存在
    pub async fn cancel_job(&self, job_id: Uuid) -> Result<bool, OrchestratorError> {
        match self.jobs.cancel(job_id, CANCELLED_BY_USER).await {
            Ok(changed) => {
                if changed {
                    info!(job_id = %job_id, "Scraping job cancelled");
                }
                Ok(changed)
            }
            Err(RepositoryError::NotFound) => Err(OrchestratorError::JobNotFound(job_id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "job_orchestrator_test.rs"]
mod tests;
