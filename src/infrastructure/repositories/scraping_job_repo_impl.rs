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

use crate::domain::models::scraping_job::{JobProgress, JobStatus, ScrapingJob};
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scraping_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 采集任务仓库实现
pub struct ScrapingJobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapingJobRepositoryImpl {
    /// 创建新的采集任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的采集任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(m: job_entity::Model) -> Result<ScrapingJob, RepositoryError> {
        let status = m.status.parse::<JobStatus>().map_err(|_| {
            RepositoryError::Database(DbErr::Custom(format!("Invalid job status: {}", m.status)))
        })?;
        let error_log: Vec<String> = serde_json::from_value(m.error_log).map_err(|e| {
            RepositoryError::Database(DbErr::Custom(format!("Invalid job error log: {}", e)))
        })?;

        Ok(ScrapingJob {
            id: m.id,
            site_id: m.site_id,
            category: m.category,
            status,
            urls_discovered: m.urls_discovered,
            urls_processed: m.urls_processed,
            urls_succeeded: m.urls_succeeded,
            urls_failed: m.urls_failed,
            urls_skipped: m.urls_skipped,
            error_log,
            started_at: m.started_at.map(Into::into),
            completed_at: m.completed_at.map(Into::into),
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        })
    }

    /// 非终态状态列表
    fn open_statuses() -> Vec<String> {
        vec![JobStatus::Pending.to_string(), JobStatus::Running.to_string()]
    }

    fn now() -> DateTime<FixedOffset> {
        Utc::now().into()
    }
}

#[async_trait]
impl ScrapingJobRepository for ScrapingJobRepositoryImpl {
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError> {
        let model = job_entity::ActiveModel {
            id: Set(job.id),
            site_id: Set(job.site_id),
            category: Set(job.category.clone()),
            status: Set(job.status.to_string()),
            urls_discovered: Set(job.urls_discovered),
            urls_processed: Set(job.urls_processed),
            urls_succeeded: Set(job.urls_succeeded),
            urls_failed: Set(job.urls_failed),
            urls_skipped: Set(job.urls_skipped),
            error_log: Set(serde_json::json!(job.error_log)),
            started_at: Set(job.started_at.map(Into::into)),
            completed_at: Set(job.completed_at.map(Into::into)),
            created_at: Set(job.created_at.into()),
            updated_at: Set(job.updated_at.into()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError> {
        job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn mark_running(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let now = Self::now();
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Running.to_string()),
            )
            .col_expr(
                job_entity::Column::StartedAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(now)),
            )
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn update_progress(
        &self,
        id: Uuid,
        progress: &JobProgress,
    ) -> Result<bool, RepositoryError> {
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::UrlsDiscovered,
                Expr::value(progress.urls_discovered),
            )
            .col_expr(
                job_entity::Column::UrlsProcessed,
                Expr::value(progress.urls_processed),
            )
            .col_expr(
                job_entity::Column::UrlsSucceeded,
                Expr::value(progress.urls_succeeded),
            )
            .col_expr(job_entity::Column::UrlsFailed, Expr::value(progress.urls_failed))
            .col_expr(
                job_entity::Column::UrlsSkipped,
                Expr::value(progress.urls_skipped),
            )
            .col_expr(
                job_entity::Column::ErrorLog,
                Expr::value(serde_json::json!(progress.errors)),
            )
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(Self::now()))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Running.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: JobStatus,
        progress: &JobProgress,
    ) -> Result<bool, RepositoryError> {
        let now = Self::now();
        let result = job_entity::Entity::update_many()
            .col_expr(job_entity::Column::Status, Expr::value(status.to_string()))
            .col_expr(
                job_entity::Column::UrlsDiscovered,
                Expr::value(progress.urls_discovered),
            )
            .col_expr(
                job_entity::Column::UrlsProcessed,
                Expr::value(progress.urls_processed),
            )
            .col_expr(
                job_entity::Column::UrlsSucceeded,
                Expr::value(progress.urls_succeeded),
            )
            .col_expr(job_entity::Column::UrlsFailed, Expr::value(progress.urls_failed))
            .col_expr(
                job_entity::Column::UrlsSkipped,
                Expr::value(progress.urls_skipped),
            )
            .col_expr(
                job_entity::Column::ErrorLog,
                Expr::value(serde_json::json!(progress.errors)),
            )
            .col_expr(
                job_entity::Column::CompletedAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(now)),
            )
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.is_in(Self::open_statuses()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn cancel(&self, id: Uuid, reason: &str) -> Result<bool, RepositoryError> {
        let job = match self.find_by_id(id).await? {
            Some(job) if !job.status.is_terminal() => job,
            Some(_) => return Ok(false),
            None => return Err(RepositoryError::NotFound),
        };

        let mut progress = job.progress();
        progress.push_terminal_error(reason);

        let now = Self::now();
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Failed.to_string()),
            )
            .col_expr(
                job_entity::Column::ErrorLog,
                Expr::value(serde_json::json!(progress.errors)),
            )
            .col_expr(
                job_entity::Column::CompletedAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(now)),
            )
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.is_in(Self::open_statuses()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        status: Option<JobStatus>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ScrapingJob>, u64), RepositoryError> {
        let mut query = job_entity::Entity::find();
        if let Some(status) = status {
            query = query.filter(job_entity::Column::Status.eq(status.to_string()));
        }

        let total = query.clone().count(self.db.as_ref()).await?;
        let jobs = query
            .order_by_desc(job_entity::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Self::to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((jobs, total))
    }
}

#[cfg(test)]
#[path = "scraping_job_repo_impl_test.rs"]
mod tests;
