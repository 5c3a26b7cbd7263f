// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::scraping_job::{JobProgress, JobStatus, ScrapingJob};
use async_trait::async_trait;
use uuid::Uuid;

/// 采集任务仓库特质
///
/// 所有变更语句都只作用于非终态任务：任务一旦结束（completed/failed），
/// 后续的进度写回和结束操作都不会生效。
#[async_trait]
pub trait ScrapingJobRepository: Send + Sync {
    /// 创建任务
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError>;

    /// 根据ID查找任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(ScrapingJob))` - 找到任务
    /// * `Ok(None)` - 任务不存在
    /// * `Err(RepositoryError)` - 查询失败
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError>;

    /// 将待处理任务标记为运行中并记录开始时间
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 状态已变更
    /// * `Ok(false)` - 任务不处于 pending 状态
    async fn mark_running(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// 写回进度计数和错误日志（检查点）
    ///
    /// 仅当任务处于 running 状态时生效，返回是否有记录被更新。
    async fn update_progress(&self, id: Uuid, progress: &JobProgress)
        -> Result<bool, RepositoryError>;

    /// 以终态结束任务并写入最终计数
    ///
    /// 仅当任务尚未结束时生效，返回是否有记录被更新。
    async fn finalize(
        &self,
        id: Uuid,
        status: JobStatus,
        progress: &JobProgress,
    ) -> Result<bool, RepositoryError>;

    /// 取消任务：标记为 failed 并追加取消原因
    ///
    /// 仅当任务尚未结束时生效，返回是否有记录被更新。
    async fn cancel(&self, id: Uuid, reason: &str) -> Result<bool, RepositoryError>;

    /// 分页列出任务，按创建时间倒序
    ///
    /// # 参数
    ///
    /// * `status` - 可选的状态过滤
    /// * `limit` - 每页数量
    /// * `offset` - 偏移量
    ///
    /// # 返回值
    ///
    /// * `Ok((Vec<ScrapingJob>, u64))` - 当前页的任务和满足过滤条件的总数
    async fn list(
        &self,
        status: Option<JobStatus>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ScrapingJob>, u64), RepositoryError>;
}
