// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 错误日志最多保留的条目数
pub const MAX_ERROR_LOG_ENTRIES: usize = 100;

/// 每处理多少个URL持久化一次进度
pub const FLUSH_INTERVAL: i32 = 5;

/// 采集任务实体
///
/// 一次编排运行的进度账本。编排开始时创建，在检查点更新，
/// 最终只会被结束（completed/failed）一次，之后不再变更。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapingJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 可选的站点过滤
    pub site_id: Option<Uuid>,
    /// 可选的分类过滤
    pub category: Option<String>,
    /// 任务状态
    pub status: JobStatus,
    /// 发现的URL数量
    pub urls_discovered: i32,
    /// 已处理的URL数量
    pub urls_processed: i32,
    /// 成功导入的数量
    pub urls_succeeded: i32,
    /// 失败的数量
    pub urls_failed: i32,
    /// 跳过的数量（已存在）
    pub urls_skipped: i32,
    /// 有界错误日志，最多 [`MAX_ERROR_LOG_ENTRIES`] 条
    pub error_log: Vec<String>,
    /// 开始时间
    pub started_at: Option<DateTime<Utc>>,
    /// 结束时间
    pub completed_at: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl ScrapingJob {
    /// 创建新的待处理任务
    pub fn new(site_id: Option<Uuid>, category: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            site_id,
            category,
            status: JobStatus::Pending,
            urls_discovered: 0,
            urls_processed: 0,
            urls_succeeded: 0,
            urls_failed: 0,
            urls_skipped: 0,
            error_log: Vec::new(),
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 当前计数的快照
    pub fn progress(&self) -> JobProgress {
        JobProgress {
            urls_discovered: self.urls_discovered,
            urls_processed: self.urls_processed,
            urls_succeeded: self.urls_succeeded,
            urls_failed: self.urls_failed,
            urls_skipped: self.urls_skipped,
            errors: self.error_log.clone(),
        }
    }
}

/// 任务状态枚举
///
/// 状态转换：Pending → Running → Completed/Failed。
/// 用户取消的任务以 Failed 结束。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 已创建，尚未开始
    #[default]
    Pending,
    /// 执行中
    Running,
    /// 已完成
    Completed,
    /// 已失败（包括被取消）
    Failed,
}

impl JobStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 任务进度累加器
///
/// 在编排循环中显式传递，在检查点整体写回任务记录。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub urls_discovered: i32,
    pub urls_processed: i32,
    pub urls_succeeded: i32,
    pub urls_failed: i32,
    pub urls_skipped: i32,
    pub errors: Vec<String>,
}

impl JobProgress {
    pub fn add_discovered(&mut self, count: usize) {
        self.urls_discovered += i32::try_from(count).unwrap_or(i32::MAX);
    }

    /// 开始处理一个URL，返回是否到达持久化检查点
    pub fn begin_url(&mut self) -> bool {
        self.urls_processed += 1;
        self.urls_processed % FLUSH_INTERVAL == 0
    }

    pub fn record_success(&mut self) {
        self.urls_succeeded += 1;
    }

    pub fn record_skip(&mut self) {
        self.urls_skipped += 1;
    }

    pub fn record_failure(&mut self, url: &str, error: &str) {
        self.urls_failed += 1;
        self.push_error(format!("{}: {}", url, error));
    }

    /// 追加错误日志，超过上限的条目被丢弃
    pub fn push_error(&mut self, message: impl Into<String>) {
        if self.errors.len() < MAX_ERROR_LOG_ENTRIES {
            self.errors.push(message.into());
        }
    }

    /// 追加结束原因（失败或取消），日志已满时替换最后一条
    pub fn push_terminal_error(&mut self, message: impl Into<String>) {
        self.errors.truncate(MAX_ERROR_LOG_ENTRIES - 1);
        self.errors.push(message.into());
    }
}

/// 编排运行的最终结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingJobResult {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub urls_discovered: i32,
    pub urls_processed: i32,
    pub urls_succeeded: i32,
    pub urls_failed: i32,
    pub urls_skipped: i32,
    pub errors: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// 运行期间被外部取消
    pub cancelled: bool,
}

impl ScrapingJobResult {
    /// 由任务记录构建结果
    pub fn from_job(job: ScrapingJob, cancelled: bool) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            urls_discovered: job.urls_discovered,
            urls_processed: job.urls_processed,
            urls_succeeded: job.urls_succeeded,
            urls_failed: job.urls_failed,
            urls_skipped: job.urls_skipped,
            errors: job.error_log,
            started_at: job.started_at,
            completed_at: job.completed_at,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<JobStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<JobStatus>().is_err());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_progress_flushes_every_interval() {
        let mut progress = JobProgress::default();
        let checkpoints: Vec<bool> = (0..10).map(|_| progress.begin_url()).collect();

        assert_eq!(
            checkpoints,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn test_error_log_is_capped() {
        let mut progress = JobProgress::default();
        for i in 0..150 {
            progress.begin_url();
            progress.record_failure(&format!("https://example.com/recipes/{}", i), "boom");
        }

        assert_eq!(progress.urls_failed, 150);
        assert_eq!(progress.errors.len(), MAX_ERROR_LOG_ENTRIES);
        assert_eq!(progress.errors[0], "https://example.com/recipes/0: boom");
    }

    #[test]
    fn test_terminal_error_lands_in_full_log() {
        let mut progress = JobProgress::default();
        for i in 0..MAX_ERROR_LOG_ENTRIES {
            progress.begin_url();
            progress.record_failure(&format!("u{}", i), "x");
        }

        progress.push_error("dropped");
        assert_eq!(progress.errors.last().map(String::as_str), Some("u99: x"));

        progress.push_terminal_error("database connection lost");
        assert_eq!(progress.errors.len(), MAX_ERROR_LOG_ENTRIES);
        assert_eq!(
            progress.errors.last().map(String::as_str),
            Some("database connection lost")
        );
        assert_eq!(progress.errors[98], "u98: x");
    }

    #[test]
    fn test_terminal_error_appends_when_room() {
        let mut progress = JobProgress::default();
        progress.push_error("first");
        progress.push_terminal_error("Cancelled by user");

        assert_eq!(progress.errors, vec!["first", "Cancelled by user"]);
    }
}
