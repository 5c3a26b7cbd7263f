// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapingSettings;
use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::services::job_orchestrator::JobOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// 创建采集任务请求
///
/// 所有字段可选，未提供的节奏参数使用配置中的值。
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CreateJobRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub site_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub max_pages_per_category: Option<u32>,
    #[validate(range(max = 600000))]
    pub delay_between_pages_ms: Option<u64>,
    #[validate(range(max = 600000))]
    pub delay_between_urls_ms: Option<u64>,
    #[validate(range(max = 600000))]
    pub delay_between_categories_ms: Option<u64>,
}

impl CreateJobRequestDto {
    /// 与配置默认值合并为运行参数
    pub fn into_options(self, defaults: &ScrapingSettings) -> JobOptions {
        let base = JobOptions::from_settings(defaults);
        JobOptions {
            site_name: self.site_name,
            category: self.category,
            max_pages_per_category: self
                .max_pages_per_category
                .unwrap_or(base.max_pages_per_category),
            delay_between_pages: self
                .delay_between_pages_ms
                .map(Duration::from_millis)
                .unwrap_or(base.delay_between_pages),
            delay_between_urls: self
                .delay_between_urls_ms
                .map(Duration::from_millis)
                .unwrap_or(base.delay_between_urls),
            delay_between_categories: self
                .delay_between_categories_ms
                .map(Duration::from_millis)
                .unwrap_or(base.delay_between_categories),
        }
    }
}

/// 任务列表查询参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobListQueryDto {
    pub status: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl JobListQueryDto {
    /// 解析状态过滤；无法识别的状态返回 `Err` 并带上原始值
    pub fn status_filter(&self) -> Result<Option<JobStatus>, String> {
        match self.status.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| s.to_string()),
        }
    }
}

/// 任务列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponseDto {
    pub jobs: Vec<ScrapingJob>,
    pub total: u64,
}
