// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::source_site::SourceSite;
use async_trait::async_trait;
use uuid::Uuid;

/// 来源站点仓库特质
///
/// 采集管道只读取站点配置；写入仅来自初始化步骤和 `last_scraped_at` 时间戳。
#[async_trait]
pub trait SourceSiteRepository: Send + Sync {
    /// 根据稳定名称查找站点
    ///
    /// # 参数
    ///
    /// * `name` - 站点名称
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(SourceSite))` - 找到站点
    /// * `Ok(None)` - 站点不存在
    /// * `Err(RepositoryError)` - 查询失败
    async fn find_by_name(&self, name: &str) -> Result<Option<SourceSite>, RepositoryError>;

    /// 根据ID查找站点
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SourceSite>, RepositoryError>;

    /// 查询启用的站点，按名称排序
    ///
    /// # 参数
    ///
    /// * `site_id` - 可选的站点过滤；为空时返回全部启用站点
    async fn find_active(&self, site_id: Option<Uuid>) -> Result<Vec<SourceSite>, RepositoryError>;

    /// 按名称插入或更新站点（幂等初始化）
    ///
    /// 已存在时更新配置字段，保留原ID、`created_at` 和 `last_scraped_at`。
    ///
    /// # 返回值
    ///
    /// * `Ok(SourceSite)` - 持久化后的站点
    async fn upsert_by_name(&self, site: &SourceSite) -> Result<SourceSite, RepositoryError>;

    /// 记录站点最近一次采集时间为当前时间
    async fn touch_last_scraped(&self, id: Uuid) -> Result<(), RepositoryError>;
}
