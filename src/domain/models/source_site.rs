// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 搜索URL模板中的查询词占位符
pub const QUERY_PLACEHOLDER: &str = "{query}";
/// 搜索URL模板中的页码占位符
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// 来源站点实体
///
/// 表示一个已配置的外部食谱网站。站点由初始化（seed）步骤创建和更新，
/// 对采集管道而言是只读的（`last_scraped_at` 除外）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSite {
    /// 站点唯一标识符
    pub id: Uuid,
    /// 站点稳定名称，唯一，重复初始化时作为幂等键
    pub name: String,
    /// 展示名称
    pub display_name: String,
    /// 站点根URL，用于解析相对链接和校验主机名
    pub base_url: String,
    /// 搜索URL模板，包含 `{query}` 和 `{page}` 占位符
    pub search_url_template: String,
    /// 可选的CSS选择器提示，用于提取候选食谱链接
    pub selector_hint: Option<String>,
    /// 需要遍历的分类/查询词
    pub categories: Vec<String>,
    /// 是否启用
    pub is_active: bool,
    /// 最近一次采集时间
    pub last_scraped_at: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl SourceSite {
    /// 创建新的来源站点
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        base_url: impl Into<String>,
        search_url_template: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: display_name.into(),
            base_url: base_url.into(),
            search_url_template: search_url_template.into(),
            selector_hint: None,
            categories,
            is_active: true,
            last_scraped_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 为给定查询词和页码构建搜索URL
    ///
    /// 查询词会进行URL编码。
    pub fn search_url(&self, query: &str, page: u32) -> String {
        self.search_url_template
            .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query))
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// 模板是否支持分页
    pub fn is_paginated(&self) -> bool {
        self.search_url_template.contains(PAGE_PLACEHOLDER)
    }
}
