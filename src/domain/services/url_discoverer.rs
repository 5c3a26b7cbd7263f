// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source_site::SourceSite;
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils::{resolve_url, same_site};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// 没有选择器提示或提示无效时使用的通用食谱链接选择器
const FALLBACK_SELECTORS: &str =
    "a[href*='/recipe/'], a[href*='/recipes/'], article a[href], .recipe-card a[href]";

static FALLBACK: Lazy<Selector> = Lazy::new(|| Selector::parse(FALLBACK_SELECTORS).unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// 候选URL路径必须包含其中之一
const RECIPE_SEGMENTS: [&str; 2] = ["/recipe/", "/recipes/"];

/// 聚合页（合集、分类、标签、搜索）路径片段
const EXCLUDED_SEGMENTS: [&str; 6] = [
    "/collection",
    "/category/",
    "/categories/",
    "/tag/",
    "/tags/",
    "/search",
];

/// 一次分类发现的结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryResult {
    /// 去重后的候选URL，保持首次出现的顺序
    pub urls: Vec<String>,
    /// 站点名称
    pub site: String,
    /// 分类/查询词
    pub category: String,
    pub scraped_at: DateTime<Utc>,
    /// 页面抓取重试耗尽时的错误；此时 `urls` 为部分结果
    pub error: Option<String>,
}

/// URL发现器
///
/// 逐页抓取站点的搜索结果页并提取候选食谱链接，不解析食谱内容。
pub struct UrlDiscoverer {
    engine: Arc<dyn FetchEngine>,
    retry_policy: RetryPolicy,
    fetch_timeout: Duration,
}

impl UrlDiscoverer {
    pub fn new(engine: Arc<dyn FetchEngine>, retry_policy: RetryPolicy, fetch_timeout: Duration) -> Self {
        Self {
            engine,
            retry_policy,
            fetch_timeout,
        }
    }

    /// 发现某站点某分类下的候选食谱URL
    ///
    /// # 参数
    ///
    /// * `site` - 来源站点
    /// * `category` - 查询词
    /// * `max_pages` - 最多抓取的页数
    /// * `delay_between_pages` - 页与页之间的等待时间
    ///
    /// # 返回值
    ///
    /// 发现结果。抓取失败不会返回错误，而是在 `error` 中记录并返回已发现的部分URL。
    #[instrument(skip(self, site, delay_between_pages), fields(site = %site.name))]
    pub async fn discover(
        &self,
        site: &SourceSite,
        category: &str,
        max_pages: u32,
        delay_between_pages: Duration,
    ) -> DiscoveryResult {
        let mut result = DiscoveryResult {
            urls: Vec::new(),
            site: site.name.clone(),
            category: category.to_string(),
            scraped_at: Utc::now(),
            error: None,
        };

        let base = match Url::parse(&site.base_url) {
            Ok(base) => base,
            Err(e) => {
                result.error = Some(format!("Invalid base URL {}: {}", site.base_url, e));
                return result;
            }
        };

        let last_page = if site.is_paginated() { max_pages } else { max_pages.min(1) };
        let mut seen = HashSet::new();

        for page in 1..=last_page {
            if page > 1 && !delay_between_pages.is_zero() {
                tokio::time::sleep(delay_between_pages).await;
            }

            let search_url = site.search_url(category, page);
            let request = FetchRequest::new(search_url.as_str(), self.fetch_timeout);
            let response = self
                .retry_policy
                .run("discover_page", || self.engine.fetch(&request))
                .await;

            let body = match response {
                Ok(response) => response.content,
                Err(e) => {
                    warn!(page, url = %search_url, error = %e, "Search page fetch failed, aborting category");
                    result.error = Some(format!("{}: {}", search_url, e));
                    break;
                }
            };

            let mut new_urls = 0;
            for url in Self::extract_candidates(&body, &base, site.selector_hint.as_deref()) {
                if seen.insert(url.clone()) {
                    result.urls.push(url);
                    new_urls += 1;
                }
            }

            debug!(page, new_urls, "Processed search page");
            if new_urls == 0 {
                break;
            }
        }

        info!(discovered = result.urls.len(), "Discovery finished");
        result
    }

    /// 从搜索页HTML中提取候选食谱URL（按文档顺序，未跨页去重）
    pub fn extract_candidates(html: &str, base: &Url, selector_hint: Option<&str>) -> Vec<String> {
        let document = Html::parse_document(html);
        let hinted = selector_hint.and_then(|hint| match Selector::parse(hint) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(hint, error = ?e, "Invalid selector hint, using fallback selectors");
                None
            }
        });
        let selector: &Selector = hinted.as_ref().unwrap_or(&*FALLBACK);

        let mut urls = Vec::new();
        for element in document.select(selector) {
            let hrefs: Vec<&str> = match element.value().attr("href") {
                Some(href) => vec![href],
                None => element
                    .select(&ANCHOR)
                    .filter_map(|a| a.value().attr("href"))
                    .collect(),
            };

            for href in hrefs {
                if let Some(url) = Self::accept_candidate(base, href) {
                    if !urls.contains(&url) {
                        urls.push(url);
                    }
                }
            }
        }
        urls
    }

    /// 解析并校验单个链接，返回去掉片段后的绝对URL
    fn accept_candidate(base: &Url, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let mut url = resolve_url(base, href).ok()?;
        if !matches!(url.scheme(), "http" | "https") || !same_site(&url, base) {
            return None;
        }
        url.set_fragment(None);

        let accepted = Self::is_recipe_path(url.path())
            && !url.query().is_some_and(has_excluded_segment);
        accepted.then(|| url.to_string())
    }

    /// 路径是否指向单个食谱页面
    pub fn is_recipe_path(path: &str) -> bool {
        let path = path.to_lowercase();
        RECIPE_SEGMENTS.iter().any(|s| path.contains(s)) && !has_excluded_segment(&path)
    }
}

/// 文本中是否出现聚合页片段，查询串中的跳转参数同样适用
fn has_excluded_segment(text: &str) -> bool {
    let text = text.to_lowercase();
    EXCLUDED_SEGMENTS.iter().any(|s| text.contains(s))
}

#[cfg(test)]
#[path = "url_discoverer_test.rs"]
mod tests;
