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

use crate::domain::models::source_site::SourceSite;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、服务器、采集节奏、解析服务和站点初始化列表
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 采集配置
    pub scraping: ScrapingSettings,
    /// LLM 解析服务配置
    pub llm: LlmSettings,
    /// 启动时初始化的来源站点
    #[serde(default)]
    pub sites: Vec<SiteSettings>,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 采集配置设置
///
/// 所有延迟都以毫秒为单位，超时以秒为单位。
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    /// 每个分类最多抓取的搜索结果页数
    pub max_pages_per_category: u32,
    /// 搜索结果页之间的延迟
    pub delay_between_pages_ms: u64,
    /// 导入URL之间的延迟
    pub delay_between_urls_ms: u64,
    /// 站点之间的延迟
    pub delay_between_categories_ms: u64,
    /// 搜索页抓取的最大尝试次数
    pub retry_attempts: u32,
    /// 重试基础延迟，第 n 次失败后等待 n × base
    pub retry_base_delay_ms: u64,
    /// 单次页面抓取超时
    pub fetch_timeout_secs: u64,
    /// 浏览器风格的 User-Agent
    pub user_agent: String,
    /// Accept-Language 请求头
    pub accept_language: String,
}

impl ScrapingSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// LLM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// API密钥；未配置时 LLM 解析和营养估算不可用
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// OpenAI 兼容接口的基础URL
    pub api_base_url: String,
    /// 单次调用超时（秒）
    pub timeout_secs: u64,
    /// 发送给模型的页面文本最大字符数
    pub max_input_chars: usize,
}

/// 来源站点初始化配置
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    pub name: String,
    pub display_name: String,
    pub base_url: String,
    pub search_url_template: String,
    #[serde(default)]
    pub selector_hint: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SiteSettings {
    /// 转换为领域实体
    pub fn to_source_site(&self) -> SourceSite {
        let mut site = SourceSite::new(
            self.name.clone(),
            self.display_name.clone(),
            self.base_url.clone(),
            self.search_url_template.clone(),
            self.categories.clone(),
        );
        site.selector_hint = self.selector_hint.clone();
        site.is_active = self.is_active;
        site
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `HARVESTRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HARVESTRS").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅包含内置默认值的配置构建器
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.url", "postgres://localhost/harvestrs")?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Polite pacing toward third-party sites
            .set_default("scraping.max_pages_per_category", 3)?
            .set_default("scraping.delay_between_pages_ms", 1000)?
            .set_default("scraping.delay_between_urls_ms", 2000)?
            .set_default("scraping.delay_between_categories_ms", 5000)?
            .set_default("scraping.retry_attempts", 3)?
            .set_default("scraping.retry_base_delay_ms", 1000)?
            .set_default("scraping.fetch_timeout_secs", 30)?
            .set_default(
                "scraping.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )?
            .set_default("scraping.accept_language", "en-GB,en;q=0.9")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("llm.timeout_secs", 60)?
            .set_default("llm.max_input_chars", 30000)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
