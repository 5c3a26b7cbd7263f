// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 食谱解析与营养估算服务接口
//!
//! 解析服务把页面HTML转换为部分食谱（[`RawRecipe`]），营养估算服务
//! 为缺少营养数据的食谱补全每份营养信息。两者都是外部协作者，
//! 通过trait注入以便替换和测试。

use crate::domain::models::master_recipe::{Ingredient, NutritionInfo};
use crate::domain::models::raw_recipe::{OneOrMany, RawRecipe};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// 解析服务错误
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Parser not configured: {0}")]
    NotConfigured(String),
    #[error("Parser service error: {0}")]
    Service(#[from] anyhow::Error),
    #[error("Invalid parser output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// 食谱解析服务
#[async_trait]
pub trait RecipeParser: Send + Sync {
    /// 从页面内容中提取食谱
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(RawRecipe))` - 提取到的部分食谱
    /// * `Ok(None)` - 页面不包含食谱
    /// * `Err(ParserError)` - 服务调用失败
    async fn parse(&self, url: &str, html: &str) -> Result<Option<RawRecipe>, ParserError>;
}

/// 营养估算服务
#[async_trait]
pub trait NutritionEstimator: Send + Sync {
    /// 根据配料和份数估算每份营养
    async fn estimate(
        &self,
        ingredients: &[Ingredient],
        servings: Option<i32>,
    ) -> anyhow::Result<NutritionInfo>;
}

/// 基于页面内嵌 schema.org JSON-LD 的解析器
///
/// 不需要网络调用，支持顶层对象、数组和 `@graph` 形式。
#[derive(Debug, Default, Clone)]
pub struct JsonLdRecipeParser;

impl JsonLdRecipeParser {
    pub fn new() -> Self {
        Self
    }

    /// 查找页面中第一个 `@type` 为 Recipe 的JSON-LD节点
    pub fn find_recipe_node(html: &str) -> Option<Value> {
        let document = Html::parse_document(html);
        document
            .select(&JSON_LD)
            .filter_map(|script| {
                let text = script.text().collect::<String>();
                match serde_json::from_str::<Value>(text.trim()) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!(error = %e, "Skipping malformed JSON-LD block");
                        None
                    }
                }
            })
            .find_map(|value| find_recipe(&value).cloned())
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            ["@graph", "mainEntity", "mainEntityOfPage"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(find_recipe)
        }
        _ => None,
    }
}

#[async_trait]
impl RecipeParser for JsonLdRecipeParser {
    async fn parse(&self, url: &str, html: &str) -> Result<Option<RawRecipe>, ParserError> {
        let Some(node) = Self::find_recipe_node(html) else {
            debug!(url, "No JSON-LD recipe found");
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(node)?))
    }
}

/// 组合解析器：先尝试主解析器，结果不可用时再调用备用解析器
///
/// 生产环境中主解析器为 [`JsonLdRecipeParser`]，备用解析器为LLM服务。
pub struct FallbackRecipeParser {
    primary: Arc<dyn RecipeParser>,
    secondary: Arc<dyn RecipeParser>,
}

impl FallbackRecipeParser {
    pub fn new(primary: Arc<dyn RecipeParser>, secondary: Arc<dyn RecipeParser>) -> Self {
        Self { primary, secondary }
    }
}

/// 名称和配料齐全的解析结果才算可用
fn is_usable(raw: &RawRecipe) -> bool {
    let has_name = raw.name.as_deref().is_some_and(|n| !n.trim().is_empty());
    let has_ingredients = match &raw.ingredients {
        Some(OneOrMany::Many(items)) => !items.is_empty(),
        Some(OneOrMany::One(_)) => true,
        None => false,
    };
    has_name && has_ingredients
}

#[async_trait]
impl RecipeParser for FallbackRecipeParser {
    async fn parse(&self, url: &str, html: &str) -> Result<Option<RawRecipe>, ParserError> {
        let partial = match self.primary.parse(url, html).await {
            Ok(Some(raw)) if is_usable(&raw) => return Ok(Some(raw)),
            Ok(raw) => {
                debug!(url, "Primary parser gave no usable recipe, falling back");
                raw
            }
            Err(e) => {
                warn!(url, error = %e, "Primary parser failed, falling back");
                None
            }
        };

        // An unconfigured fallback leaves the primary outcome in place
        match self.secondary.parse(url, html).await {
            Err(ParserError::NotConfigured(reason)) => {
                debug!(url, reason = %reason, "Fallback parser not configured");
                Ok(partial)
            }
            result => result,
        }
    }
}

#[cfg(test)]
#[path = "recipe_parser_test.rs"]
mod tests;
