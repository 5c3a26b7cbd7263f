// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LlmSettings;
use crate::domain::models::master_recipe::{Ingredient, NutritionInfo};
use crate::domain::models::raw_recipe::{RawNutrition, RawRecipe};
use crate::domain::services::recipe_normalizer::{clean_text, normalize_nutrition};
use crate::domain::services::recipe_parser::{NutritionEstimator, ParserError, RecipeParser};
use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

static NON_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:script|style|noscript|svg)[^>]*>.*?</(?:script|style|noscript|svg)>")
        .unwrap()
});

const RECIPE_SCHEMA: &str = r#"{"name": string, "description": string|null, "image_url": string|null,
"servings": number|null, "prep_time_minutes": number|null, "cook_time_minutes": number|null,
"cuisine": string|null, "meal_categories": [string], "dietary_tags": [string],
"ingredients": [{"name": string, "quantity": number|null, "unit": string|null, "original_text": string}],
"instructions": [{"step": number, "text": string}],
"nutrition": {"calories": number|null, "protein_g": number|null, "carbs_g": number|null,
"fat_g": number|null, "fiber_g": number|null, "sugar_g": number|null, "sodium_mg": number|null}}"#;

const NUTRITION_SCHEMA: &str = r#"{"calories": number, "protein_g": number, "carbs_g": number,
"fat_g": number, "fiber_g": number, "sugar_g": number, "sodium_mg": number}"#;

/// LLM服务 - 处理与LLM提供商的交互
///
/// 调用 OpenAI 兼容的 chat completions 接口，既作为食谱解析服务，
/// 也作为营养估算服务。每次调用都带有显式超时。
///
/// # 配置
///
/// 通过 [`LlmSettings`] 配置：API密钥、模型名称、API基础URL、超时和最大输入长度。
pub struct LLMService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    max_input_chars: usize,
}

impl LLMService {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build LLM HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            max_input_chars: settings.max_input_chars,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// 页面HTML转为纯文本并截断到最大输入长度
    pub fn page_text(&self, html: &str) -> String {
        let without_scripts = NON_CONTENT.replace_all(html, " ");
        let text = clean_text(&without_scripts);
        match text.char_indices().nth(self.max_input_chars) {
            Some((idx, _)) => text[..idx].to_string(),
            None => text,
        }
    }

    /// 发送一次对话请求，返回模型输出的JSON
    ///
    /// # 参数
    /// * `system` - 系统提示
    /// * `prompt` - 用户提示
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或输出不是合法JSON时返回错误
    pub async fn complete_json(&self, system: &str, prompt: &str) -> Result<Value> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let request_body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.0
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "LLM API returned error: {} - {}",
                status,
                error_text
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        if let Some(total) = body["usage"]["total_tokens"].as_u64() {
            debug!(model = %self.model, total_tokens = total, "LLM call finished");
        }

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format from LLM API"))?;

        serde_json::from_str::<Value>(strip_code_fence(content))
            .context("Failed to parse extracted JSON content")
    }
}

/// 去掉模型可能包裹的 ```json 代码块
fn strip_code_fence(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[async_trait]
impl RecipeParser for LLMService {
    #[instrument(skip(self, html))]
    async fn parse(&self, url: &str, html: &str) -> Result<Option<RawRecipe>, ParserError> {
        if !self.is_configured() {
            return Err(ParserError::NotConfigured(
                "LLM API key not configured".to_string(),
            ));
        }

        let prompt = format!(
            "Extract the recipe from the following web page ({}). \
            Respond with a single JSON object of this shape: {}. \
            Use null for unknown values. If the page does not contain a recipe, respond with null. \
            Page text: {}",
            url,
            RECIPE_SCHEMA,
            self.page_text(html)
        );

        let value = self
            .complete_json(
                "You are a recipe extraction assistant. You output only valid JSON.",
                &prompt,
            )
            .await?;

        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }
}

#[async_trait]
impl NutritionEstimator for LLMService {
    async fn estimate(
        &self,
        ingredients: &[Ingredient],
        servings: Option<i32>,
    ) -> Result<NutritionInfo> {
        let lines: Vec<&str> = ingredients.iter().map(|i| i.original_text.as_str()).collect();
        let prompt = format!(
            "Estimate the nutrition per serving for a recipe serving {} with these ingredients:\n{}\n\
            Respond with a single JSON object of this shape: {}",
            servings.unwrap_or(1).max(1),
            lines.join("\n"),
            NUTRITION_SCHEMA
        );

        let value = self
            .complete_json(
                "You are a nutrition analysis assistant. You output only valid JSON.",
                &prompt,
            )
            .await?;

        let raw: RawNutrition =
            serde_json::from_value(value).context("Nutrition estimate is not an object")?;
        let nutrition = normalize_nutrition(raw);
        if !nutrition.has_calories() {
            return Err(anyhow::anyhow!("Nutrition estimate is missing calories"));
        }
        Ok(nutrition)
    }
}

#[cfg(test)]
#[path = "llm_service_test.rs"]
mod tests;
