// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::master_recipe::{MasterRecipe, NutritionSource};
use crate::domain::models::source_site::SourceSite;
use crate::domain::repositories::master_recipe_repository::MasterRecipeRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::recipe_normalizer::{normalize, NormalizationError};
use crate::domain::services::recipe_parser::{NutritionEstimator, ParserError, RecipeParser};
use crate::domain::services::{allergen_classifier, quality_scorer};
use crate::engines::traits::{EngineError, FetchEngine, FetchRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 已导入URL被跳过时的原因
pub const ALREADY_IMPORTED: &str = "already imported";

/// 单个URL的导入结果
///
/// 导入器从不返回错误，所有失败都以 `success == false` 的结果表示。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    pub success: bool,
    pub recipe_id: Option<Uuid>,
    pub error: Option<String>,
    pub skipped: bool,
    pub reason: Option<String>,
}

impl ImportResult {
    pub fn imported(recipe_id: Uuid) -> Self {
        Self {
            success: true,
            recipe_id: Some(recipe_id),
            error: None,
            skipped: false,
            reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            recipe_id: None,
            error: None,
            skipped: true,
            reason: Some(reason.into()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            recipe_id: None,
            error: Some(error.into()),
            skipped: false,
            reason: None,
        }
    }
}

/// 导入过程中的内部错误，最终转换为失败结果
#[derive(Error, Debug)]
enum ImportError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] EngineError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error("Parser returned no data")]
    NoData,
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 食谱导入器
///
/// 抓取一个URL、解析、标准化、补全营养、计算过敏原和质量分后持久化。
pub struct RecipeImporter {
    engine: Arc<dyn FetchEngine>,
    parser: Arc<dyn RecipeParser>,
    estimator: Option<Arc<dyn NutritionEstimator>>,
    recipes: Arc<dyn MasterRecipeRepository>,
    fetch_timeout: Duration,
}

impl RecipeImporter {
    pub fn new(
        engine: Arc<dyn FetchEngine>,
        parser: Arc<dyn RecipeParser>,
        recipes: Arc<dyn MasterRecipeRepository>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            parser,
            estimator: None,
            recipes,
            fetch_timeout,
        }
    }

    /// 设置营养估算服务
    pub fn with_estimator(mut self, estimator: Arc<dyn NutritionEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// URL是否已经导入
    pub async fn is_imported(&self, url: &str) -> Result<bool, RepositoryError> {
        self.recipes.exists_by_source_url(url).await
    }

    /// 导入单个食谱URL
    ///
    /// # 参数
    ///
    /// * `url` - 食谱页面URL
    /// * `site` - 所属来源站点
    ///
    /// # 返回值
    ///
    /// 导入结果；任何步骤的错误都转换为带错误信息的失败结果
    #[instrument(skip(self, site), fields(site = %site.name))]
    pub async fn import_url(&self, url: &str, site: &SourceSite) -> ImportResult {
        match self.try_import(url, site).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Recipe import failed");
                ImportResult::failed(e.to_string())
            }
        }
    }

    async fn try_import(&self, url: &str, site: &SourceSite) -> Result<ImportResult, ImportError> {
        if self.is_imported(url).await? {
            debug!("Recipe already imported");
            return Ok(ImportResult::skipped(ALREADY_IMPORTED));
        }

        let request = FetchRequest::new(url, self.fetch_timeout);
        let page = self.engine.fetch(&request).await?;

        let raw = self
            .parser
            .parse(url, &page.content)
            .await?
            .ok_or(ImportError::NoData)?;
        let mut data = normalize(raw)?;

        let mut nutrition_source = NutritionSource::SourceSite;
        if !data.nutrition.has_calories() && !data.ingredients.is_empty() {
            if let Some(estimator) = &self.estimator {
                match estimator.estimate(&data.ingredients, data.servings).await {
                    Ok(nutrition) => {
                        data.nutrition = nutrition;
                        nutrition_source = NutritionSource::AiEstimated;
                    }
                    Err(e) => warn!(error = %e, "Nutrition estimation failed"),
                }
            }
        }

        let allergens = allergen_classifier::detect(&data.ingredients);
        let quality_score = quality_scorer::score(&data);
        let recipe = MasterRecipe::from_recipe_data(
            data,
            url,
            site.id,
            nutrition_source,
            allergens,
            quality_score,
        );

        match self.recipes.create(&recipe).await {
            Ok(created) => {
                info!(
                    recipe_id = %created.id,
                    quality_score,
                    is_active = created.is_active,
                    "Recipe imported"
                );
                Ok(ImportResult::imported(created.id))
            }
            Err(RepositoryError::AlreadyExists(_)) => {
                debug!("Recipe imported concurrently");
                Ok(ImportResult::skipped(ALREADY_IMPORTED))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "recipe_importer_test.rs"]
mod tests;
