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

use crate::domain::models::master_recipe::{MasterRecipe, NutritionInfo, NutritionSource};
use crate::domain::repositories::master_recipe_repository::MasterRecipeRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::master_recipe as recipe_entity;
use async_trait::async_trait;
use sea_orm::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// 主食谱仓库实现
pub struct MasterRecipeRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl MasterRecipeRepositoryImpl {
    /// 创建新的主食谱仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn decode<T: DeserializeOwned>(value: serde_json::Value, field: &str) -> Result<T, RepositoryError> {
        serde_json::from_value(value).map_err(|e| {
            RepositoryError::Database(DbErr::Custom(format!("Invalid {}: {}", field, e)))
        })
    }

    fn to_domain(m: recipe_entity::Model) -> Result<MasterRecipe, RepositoryError> {
        let nutrition_source = m.nutrition_source.parse::<NutritionSource>().map_err(|_| {
            RepositoryError::Database(DbErr::Custom(format!(
                "Invalid nutrition source: {}",
                m.nutrition_source
            )))
        })?;

        Ok(MasterRecipe {
            id: m.id,
            source_url: m.source_url,
            source_site_id: m.source_site_id,
            scraped_at: m.scraped_at.into(),
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            servings: m.servings,
            prep_time_minutes: m.prep_time_minutes,
            cook_time_minutes: m.cook_time_minutes,
            total_time_minutes: m.total_time_minutes,
            cuisine: m.cuisine,
            meal_categories: Self::decode(m.meal_categories, "meal categories")?,
            dietary_tags: Self::decode(m.dietary_tags, "dietary tags")?,
            ingredients: Self::decode(m.ingredients, "ingredients")?,
            ingredient_names: Self::decode(m.ingredient_names, "ingredient names")?,
            instructions: Self::decode(m.instructions, "instructions")?,
            nutrition: NutritionInfo {
                calories: m.calories,
                protein_g: m.protein_g,
                carbs_g: m.carbs_g,
                fat_g: m.fat_g,
                fiber_g: m.fiber_g,
                sugar_g: m.sugar_g,
                sodium_mg: m.sodium_mg,
            },
            nutrition_source,
            allergens: Self::decode(m.allergens, "allergens")?,
            quality_score: u8::try_from(m.quality_score).unwrap_or(0),
            is_active: m.is_active,
            created_at: m.created_at.into(),
        })
    }
}

#[async_trait]
impl MasterRecipeRepository for MasterRecipeRepositoryImpl {
    async fn exists_by_source_url(&self, source_url: &str) -> Result<bool, RepositoryError> {
        let count = recipe_entity::Entity::find()
            .filter(recipe_entity::Column::SourceUrl.eq(source_url))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, recipe: &MasterRecipe) -> Result<MasterRecipe, RepositoryError> {
        let model = recipe_entity::ActiveModel {
            id: Set(recipe.id),
            source_url: Set(recipe.source_url.clone()),
            source_site_id: Set(recipe.source_site_id),
            scraped_at: Set(recipe.scraped_at.into()),
            name: Set(recipe.name.clone()),
            description: Set(recipe.description.clone()),
            image_url: Set(recipe.image_url.clone()),
            servings: Set(recipe.servings),
            prep_time_minutes: Set(recipe.prep_time_minutes),
            cook_time_minutes: Set(recipe.cook_time_minutes),
            total_time_minutes: Set(recipe.total_time_minutes),
            cuisine: Set(recipe.cuisine.clone()),
            meal_categories: Set(serde_json::json!(recipe.meal_categories)),
            dietary_tags: Set(serde_json::json!(recipe.dietary_tags)),
            ingredients: Set(serde_json::json!(recipe.ingredients)),
            ingredient_names: Set(serde_json::json!(recipe.ingredient_names)),
            instructions: Set(serde_json::json!(recipe.instructions)),
            calories: Set(recipe.nutrition.calories),
            protein_g: Set(recipe.nutrition.protein_g),
            carbs_g: Set(recipe.nutrition.carbs_g),
            fat_g: Set(recipe.nutrition.fat_g),
            fiber_g: Set(recipe.nutrition.fiber_g),
            sugar_g: Set(recipe.nutrition.sugar_g),
            sodium_mg: Set(recipe.nutrition.sodium_mg),
            nutrition_source: Set(recipe.nutrition_source.to_string()),
            allergens: Set(serde_json::json!(recipe.allergens)),
            quality_score: Set(i32::from(recipe.quality_score)),
            is_active: Set(recipe.is_active),
            created_at: Set(recipe.created_at.into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(recipe.clone()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(RepositoryError::AlreadyExists(recipe.source_url.clone()))
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MasterRecipe>, RepositoryError> {
        recipe_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn count_by_site(&self, source_site_id: Uuid) -> Result<u64, RepositoryError> {
        let count = recipe_entity::Entity::find()
            .filter(recipe_entity::Column::SourceSiteId.eq(source_site_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "master_recipe_repo_impl_test.rs"]
mod tests;
