// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::allergen::AllergenCategory;

/// 公开可见的质量分阈值
///
/// 这是独立的策略常量，不属于质量评分器本身。
pub const VISIBILITY_THRESHOLD: u8 = 50;

/// 标准化后的配料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    /// 标准化名称（小写）
    pub name: String,
    /// 数量
    pub quantity: Option<f64>,
    /// 单位
    pub unit: Option<String>,
    /// 可选分类（如 produce、dairy）
    pub category: Option<String>,
    /// 原始文本
    pub original_text: String,
}

impl Ingredient {
    /// 仅用名称构建配料，原始文本与名称相同
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            original_text: name.clone(),
            name: name.to_lowercase(),
            quantity: None,
            unit: None,
            category: None,
        }
    }
}

/// 烹饪步骤
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instruction {
    /// 步骤序号，从1开始
    pub step: u32,
    pub text: String,
}

/// 每份营养信息
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionInfo {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
}

impl NutritionInfo {
    pub fn has_calories(&self) -> bool {
        self.calories.is_some()
    }

    /// 蛋白质、碳水和脂肪是否齐全
    pub fn has_macros(&self) -> bool {
        self.protein_g.is_some() && self.carbs_g.is_some() && self.fat_g.is_some()
    }
}

/// 营养数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NutritionSource {
    /// 来自源站页面
    #[default]
    SourceSite,
    /// 由营养估算服务生成
    AiEstimated,
}

impl fmt::Display for NutritionSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NutritionSource::SourceSite => write!(f, "source_site"),
            NutritionSource::AiEstimated => write!(f, "ai_estimated"),
        }
    }
}

impl FromStr for NutritionSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source_site" => Ok(NutritionSource::SourceSite),
            "ai_estimated" => Ok(NutritionSource::AiEstimated),
            _ => Err(()),
        }
    }
}

/// 标准化后的食谱数据
///
/// 解析结果经过校验和转换后的规范形态，是质量评分和持久化的输入。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeData {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub servings: Option<i32>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub cuisine: Option<String>,
    pub meal_categories: Vec<String>,
    pub dietary_tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub nutrition: NutritionInfo,
}

impl RecipeData {
    /// 总时长 = 准备 + 烹饪；两者都缺失时为空
    pub fn total_time_minutes(&self) -> Option<i32> {
        match (self.prep_time_minutes, self.cook_time_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }

    /// 扁平化的小写配料名称列表，用于搜索
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|i| i.name.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// 主食谱实体
///
/// 每个唯一来源URL对应一条记录，创建后管道不再更新。
/// 不变式：`is_active == (quality_score >= VISIBILITY_THRESHOLD)`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MasterRecipe {
    pub id: Uuid,
    /// 来源URL，天然的去重键
    pub source_url: String,
    pub source_site_id: Uuid,
    pub scraped_at: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub servings: Option<i32>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub total_time_minutes: Option<i32>,
    pub cuisine: Option<String>,
    pub meal_categories: Vec<String>,
    pub dietary_tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub ingredient_names: Vec<String>,
    pub instructions: Vec<Instruction>,
    pub nutrition: NutritionInfo,
    pub nutrition_source: NutritionSource,
    pub allergens: BTreeSet<AllergenCategory>,
    pub quality_score: u8,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl MasterRecipe {
    /// 由标准化数据和派生元数据构建新记录
    ///
    /// `is_active` 由质量分和可见性阈值决定，不接受外部指定。
    pub fn from_recipe_data(
        data: RecipeData,
        source_url: impl Into<String>,
        source_site_id: Uuid,
        nutrition_source: NutritionSource,
        allergens: BTreeSet<AllergenCategory>,
        quality_score: u8,
    ) -> Self {
        let now = Utc::now();
        let total_time_minutes = data.total_time_minutes();
        let ingredient_names = data.ingredient_names();

        Self {
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            source_site_id,
            scraped_at: now,
            name: data.name,
            description: data.description,
            image_url: data.image_url,
            servings: data.servings,
            prep_time_minutes: data.prep_time_minutes,
            cook_time_minutes: data.cook_time_minutes,
            total_time_minutes,
            cuisine: data.cuisine,
            meal_categories: data.meal_categories,
            dietary_tags: data.dietary_tags,
            ingredients: data.ingredients,
            ingredient_names,
            instructions: data.instructions,
            nutrition: data.nutrition,
            nutrition_source,
            allergens,
            quality_score,
            is_active: quality_score >= VISIBILITY_THRESHOLD,
            created_at: now,
        }
    }
}
