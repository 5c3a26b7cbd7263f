// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 解析服务返回的原始食谱形态
//!
//! 解析服务（LLM 或页面内嵌的 schema.org JSON-LD）返回的数据字段不全、
//! 类型不稳定：同一字段可能是字符串、数字、数组或对象。这里用 `untagged`
//! 枚举把这些变体显式建模，再由规范化器一步转换为 [`RecipeData`]。
//!
//! [`RecipeData`]: super::master_recipe::RecipeData

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// 宽松反序列化：字段形态无法识别时视为缺失，而不是让整条记录失败
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// 单个值或值列表
///
/// `Many` 排在前面：结构体变体也能从数组反序列化，先匹配 `One` 会误吞列表。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

/// 数字或文本（如 `4`、`"4 servings"`、`"PT30M"`、`"250 kcal"`）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

/// 图片：URL、ImageObject 或它们的列表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    List(Vec<RawImage>),
    Object { url: Option<String> },
}

impl RawImage {
    /// 第一个非空的图片URL
    pub fn first_url(&self) -> Option<String> {
        match self {
            RawImage::Url(u) => Some(u.trim().to_string()).filter(|u| !u.is_empty()),
            RawImage::Object { url } => url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            RawImage::List(items) => items.iter().find_map(RawImage::first_url),
        }
    }
}

/// 原始配料：纯文本行，或已结构化的对象
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawIngredient {
    Text(String),
    Structured {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, alias = "amount", deserialize_with = "lenient")]
        quantity: Option<NumberOrText>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default, alias = "originalText", alias = "original", alias = "text")]
        original_text: Option<String>,
    },
}

/// 原始步骤：纯文本、HowToSection 或 HowToStep
///
/// `Section` 必须排在 `Step` 之前：`Step` 的字段全部可选，会吞掉任何对象。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawInstruction {
    Text(String),
    Section {
        #[serde(rename = "itemListElement")]
        items: Vec<RawInstruction>,
    },
    Step {
        #[serde(default, alias = "position", deserialize_with = "lenient")]
        step: Option<NumberOrText>,
        #[serde(default, alias = "description")]
        text: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// 原始营养信息，同时兼容 snake_case 与 schema.org NutritionInformation 字段名
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawNutrition {
    #[serde(deserialize_with = "lenient")]
    pub calories: Option<NumberOrText>,
    #[serde(alias = "proteinContent", alias = "protein", deserialize_with = "lenient")]
    pub protein_g: Option<NumberOrText>,
    #[serde(
        alias = "carbohydrateContent",
        alias = "carbs",
        deserialize_with = "lenient"
    )]
    pub carbs_g: Option<NumberOrText>,
    #[serde(alias = "fatContent", alias = "fat", deserialize_with = "lenient")]
    pub fat_g: Option<NumberOrText>,
    #[serde(alias = "fiberContent", alias = "fiber", deserialize_with = "lenient")]
    pub fiber_g: Option<NumberOrText>,
    #[serde(alias = "sugarContent", alias = "sugar", deserialize_with = "lenient")]
    pub sugar_g: Option<NumberOrText>,
    #[serde(alias = "sodiumContent", alias = "sodium", deserialize_with = "lenient")]
    pub sodium_mg: Option<NumberOrText>,
}

/// 解析服务返回的部分食谱
///
/// 所有字段都可能缺失或形态异常；异常字段按缺失处理。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawRecipe {
    #[serde(alias = "title", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(alias = "image_url", deserialize_with = "lenient")]
    pub image: Option<RawImage>,
    #[serde(alias = "recipeYield", alias = "yield", deserialize_with = "lenient")]
    pub servings: Option<OneOrMany<NumberOrText>>,
    #[serde(
        alias = "prepTime",
        alias = "prep_time_minutes",
        deserialize_with = "lenient"
    )]
    pub prep_time: Option<NumberOrText>,
    #[serde(
        alias = "cookTime",
        alias = "cook_time_minutes",
        deserialize_with = "lenient"
    )]
    pub cook_time: Option<NumberOrText>,
    #[serde(alias = "recipeCuisine", deserialize_with = "lenient")]
    pub cuisine: Option<OneOrMany<String>>,
    #[serde(
        alias = "recipeCategory",
        alias = "meal_category",
        deserialize_with = "lenient"
    )]
    pub meal_categories: Option<OneOrMany<String>>,
    #[serde(alias = "suitableForDiet", deserialize_with = "lenient")]
    pub dietary_tags: Option<OneOrMany<String>>,
    #[serde(alias = "recipeIngredient", deserialize_with = "lenient")]
    pub ingredients: Option<OneOrMany<RawIngredient>>,
    #[serde(alias = "recipeInstructions", deserialize_with = "lenient")]
    pub instructions: Option<OneOrMany<RawInstruction>>,
    #[serde(deserialize_with = "lenient")]
    pub nutrition: Option<RawNutrition>,
}
