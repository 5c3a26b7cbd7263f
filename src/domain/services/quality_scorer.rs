// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::master_recipe::RecipeData;

const DESCRIPTION_POINTS: u8 = 10;
const IMAGE_POINTS: u8 = 15;
const PREP_TIME_POINTS: u8 = 5;
const COOK_TIME_POINTS: u8 = 5;
const SERVINGS_POINTS: u8 = 5;
const CALORIES_POINTS: u8 = 10;
const MACROS_POINTS: u8 = 5;
const INGREDIENTS_POINTS: u8 = 15;
const RICH_INGREDIENTS_POINTS: u8 = 5;
const INSTRUCTIONS_POINTS: u8 = 15;
const RICH_INSTRUCTIONS_POINTS: u8 = 5;
const CUISINE_POINTS: u8 = 5;

/// 食谱完整度评分（0-100）
///
/// 纯函数，结果只取决于哪些字段被填充。填充更多字段不会降低分数。
///
/// | 条件 | 分值 |
/// |------|------|
/// | 描述 | 10 |
/// | 图片 | 15 |
/// | 准备时间 / 烹饪时间 / 份数 | 各 5 |
/// | 热量 | 10 |
/// | 蛋白质+碳水+脂肪齐全 | 5 |
/// | ≥3 种配料 | 15，≥6 种再加 5 |
/// | ≥2 个步骤 | 15，≥4 个再加 5 |
/// | 菜系 | 5 |
pub fn score(recipe: &RecipeData) -> u8 {
    let has_text = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());

    let ingredient_count = recipe.ingredients.len();
    let instruction_count = recipe.instructions.len();

    let checks = [
        (has_text(&recipe.description), DESCRIPTION_POINTS),
        (has_text(&recipe.image_url), IMAGE_POINTS),
        (recipe.prep_time_minutes.is_some(), PREP_TIME_POINTS),
        (recipe.cook_time_minutes.is_some(), COOK_TIME_POINTS),
        (recipe.servings.is_some(), SERVINGS_POINTS),
        (recipe.nutrition.has_calories(), CALORIES_POINTS),
        (recipe.nutrition.has_macros(), MACROS_POINTS),
        (ingredient_count >= 3, INGREDIENTS_POINTS),
        (ingredient_count >= 6, RICH_INGREDIENTS_POINTS),
        (instruction_count >= 2, INSTRUCTIONS_POINTS),
        (instruction_count >= 4, RICH_INSTRUCTIONS_POINTS),
        (has_text(&recipe.cuisine), CUISINE_POINTS),
    ];

    let total: u32 = checks
        .iter()
        .filter(|(passed, _)| *passed)
        .map(|(_, points)| u32::from(*points))
        .sum();

    u8::try_from(total.min(100)).unwrap_or(100)
}
