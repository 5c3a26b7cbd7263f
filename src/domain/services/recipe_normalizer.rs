// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 原始食谱到标准食谱的转换
//!
//! 在一个显式步骤中完成字段清洗、类型转换和必填校验：
//! 名称为空或配料为空的记录被拒绝。

use crate::domain::models::master_recipe::{Ingredient, Instruction, NutritionInfo, RecipeData};
use crate::domain::models::raw_recipe::{
    NumberOrText, OneOrMany, RawIngredient, RawInstruction, RawNutrition, RawRecipe,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// 没有任何餐次分类时使用的默认值
pub const DEFAULT_MEAL_CATEGORY: &str = "dinner";

/// 标准化错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Missing recipe name")]
    MissingName,
    #[error("Missing ingredients")]
    MissingIngredients,
}

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static THOUSANDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d),(\d{3})").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static PARENTHESES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .unwrap()
});
static HOURS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)\b").unwrap());
static MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?|m)\b").unwrap());
static LEADING_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?\s*[½¼¾⅓⅔⅛]?|[½¼¾⅓⅔⅛])(?:\s*(?:-|to)\s*[\d./]+)?")
        .unwrap()
});

/// 常见单位，最长的排在前面避免部分匹配
static UNITS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut units = vec![
        "tablespoons", "tablespoon", "tbsp", "teaspoons", "teaspoon", "tsp", "cups", "cup",
        "millilitres", "milliliters", "millilitre", "milliliter", "ml", "litres", "liters",
        "litre", "liter", "l", "fl oz", "ounces", "ounce", "oz", "pounds", "pound", "lbs", "lb",
        "kilograms", "kilogram", "kg", "grams", "gram", "g", "pinches", "pinch", "cloves",
        "clove", "cans", "can", "tins", "tin", "handfuls", "handful", "bunches", "bunch",
        "slices", "slice", "pieces", "piece", "sprigs", "sprig", "sticks", "stick", "packs",
        "pack", "jars", "jar",
    ];
    units.sort_by(|a, b| b.len().cmp(&a.len()));
    units
});

/// 解码HTML实体、去掉标签并压缩空白
pub fn clean_text(input: &str) -> String {
    let decoded = html_escape::decode_html_entities(input);
    let stripped = HTML_TAG.replace_all(&decoded, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

fn clean_optional(input: Option<String>) -> Option<String> {
    input.map(|s| clean_text(&s)).filter(|s| !s.is_empty())
}

/// 文本中的第一个数字，支持千位分隔符
fn first_number(text: &str) -> Option<f64> {
    let text = THOUSANDS.replace_all(text, "$1$2");
    NUMBER.find(&text).and_then(|m| m.as_str().parse().ok())
}

fn vulgar_fraction(c: char) -> Option<f64> {
    match c {
        '½' => Some(0.5),
        '¼' => Some(0.25),
        '¾' => Some(0.75),
        '⅓' => Some(1.0 / 3.0),
        '⅔' => Some(2.0 / 3.0),
        '⅛' => Some(0.125),
        _ => None,
    }
}

/// 解析数量文本：`2`、`1.5`、`1/2`、`1 1/2`、`½`、`1½`
pub fn parse_quantity(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut matched = false;
    for part in text.split_whitespace() {
        if let Some((num, den)) = part.split_once('/') {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            total += num / den;
            matched = true;
            continue;
        }

        let digits: String = part.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
        let rest = &part[digits.len()..];
        if !digits.is_empty() {
            total += digits.parse::<f64>().ok()?;
            matched = true;
        }
        for c in rest.chars() {
            total += vulgar_fraction(c)?;
            matched = true;
        }
    }

    matched.then_some(total)
}

/// 解析时长为分钟：ISO 8601（`PT1H30M`）、自然语言（`1 hour 30 mins`）或纯数字
pub fn parse_duration_minutes(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let minutes = if let Some(caps) = ISO_DURATION.captures(text) {
        let part = |i: usize| -> f64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        part(1) * 1440.0 + part(2) * 60.0 + part(3) + part(4) / 60.0
    } else {
        let hours: f64 = HOURS
            .captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<f64>().ok())
            .sum();
        let mins: f64 = MINUTES
            .captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<f64>().ok())
            .sum();
        if hours == 0.0 && mins == 0.0 {
            text.parse::<f64>().ok()?
        } else {
            hours * 60.0 + mins
        }
    };

    positive_minutes(minutes)
}

fn positive_minutes(minutes: f64) -> Option<i32> {
    let rounded = minutes.round();
    (rounded > 0.0 && rounded < f64::from(i32::MAX)).then_some(rounded as i32)
}

fn duration_field(value: Option<NumberOrText>) -> Option<i32> {
    match value? {
        NumberOrText::Number(n) => positive_minutes(n),
        NumberOrText::Text(t) => parse_duration_minutes(&t),
    }
}

fn servings_field(value: Option<OneOrMany<NumberOrText>>) -> Option<i32> {
    value?.into_vec().into_iter().find_map(|v| {
        let n = match v {
            NumberOrText::Number(n) => n.round(),
            NumberOrText::Text(t) => INTEGER.find(&t)?.as_str().parse::<f64>().ok()?,
        };
        (n >= 1.0 && n < 1000.0).then_some(n as i32)
    })
}

fn number_field(value: Option<NumberOrText>) -> Option<f64> {
    let n = match value? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(t) => first_number(&t)?,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// 钠以毫克保存；以克标注的文本值会被换算
fn sodium_field(value: Option<NumberOrText>) -> Option<f64> {
    let grams = match &value {
        Some(NumberOrText::Text(t)) => {
            let t = t.trim().to_lowercase();
            t.ends_with('g') && !t.ends_with("mg")
        }
        _ => false,
    };
    number_field(value).map(|n| if grams { n * 1000.0 } else { n })
}

/// 转换营养信息，数值无法识别的字段视为缺失
pub fn normalize_nutrition(raw: RawNutrition) -> NutritionInfo {
    NutritionInfo {
        calories: number_field(raw.calories),
        protein_g: number_field(raw.protein_g),
        carbs_g: number_field(raw.carbs_g),
        fat_g: number_field(raw.fat_g),
        fiber_g: number_field(raw.fiber_g),
        sugar_g: number_field(raw.sugar_g),
        sodium_mg: sodium_field(raw.sodium_mg),
    }
}

/// 去掉逗号后的备注和括号内容，得到小写名称
fn ingredient_name(rest: &str) -> String {
    let head = rest.split(',').next().unwrap_or(rest);
    let without_parens = PARENTHESES.replace_all(head, "");
    let name = without_parens.trim();
    let name = name.strip_prefix("of ").unwrap_or(name);
    WHITESPACE.replace_all(name.trim(), " ").to_lowercase()
}

/// 解析一行配料文本，如 `"2 1/2 cups plain flour, sifted"`
pub fn parse_ingredient_line(line: &str) -> Option<Ingredient> {
    let original = clean_text(line);
    if original.is_empty() {
        return None;
    }

    let mut rest = original.as_str();
    let mut quantity = None;
    if let Some(m) = LEADING_QUANTITY.find(rest) {
        let quantity_text = m.as_str().split(['-']).next().unwrap_or("");
        let quantity_text = quantity_text.split(" to ").next().unwrap_or(quantity_text);
        quantity = parse_quantity(quantity_text);
        rest = rest[m.end()..].trim_start();
    }

    let mut unit = None;
    if quantity.is_some() {
        let lower = rest.to_lowercase();
        if let Some(u) = UNITS.iter().find(|u| {
            lower.starts_with(*u)
                && lower[u.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphabetic())
        }) {
            unit = Some(u.to_string());
            rest = rest[u.len()..].trim_start_matches('.').trim_start();
        }
    }

    let name = ingredient_name(rest);
    if name.is_empty() {
        return None;
    }

    Some(Ingredient {
        name,
        quantity,
        unit,
        category: None,
        original_text: original,
    })
}

fn ingredient(raw: RawIngredient) -> Option<Ingredient> {
    match raw {
        RawIngredient::Text(line) => parse_ingredient_line(&line),
        RawIngredient::Structured {
            name,
            quantity,
            unit,
            category,
            original_text,
        } => {
            let name = clean_optional(name).map(|n| ingredient_name(&n));
            let original = clean_optional(original_text);
            let Some(name) = name.filter(|n| !n.is_empty()) else {
                return original.as_deref().and_then(parse_ingredient_line);
            };

            let quantity = match quantity {
                Some(NumberOrText::Number(n)) if n.is_finite() && n >= 0.0 => Some(n),
                Some(NumberOrText::Text(t)) => parse_quantity(&t),
                _ => None,
            };
            let unit = clean_optional(unit).map(|u| u.to_lowercase());
            let original_text = original.unwrap_or_else(|| {
                let mut parts = Vec::new();
                if let Some(q) = quantity {
                    parts.push(format!("{}", q));
                }
                if let Some(u) = &unit {
                    parts.push(u.clone());
                }
                parts.push(name.clone());
                parts.join(" ")
            });

            Some(Ingredient {
                name,
                quantity,
                unit,
                category: clean_optional(category).map(|c| c.to_lowercase()),
                original_text,
            })
        }
    }
}

/// 展开分节并把多行文本拆成独立步骤
fn flatten_instructions(raw: RawInstruction, out: &mut Vec<String>) {
    match raw {
        RawInstruction::Text(text) => out.extend(
            text.split(['\n', '\r'])
                .map(clean_text)
                .filter(|line| !line.is_empty()),
        ),
        RawInstruction::Section { items } => {
            for item in items {
                flatten_instructions(item, out);
            }
        }
        RawInstruction::Step { text, name, .. } => {
            if let Some(text) = clean_optional(text).or_else(|| clean_optional(name)) {
                out.push(text);
            }
        }
    }
}

fn string_list(value: Option<OneOrMany<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in value.map(OneOrMany::into_vec).unwrap_or_default() {
        for part in item.split(',') {
            let cleaned = clean_text(part).to_lowercase();
            if !cleaned.is_empty() && !out.contains(&cleaned) {
                out.push(cleaned);
            }
        }
    }
    out
}

/// `https://schema.org/GlutenFreeDiet` → `gluten-free`
fn dietary_tag(raw: &str) -> String {
    let last = raw.rsplit('/').next().unwrap_or(raw);
    let last = last.strip_suffix("Diet").unwrap_or(last);
    let mut tag = String::with_capacity(last.len() + 4);
    for (i, c) in last.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            tag.push('-');
        }
        tag.extend(c.to_lowercase());
    }
    tag.replace([' ', '_'], "-")
}

/// 将解析服务的原始输出转换为标准食谱
///
/// # 参数
///
/// * `raw` - 解析服务返回的部分食谱
///
/// # 返回值
///
/// * `Ok(RecipeData)` - 清洗后的食谱
/// * `Err(NormalizationError)` - 名称或配料缺失
pub fn normalize(raw: RawRecipe) -> Result<RecipeData, NormalizationError> {
    let name = clean_optional(raw.name).ok_or(NormalizationError::MissingName)?;

    let ingredients: Vec<Ingredient> = raw
        .ingredients
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(ingredient)
        .collect();
    if ingredients.is_empty() {
        return Err(NormalizationError::MissingIngredients);
    }

    let mut steps = Vec::new();
    for item in raw.instructions.map(OneOrMany::into_vec).unwrap_or_default() {
        flatten_instructions(item, &mut steps);
    }
    let instructions = steps
        .into_iter()
        .zip(1u32..)
        .map(|(text, step)| Instruction { step, text })
        .collect();

    let mut meal_categories = string_list(raw.meal_categories);
    if meal_categories.is_empty() {
        meal_categories.push(DEFAULT_MEAL_CATEGORY.to_string());
    }

    let mut dietary_tags: Vec<String> = Vec::new();
    for tag in raw.dietary_tags.map(OneOrMany::into_vec).unwrap_or_default() {
        let tag = dietary_tag(clean_text(&tag).as_str());
        if !tag.is_empty() && !dietary_tags.contains(&tag) {
            dietary_tags.push(tag);
        }
    }

    Ok(RecipeData {
        name,
        description: clean_optional(raw.description),
        image_url: raw.image.and_then(|i| i.first_url()),
        servings: servings_field(raw.servings),
        prep_time_minutes: duration_field(raw.prep_time),
        cook_time_minutes: duration_field(raw.cook_time),
        cuisine: string_list(raw.cuisine)
            .into_iter()
            .next()
            .map(|c| title_case(&c)),
        meal_categories,
        dietary_tags,
        ingredients,
        instructions,
        nutrition: normalize_nutrition(raw.nutrition.unwrap_or_default()),
    })
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "recipe_normalizer_test.rs"]
mod tests;
