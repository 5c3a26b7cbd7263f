// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 基于关键词的过敏原分类
//!
//! 对每个配料，把标准化名称和原始文本拼接后转小写，
//! 再与各类别的关键词做子串匹配。不做模糊匹配，也不处理否定
//! （"gluten-free pasta" 仍会命中 gluten）。

use crate::domain::models::allergen::AllergenCategory;
use crate::domain::models::master_recipe::Ingredient;
use std::collections::BTreeSet;

/// 各类别的关键词表
const KEYWORDS: [(AllergenCategory, &[&str]); 12] = [
    (AllergenCategory::Celery, &["celery", "celeriac"]),
    (
        AllergenCategory::Dairy,
        &[
            "milk", "butter", "cream", "cheese", "yogurt", "yoghurt", "ghee", "whey", "casein",
            "creme fraiche", "crème fraîche", "mascarpone", "ricotta", "mozzarella", "parmesan",
            "cheddar", "feta", "halloumi", "paneer", "custard", "fromage frais", "quark",
        ],
    ),
    (
        AllergenCategory::Eggs,
        &["egg", "mayonnaise", "mayo", "meringue", "aioli"],
    ),
    (
        AllergenCategory::Fish,
        &[
            "fish", "salmon", "tuna", "cod", "haddock", "mackerel", "sardine", "anchov", "trout",
            "sea bass", "halibut", "pollock", "tilapia", "plaice", "hake", "monkfish",
            "swordfish", "worcestershire",
        ],
    ),
    (
        AllergenCategory::Gluten,
        &[
            "gluten", "flour", "wheat", "bread", "pasta", "spaghetti", "noodle", "couscous",
            "barley", "rye", "semolina", "bulgur", "panko", "tortilla", "pitta", "pita", "naan",
            "spelt", "biscuit", "cracker", "pastry", "filo", "phyllo", "seitan",
        ],
    ),
    (AllergenCategory::Mustard, &["mustard"]),
    (
        AllergenCategory::Nuts,
        &[
            "almond", "walnut", "cashew", "pecan", "pistachio", "hazelnut", "macadamia",
            "brazil nut", "pine nut", "praline", "marzipan", "frangipane",
        ],
    ),
    (AllergenCategory::Peanuts, &["peanut", "groundnut", "satay"]),
    (
        AllergenCategory::Sesame,
        &["sesame", "tahini", "halva", "hummus"],
    ),
    (
        AllergenCategory::Shellfish,
        &[
            "prawn", "shrimp", "crab", "lobster", "mussel", "clam", "oyster", "scallop", "squid",
            "calamari", "crayfish", "langoustine", "octopus", "cockle",
        ],
    ),
    (
        AllergenCategory::Soy,
        &["soy", "soya", "tofu", "edamame", "miso", "tempeh", "tamari"],
    ),
    (
        AllergenCategory::Sulphites,
        &[
            "sulphite", "sulfite", "wine", "dried apricot", "raisin", "sultana", "prosecco",
            "balsamic",
        ],
    ),
];

/// 供匹配的小写文本：标准化名称 + 原始文本
fn haystack(ingredient: &Ingredient) -> String {
    format!("{} {}", ingredient.name, ingredient.original_text).to_lowercase()
}

fn keywords_for(category: AllergenCategory) -> &'static [&'static str] {
    KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, k)| *k)
        .unwrap_or(&[])
}

/// 检测配料列表中出现的过敏原类别
///
/// # 参数
///
/// * `ingredients` - 配料列表
///
/// # 返回值
///
/// 按名称排序的过敏原类别集合
pub fn detect(ingredients: &[Ingredient]) -> BTreeSet<AllergenCategory> {
    let texts: Vec<String> = ingredients.iter().map(haystack).collect();

    KEYWORDS
        .iter()
        .filter(|(_, keywords)| {
            texts
                .iter()
                .any(|text| keywords.iter().any(|k| text.contains(k)))
        })
        .map(|(category, _)| *category)
        .collect()
}

/// 配料列表是否包含指定类别的过敏原，命中即返回
pub fn contains_allergen(ingredients: &[Ingredient], category: AllergenCategory) -> bool {
    let keywords = keywords_for(category);
    ingredients.iter().any(|ingredient| {
        let text = haystack(ingredient);
        keywords.iter().any(|k| text.contains(k))
    })
}
