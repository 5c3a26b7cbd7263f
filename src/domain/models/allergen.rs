// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 过敏原类别
///
/// 十二个固定的基于关键词检测的危害类别。变体按字母顺序声明，
/// 因此 `BTreeSet<AllergenCategory>` 的迭代顺序与名称排序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergenCategory {
    Celery,
    Dairy,
    Eggs,
    Fish,
    Gluten,
    Mustard,
    Nuts,
    Peanuts,
    Sesame,
    Shellfish,
    Soy,
    Sulphites,
}

impl AllergenCategory {
    /// 所有类别
    pub const ALL: [AllergenCategory; 12] = [
        AllergenCategory::Celery,
        AllergenCategory::Dairy,
        AllergenCategory::Eggs,
        AllergenCategory::Fish,
        AllergenCategory::Gluten,
        AllergenCategory::Mustard,
        AllergenCategory::Nuts,
        AllergenCategory::Peanuts,
        AllergenCategory::Sesame,
        AllergenCategory::Shellfish,
        AllergenCategory::Soy,
        AllergenCategory::Sulphites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllergenCategory::Celery => "celery",
            AllergenCategory::Dairy => "dairy",
            AllergenCategory::Eggs => "eggs",
            AllergenCategory::Fish => "fish",
            AllergenCategory::Gluten => "gluten",
            AllergenCategory::Mustard => "mustard",
            AllergenCategory::Nuts => "nuts",
            AllergenCategory::Peanuts => "peanuts",
            AllergenCategory::Sesame => "sesame",
            AllergenCategory::Shellfish => "shellfish",
            AllergenCategory::Soy => "soy",
            AllergenCategory::Sulphites => "sulphites",
        }
    }
}

impl fmt::Display for AllergenCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllergenCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AllergenCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}
