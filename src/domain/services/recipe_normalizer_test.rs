// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::raw_recipe::RawRecipe;
    use crate::domain::services::recipe_normalizer::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_quantity_forms() {
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity("1.5"), Some(1.5));
        assert_eq!(parse_quantity("1/2"), Some(0.5));
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("½"), Some(0.5));
        assert_eq!(parse_quantity("1½"), Some(1.5));
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("some"), None);
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration_minutes("PT30M"), Some(30));
        assert_eq!(parse_duration_minutes("PT1H15M"), Some(75));
        assert_eq!(parse_duration_minutes("P0DT2H"), Some(120));
        assert_eq!(parse_duration_minutes("1 hour 30 mins"), Some(90));
        assert_eq!(parse_duration_minutes("45 minutes"), Some(45));
        assert_eq!(parse_duration_minutes("20"), Some(20));
        assert_eq!(parse_duration_minutes("PT0M"), None);
        assert_eq!(parse_duration_minutes("a while"), None);
    }

    #[test]
    fn test_parse_ingredient_line() {
        let flour = parse_ingredient_line("2 1/2 cups plain flour, sifted").unwrap();
        assert_eq!(flour.quantity, Some(2.5));
        assert_eq!(flour.unit.as_deref(), Some("cups"));
        assert_eq!(flour.name, "plain flour");
        assert_eq!(flour.original_text, "2 1/2 cups plain flour, sifted");

        let butter = parse_ingredient_line("200g unsalted butter (softened)").unwrap();
        assert_eq!(butter.quantity, Some(200.0));
        assert_eq!(butter.unit.as_deref(), Some("g"));
        assert_eq!(butter.name, "unsalted butter");

        let garlic = parse_ingredient_line("3 garlic cloves").unwrap();
        assert_eq!(garlic.quantity, Some(3.0));
        assert_eq!(garlic.unit, None);
        assert_eq!(garlic.name, "garlic cloves");

        let salt = parse_ingredient_line("Salt &amp; pepper").unwrap();
        assert_eq!(salt.quantity, None);
        assert_eq!(salt.name, "salt & pepper");

        assert!(parse_ingredient_line("   ").is_none());
    }

    #[test]
    fn test_normalize_json_ld_recipe() {
        let data = normalize(raw(json!({
            "name": " Chicken &amp; Leek Pie ",
            "description": "<p>A comforting   pie.</p>",
            "image": {"url": "https://img.example.com/pie.jpg"},
            "recipeYield": ["6", "6 servings"],
            "prepTime": "PT20M",
            "cookTime": "PT1H",
            "recipeCuisine": "british",
            "recipeCategory": "Dinner, Main course",
            "suitableForDiet": "https://schema.org/GlutenFreeDiet",
            "recipeIngredient": ["500g chicken thighs", "2 leeks, sliced", ""],
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Fry the leeks."},
                {"@type": "HowToStep", "text": "Add chicken."},
                {"@type": "HowToStep", "text": "Bake."}
            ],
            "nutrition": {
                "calories": "512 kcal",
                "proteinContent": "38 g",
                "carbohydrateContent": "30g",
                "fatContent": "25 g",
                "sodiumContent": "1.2 g"
            }
        })))
        .unwrap();

        assert_eq!(data.name, "Chicken & Leek Pie");
        assert_eq!(data.description.as_deref(), Some("A comforting pie."));
        assert_eq!(data.image_url.as_deref(), Some("https://img.example.com/pie.jpg"));
        assert_eq!(data.servings, Some(6));
        assert_eq!(data.prep_time_minutes, Some(20));
        assert_eq!(data.cook_time_minutes, Some(60));
        assert_eq!(data.total_time_minutes(), Some(80));
        assert_eq!(data.cuisine.as_deref(), Some("British"));
        assert_eq!(data.meal_categories, vec!["dinner", "main course"]);
        assert_eq!(data.dietary_tags, vec!["gluten-free"]);
        assert_eq!(data.ingredients.len(), 2);
        assert_eq!(data.ingredients[1].name, "leeks");
        assert_eq!(data.instructions.len(), 3);
        assert_eq!(data.instructions[2].step, 3);
        assert_eq!(data.nutrition.calories, Some(512.0));
        assert!(data.nutrition.has_macros());
        assert_eq!(data.nutrition.sodium_mg, Some(1200.0));
    }

    #[test]
    fn test_normalize_llm_shape() {
        let data = normalize(raw(json!({
            "title": "Pancakes",
            "servings": 4,
            "prep_time_minutes": 10,
            "ingredients": [
                {"name": "Plain Flour", "quantity": "1 1/2", "unit": "Cups", "original_text": "1 1/2 cups plain flour"},
                {"name": "", "original_text": "2 eggs"}
            ],
            "instructions": "Whisk everything.\nFry in batches.",
            "nutrition": {"calories": 250, "protein_g": 8}
        })))
        .unwrap();

        assert_eq!(data.servings, Some(4));
        assert_eq!(data.prep_time_minutes, Some(10));
        assert_eq!(data.ingredients[0].name, "plain flour");
        assert_eq!(data.ingredients[0].quantity, Some(1.5));
        assert_eq!(data.ingredients[0].unit.as_deref(), Some("cups"));
        assert_eq!(data.ingredients[1].name, "eggs");
        assert_eq!(data.instructions.len(), 2);
        assert_eq!(data.meal_categories, vec![DEFAULT_MEAL_CATEGORY]);
        assert_eq!(data.nutrition.calories, Some(250.0));
        assert!(!data.nutrition.has_macros());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = normalize(raw(json!({"name": "  ", "ingredients": ["1 egg"]}))).unwrap_err();
        assert_eq!(err, NormalizationError::MissingName);
        assert_eq!(err.to_string(), "Missing recipe name");
    }

    #[test]
    fn test_missing_ingredients_is_rejected() {
        let err = normalize(raw(json!({"name": "Air", "ingredients": []}))).unwrap_err();
        assert_eq!(err, NormalizationError::MissingIngredients);
        assert_eq!(err.to_string(), "Missing ingredients");

        let err = normalize(raw(json!({"name": "Air"}))).unwrap_err();
        assert_eq!(err, NormalizationError::MissingIngredients);
    }
}
