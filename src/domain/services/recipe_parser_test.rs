// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::raw_recipe::RawRecipe;
    use crate::domain::services::recipe_parser::{
        FallbackRecipeParser, JsonLdRecipeParser, ParserError, RecipeParser,
    };
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        pub Parser {}
        #[async_trait]
        impl RecipeParser for Parser {
            async fn parse(&self, url: &str, html: &str) -> Result<Option<RawRecipe>, ParserError>;
        }
    }

    const URL: &str = "https://example.com/recipes/pie";

    fn recipe(name: &str, ingredients: &[&str]) -> RawRecipe {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "recipeIngredient": ingredients,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_json_ld_top_level_recipe() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{"@type": "Organization", "name": "Example"}</script>
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@type": "Recipe", "name": "Fish Pie",
                 "recipeIngredient": ["400g cod", "500ml milk"]}
            </script>
            </head><body></body></html>
        "#;

        let raw = JsonLdRecipeParser::new().parse(URL, html).await.unwrap().unwrap();

        assert_eq!(raw.name.as_deref(), Some("Fish Pie"));
        assert_eq!(raw.ingredients.map(|i| i.into_vec().len()), Some(2));
    }

    #[tokio::test]
    async fn test_json_ld_graph_and_type_array() {
        let html = r#"
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": ["Recipe", "NewsArticle"], "name": "Risotto", "recipeIngredient": ["rice"]}
            ]}
            </script>
        "#;

        let raw = JsonLdRecipeParser::new().parse(URL, html).await.unwrap().unwrap();

        assert_eq!(raw.name.as_deref(), Some("Risotto"));
    }

    #[tokio::test]
    async fn test_json_ld_skips_malformed_blocks() {
        let html = r#"
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">[{"@type": "Recipe", "name": "Soup"}]</script>
        "#;

        let raw = JsonLdRecipeParser::new().parse(URL, html).await.unwrap().unwrap();
        assert_eq!(raw.name.as_deref(), Some("Soup"));
    }

    #[tokio::test]
    async fn test_json_ld_without_recipe_returns_none() {
        let html = "<html><body><p>No structured data here.</p></body></html>";

        let raw = JsonLdRecipeParser::new().parse(URL, html).await.unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_fallback_prefers_usable_primary_result() {
        let mut primary = MockParser::new();
        primary
            .expect_parse()
            .times(1)
            .returning(|_, _| Ok(Some(recipe("Pie", &["pastry"]))));
        let mut secondary = MockParser::new();
        secondary.expect_parse().times(0);

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let raw = parser.parse(URL, "<html></html>").await.unwrap().unwrap();

        assert_eq!(raw.name.as_deref(), Some("Pie"));
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_incomplete() {
        let mut primary = MockParser::new();
        primary
            .expect_parse()
            .returning(|_, _| Ok(Some(recipe("Pie", &[]))));
        let mut secondary = MockParser::new();
        secondary
            .expect_parse()
            .times(1)
            .returning(|_, _| Ok(Some(recipe("Pie from LLM", &["pastry"]))));

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let raw = parser.parse(URL, "<html></html>").await.unwrap().unwrap();

        assert_eq!(raw.name.as_deref(), Some("Pie from LLM"));
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_fails() {
        let mut primary = MockParser::new();
        primary
            .expect_parse()
            .returning(|_, _| Err(ParserError::NotConfigured("offline".to_string())));
        let mut secondary = MockParser::new();
        secondary.expect_parse().returning(|_, _| Ok(None));

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let raw = parser.parse(URL, "<html></html>").await.unwrap();

        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_fallback_reports_no_data() {
        let mut primary = MockParser::new();
        primary.expect_parse().returning(|_, _| Ok(None));
        let mut secondary = MockParser::new();
        secondary
            .expect_parse()
            .returning(|_, _| Err(ParserError::NotConfigured("no API key".to_string())));

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let raw = parser.parse(URL, "<html></html>").await.unwrap();

        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_fallback_keeps_partial_primary_result() {
        let mut primary = MockParser::new();
        primary
            .expect_parse()
            .returning(|_, _| Ok(Some(recipe("Pie", &[]))));
        let mut secondary = MockParser::new();
        secondary
            .expect_parse()
            .returning(|_, _| Err(ParserError::NotConfigured("no API key".to_string())));

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let raw = parser.parse(URL, "<html></html>").await.unwrap().unwrap();

        assert_eq!(raw.name.as_deref(), Some("Pie"));
    }

    #[tokio::test]
    async fn test_fallback_service_error_is_propagated() {
        let mut primary = MockParser::new();
        primary.expect_parse().returning(|_, _| Ok(None));
        let mut secondary = MockParser::new();
        secondary
            .expect_parse()
            .returning(|_, _| Err(ParserError::Service(anyhow::anyhow!("HTTP 429"))));

        let parser = FallbackRecipeParser::new(Arc::new(primary), Arc::new(secondary));
        let err = parser.parse(URL, "<html></html>").await.unwrap_err();

        assert!(err.to_string().contains("429"));
    }
}
