// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MasterRecipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterRecipes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // The dedup key: concurrent imports of one URL collide here
                    .col(
                        ColumnDef::new(MasterRecipes::SourceUrl)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MasterRecipes::SourceSiteId).uuid().not_null())
                    .col(
                        ColumnDef::new(MasterRecipes::ScrapedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterRecipes::Name).string().not_null())
                    .col(ColumnDef::new(MasterRecipes::Description).text())
                    .col(ColumnDef::new(MasterRecipes::ImageUrl).string())
                    .col(ColumnDef::new(MasterRecipes::Servings).integer())
                    .col(ColumnDef::new(MasterRecipes::PrepTimeMinutes).integer())
                    .col(ColumnDef::new(MasterRecipes::CookTimeMinutes).integer())
                    .col(ColumnDef::new(MasterRecipes::TotalTimeMinutes).integer())
                    .col(ColumnDef::new(MasterRecipes::Cuisine).string())
                    .col(ColumnDef::new(MasterRecipes::MealCategories).json().not_null())
                    .col(ColumnDef::new(MasterRecipes::DietaryTags).json().not_null())
                    .col(ColumnDef::new(MasterRecipes::Ingredients).json().not_null())
                    .col(ColumnDef::new(MasterRecipes::IngredientNames).json().not_null())
                    .col(ColumnDef::new(MasterRecipes::Instructions).json().not_null())
                    .col(ColumnDef::new(MasterRecipes::Calories).double())
                    .col(ColumnDef::new(MasterRecipes::ProteinG).double())
                    .col(ColumnDef::new(MasterRecipes::CarbsG).double())
                    .col(ColumnDef::new(MasterRecipes::FatG).double())
                    .col(ColumnDef::new(MasterRecipes::FiberG).double())
                    .col(ColumnDef::new(MasterRecipes::SugarG).double())
                    .col(ColumnDef::new(MasterRecipes::SodiumMg).double())
                    .col(
                        ColumnDef::new(MasterRecipes::NutritionSource)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterRecipes::Allergens).json().not_null())
                    .col(
                        ColumnDef::new(MasterRecipes::QualityScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MasterRecipes::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MasterRecipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_master_recipes_site")
                    .table(MasterRecipes::Table)
                    .col(MasterRecipes::SourceSiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_master_recipes_active_score")
                    .table(MasterRecipes::Table)
                    .col(MasterRecipes::IsActive)
                    .col(MasterRecipes::QualityScore)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MasterRecipes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MasterRecipes {
    Table,
    Id,
    SourceUrl,
    SourceSiteId,
    ScrapedAt,
    Name,
    Description,
    ImageUrl,
    Servings,
    PrepTimeMinutes,
    CookTimeMinutes,
    TotalTimeMinutes,
    Cuisine,
    MealCategories,
    DietaryTags,
    Ingredients,
    IngredientNames,
    Instructions,
    Calories,
    ProteinG,
    CarbsG,
    FatG,
    FiberG,
    SugarG,
    SodiumMg,
    NutritionSource,
    Allergens,
    QualityScore,
    IsActive,
    CreatedAt,
}
