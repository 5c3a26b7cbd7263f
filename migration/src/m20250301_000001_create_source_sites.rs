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
                    .table(SourceSites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SourceSites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SourceSites::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SourceSites::DisplayName).string().not_null())
                    .col(ColumnDef::new(SourceSites::BaseUrl).string().not_null())
                    .col(
                        ColumnDef::new(SourceSites::SearchUrlTemplate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourceSites::SelectorHint).string())
                    .col(ColumnDef::new(SourceSites::Categories).json().not_null())
                    .col(
                        ColumnDef::new(SourceSites::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SourceSites::LastScrapedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(SourceSites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SourceSites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SourceSites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SourceSites {
    Table,
    Id,
    Name,
    DisplayName,
    BaseUrl,
    SearchUrlTemplate,
    SelectorHint,
    Categories,
    IsActive,
    LastScrapedAt,
    CreatedAt,
    UpdatedAt,
}
