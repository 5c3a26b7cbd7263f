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
                    .table(ScrapingJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapingJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapingJobs::SiteId).uuid())
                    .col(ColumnDef::new(ScrapingJobs::Category).string())
                    .col(ColumnDef::new(ScrapingJobs::Status).string().not_null())
                    .col(
                        ColumnDef::new(ScrapingJobs::UrlsDiscovered)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UrlsProcessed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UrlsSucceeded)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UrlsFailed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UrlsSkipped)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ScrapingJobs::ErrorLog).json().not_null())
                    .col(ColumnDef::new(ScrapingJobs::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScrapingJobs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScrapingJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UpdatedAt)
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
                    .name("idx_scraping_jobs_status_created")
                    .table(ScrapingJobs::Table)
                    .col(ScrapingJobs::Status)
                    .col(ScrapingJobs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapingJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapingJobs {
    Table,
    Id,
    SiteId,
    Category,
    Status,
    UrlsDiscovered,
    UrlsProcessed,
    UrlsSucceeded,
    UrlsFailed,
    UrlsSkipped,
    ErrorLog,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
