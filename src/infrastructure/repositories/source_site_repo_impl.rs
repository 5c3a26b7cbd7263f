// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::source_site::SourceSite;
use crate::domain::repositories::source_site_repository::SourceSiteRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::source_site as site_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 来源站点仓库实现
pub struct SourceSiteRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SourceSiteRepositoryImpl {
    /// 创建新的来源站点仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(m: site_entity::Model) -> Result<SourceSite, RepositoryError> {
        let categories: Vec<String> = serde_json::from_value(m.categories).map_err(|e| {
            RepositoryError::Database(DbErr::Custom(format!("Invalid site categories: {}", e)))
        })?;

        Ok(SourceSite {
            id: m.id,
            name: m.name,
            display_name: m.display_name,
            base_url: m.base_url,
            search_url_template: m.search_url_template,
            selector_hint: m.selector_hint,
            categories,
            is_active: m.is_active,
            last_scraped_at: m.last_scraped_at.map(Into::into),
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        })
    }
}

#[async_trait]
impl SourceSiteRepository for SourceSiteRepositoryImpl {
    async fn find_by_name(&self, name: &str) -> Result<Option<SourceSite>, RepositoryError> {
        site_entity::Entity::find()
            .filter(site_entity::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SourceSite>, RepositoryError> {
        site_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn find_active(&self, site_id: Option<Uuid>) -> Result<Vec<SourceSite>, RepositoryError> {
        let mut query = site_entity::Entity::find().filter(site_entity::Column::IsActive.eq(true));

        if let Some(id) = site_id {
            query = query.filter(site_entity::Column::Id.eq(id));
        }

        query
            .order_by_asc(site_entity::Column::Name)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Self::to_domain)
            .collect()
    }

    async fn upsert_by_name(&self, site: &SourceSite) -> Result<SourceSite, RepositoryError> {
        let existing = site_entity::Entity::find()
            .filter(site_entity::Column::Name.eq(site.name.as_str()))
            .one(self.db.as_ref())
            .await?;

        let saved = match existing {
            Some(m) => {
                let mut model: site_entity::ActiveModel = m.into();
                model.display_name = Set(site.display_name.clone());
                model.base_url = Set(site.base_url.clone());
                model.search_url_template = Set(site.search_url_template.clone());
                model.selector_hint = Set(site.selector_hint.clone());
                model.categories = Set(serde_json::json!(site.categories));
                model.is_active = Set(site.is_active);
                model.updated_at = Set(Utc::now().into());
                model.update(self.db.as_ref()).await?
            }
            None => {
                let model = site_entity::ActiveModel {
                    id: Set(site.id),
                    name: Set(site.name.clone()),
                    display_name: Set(site.display_name.clone()),
                    base_url: Set(site.base_url.clone()),
                    search_url_template: Set(site.search_url_template.clone()),
                    selector_hint: Set(site.selector_hint.clone()),
                    categories: Set(serde_json::json!(site.categories)),
                    is_active: Set(site.is_active),
                    last_scraped_at: Set(site.last_scraped_at.map(Into::into)),
                    created_at: Set(site.created_at.into()),
                    updated_at: Set(site.updated_at.into()),
                };
                model.insert(self.db.as_ref()).await?
            }
        };

        Self::to_domain(saved)
    }

    async fn touch_last_scraped(&self, id: Uuid) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let result = site_entity::Entity::update_many()
            .col_expr(
                site_entity::Column::LastScrapedAt,
                Expr::value::<Option<chrono::DateTime<chrono::FixedOffset>>>(Some(now.into())),
            )
            .col_expr(
                site_entity::Column::UpdatedAt,
                Expr::value::<chrono::DateTime<chrono::FixedOffset>>(now.into()),
            )
            .filter(site_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "source_site_repo_impl_test.rs"]
mod tests;
