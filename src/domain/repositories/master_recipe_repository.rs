// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::master_recipe::MasterRecipe;
use async_trait::async_trait;
use uuid::Uuid;

/// 主食谱仓库特质
#[async_trait]
pub trait MasterRecipeRepository: Send + Sync {
    /// 检查来源URL是否已导入
    async fn exists_by_source_url(&self, source_url: &str) -> Result<bool, RepositoryError>;

    /// 创建食谱
    ///
    /// # 返回值
    ///
    /// * `Ok(MasterRecipe)` - 创建成功
    /// * `Err(RepositoryError::AlreadyExists)` - 来源URL违反唯一约束
    /// * `Err(RepositoryError)` - 其他数据库错误
    async fn create(&self, recipe: &MasterRecipe) -> Result<MasterRecipe, RepositoryError>;

    /// 根据ID查找食谱
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MasterRecipe>, RepositoryError>;

    /// 统计某站点已导入的食谱数量
    async fn count_by_site(&self, source_site_id: Uuid) -> Result<u64, RepositoryError>;
}
