// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层（SeaORM）提供。
///
/// 包含的仓库接口：
/// - 来源站点仓库（source_site_repository）：站点配置的读取与初始化
/// - 采集任务仓库（scraping_job_repository）：任务台账的创建、检查点与结束
/// - 主食谱仓库（master_recipe_repository）：去重检查与食谱持久化
pub mod master_recipe_repository;
pub mod scraping_job_repository;
pub mod source_site_repository;

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
}
