// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了采集管道的核心业务实体，包括：
/// - 来源站点（source_site）：可配置的外部食谱网站
/// - 采集任务（scraping_job）：一次编排运行的进度台账
/// - 主食谱（master_recipe）：去重后持久化的标准食谱记录
/// - 过敏原（allergen）：固定的十二类过敏原
/// - 原始食谱（raw_recipe）：解析服务返回的部分结构数据
pub mod allergen;
pub mod master_recipe;
pub mod raw_recipe;
pub mod scraping_job;
pub mod source_site;
