// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 食谱采集管道的核心业务逻辑，按数据流向排列：
/// - URL发现（url_discoverer）：分页抓取站点搜索结果，提取候选食谱链接
/// - 食谱解析（recipe_parser）：页面内嵌 JSON-LD 解析，以及解析器的降级组合
/// - LLM服务（llm_service）：基于大语言模型的页面解析和营养估算
/// - 规范化（recipe_normalizer）：把原始解析结果转换为标准食谱数据
/// - 过敏原分类（allergen_classifier）：基于配料关键词检测过敏原
/// - 质量评分（quality_scorer）：按完整度计算 0-100 的质量分
/// - 食谱导入（recipe_importer）：单个URL的抓取、解析、评分和持久化
/// - 任务编排（job_orchestrator）：跨站点和分类的一次完整采集运行
///
/// 分类器、评分器和规范化器是无状态的纯函数，其余服务通过
/// 仓库和引擎的 trait 对象访问外部系统。
pub mod allergen_classifier;
pub mod job_orchestrator;
pub mod llm_service;
pub mod quality_scorer;
pub mod recipe_importer;
pub mod recipe_normalizer;
pub mod recipe_parser;
pub mod url_discoverer;
