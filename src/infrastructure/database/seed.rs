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

use crate::config::settings::SiteSettings;
use crate::domain::repositories::source_site_repository::SourceSiteRepository;
use crate::domain::repositories::RepositoryError;
use tracing::{info, warn};

/// 按配置初始化来源站点
///
/// 以站点名称为幂等键执行插入或更新，重复调用不会产生重复记录。
///
/// # 参数
///
/// * `repo` - 来源站点仓库
/// * `sites` - 配置中声明的站点
///
/// # 返回值
///
/// * `Ok(usize)` - 写入的站点数量
/// * `Err(RepositoryError)` - 写入失败
pub async fn seed_source_sites(
    repo: &dyn SourceSiteRepository,
    sites: &[SiteSettings],
) -> Result<usize, RepositoryError> {
    if sites.is_empty() {
        warn!("No source sites configured");
        return Ok(0);
    }

    for site in sites {
        let saved = repo.upsert_by_name(&site.to_source_site()).await?;
        info!(
            site = %saved.name,
            active = saved.is_active,
            categories = saved.categories.len(),
            "Source site seeded"
        );
    }
    Ok(sites.len())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
