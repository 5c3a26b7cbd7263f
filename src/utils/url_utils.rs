// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 去掉前导 `www.` 的小写主机名
pub fn normalized_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let h = h.to_ascii_lowercase();
        h.strip_prefix("www.").map(str::to_string).unwrap_or(h)
    })
}

/// 两个URL是否属于同一站点（忽略 `www.` 前缀）
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (normalized_host(a), normalized_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
