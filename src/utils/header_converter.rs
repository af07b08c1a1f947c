//! Header格式转换工具
//! 请求头取值与 Cookie 解析

use std::collections::HashMap;
use http::header::{HeaderMap, COOKIE};
use tracing::debug;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 获取指定Header的第一个非空值（名称不区分大小写，非 UTF-8 字节按替换字符处理）
    pub fn first_value(header_map: &HeaderMap, name: &str) -> Option<String> {
        header_map
            .get_all(name.to_ascii_lowercase().as_str())
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .find(|v| !v.trim().is_empty())
            .map(|v| v.trim().to_string())
    }

    /// 解析所有 Cookie 头为 name -> value，同名 Cookie 保留第一个
    pub fn cookies(header_map: &HeaderMap) -> HashMap<String, String> {
        let mut cookies = HashMap::new();

        for header in header_map.get_all(COOKIE).iter() {
            let Ok(raw) = header.to_str() else {
                debug!("Cookie头包含非ASCII字符，已跳过");
                continue;
            };

            for pair in raw.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let value = value.trim().trim_matches('"');
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        cookies
    }
}
