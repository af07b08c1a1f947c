//! 内置取值来源：Referer / Header / Cookie / 查询参数 / URL / 路径

use std::fmt;
use std::str::FromStr;

use http::header::REFERER;
use http::request::Parts;
use url::Url;

use super::provider::SegmentProvider;
use crate::error::SegmentError;
use crate::utils::HeaderConverter;

/// 内置取值来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Referer 请求头
    Referrer,
    /// 清洗后的完整 URL
    Url,
    /// 清洗后 URL 的路径部分
    Path,
    /// 指定请求头的第一个非空值
    Header(String),
    /// 指定 Cookie
    Cookie(String),
    /// 清洗后 URL 中指定查询参数的第一个值
    Query(String),
}

impl SegmentProvider for ValueSource {
    fn current_value(&self, url: &Url, request: &Parts) -> Option<String> {
        match self {
            ValueSource::Referrer => HeaderConverter::first_value(&request.headers, REFERER.as_str()),
            ValueSource::Url => Some(url.as_str().to_string()),
            ValueSource::Path => Some(url.path().to_string()),
            ValueSource::Header(name) => HeaderConverter::first_value(&request.headers, name),
            ValueSource::Cookie(name) => HeaderConverter::cookies(&request.headers).remove(name),
            ValueSource::Query(name) => url
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned()),
        }
    }
}

impl FromStr for ValueSource {
    type Err = SegmentError;

    /// 解析 `referrer` / `url` / `path` / `header:NAME` / `cookie:NAME` / `query:NAME`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        let named = |arg: Option<&str>| -> Result<String, SegmentError> {
            match arg {
                Some(name) if !name.is_empty() => Ok(name.to_string()),
                _ => Err(SegmentError::InvalidInput(format!("取值来源缺少名称：{}", s))),
            }
        };

        match (kind.to_ascii_lowercase().as_str(), arg) {
            ("referrer" | "referer", None) => Ok(ValueSource::Referrer),
            ("url", None) => Ok(ValueSource::Url),
            ("path", None) => Ok(ValueSource::Path),
            ("header", arg) => Ok(ValueSource::Header(named(arg)?)),
            ("cookie", arg) => Ok(ValueSource::Cookie(named(arg)?)),
            ("query", arg) => Ok(ValueSource::Query(named(arg)?)),
            _ => Err(SegmentError::InvalidInput(format!("未知取值来源：{}", s))),
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Referrer => write!(f, "referrer"),
            ValueSource::Url => write!(f, "url"),
            ValueSource::Path => write!(f, "path"),
            ValueSource::Header(name) => write!(f, "header:{}", name),
            ValueSource::Cookie(name) => write!(f, "cookie:{}", name),
            ValueSource::Query(name) => write!(f, "query:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> Parts {
        http::Request::builder()
            .uri("/shop/shoes?color=red&color=blue&q=%E9%9E%8B")
            .header("Referer", "https://www.google.com/search?q=shoes")
            .header("X-Country", "")
            .header("X-Country", "NL")
            .header("Cookie", "visitor=returning; lang=en")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn url() -> Url {
        Url::parse("https://shop.test/shop/shoes?color=red&color=blue&q=%E9%9E%8B").unwrap()
    }

    fn value(source: &str) -> Option<String> {
        source.parse::<ValueSource>().unwrap().current_value(&url(), &parts())
    }

    #[test]
    fn test_builtin_values() {
        assert_eq!(value("referrer").as_deref(), Some("https://www.google.com/search?q=shoes"));
        assert_eq!(value("url").as_deref(), Some(url().as_str()));
        assert_eq!(value("path").as_deref(), Some("/shop/shoes"));
        assert_eq!(value("header:x-country").as_deref(), Some("NL"));
        assert_eq!(value("cookie:visitor").as_deref(), Some("returning"));
        assert_eq!(value("query:color").as_deref(), Some("red"));
        assert_eq!(value("query:q").as_deref(), Some("鞋"));
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(value("header:x-missing"), None);
        assert_eq!(value("cookie:missing"), None);
        assert_eq!(value("query:missing"), None);

        let bare = http::Request::builder().body(()).unwrap().into_parts().0;
        assert_eq!(ValueSource::Referrer.current_value(&url(), &bare), None);
    }

    #[test]
    fn test_referrer_rule_matching() {
        let source = ValueSource::Referrer;
        assert!(source.is_match(r"google\.", &url(), &parts()).unwrap());
        assert!(!source.is_match(r"bing\.", &url(), &parts()).unwrap());
    }

    #[test]
    fn test_parse_sources() {
        assert_eq!("Referer".parse::<ValueSource>().unwrap(), ValueSource::Referrer);
        assert_eq!(
            "header: Accept-Language".parse::<ValueSource>().unwrap(),
            ValueSource::Header("Accept-Language".to_string())
        );
        assert!("cookie:".parse::<ValueSource>().is_err());
        assert!("url:extra".parse::<ValueSource>().is_err());
        assert!("geoip".parse::<ValueSource>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["referrer", "url", "path", "header:X-A", "cookie:c", "query:q"] {
            assert_eq!(s.parse::<ValueSource>().unwrap().to_string(), s);
        }
    }
}
