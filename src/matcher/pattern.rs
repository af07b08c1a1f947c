//! 匹配策略模型
//! 规则表达式与当前值之间的匹配方式，默认正则

use regex::Regex;

use crate::error::SegResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternMatcher {
    #[default]
    Regex, // 正则匹配（默认语义：非多行、大小写敏感、非锚定）
    Exact, // 精确匹配
    Contains, // 包含匹配（忽略大小写）
    StartsWith, // 前缀匹配（忽略大小写）
}

impl PatternMatcher {
    /// 匹配判断；正则每次调用时编译，编译失败直接返回错误
    pub fn is_match(&self, pattern: &str, input: &str) -> SegResult<bool> {
        Ok(match self {
            PatternMatcher::Regex => Regex::new(pattern)?.is_match(input),
            PatternMatcher::Exact => input == pattern,
            PatternMatcher::Contains => input.to_lowercase().contains(&pattern.to_lowercase()),
            PatternMatcher::StartsWith => input.to_lowercase().starts_with(&pattern.to_lowercase()),
        })
    }

    /// 策略描述（用于日志输出）
    pub fn describe(&self) -> &'static str {
        match self {
            PatternMatcher::Regex => "regex",
            PatternMatcher::Exact => "exact",
            PatternMatcher::Contains => "contains",
            PatternMatcher::StartsWith => "starts_with",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentError;

    #[test]
    fn test_regex_is_unanchored() {
        let m = PatternMatcher::Regex;
        assert!(m.is_match(r"facebook\.com", "https://facebook.com/x").unwrap());
        assert!(!m.is_match(r"facebook\.com", "https://example.com").unwrap());
        assert!(!m.is_match(r"^facebook", "https://facebook.com").unwrap());
    }

    #[test]
    fn test_regex_is_case_sensitive() {
        let m = PatternMatcher::Regex;
        assert!(!m.is_match("Facebook", "https://facebook.com").unwrap());
        assert!(m.is_match("(?i)Facebook", "https://facebook.com").unwrap());
    }

    #[test]
    fn test_regex_is_not_multiline() {
        // 测试场景：^/$ 只锚定整个输入的首尾
        let m = PatternMatcher::Regex;
        assert!(!m.is_match("^b$", "a\nb\nc").unwrap());
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert!(PatternMatcher::Regex.is_match("", "anything").unwrap());
    }

    #[test]
    fn test_malformed_regex_is_error() {
        let result = PatternMatcher::Regex.is_match("(unclosed", "x");
        assert!(matches!(result, Err(SegmentError::RegexCompileError(_))));
    }

    #[test]
    fn test_string_strategies() {
        assert!(PatternMatcher::Exact.is_match("en-US", "en-US").unwrap());
        assert!(!PatternMatcher::Exact.is_match("en", "en-US").unwrap());
        assert!(PatternMatcher::Contains.is_match("GOOGLE", "www.google.com").unwrap());
        assert!(PatternMatcher::StartsWith.is_match("HTTPS://", "https://a.b").unwrap());
        assert!(!PatternMatcher::StartsWith.is_match("google", "www.google.com").unwrap());
        // 非正则策略不会编译表达式
        assert!(!PatternMatcher::Contains.is_match("(unclosed", "x").unwrap());
    }

    #[test]
    fn test_describe() {
        assert_eq!(PatternMatcher::default().describe(), "regex");
        assert_eq!(PatternMatcher::Exact.describe(), "exact");
        assert_eq!(PatternMatcher::Contains.describe(), "contains");
        assert_eq!(PatternMatcher::StartsWith.describe(), "starts_with");
    }
}
