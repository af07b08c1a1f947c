//! 匹配模块：规则表达式的匹配策略
pub mod pattern;

pub use self::pattern::PatternMatcher;
