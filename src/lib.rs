//! rsegment - 基于正则规则的请求分段提供器

// 导出全局错误类型
pub use self::error::{SegmentError, SegResult};

// 导出配置模块
pub use self::config::{SegmentConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{
    SegmentRule, Segment, SegmentCollection, ContentVariant, RuleStore
};

// 导出匹配模块核心接口
pub use self::matcher::PatternMatcher;

// 导出提供器模块核心接口
pub use self::provider::{
    SegmentProvider,
    RuleSegmentProvider,
    RequestSegmenter,
    ProviderRegistry,
    ValueSource,
};

// 导出工具模块核心接口
pub use self::utils::HeaderConverter;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod matcher;
pub mod provider;
pub mod utils;
