//! 提供器模块：请求取值、规则匹配、分段汇总与变体上报
pub mod provider;
pub mod extractors;
pub mod registry;

// 导出核心接口
pub use self::provider::{RuleSegmentProvider, SegmentProvider};
pub use self::extractors::ValueSource;
pub use self::registry::{ProviderRegistry, RequestSegmenter};
