//! 规则模块：负责分段规则的数据模型定义与文件存储
pub mod model;
pub mod store;

// 导出核心接口
pub use self::model::{ContentVariant, Segment, SegmentCollection, SegmentRule};
pub use self::store::RuleStore;
