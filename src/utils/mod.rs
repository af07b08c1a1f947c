//! 工具模块：请求头转换等通用辅助
pub mod header_converter;

pub use self::header_converter::HeaderConverter;
