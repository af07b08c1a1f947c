//! 全局配置管理，存储分段规则文件相关的可配置项

use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    // 应用数据根目录
    pub data_root: PathBuf,
    // 分段规则文件所在子目录
    pub segments_dir: String,
    // 规则文件后缀
    pub file_suffix: String,
    // 是否先写临时文件再重命名覆盖
    pub atomic_write: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("App_Data"),
            segments_dir: "Segments".to_string(),
            file_suffix: ".segments.json".to_string(),
            atomic_write: true,
        }
    }
}

impl SegmentConfig {
    /// 规则文件目录：<data_root>/<segments_dir>
    pub fn segments_path(&self) -> PathBuf {
        self.data_root.join(&self.segments_dir)
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> SegmentConfig {
        SegmentConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: SegmentConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SegmentConfig::default(),
        }
    }

    pub fn data_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_root = path.into();
        self
    }

    pub fn segments_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.segments_dir = dir.into();
        self
    }

    pub fn file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.file_suffix = suffix.into();
        self
    }

    pub fn atomic_write(mut self, atomic: bool) -> Self {
        self.config.atomic_write = atomic;
        self
    }

    pub fn build(self) -> SegmentConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.segments_path(), PathBuf::from("App_Data").join("Segments"));
        assert_eq!(config.file_suffix, ".segments.json");
        assert!(config.atomic_write);
    }

    #[test]
    fn test_custom_builder() {
        let config = ConfigManager::custom()
            .data_root("/srv/site/data")
            .segments_dir("Rules")
            .atomic_write(false)
            .build();

        assert_eq!(config.segments_path(), PathBuf::from("/srv/site/data/Rules"));
        assert!(!config.atomic_write);
        // 未设置的字段保持默认值
        assert_eq!(config.file_suffix, ".segments.json");
    }
}
