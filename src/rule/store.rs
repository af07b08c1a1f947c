//! 规则存储管理
//! 负责单个提供器规则文件的 JSON 读写，读共享、写独占

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::model::SegmentRule;
use crate::config::SegmentConfig;
use crate::error::{SegResult, SegmentError};

/// 提供器 Key 只允许出现在文件名中的安全字符
static PROVIDER_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap()
});

/// 规则存储（每个提供器实例持有一个）
#[derive(Debug)]
pub struct RuleStore {
    provider_key: String,
    path: PathBuf,
    atomic_write: bool,
    lock: RwLock<()>,
}

impl RuleStore {
    /// 创建规则存储，文件路径：<data_root>/<segments_dir>/<provider_key><file_suffix>
    pub fn new(config: &SegmentConfig, provider_key: impl Into<String>) -> SegResult<Self> {
        let provider_key = provider_key.into();
        if !PROVIDER_KEY_RE.is_match(&provider_key) {
            return Err(SegmentError::InvalidInput(format!(
                "提供器Key不合法：{:?}",
                provider_key
            )));
        }

        let file_name = format!("{}{}", provider_key, config.file_suffix);
        let path = config.segments_path().join(file_name);

        Ok(Self {
            provider_key,
            path,
            atomic_write: config.atomic_write,
            lock: RwLock::new(()),
        })
    }

    pub fn provider_key(&self) -> &str {
        &self.provider_key
    }

    /// 规则文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取规则列表；文件不存在时返回空列表，Key 为空的规则被过滤
    pub fn read(&self) -> SegResult<Vec<SegmentRule>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("规则文件不存在，返回空规则：{}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let rules: Vec<SegmentRule> = serde_json::from_slice(&data)?;
        let total = rules.len();
        let rules: Vec<SegmentRule> = rules.into_iter().filter(SegmentRule::has_key).collect();

        if rules.len() < total {
            warn!(
                "[{}] 丢弃{}条Key为空的规则",
                self.provider_key,
                total - rules.len()
            );
        }
        debug!("[{}] 规则读取成功，规则数：{}", self.provider_key, rules.len());

        Ok(rules)
    }

    /// 整体覆盖写入规则列表，目录不存在时自动创建
    pub fn write(&self, rules: &[SegmentRule]) -> SegResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let data = serde_json::to_vec_pretty(rules)?;

        if self.atomic_write {
            let mut tmp_name = self.path.as_os_str().to_owned();
            tmp_name.push(".tmp");
            let tmp_path = PathBuf::from(tmp_name);

            // 写入或重命名任一步失败都清理临时文件
            if let Err(e) = fs::write(&tmp_path, &data).and_then(|_| fs::rename(&tmp_path, &self.path)) {
                let _ = fs::remove_file(&tmp_path);
                return Err(e.into());
            }
        } else {
            fs::write(&self.path, &data)?;
        }

        debug!(
            "[{}] 规则写入成功，规则数：{}，数据大小：{} 字节",
            self.provider_key,
            rules.len(),
            data.len()
        );
        Ok(())
    }
}
