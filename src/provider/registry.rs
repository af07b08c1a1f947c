//! 提供器注册表：宿主请求管线持有的全部分段提供器

use std::collections::HashSet;
use std::sync::Arc;

use http::request::Parts;
use tracing::debug;
use url::Url;

use crate::error::{SegResult, SegmentError};
use crate::rule::{ContentVariant, SegmentCollection, SegmentRule};

/// 对宿主暴露的分段接口（对象安全，可放入注册表）
pub trait RequestSegmenter: Send + Sync {
    /// 提供器配置 Key（决定规则文件名）
    fn provider_key(&self) -> &str;

    /// 读取当前规则配置
    fn read_segment_configuration(&self) -> SegResult<Vec<SegmentRule>>;

    /// 整体覆盖规则配置
    fn write_segment_configuration(&self, rules: &[SegmentRule]) -> SegResult<()>;

    /// 计算当前请求命中的分段
    fn get_segments_for_request(
        &self,
        original_url: &Url,
        cleaned_url: &Url,
        request: &Parts,
    ) -> SegResult<SegmentCollection>;

    /// 可分配的内容变体
    fn assignable_content_variants(&self) -> SegResult<Vec<ContentVariant>>;
}

/// 提供器注册表
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RequestSegmenter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册提供器，Key 重复时报错
    pub fn register(&mut self, segmenter: Arc<dyn RequestSegmenter>) -> SegResult<()> {
        if self.get(segmenter.provider_key()).is_some() {
            return Err(SegmentError::InvalidInput(format!(
                "提供器Key重复注册：{}",
                segmenter.provider_key()
            )));
        }
        debug!("注册分段提供器：{}", segmenter.provider_key());
        self.providers.push(segmenter);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, provider_key: &str) -> Option<Arc<dyn RequestSegmenter>> {
        self.providers
            .iter()
            .find(|p| p.provider_key() == provider_key)
            .cloned()
    }

    /// 获取提供器，不存在时报错
    pub fn require(&self, provider_key: &str) -> SegResult<Arc<dyn RequestSegmenter>> {
        self.get(provider_key)
            .ok_or_else(|| SegmentError::ProviderNotFound(provider_key.to_string()))
    }

    /// 按注册顺序汇总所有提供器的分段，任一提供器出错即中止
    pub fn get_segments_for_request(
        &self,
        original_url: &Url,
        cleaned_url: &Url,
        request: &Parts,
    ) -> SegResult<SegmentCollection> {
        let mut segments = SegmentCollection::new();
        for provider in &self.providers {
            segments.extend(provider.get_segments_for_request(original_url, cleaned_url, request)?);
        }
        Ok(segments)
    }

    /// 所有提供器可分配变体的并集
    pub fn assignable_content_variants(&self) -> SegResult<Vec<ContentVariant>> {
        let mut seen = HashSet::new();
        let mut variants = Vec::new();
        for provider in &self.providers {
            for variant in provider.assignable_content_variants()? {
                if seen.insert(variant.clone()) {
                    variants.push(variant);
                }
            }
        }
        Ok(variants)
    }
}
