//! 分段提供器核心：取值 + 匹配 + 规则汇总

use std::collections::HashSet;

use http::request::Parts;
use tracing::debug;
use url::Url;

use super::registry::RequestSegmenter;
use crate::config::SegmentConfig;
use crate::error::SegResult;
use crate::matcher::PatternMatcher;
use crate::rule::{ContentVariant, RuleStore, SegmentCollection, SegmentRule};

/// 分段提供器：只需实现 `current_value`，匹配方式可按需覆盖
pub trait SegmentProvider: Send + Sync {
    /// 从请求中提取当前值，返回 None 表示无值（任何规则都不命中）
    fn current_value(&self, url: &Url, request: &Parts) -> Option<String>;

    /// 表达式匹配策略，默认正则
    fn pattern_matcher(&self) -> PatternMatcher {
        PatternMatcher::Regex
    }

    /// 判断规则表达式是否命中当前请求
    fn is_match(&self, pattern: &str, url: &Url, request: &Parts) -> SegResult<bool> {
        let Some(value) = self.current_value(url, request) else {
            return Ok(false);
        };
        self.pattern_matcher().is_match(pattern, &value)
    }

    /// 提供器自身声明的基础变体
    fn base_variants(&self) -> Vec<ContentVariant> {
        Vec::new()
    }
}

/// 基于规则文件的分段提供器
#[derive(Debug)]
pub struct RuleSegmentProvider<P> {
    provider: P,
    store: RuleStore,
}

impl<P: SegmentProvider> RuleSegmentProvider<P> {
    pub fn new(config: &SegmentConfig, provider_key: impl Into<String>, provider: P) -> SegResult<Self> {
        Ok(Self {
            provider,
            store: RuleStore::new(config, provider_key)?,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }
}

impl<P: SegmentProvider> RequestSegmenter for RuleSegmentProvider<P> {
    fn provider_key(&self) -> &str {
        self.store.provider_key()
    }

    fn read_segment_configuration(&self) -> SegResult<Vec<SegmentRule>> {
        self.store.read()
    }

    fn write_segment_configuration(&self, rules: &[SegmentRule]) -> SegResult<()> {
        self.store.write(rules)
    }

    fn get_segments_for_request(
        &self,
        original_url: &Url,
        cleaned_url: &Url,
        request: &Parts,
    ) -> SegResult<SegmentCollection> {
        let rules = self.store.read()?;
        let mut segments = SegmentCollection::new();

        for rule in &rules {
            if self.provider.is_match(&rule.match_expression, cleaned_url, request)? {
                debug!(
                    "[{}] 规则命中：Key={}，Value={}，规则={}，策略={}",
                    self.store.provider_key(),
                    rule.key,
                    rule.value,
                    rule.match_expression,
                    self.provider.pattern_matcher().describe()
                );
                segments.push(rule.to_segment());
            }
        }

        debug!(
            "[{}] 请求 {} 分段计算完成，命中{}/{}条规则",
            self.store.provider_key(),
            original_url,
            segments.len(),
            rules.len()
        );
        Ok(segments)
    }

    fn assignable_content_variants(&self) -> SegResult<Vec<ContentVariant>> {
        let rules = self.store.read()?;
        let mut seen = HashSet::new();

        // 基础变体在前，规则变体在后；完全相同的变体只保留一个
        let variants: Vec<ContentVariant> = self
            .provider
            .base_variants()
            .into_iter()
            .chain(rules.iter().filter_map(SegmentRule::to_variant))
            .filter(|variant| seen.insert(variant.clone()))
            .collect();

        Ok(variants)
    }
}
