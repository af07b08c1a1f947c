//! 规则数据模型定义
//! 仅存储规则与分段数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// 分段匹配规则（对应规则文件中的一条记录）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentRule {
    #[serde(default, deserialize_with = "nullable_string")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub value: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub match_expression: String,
    #[serde(default)]
    pub persist: bool,
    #[serde(default)]
    pub allowed_as_variant: bool,
}

impl SegmentRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>, match_expression: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            match_expression: match_expression.into(),
            persist: false,
            allowed_as_variant: false,
        }
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn allowed_as_variant(mut self, allowed: bool) -> Self {
        self.allowed_as_variant = allowed;
        self
    }

    /// Key 为空或全空白的规则视为无效
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// 规则命中后生成的分段
    pub fn to_segment(&self) -> Segment {
        Segment {
            key: self.key.clone(),
            value: self.value.clone(),
            persist: self.persist,
        }
    }

    /// 允许作为内容变体时生成的变体描述（Key 同时作为名称）
    pub fn to_variant(&self) -> Option<ContentVariant> {
        self.allowed_as_variant.then(|| ContentVariant::new(&self.key, &self.key, &self.value))
    }
}

// ======== 辅助函数：null 按空字符串处理 ========
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 请求分段（单次请求内有效）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub key: String,
    pub value: String,
    pub persist: bool,
}

impl Segment {
    pub fn new(key: impl Into<String>, value: impl Into<String>, persist: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            persist,
        }
    }
}

// ======== 为 Segment 实现 Display trait（用于 CLI 输出） ========
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.persist {
            write!(f, "{}={} (persist)", self.key, self.value)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

/// 单次请求的分段集合，保持规则顺序，不做 Key 去重
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentCollection(Vec<Segment>);

impl SegmentCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    /// 按 Key 查找全部分段（可能存在多个同名分段）
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Segment> + 'a {
        self.0.iter().filter(move |s| s.key == key)
    }

    pub fn into_vec(self) -> Vec<Segment> {
        self.0
    }
}

impl From<Vec<Segment>> for SegmentCollection {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for SegmentCollection {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Segment> for SegmentCollection {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for SegmentCollection {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SegmentCollection {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 可选内容变体描述
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentVariant {
    pub key: String,
    pub name: String,
    pub value: String,
}

impl ContentVariant {
    pub fn new(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}={})", self.name, self.key, self.value)
    }
}
