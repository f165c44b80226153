//! 候选条目：一条人物检索结果
//!
//! 上游返回的字段不固定（fullName / name / headline / url / profileURL 均可能缺失），
//! 这里整体保存上游对象，在一处给出展示用的默认值规则；返回给调用方的始终是原对象。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 展示名缺失时的占位
pub const UNKNOWN_NAME: &str = "Unknown";
/// 副标题缺失时的占位
pub const NO_HEADLINE: &str = "No headline";
/// 链接缺失时的占位
pub const NO_URL: &str = "No URL";

/// 单条候选：保存上游对象的全部键值（含 null 与类型不符的字段），序列化回去与输入一致；
/// 已知字段只在展示时按字符串读取
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    fields: Map<String, Value>,
}

impl Candidate {
    /// 原始键值
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 非空字符串字段；缺失、null、非字符串或空白都视为没有
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// 展示名：fullName → name → "Unknown"（部分接口把公开 ID 放在 name）
    pub fn display_name(&self) -> &str {
        self.text("fullName")
            .or_else(|| self.text("name"))
            .unwrap_or(UNKNOWN_NAME)
    }

    /// 副标题：headline → "No headline"
    pub fn subtitle(&self) -> &str {
        self.text("headline").unwrap_or(NO_HEADLINE)
    }

    /// 链接：url → profileURL → "No URL"
    pub fn link(&self) -> &str {
        self.text("url")
            .or_else(|| self.text("profileURL"))
            .unwrap_or(NO_URL)
    }

    /// 作为工具结果返回的 JSON（缩进两格）
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Map<String, Value>> for Candidate {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
