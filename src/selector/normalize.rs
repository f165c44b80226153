//! 检索结果归一化
//!
//! 上游可能返回 JSON 数组、JSON 文本，或其它任意内容。能解析为候选数组时返回 Candidates，
//! 否则原样返回 Opaque，由调用方决定如何展示（非错误）。

use serde_json::Value;

use crate::selector::Candidate;

/// 数据源返回的原始结果
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// 文本（通常是 HTTP body）
    Text(String),
    /// 已解析的 JSON
    Json(Value),
}

impl From<String> for RawResponse {
    fn from(s: String) -> Self {
        RawResponse::Text(s)
    }
}

impl From<&str> for RawResponse {
    fn from(s: &str) -> Self {
        RawResponse::Text(s.to_string())
    }
}

impl From<Value> for RawResponse {
    fn from(v: Value) -> Self {
        RawResponse::Json(v)
    }
}

impl From<Vec<Candidate>> for RawResponse {
    fn from(list: Vec<Candidate>) -> Self {
        RawResponse::Json(serde_json::to_value(list).unwrap_or(Value::Array(Vec::new())))
    }
}

/// 归一化结果
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// 有序候选列表（顺序与上游一致，可能为空）
    Candidates(Vec<Candidate>),
    /// 非列表结果，原样透传
    Opaque(String),
}

/// 归一化：文本先尝试 JSON 解析；解析失败或不是候选数组时透传原文
pub fn normalize(raw: RawResponse) -> Normalized {
    match raw {
        RawResponse::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => match candidates_from_value(&value) {
                Some(list) => Normalized::Candidates(list),
                None => {
                    tracing::warn!("response JSON is not a candidate list; passing through");
                    Normalized::Opaque(text)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "response is not valid JSON; passing through raw text");
                Normalized::Opaque(text)
            }
        },
        RawResponse::Json(value) => match candidates_from_value(&value) {
            Some(list) => Normalized::Candidates(list),
            None => {
                tracing::warn!("unexpected response shape; passing through");
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Normalized::Opaque(text)
            }
        },
    }
}

/// 仅当值为数组且每个元素都是对象时返回候选列表；对象内字段类型不做限制
fn candidates_from_value(value: &Value) -> Option<Vec<Candidate>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_object().cloned().map(Candidate::from))
        .collect()
}
