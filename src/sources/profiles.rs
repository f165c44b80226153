//! RapidAPI 风格的人物检索客户端
//!
//! 检索：GET {base}/search-people?keywords=..&company=..；详情：GET {base}/get-profile-data-by-url?url=..
//! 请求头带 x-rapidapi-key / x-rapidapi-host。检索响应按 items_pointer（默认 /data/items）
//! 取出候选数组；取不到时把原始 body 交给 Selector，由其透传。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ProfileSourceSection;
use crate::selector::RawResponse;
use crate::sources::{ProfileSource, SourceError};

/// 从检索响应中取出候选数组；body 非 JSON 或指针不存在时返回原文
pub fn extract_items(body: String, items_pointer: &str) -> RawResponse {
    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        return RawResponse::Text(body);
    };
    if items_pointer.is_empty() {
        return RawResponse::Json(value);
    }
    match value.pointer(items_pointer) {
        Some(items) => RawResponse::Json(items.clone()),
        None => RawResponse::Text(body),
    }
}

/// HTTP 人物检索源
pub struct HttpProfileSource {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
    items_pointer: String,
}

impl HttpProfileSource {
    pub fn new(base_url: &str, host: &str, api_key: &str, items_pointer: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host.to_string(),
            api_key: api_key.to_string(),
            items_pointer: items_pointer.to_string(),
        }
    }

    /// 从 [sources.profiles] 创建；API Key 从 api_key_env 指定的环境变量读取
    pub fn from_config(cfg: &ProfileSourceSection) -> Result<Self, SourceError> {
        let key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SourceError::MissingApiKey(cfg.api_key_env.clone()))?;
        Ok(Self::new(
            &cfg.base_url,
            &cfg.host,
            &key,
            &cfg.items_pointer,
            cfg.timeout_secs,
        ))
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(query)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn search_people(
        &self,
        name: &str,
        company: Option<&str>,
    ) -> Result<RawResponse, SourceError> {
        tracing::info!(name = %name, company = ?company, "people search");
        let mut query = vec![("keywords", name)];
        if let Some(c) = company.filter(|c| !c.trim().is_empty()) {
            query.push(("company", c));
        }
        let body = self.get_text("search-people", &query).await?;
        Ok(extract_items(body, &self.items_pointer))
    }

    async fn profile_info(&self, url: &str) -> Result<String, SourceError> {
        tracing::info!(url = %url, "profile lookup");
        self.get_text("get-profile-data-by-url", &[("url", url)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_items_follows_pointer() {
        let body = r#"{"success":true,"data":{"total":1,"items":[{"fullName":"A"}]}}"#.to_string();
        assert_eq!(
            extract_items(body, "/data/items"),
            RawResponse::Json(serde_json::json!([{"fullName": "A"}]))
        );
    }

    #[test]
    fn test_extract_items_missing_pointer_keeps_body() {
        let body = r#"{"success":false,"message":"quota exceeded"}"#.to_string();
        assert_eq!(
            extract_items(body.clone(), "/data/items"),
            RawResponse::Text(body)
        );
    }

    #[test]
    fn test_extract_items_non_json_keeps_body() {
        let body = "upstream timeout".to_string();
        assert_eq!(extract_items(body.clone(), "/data/items"), RawResponse::Text(body));
    }

    #[test]
    fn test_extract_items_empty_pointer_returns_whole() {
        let body = r#"[{"name":"x"}]"#.to_string();
        assert_eq!(
            extract_items(body, ""),
            RawResponse::Json(serde_json::json!([{"name": "x"}]))
        );
    }
}
