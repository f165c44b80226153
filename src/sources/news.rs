//! GNews 风格的新闻 API 客户端
//!
//! GET {base}/search?q=..&lang=..&max=..&apikey=.. 与 GET {base}/top-headlines，
//! 响应形如 {"articles":[{"title","url","publishedAt","source":{"name"}}]}。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::NewsSourceSection;
use crate::sources::{Headline, NewsSource, SourceError};

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

/// 解析 articles 响应体
pub fn parse_articles(body: &str) -> Result<Vec<Headline>, SourceError> {
    let resp: ArticlesResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    Ok(resp
        .articles
        .into_iter()
        .map(|a| Headline {
            title: a.title,
            source: a
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown source".to_string()),
            published: a.published_at,
            url: a.url,
        })
        .collect())
}

/// HTTP 新闻源
pub struct HttpNewsSource {
    client: Client,
    base_url: String,
    api_key: String,
    lang: String,
    max_results: u32,
}

impl HttpNewsSource {
    pub fn new(base_url: &str, api_key: &str, lang: &str, max_results: u32, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            lang: lang.to_string(),
            max_results,
        }
    }

    /// 从 [sources.news] 创建；API Key 从 api_key_env 指定的环境变量读取
    pub fn from_config(cfg: &NewsSourceSection) -> Result<Self, SourceError> {
        let key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SourceError::MissingApiKey(cfg.api_key_env.clone()))?;
        Ok(Self::new(
            &cfg.base_url,
            &key,
            &cfg.lang,
            cfg.max_results,
            cfg.timeout_secs,
        ))
    }

    async fn get_articles(&self, path: &str, extra: &[(&str, &str)]) -> Result<Vec<Headline>, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        let max = self.max_results.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("lang", self.lang.as_str()),
            ("max", max.as_str()),
            ("apikey", self.api_key.as_str()),
        ];
        query.extend_from_slice(extra);
        let resp = self.client.get(&url).query(&query).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }
        let body = resp.text().await?;
        parse_articles(&body)
    }
}

#[async_trait]
impl NewsSource for HttpNewsSource {
    async fn query_news(&self, topic: &str) -> Result<Vec<Headline>, SourceError> {
        tracing::info!(topic = %topic, "news search");
        self.get_articles("search", &[("q", topic)]).await
    }

    async fn top_headlines(&self) -> Result<Vec<Headline>, SourceError> {
        tracing::info!("news top headlines");
        self.get_articles("top-headlines", &[("category", "general")]).await
    }
}
