//! 外部数据源：新闻标题查询、人物检索与详情
//!
//! 两类数据源都以 trait 抽象，HTTP 实现走 reqwest；未配置 API Key 时回退到内存样例数据，
//! 保证离线也能跑通整条 Agent 流程。

pub mod fixture;
pub mod news;
pub mod profiles;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::selector::RawResponse;

pub use fixture::{StaticNewsSource, StaticProfileSource};
pub use news::HttpNewsSource;
pub use profiles::HttpProfileSource;

/// 数据源错误
#[derive(Debug, Error)]
pub enum SourceError {
    /// 不含请求 URL（查询串里带 API Key）
    #[error("request failed: {0}")]
    Http(reqwest::Error),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("missing API key (set {0})")]
    MissingApiKey(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(e.without_url())
    }
}

/// 一条新闻标题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub published: Option<String>,
    pub url: Option<String>,
}

/// 新闻数据源
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// 按主题查询标题
    async fn query_news(&self, topic: &str) -> Result<Vec<Headline>, SourceError>;

    /// 头条
    async fn top_headlines(&self) -> Result<Vec<Headline>, SourceError>;
}

/// 人物检索数据源；检索结果形状不固定，交给 Selector 归一化
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn search_people(
        &self,
        name: &str,
        company: Option<&str>,
    ) -> Result<RawResponse, SourceError>;

    /// 按主页 URL 取详情（文本）
    async fn profile_info(&self, url: &str) -> Result<String, SourceError>;
}

/// 标题列表转为供 LLM 阅读的文本
pub fn format_headlines(headlines: &[Headline]) -> String {
    headlines
        .iter()
        .map(|h| {
            let mut line = format!("- {} ({}", h.title, h.source);
            if let Some(p) = &h.published {
                line.push_str(&format!(", {}", p));
            }
            line.push(')');
            if let Some(u) = &h.url {
                line.push_str(&format!(" {}", u));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 按配置创建数据源：有 API Key 用 HTTP 实现，否则回退样例数据
pub fn create_sources_from_config(
    cfg: &AppConfig,
) -> (Arc<dyn NewsSource>, Arc<dyn ProfileSource>) {
    let news: Arc<dyn NewsSource> = match HttpNewsSource::from_config(&cfg.sources.news) {
        Ok(s) => {
            tracing::info!(base_url = %cfg.sources.news.base_url, "Using HTTP news source");
            Arc::new(s)
        }
        Err(e) => {
            tracing::warn!(error = %e, "News source unavailable, using sample headlines");
            Arc::new(StaticNewsSource::sample())
        }
    };
    let profiles: Arc<dyn ProfileSource> =
        match HttpProfileSource::from_config(&cfg.sources.profiles) {
            Ok(s) => {
                tracing::info!(base_url = %cfg.sources.profiles.base_url, "Using HTTP profile source");
                Arc::new(s)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile source unavailable, using sample profiles");
                Arc::new(StaticProfileSource::sample())
            }
        };
    (news, profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_headlines() {
        let hs = vec![
            Headline {
                title: "Markets rally".to_string(),
                source: "Reuters".to_string(),
                published: Some("2025-01-02".to_string()),
                url: Some("https://r/1".to_string()),
            },
            Headline {
                title: "Rates hold".to_string(),
                source: "AP".to_string(),
                published: None,
                url: None,
            },
        ];
        assert_eq!(
            format_headlines(&hs),
            "- Markets rally (Reuters, 2025-01-02) https://r/1\n- Rates hold (AP)"
        );
    }
}
