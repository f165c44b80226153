//! 内存数据源（离线演示与测试用）

use std::collections::HashMap;

use async_trait::async_trait;

use crate::selector::RawResponse;
use crate::sources::{Headline, NewsSource, ProfileSource, SourceError};

/// 固定标题列表；query_news 按标题关键字过滤，无匹配时返回全部
#[derive(Debug, Clone, Default)]
pub struct StaticNewsSource {
    headlines: Vec<Headline>,
}

impl StaticNewsSource {
    pub fn new(headlines: Vec<Headline>) -> Self {
        Self { headlines }
    }

    pub fn sample() -> Self {
        let h = |title: &str, source: &str| Headline {
            title: title.to_string(),
            source: source.to_string(),
            published: None,
            url: None,
        };
        Self::new(vec![
            h("Global markets steady as central banks signal patience", "Reuters"),
            h("World finance leaders meet to discuss debt relief", "Associated Press"),
            h("Tech stocks lead gains on strong earnings", "Bloomberg"),
        ])
    }
}

#[async_trait]
impl NewsSource for StaticNewsSource {
    async fn query_news(&self, topic: &str) -> Result<Vec<Headline>, SourceError> {
        let words: Vec<String> = topic
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        let matched: Vec<Headline> = self
            .headlines
            .iter()
            .filter(|h| {
                let title = h.title.to_lowercase();
                words.iter().any(|w| title.contains(w.as_str()))
            })
            .cloned()
            .collect();
        if matched.is_empty() {
            Ok(self.headlines.clone())
        } else {
            Ok(matched)
        }
    }

    async fn top_headlines(&self) -> Result<Vec<Headline>, SourceError> {
        Ok(self.headlines.clone())
    }
}

/// 固定检索结果与按 URL 索引的详情
#[derive(Debug, Clone)]
pub struct StaticProfileSource {
    search: RawResponse,
    details: HashMap<String, String>,
}

impl StaticProfileSource {
    pub fn new(search: impl Into<RawResponse>) -> Self {
        Self {
            search: search.into(),
            details: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, url: &str, detail: &str) -> Self {
        self.details.insert(url.to_string(), detail.to_string());
        self
    }

    /// 两条同名候选，演示人工消歧
    pub fn sample() -> Self {
        Self::new(serde_json::json!([
            {
                "fullName": "Scott Persinger",
                "headline": "Software Engineer at Tatari",
                "url": "https://www.linkedin.com/in/scottpersinger"
            },
            {
                "fullName": "Scott Persinger",
                "headline": "Founder at Supercog AI",
                "url": "https://www.linkedin.com/in/scott-persinger-supercog"
            }
        ]))
        .with_detail(
            "https://www.linkedin.com/in/scottpersinger",
            "Scott Persinger - Software Engineer at Tatari. Previously engineering leadership roles at several startups.",
        )
        .with_detail(
            "https://www.linkedin.com/in/scott-persinger-supercog",
            "Scott Persinger - Founder at Supercog AI, building agent platforms.",
        )
    }
}

#[async_trait]
impl ProfileSource for StaticProfileSource {
    async fn search_people(
        &self,
        _name: &str,
        _company: Option<&str>,
    ) -> Result<RawResponse, SourceError> {
        Ok(self.search.clone())
    }

    async fn profile_info(&self, url: &str) -> Result<String, SourceError> {
        Ok(self
            .details
            .get(url)
            .cloned()
            .unwrap_or_else(|| format!("No profile details available for {url}")))
    }
}
