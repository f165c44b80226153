//! 新闻工具：按主题查询标题、头条

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::sources::{format_headlines, NewsSource};
use crate::tools::registry::required_str;
use crate::tools::Tool;

/// query_news：按主题查询新闻标题
pub struct QueryNewsTool {
    source: Arc<dyn NewsSource>,
}

impl QueryNewsTool {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for QueryNewsTool {
    fn name(&self) -> &str {
        "query_news"
    }

    fn description(&self) -> &str {
        "Query the news service to get headlines on the indicated news topic. Args: {\"topic\": \"...\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "The news topic to query."}
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let topic = required_str(&args, "topic")?;
        let headlines = self
            .source
            .query_news(topic)
            .await
            .map_err(|e| e.to_string())?;
        if headlines.is_empty() {
            return Ok(format!("No headlines found for {topic}."));
        }
        Ok(format_headlines(&headlines))
    }
}

/// top_headlines：当前头条
pub struct TopHeadlinesTool {
    source: Arc<dyn NewsSource>,
}

impl TopHeadlinesTool {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for TopHeadlinesTool {
    fn name(&self) -> &str {
        "top_headlines"
    }

    fn description(&self) -> &str {
        "Get the current top news headlines. Args: {}"
    }

    async fn execute(&self, _args: Value) -> Result<String, String> {
        let headlines = self.source.top_headlines().await.map_err(|e| e.to_string())?;
        if headlines.is_empty() {
            return Ok("No headlines found.".to_string());
        }
        Ok(format_headlines(&headlines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{HttpNewsSource, StaticNewsSource};

    #[tokio::test]
    async fn test_failed_request_observation_has_no_api_key() {
        let source = HttpNewsSource::new("http://127.0.0.1:1", "SECRETKEY123", "en", 10, 2);
        let tool = QueryNewsTool::new(Arc::new(source));
        let err = tool
            .execute(serde_json::json!({"topic": "World Finance"}))
            .await
            .unwrap_err();
        assert!(!err.contains("SECRETKEY123"), "leaked key: {err}");
    }

    #[tokio::test]
    async fn test_query_news_formats_headlines() {
        let tool = QueryNewsTool::new(Arc::new(StaticNewsSource::sample()));
        let out = tool
            .execute(serde_json::json!({"topic": "World Finance"}))
            .await
            .unwrap();
        assert_eq!(
            out,
            "- World finance leaders meet to discuss debt relief (Associated Press)"
        );
    }

    #[tokio::test]
    async fn test_query_news_empty_source() {
        let tool = QueryNewsTool::new(Arc::new(StaticNewsSource::new(Vec::new())));
        let out = tool
            .execute(serde_json::json!({"topic": "Mars"}))
            .await
            .unwrap();
        assert_eq!(out, "No headlines found for Mars.");
    }

    #[tokio::test]
    async fn test_query_news_requires_topic() {
        let tool = QueryNewsTool::new(Arc::new(StaticNewsSource::sample()));
        assert_eq!(
            tool.execute(serde_json::json!({})).await.unwrap_err(),
            "Missing topic"
        );
    }

    #[tokio::test]
    async fn test_top_headlines() {
        let tool = TopHeadlinesTool::new(Arc::new(StaticNewsSource::sample()));
        let out = tool.execute(Value::Null).await.unwrap();
        assert_eq!(out.lines().count(), 3);
    }
}
