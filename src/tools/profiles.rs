//! 人物检索工具
//!
//! search_profiles：先检索、再消歧（多条候选时等待人工选择），返回选中的候选 JSON；
//! get_profile：按主页 URL 取详情。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::selector::SharedSelector;
use crate::sources::ProfileSource;
use crate::tools::registry::{optional_str, required_str};
use crate::tools::Tool;

/// search_profiles：检索 + 人工消歧
pub struct SearchProfilesTool {
    source: Arc<dyn ProfileSource>,
    selector: SharedSelector,
    cancel: CancellationToken,
}

impl SearchProfilesTool {
    pub fn new(source: Arc<dyn ProfileSource>, selector: SharedSelector) -> Self {
        Self {
            source,
            selector,
            cancel: CancellationToken::new(),
        }
    }

    /// 取消令牌：触发后正在等待的人工选择立即结束
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
impl Tool for SearchProfilesTool {
    fn name(&self) -> &str {
        "search_profiles"
    }

    fn description(&self) -> &str {
        "Search for LinkedIn profiles by providing a candidate's name and optionally a company. \
         If several profiles match, the human picks one. Returns the selected profile as JSON. \
         Args: {\"name\": \"...\", \"company\": \"...\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "The name of the person to search for."},
                "company": {"type": "string", "description": "Optional; the company where the person works."}
            },
            "required": ["name"]
        })
    }

    fn interactive(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let name = required_str(&args, "name")?;
        let company = optional_str(&args, "company");
        let raw = self
            .source
            .search_people(name, company)
            .await
            .map_err(|e| e.to_string())?;
        let mut selector = self.selector.lock().await;
        let selection = selector
            .select(raw, &self.cancel)
            .await
            .map_err(|e| e.to_string())?;
        Ok(selection.into_tool_output())
    }
}

/// get_profile：按 URL 取主页详情
pub struct GetProfileTool {
    source: Arc<dyn ProfileSource>,
}

impl GetProfileTool {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetProfileTool {
    fn name(&self) -> &str {
        "get_profile"
    }

    fn description(&self) -> &str {
        "Retrieve detailed information for a LinkedIn profile using its URL. Args: {\"url\": \"https://...\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "The URL of the profile."}
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let url = required_str(&args, "url")?;
        self.source.profile_info(url).await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{LinePrompt, ListingStyle, Selector};
    use crate::sources::StaticProfileSource;

    fn selector_with_input(input: &'static [u8]) -> SharedSelector {
        Selector::new(LinePrompt::new(input, Vec::new(), ListingStyle::Plain)).shared()
    }

    #[tokio::test]
    async fn test_multiple_matches_use_human_choice() {
        let tool = SearchProfilesTool::new(
            Arc::new(StaticProfileSource::sample()),
            selector_with_input(b"two\n2\n"),
        );
        let out = tool
            .execute(serde_json::json!({"name": "Scott Persinger"}))
            .await
            .unwrap();
        let chosen: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(chosen["headline"], "Founder at Supercog AI");
    }

    #[tokio::test]
    async fn test_single_match_returns_without_input() {
        let source = StaticProfileSource::new(serde_json::json!([
            {"fullName": "Scott Persinger", "headline": "Engineer", "url": "https://x/scott"}
        ]));
        let tool = SearchProfilesTool::new(Arc::new(source), selector_with_input(b""));
        let out = tool
            .execute(serde_json::json!({"name": "Scott Persinger", "company": "Tatari"}))
            .await
            .unwrap();
        let chosen: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            chosen,
            serde_json::json!({"fullName": "Scott Persinger", "headline": "Engineer", "url": "https://x/scott"})
        );
    }

    #[tokio::test]
    async fn test_no_matches() {
        let tool = SearchProfilesTool::new(
            Arc::new(StaticProfileSource::new("[]")),
            selector_with_input(b""),
        );
        let out = tool
            .execute(serde_json::json!({"name": "Nobody"}))
            .await
            .unwrap();
        assert_eq!(out, "No profiles found.");
    }

    #[tokio::test]
    async fn test_input_closed_is_tool_error() {
        let tool = SearchProfilesTool::new(
            Arc::new(StaticProfileSource::sample()),
            selector_with_input(b""),
        );
        let err = tool
            .execute(serde_json::json!({"name": "Scott Persinger"}))
            .await
            .unwrap_err();
        assert!(err.contains("input closed"));
    }

    #[tokio::test]
    async fn test_get_profile() {
        let tool = GetProfileTool::new(Arc::new(StaticProfileSource::sample()));
        let out = tool
            .execute(serde_json::json!({"url": "https://www.linkedin.com/in/scottpersinger"}))
            .await
            .unwrap();
        assert!(out.contains("Software Engineer at Tatari"));
        assert_eq!(
            tool.execute(serde_json::json!({})).await.unwrap_err(),
            "Missing url"
        );
    }
}
