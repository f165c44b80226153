//! human_assistance：向用户提问并把回答作为观察返回（澄清缺失信息、确认候选等）

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::selector::SharedSelector;
use crate::tools::registry::required_str;
use crate::tools::Tool;

pub struct HumanAssistanceTool {
    selector: SharedSelector,
    cancel: CancellationToken,
}

impl HumanAssistanceTool {
    pub fn new(selector: SharedSelector) -> Self {
        Self {
            selector,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
impl Tool for HumanAssistanceTool {
    fn name(&self) -> &str {
        "human_assistance"
    }

    fn description(&self) -> &str {
        "Ask the human user a question when information is missing or a choice needs clarification. \
         Args: {\"query\": \"question for the user\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The question to ask."}
            },
            "required": ["query"]
        })
    }

    fn interactive(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = required_str(&args, "query")?;
        let mut selector = self.selector.lock().await;
        let answer = tokio::select! {
            res = selector.prompt_mut().ask(query) => res.map_err(|e| e.to_string())?,
            _ = self.cancel.cancelled() => return Err("human assistance cancelled".to_string()),
        };
        tracing::info!(answer_len = answer.len(), "human answered");
        if answer.trim().is_empty() {
            return Ok("The user gave no answer.".to_string());
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{LinePrompt, ListingStyle, Selector};

    #[tokio::test]
    async fn test_returns_user_answer() {
        let input: &[u8] = b"He works at Tatari\n";
        let selector = Selector::new(LinePrompt::new(input, Vec::new(), ListingStyle::Plain)).shared();
        let tool = HumanAssistanceTool::new(selector);
        let out = tool
            .execute(serde_json::json!({"query": "Which company?"}))
            .await
            .unwrap();
        assert_eq!(out, "He works at Tatari");
    }

    #[tokio::test]
    async fn test_cancelled() {
        let input: &[u8] = b"";
        let selector = Selector::new(LinePrompt::new(input, Vec::new(), ListingStyle::Plain)).shared();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let tool = HumanAssistanceTool::new(selector).with_cancel(cancel);
        let err = tool
            .execute(serde_json::json!({"query": "Which company?"}))
            .await
            .unwrap_err();
        // 输入为空时 ask 立即返回 InputClosed，与取消竞争；两种结果都不是成功
        assert!(err.contains("cancelled") || err.contains("input closed"));
    }
}
