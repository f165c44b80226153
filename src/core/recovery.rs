//! 错误恢复引擎
//!
//! 根据 AgentError 类型返回 RecoveryAction，供 ReAct 循环决定是重试、回写观察还是终止。

use crate::core::{AgentError, RecoveryAction};

/// 语义化错误恢复：将错误映射为可执行动作
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    /// valid_tools 用于提示 LLM 可用的工具名
    pub fn handle(&self, err: &AgentError, valid_tools: &[String]) -> RecoveryAction {
        match err {
            AgentError::JsonParseError(raw) => RecoveryAction::RetryWithPrompt(format!(
                "Your previous output was not valid JSON: {raw}. \
                When calling a tool you must output exactly one JSON object and nothing else, \
                in the form {{\"tool\": \"<name>\", \"args\": {{...}}}}."
            )),
            AgentError::HallucinatedTool(name) => RecoveryAction::Observe(format!(
                "Tool '{name}' does not exist. Available tools: {}.",
                valid_tools.join(", ")
            )),
            AgentError::ToolTimeout(name) => {
                RecoveryAction::Observe(format!("Tool '{name}' timed out."))
            }
            AgentError::ToolExecutionFailed(msg) => {
                RecoveryAction::Observe(format!("Error: {msg}"))
            }
            _ => RecoveryAction::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_json_parse_error() {
        let engine = RecoveryEngine::new();
        let err = AgentError::JsonParseError("invalid json".to_string());
        match engine.handle(&err, &[]) {
            RecoveryAction::RetryWithPrompt(msg) => assert!(msg.contains("JSON")),
            other => panic!("Expected RetryWithPrompt, got {:?}", other),
        }
    }

    #[test]
    fn test_recovery_hallucinated_tool_lists_valid_tools() {
        let engine = RecoveryEngine::new();
        let err = AgentError::HallucinatedTool("fake_tool".to_string());
        let tools = vec!["search_profiles".to_string(), "get_profile".to_string()];
        match engine.handle(&err, &tools) {
            RecoveryAction::Observe(msg) => {
                assert!(msg.contains("fake_tool"));
                assert!(msg.contains("search_profiles, get_profile"));
            }
            other => panic!("Expected Observe, got {:?}", other),
        }
    }

    #[test]
    fn test_recovery_tool_failure_observed() {
        let engine = RecoveryEngine::new();
        let err = AgentError::ToolExecutionFailed("HTTP 429".to_string());
        assert!(matches!(engine.handle(&err, &[]), RecoveryAction::Observe(_)));
    }

    #[test]
    fn test_recovery_cancelled() {
        let engine = RecoveryEngine::new();
        assert!(matches!(
            engine.handle(&AgentError::Cancelled, &[]),
            RecoveryAction::Abort
        ));
        assert!(matches!(
            engine.handle(&AgentError::LlmError("down".to_string()), &[]),
            RecoveryAction::Abort
        ));
    }
}
