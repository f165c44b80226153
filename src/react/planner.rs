//! Planner：意图规划与 Tool Call 解析
//!
//! 调用 LLM 得到回复或 JSON Tool Call；parse_llm_output 从文本中提取 JSON 并解析为 ToolCall 或直接回复。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::Message;
use crate::tools::{tool_call_schema_json, ToolRegistry};

/// LLM 返回的 Tool Call（简化 JSON：{"tool": "query_news", "args": {"topic": "..."}}）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

/// Planner 输出
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerOutput {
    /// 直接回复用户
    Response(String),
    /// 需要执行工具
    ToolCall(ToolCall),
}

/// 解析 LLM 输出：JSON 对象且含非空 tool 字段为 ToolCall；无 JSON 或 JSON 中没有 tool 为 Response；
/// 看起来是 JSON 但解析失败为 JsonParseError
pub fn parse_llm_output(output: &str) -> Result<PlannerOutput, AgentError> {
    let trimmed = output.trim();

    let json_str = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```")
            .map(|end| rest[..end].trim())
            .unwrap_or(rest.trim())
    } else if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            &trimmed[start..=end]
        } else {
            return Ok(PlannerOutput::Response(trimmed.to_string()));
        }
    } else {
        return Ok(PlannerOutput::Response(trimmed.to_string()));
    };

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| AgentError::JsonParseError(format!("{}: {}", e, json_str)))?;

    // 回复正文里嵌了普通 JSON（如候选人资料），不是工具调用
    if value.get("tool").is_none() {
        return Ok(PlannerOutput::Response(trimmed.to_string()));
    }

    let parsed: ToolCall = serde_json::from_value(value)
        .map_err(|e| AgentError::JsonParseError(format!("{}: {}", e, json_str)))?;

    if parsed.tool.trim().is_empty() {
        Ok(PlannerOutput::Response(trimmed.to_string()))
    } else {
        Ok(PlannerOutput::ToolCall(parsed))
    }
}

/// 由基础 prompt 与已注册工具拼出完整 system prompt
pub fn build_system_prompt(base: &str, registry: &ToolRegistry) -> String {
    let tools = registry
        .tool_descriptions()
        .into_iter()
        .map(|(name, desc)| format!("- {name}: {desc}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{base}\n\n\
         Available tools:\n{tools}\n\n\
         Tool parameters (JSON Schema per tool):\n{parameters}\n\n\
         To call a tool, reply with exactly one JSON object matching this schema and nothing else:\n\
         {schema}\n\n\
         Tool results come back as messages starting with \"Observation from <tool>:\". \
         When you have the final answer, reply in plain text without JSON.",
        base = base.trim(),
        parameters = registry.to_schema_json(),
        schema = tool_call_schema_json(),
    )
}

/// Planner：持有 LLM 与 system prompt，plan 时拼 system + messages 调用 LLM
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    /// system prompt 中附带工具列表与调用格式
    pub fn with_tools(llm: Arc<dyn LlmClient>, base_prompt: &str, registry: &ToolRegistry) -> Self {
        Self::new(llm, build_system_prompt(base_prompt, registry))
    }

    /// 获取 LLM 累计 token 使用统计
    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    pub async fn plan(&self, messages: &[Message]) -> Result<String, AgentError> {
        let mut full_messages = Vec::with_capacity(messages.len() + 1);
        full_messages.push(Message::system(self.system_prompt.clone()));
        full_messages.extend_from_slice(messages);
        self.llm
            .complete(&full_messages)
            .await
            .map_err(AgentError::LlmError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use async_trait::async_trait;

    #[test]
    fn test_parse_plain_response() {
        assert_eq!(
            parse_llm_output("  Here is the report.  ").unwrap(),
            PlannerOutput::Response("Here is the report.".to_string())
        );
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let out = "Let me search.\n```json\n{\"tool\": \"search_profiles\", \"args\": {\"name\": \"Scott\"}}\n```";
        match parse_llm_output(out).unwrap() {
            PlannerOutput::ToolCall(tc) => {
                assert_eq!(tc.tool, "search_profiles");
                assert_eq!(tc.args["name"], "Scott");
            }
            other => panic!("Expected ToolCall, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_tool_call_without_args() {
        match parse_llm_output(r#"{"tool": "top_headlines"}"#).unwrap() {
            PlannerOutput::ToolCall(tc) => {
                assert_eq!(tc.tool, "top_headlines");
                assert!(tc.args.is_null());
            }
            other => panic!("Expected ToolCall, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_without_tool_is_response() {
        let out = "Selected profile:\n{\"fullName\": \"Scott Persinger\"}";
        assert_eq!(
            parse_llm_output(out).unwrap(),
            PlannerOutput::Response(out.to_string())
        );
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_llm_output(r#"{"tool": "query_news", "args": {"topic": }}"#).unwrap_err();
        assert!(matches!(err, AgentError::JsonParseError(_)));
    }

    struct Named;

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            "query_news"
        }
        fn description(&self) -> &str {
            "Query headlines."
        }
        async fn execute(&self, _args: Value) -> Result<String, String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let mut reg = ToolRegistry::new();
        reg.register(Named);
        let prompt = build_system_prompt("You are a hard news reporter.", &reg);
        assert!(prompt.starts_with("You are a hard news reporter."));
        assert!(prompt.contains("- query_news: Query headlines."));
        assert!(prompt.contains("\"tool\""));
        assert!(prompt.contains("Tool parameters (JSON Schema per tool):"));
        assert!(prompt.contains("\"parameters\""));
    }

    struct WithSchema;

    #[async_trait]
    impl Tool for WithSchema {
        fn name(&self) -> &str {
            "search_profiles"
        }
        fn description(&self) -> &str {
            "Search people."
        }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "company": {"type": "string"}},
                "required": ["name"]
            })
        }
        async fn execute(&self, _args: Value) -> Result<String, String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_system_prompt_carries_parameter_schema() {
        let mut reg = ToolRegistry::new();
        reg.register(WithSchema);
        let prompt = build_system_prompt("You do research on people.", &reg);
        assert!(prompt.contains(&reg.to_schema_json()));
        assert!(prompt.contains("\"company\""));
        assert!(prompt.contains("\"required\""));
    }
}
