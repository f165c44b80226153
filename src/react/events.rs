//! ReAct 过程事件：供调用方实时展示思考、工具调用、观察与回复

use serde::Serialize;

/// 单步过程事件（可序列化为 JSON）
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactEvent {
    /// 步数更新；agent 为发出事件的 Agent 名（嵌套 Agent 时区分来源）
    StepUpdate {
        agent: String,
        step: usize,
        max_steps: usize,
    },
    /// 正在调用 LLM
    Thinking,
    /// 调用工具
    ToolCall {
        tool: String,
        args: serde_json::Value,
    },
    /// 工具返回（预览）
    Observation { tool: String, preview: String },
    /// 工具执行失败
    ToolFailure { tool: String, reason: String },
    /// 错误恢复动作
    Recovery { action: String, detail: String },
    /// 最终回复
    Response { text: String },
    Error { text: String },
}
