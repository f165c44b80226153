//! ReAct 主循环
//!
//! Plan -> Act (Tool) -> Observe -> 下一轮 Plan；支持 RetryWithPrompt、Cancel、最大步数限制。
//! 可选 event_tx：向调用方推送 StepUpdate / ToolCall / Observation / Response 等事件。

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::core::{AgentError, RecoveryAction, RecoveryEngine};
use crate::memory::{ConversationMemory, Message};
use crate::react::{parse_llm_output, Planner, PlannerOutput, ReactEvent};
use crate::tools::ToolExecutor;

/// 默认最大 ReAct 步数，防止死循环
pub const DEFAULT_MAX_STEPS: usize = 10;
/// 默认保留的对话轮数
const DEFAULT_CONTEXT_TURNS: usize = 20;
/// Observation 预览最大字符数
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 一次运行的结果：最终回复、实际步数与对话历史
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub response: String,
    pub steps: usize,
    pub messages: Vec<Message>,
}

/// 具名 Agent：Planner + 工具执行器 + 恢复引擎
pub struct Agent {
    name: String,
    planner: Planner,
    executor: ToolExecutor,
    recovery: RecoveryEngine,
    max_steps: usize,
    max_context_turns: usize,
    event_tx: Option<UnboundedSender<ReactEvent>>,
    cancel: CancellationToken,
}

impl Agent {
    pub fn new(name: impl Into<String>, planner: Planner, executor: ToolExecutor) -> Self {
        Self {
            name: name.into(),
            planner,
            executor,
            recovery: RecoveryEngine::new(),
            max_steps: DEFAULT_MAX_STEPS,
            max_context_turns: DEFAULT_CONTEXT_TURNS,
            event_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_max_context_turns(mut self, turns: usize) -> Self {
        self.max_context_turns = turns.max(1);
        self
    }

    pub fn with_events(mut self, tx: UnboundedSender<ReactEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.executor.tool_names()
    }

    fn send(&self, ev: ReactEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(ev);
        }
    }

    /// 对单条用户输入跑 ReAct：每次调用都从空对话开始
    pub async fn run(&self, input: &str) -> Result<AgentRun, AgentError> {
        let mut memory = ConversationMemory::new(self.max_context_turns);
        memory.push(Message::user(input));
        let mut last_output = String::new();

        for step in 0..self.max_steps {
            if self.cancel.is_cancelled() {
                self.send(ReactEvent::Error {
                    text: "Cancelled".to_string(),
                });
                return Err(AgentError::Cancelled);
            }
            self.send(ReactEvent::StepUpdate {
                agent: self.name.clone(),
                step,
                max_steps: self.max_steps,
            });
            tracing::info!(agent = %self.name, step, "react step");

            self.send(ReactEvent::Thinking);
            let planned = tokio::select! {
                res = self.planner.plan(memory.messages()) => res,
                _ = self.cancel.cancelled() => Err(AgentError::Cancelled),
            };
            let output = match planned {
                Ok(o) => o,
                Err(e) => {
                    self.retry_or_abort(&mut memory, e)?;
                    continue;
                }
            };
            last_output = output.clone();

            match parse_llm_output(&output) {
                Ok(PlannerOutput::Response(text)) => {
                    let (prompt_tokens, completion_tokens, total_tokens) = self.planner.token_usage();
                    tracing::info!(
                        agent = %self.name,
                        steps = step + 1,
                        prompt_tokens,
                        completion_tokens,
                        total_tokens,
                        "final response"
                    );
                    memory.push(Message::assistant(text.clone()));
                    self.send(ReactEvent::Response { text: text.clone() });
                    return Ok(AgentRun {
                        response: text,
                        steps: step + 1,
                        messages: memory.messages().to_vec(),
                    });
                }
                Ok(PlannerOutput::ToolCall(tc)) => {
                    tracing::info!(agent = %self.name, tool = %tc.tool, args = %tc.args, "tool call");
                    self.send(ReactEvent::ToolCall {
                        tool: tc.tool.clone(),
                        args: tc.args.clone(),
                    });
                    memory.push(Message::assistant(output));

                    let result = tokio::select! {
                        res = self.executor.execute(&tc.tool, tc.args) => res,
                        _ = self.cancel.cancelled() => Err(AgentError::Cancelled),
                    };
                    let observation = match result {
                        Ok(content) => content,
                        Err(e) => self.observe_failure(&tc.tool, e)?,
                    };
                    let preview: String = observation.chars().take(OBSERVATION_PREVIEW_CHARS).collect();
                    self.send(ReactEvent::Observation {
                        tool: tc.tool.clone(),
                        preview,
                    });
                    memory.push(Message::observation(&tc.tool, &observation));
                }
                Err(e) => self.retry_or_abort(&mut memory, e)?,
            }
        }

        tracing::warn!(agent = %self.name, max_steps = self.max_steps, "step limit reached");
        Ok(AgentRun {
            response: format!(
                "Reached the step limit ({}). Last output:\n{}",
                self.max_steps, last_output
            ),
            steps: self.max_steps,
            messages: memory.messages().to_vec(),
        })
    }

    /// LLM 或解析失败：可重试则注入提示，否则终止
    fn retry_or_abort(&self, memory: &mut ConversationMemory, err: AgentError) -> Result<(), AgentError> {
        match self.recovery.handle(&err, &self.executor.tool_names()) {
            RecoveryAction::RetryWithPrompt(prompt) => {
                tracing::warn!(agent = %self.name, error = %err, "retrying with corrective prompt");
                self.send(ReactEvent::Recovery {
                    action: "RetryWithPrompt".to_string(),
                    detail: prompt.clone(),
                });
                memory.push(Message::user(prompt));
                Ok(())
            }
            _ => {
                tracing::error!(agent = %self.name, error = %err, "aborting");
                self.send(ReactEvent::Error {
                    text: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// 工具失败：可观察的错误写回对话，其余终止
    fn observe_failure(&self, tool: &str, err: AgentError) -> Result<String, AgentError> {
        match self.recovery.handle(&err, &self.executor.tool_names()) {
            RecoveryAction::Observe(msg) | RecoveryAction::RetryWithPrompt(msg) => {
                tracing::warn!(agent = %self.name, tool, error = %err, "tool failed");
                self.send(ReactEvent::ToolFailure {
                    tool: tool.to_string(),
                    reason: err.to_string(),
                });
                Ok(msg)
            }
            RecoveryAction::Abort => {
                self.send(ReactEvent::Error {
                    text: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::llm::MockLlmClient;
    use crate::tools::{Tool, ToolRegistry};

    struct Failing;

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "flaky"
        }
        fn description(&self) -> &str {
            "Always fails."
        }
        async fn execute(&self, _args: Value) -> Result<String, String> {
            Err("HTTP 503".to_string())
        }
    }

    struct Greeter;

    #[async_trait]
    impl Tool for Greeter {
        fn name(&self) -> &str {
            "greet"
        }
        fn description(&self) -> &str {
            "Greets a name."
        }
        async fn execute(&self, args: Value) -> Result<String, String> {
            Ok(format!("Hello, {}!", args["name"].as_str().unwrap_or("?")))
        }
    }

    fn agent(script: &[&str]) -> Agent {
        let mut reg = ToolRegistry::new();
        reg.register(Failing);
        reg.register(Greeter);
        let llm = Arc::new(MockLlmClient::scripted(script.iter().copied()));
        let planner = Planner::with_tools(llm, "You are a test agent.", &reg);
        Agent::new("tester", planner, ToolExecutor::new(reg, 5))
    }

    #[tokio::test]
    async fn test_tool_call_then_observation_answer() {
        let run = agent(&[r#"{"tool": "greet", "args": {"name": "Ada"}}"#])
            .run("say hi to Ada")
            .await
            .unwrap();
        assert_eq!(run.response, "Hello, Ada!");
        assert_eq!(run.steps, 2);
        assert!(run
            .messages
            .iter()
            .any(|m| m.content == "Observation from greet: Hello, Ada!"));
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_observation() {
        let run = agent(&[r#"{"tool": "flaky", "args": {}}"#, "Gave up politely."])
            .run("try it")
            .await
            .unwrap();
        assert_eq!(run.response, "Gave up politely.");
        assert!(run
            .messages
            .iter()
            .any(|m| m.content == "Observation from flaky: Error: HTTP 503"));
    }

    #[tokio::test]
    async fn test_hallucinated_tool_lists_valid_tools() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let run = agent(&[r#"{"tool": "teleport", "args": {}}"#])
            .with_events(tx)
            .run("go")
            .await
            .unwrap();
        assert_eq!(
            run.response,
            "Tool 'teleport' does not exist. Available tools: flaky, greet."
        );
        let mut saw_failure = false;
        while let Ok(ev) = rx.try_recv() {
            if matches!(ev, ReactEvent::ToolFailure { .. }) {
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    #[tokio::test]
    async fn test_malformed_json_retries() {
        let run = agent(&[r#"{"tool": "greet", "args": {"name": }}"#, "Recovered."])
            .run("go")
            .await
            .unwrap();
        assert_eq!(run.response, "Recovered.");
        assert_eq!(run.steps, 2);
    }

    #[tokio::test]
    async fn test_step_limit() {
        let call = r#"{"tool": "greet", "args": {"name": "loop"}}"#;
        let run = agent(&[call, call, call, call])
            .with_max_steps(2)
            .run("loop forever")
            .await
            .unwrap();
        assert_eq!(run.steps, 2);
        assert!(run.response.starts_with("Reached the step limit (2)."));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = agent(&[]).with_cancel(cancel).run("go").await.unwrap_err();
        assert!(matches!(err, AgentError::Cancelled));
    }
}
