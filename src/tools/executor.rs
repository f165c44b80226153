//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时，execute(tool_name, args) 在超时内调用工具；交互式工具（等待人工输入）不加超时，
//! 其等待策略由 Selector 自行决定；委派给内层 Agent 的工具同样不加超时，内层每次工具调用仍各自计时。失败时转为 AgentError；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AgentError;
use crate::tools::ToolRegistry;

/// 工具执行器：对每次调用施加超时，并将结果映射为 AgentError
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 执行指定工具；未注册返回 HallucinatedTool，超时返回 ToolTimeout，工具返回 Err 则转为 ToolExecutionFailed
    pub async fn execute(&self, tool_name: &str, args: serde_json::Value) -> Result<String, AgentError> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| AgentError::HallucinatedTool(tool_name.to_string()))?;

        let start = Instant::now();
        let args_preview = args_preview(&args);
        let result = if tool.interactive() || tool.delegates() {
            Ok(tool.execute(args).await)
        } else {
            timeout(self.timeout, tool.execute(args)).await
        };

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool_name,
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "args_preview": args_preview,
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err(AgentError::ToolExecutionFailed(e)),
            Err(_) => Err(AgentError::ToolTimeout(tool_name.to_string())),
        }
    }

    /// 覆盖超时（亚秒级，主要用于测试）
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }
}

fn args_preview(args: &serde_json::Value) -> String {
    let s = args.to_string();
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Slow {
        interactive: bool,
        delegates: bool,
    }

    #[async_trait]
    impl Tool for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn description(&self) -> &str {
            "sleeps"
        }

        fn interactive(&self) -> bool {
            self.interactive
        }

        fn delegates(&self) -> bool {
            self.delegates
        }

        async fn execute(&self, _args: Value) -> Result<String, String> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok("done".to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn execute(&self, _args: Value) -> Result<String, String> {
            Err("HTTP 500".to_string())
        }
    }

    #[tokio::test]
    async fn test_timeout_applies_to_plain_tools() {
        let mut reg = ToolRegistry::new();
        reg.register(Slow {
            interactive: false,
            delegates: false,
        });
        let exec = ToolExecutor::new(reg, 1).with_timeout(Duration::from_millis(20));
        let err = exec.execute("slow", Value::Null).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolTimeout(name) if name == "slow"));
    }

    #[tokio::test]
    async fn test_interactive_tools_are_not_timed_out() {
        let mut reg = ToolRegistry::new();
        reg.register(Slow {
            interactive: true,
            delegates: false,
        });
        let exec = ToolExecutor::new(reg, 1).with_timeout(Duration::from_millis(20));
        assert_eq!(exec.execute("slow", Value::Null).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_delegating_tools_are_not_timed_out() {
        let mut reg = ToolRegistry::new();
        reg.register(Slow {
            interactive: false,
            delegates: true,
        });
        let exec = ToolExecutor::new(reg, 1).with_timeout(Duration::from_millis(20));
        assert_eq!(exec.execute("slow", Value::Null).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_errors_are_mapped() {
        let mut reg = ToolRegistry::new();
        reg.register(Failing);
        let exec = ToolExecutor::new(reg, 5);
        assert!(matches!(
            exec.execute("failing", Value::Null).await,
            Err(AgentError::ToolExecutionFailed(msg)) if msg == "HTTP 500"
        ));
        assert!(matches!(
            exec.execute("missing", Value::Null).await,
            Err(AgentError::HallucinatedTool(_))
        ));
    }
}
