//! news_reporter：把主题交给内层 reporter Agent，返回其写好的报道
//!
//! 内层 Agent 可能要多轮 LLM 与工具调用，执行器不对本工具计时；取消由内层 Agent 的 CancellationToken 负责。

use async_trait::async_trait;
use serde_json::Value;

use crate::react::Agent;
use crate::tools::registry::required_str;
use crate::tools::Tool;

/// 交给 reporter 的任务描述
pub fn reporter_task(topic: &str) -> String {
    format!(
        "You are a hard news reporter. Your task is to generate an NPR-style news report on the topic: {topic}. \
         Use the query_news tool to retrieve relevant headlines."
    )
}

pub struct NewsReporterTool {
    reporter: Agent,
}

impl NewsReporterTool {
    pub fn new(reporter: Agent) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl Tool for NewsReporterTool {
    fn name(&self) -> &str {
        "news_reporter"
    }

    fn description(&self) -> &str {
        "Hand a news topic to the reporter, who researches headlines and writes an NPR-style report. \
         Args: {\"topic\": \"...\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "The news topic to report on."}
            },
            "required": ["topic"]
        })
    }

    fn delegates(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let topic = required_str(&args, "topic")?;
        tracing::info!(reporter = %self.reporter.name(), topic, "delegating to reporter");
        let run = self
            .reporter
            .run(&reporter_task(topic))
            .await
            .map_err(|e| e.to_string())?;
        Ok(run.response)
    }
}
