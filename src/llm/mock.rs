//! Mock LLM 客户端（用于测试与离线演示，无需 API）
//!
//! 按脚本依次返回预设回复；脚本用完后，若最后一条 User 消息是工具观察则把观察内容作为最终回复，
//! 否则回显最后一条 User 消息。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::{Message, Role};

/// Mock 客户端
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设回复（通常是若干条 JSON Tool Call）
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    fn next_scripted(&self) -> Option<String> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        if let Some(reply) = self.next_scripted() {
            return Ok(reply);
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User));

        Ok(match last_user {
            Some(m) => match m.as_observation() {
                Some((_, observation)) => observation.to_string(),
                None => format!("Echo from Mock: {}", m.content),
            },
            None => "Echo from Mock: (no input)".to_string(),
        })
    }
}
