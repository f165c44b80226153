//! 短期记忆：对话历史
//!
//! 保留最近 N 轮对话，超出时自动剪枝，供 LLM 上下文使用。
//! 工具观察以 "Observation from {tool}: ..." 的 User 消息写回。

use serde::{Deserialize, Serialize};

const OBSERVATION_PREFIX: &str = "Observation from ";

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// 工具观察（作为 User 消息喂回 LLM）
    pub fn observation(tool: &str, observation: &str) -> Self {
        Self::user(format!("{OBSERVATION_PREFIX}{tool}: {observation}"))
    }

    /// 若为工具观察，返回 (tool, observation)
    pub fn as_observation(&self) -> Option<(&str, &str)> {
        if self.role != Role::User {
            return None;
        }
        self.content
            .strip_prefix(OBSERVATION_PREFIX)?
            .split_once(": ")
    }
}

/// 短期记忆：最近 N 轮对话（每轮含 user + assistant，故实际保留约 max_turns*2 条消息）
#[derive(Clone, Debug)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    max_turns: usize,
}

impl ConversationMemory {
    pub fn new(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_turns,
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
        self.prune();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// 超出 max_turns*2 时丢弃最旧的消息，保留最近部分
    fn prune(&mut self) {
        let keep = self.max_turns * 2;
        if self.messages.len() > keep {
            self.messages.drain(..self.messages.len() - keep);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_round_trip() {
        let m = Message::observation("search_profiles", "No profiles found.");
        assert_eq!(m.as_observation(), Some(("search_profiles", "No profiles found.")));
        assert_eq!(Message::user("hi").as_observation(), None);
        assert_eq!(
            Message::assistant("Observation from x: y").as_observation(),
            None
        );
    }

    #[test]
    fn test_prune_keeps_recent() {
        let mut mem = ConversationMemory::new(1);
        mem.push(Message::user("a"));
        mem.push(Message::assistant("b"));
        mem.push(Message::user("c"));
        assert_eq!(mem.len(), 2);
        assert_eq!(mem.messages()[0].content, "b");
    }
}
