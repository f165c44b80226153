//! 记忆层：短期对话

pub mod conversation;

pub use conversation::{ConversationMemory, Message, Role};
