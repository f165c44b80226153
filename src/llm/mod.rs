//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use crate::config::AppConfig;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::LlmClient;

/// 按配置创建 LLM：provider 非 mock 且有 OPENAI_API_KEY 时走 OpenAI 兼容端点，否则用 Mock。
/// offline_script 为 Mock 的预设回复（离线演示时驱动工具调用）。
pub fn create_llm_from_config(cfg: &AppConfig, offline_script: Vec<String>) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    match api_key {
        Some(key) if provider != "mock" => {
            tracing::info!("Using OpenAI LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                Some(&key),
            ))
        }
        _ => {
            tracing::warn!("No API key set or provider is mock, using Mock LLM");
            Arc::new(MockLlmClient::scripted(offline_script))
        }
    }
}
