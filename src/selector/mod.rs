//! 候选消歧（人工介入）
//!
//! Selector 把一次人物检索的原始结果收敛为恰好一个候选：
//! - 非列表结果原样透传（Passthrough）
//! - 空列表返回 NoCandidates
//! - 单条直接返回，不打扰用户
//! - 多条交给 HumanPrompt 选择；等待可被 CancellationToken 取消或超时，
//!   按 FallbackPolicy 决定报错还是取第一条
//!
//! 输入列表不会被修改或重排。

pub mod candidate;
pub mod console;
pub mod normalize;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use candidate::Candidate;
pub use console::ConsoleInput;
pub use normalize::{normalize, Normalized, RawResponse};
pub use prompt::{
    parse_choice, render_plain, render_table, ChoiceError, HumanPrompt, LinePrompt, ListingStyle,
    PromptError,
};

/// 多个工具共享同一个人工输入端（检索消歧与人工澄清共用控制台）
pub type SharedSelector = Arc<tokio::sync::Mutex<Selector<Box<dyn HumanPrompt>>>>;

/// 空列表时返回给调用方的文本
pub const NO_PROFILES_FOUND: &str = "No profiles found.";

/// 消歧结果
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// 选中的候选（单条自动 / 多条人工）
    Chosen(Candidate),
    /// 检索结果为空
    NoCandidates,
    /// 非列表结果，原样透传
    Passthrough(String),
}

impl Selection {
    /// 转为工具返回值：候选为 JSON，空为 "No profiles found."，透传为原文
    pub fn into_tool_output(self) -> String {
        match self {
            Selection::Chosen(c) => c.to_json_pretty(),
            Selection::NoCandidates => NO_PROFILES_FOUND.to_string(),
            Selection::Passthrough(text) => text,
        }
    }
}

/// 人工等待被取消或超时时的处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// 返回 SelectError
    #[default]
    Abort,
    /// 自动选第一条候选
    FirstCandidate,
}

/// 消歧失败：只来自人工等待阶段
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("selection cancelled")]
    Cancelled,
    #[error("no selection within {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// 候选选择器
pub struct Selector<P> {
    prompt: P,
    timeout: Option<Duration>,
    fallback: FallbackPolicy,
}

impl<P: HumanPrompt> Selector<P> {
    /// 无超时、取消即报错（与控制台脚本一致的无限等待）
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            timeout: None,
            fallback: FallbackPolicy::Abort,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// 包装为可在多个工具间共享的选择器
    pub fn shared(self) -> SharedSelector
    where
        P: 'static,
    {
        let Selector {
            prompt,
            timeout,
            fallback,
        } = self;
        let boxed: Box<dyn HumanPrompt> = Box::new(prompt);
        Arc::new(tokio::sync::Mutex::new(Selector {
            prompt: boxed,
            timeout,
            fallback,
        }))
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    /// 归一化后按条数分流；只有多条候选时才会等待人工输入
    pub async fn select(
        &mut self,
        raw: RawResponse,
        cancel: &CancellationToken,
    ) -> Result<Selection, SelectError> {
        let candidates = match normalize(raw) {
            Normalized::Opaque(text) => return Ok(Selection::Passthrough(text)),
            Normalized::Candidates(list) => list,
        };
        match candidates.len() {
            0 => {
                tracing::info!("no candidates");
                Ok(Selection::NoCandidates)
            }
            1 => {
                let only = candidates.into_iter().next().map(Selection::Chosen);
                Ok(only.unwrap_or(Selection::NoCandidates))
            }
            n => {
                tracing::info!(candidates = n, "multiple candidates, waiting for human selection");
                let index = self.wait_for_choice(&candidates, cancel).await?;
                let chosen = candidates.into_iter().nth(index).map(Selection::Chosen);
                Ok(chosen.unwrap_or(Selection::NoCandidates))
            }
        }
    }

    async fn wait_for_choice(
        &mut self,
        candidates: &[Candidate],
        cancel: &CancellationToken,
    ) -> Result<usize, SelectError> {
        let timeout = self.timeout;
        let outcome = {
            let choose = self.prompt.choose(candidates);
            tokio::select! {
                res = choose => res.map_err(SelectError::from),
                _ = cancel.cancelled() => Err(SelectError::Cancelled),
                _ = sleep_or_forever(timeout) => Err(SelectError::TimedOut(timeout.unwrap_or_default())),
            }
        };
        match (outcome, self.fallback) {
            (Ok(index), _) => {
                tracing::info!(choice = index + 1, "human selected candidate");
                Ok(index)
            }
            (Err(e @ (SelectError::Cancelled | SelectError::TimedOut(_))), FallbackPolicy::FirstCandidate) => {
                tracing::warn!(reason = %e, "falling back to first candidate");
                Ok(0)
            }
            (Err(e), _) => Err(e),
        }
    }
}

async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending::<()>().await,
    }
}
