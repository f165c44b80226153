//! Scout - Rust 智能体工具集
//!
//! 模块划分：
//! - **agent**: 预置 Agent（人物调研、新闻制作人/记者、单 Agent 新闻对话）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与恢复引擎
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **memory**: 短期对话记忆
//! - **observability**: 日志初始化
//! - **react**: Planner、ReAct 主循环
//! - **selector**: 人物候选消歧（人工介入）
//! - **sources**: 新闻与人物检索数据源（HTTP / 内存样例）
//! - **tools**: 工具箱与执行器

pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod react;
pub mod selector;
pub mod sources;
pub mod tools;
