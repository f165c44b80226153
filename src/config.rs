//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SCOUT__*` 覆盖（双下划线表示嵌套，如 `SCOUT__SELECTOR__STYLE=table`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::selector::{FallbackPolicy, ListingStyle};

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub agent: AgentSection,
    pub tools: ToolsSection,
    pub selector: SelectorSection,
    pub sources: SourcesSection,
}

/// [app] 段：应用名、对话轮数上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 对话历史保留轮数（短期记忆）
    pub max_context_turns: usize,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            max_context_turns: 20,
        }
    }
}

/// [llm] 段：后端选择
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// openai / mock；openai 需要 OPENAI_API_KEY，否则回退 mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
        }
    }
}

/// [agent] 段：ReAct 步数上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub max_steps: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self { max_steps: 10 }
    }
}

/// [tools] 段：单次工具调用超时（交互式工具不受此限制）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub tool_timeout_secs: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 60,
        }
    }
}

/// [selector] 段：候选列表样式、着色、人工等待超时与超时策略
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorSection {
    pub style: ListingStyle,
    pub color: bool,
    /// 未设置时无限等待
    pub timeout_secs: Option<u64>,
    pub fallback: FallbackPolicy,
}

impl Default for SelectorSection {
    fn default() -> Self {
        Self {
            style: ListingStyle::Plain,
            color: true,
            timeout_secs: None,
            fallback: FallbackPolicy::Abort,
        }
    }
}

impl SelectorSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// [sources] 段
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SourcesSection {
    pub news: NewsSourceSection,
    pub profiles: ProfileSourceSection,
}

/// [sources.news] 段：GNews 风格 API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsSourceSection {
    pub base_url: String,
    /// 存放 API Key 的环境变量名
    pub api_key_env: String,
    pub lang: String,
    pub max_results: u32,
    pub timeout_secs: u64,
}

impl Default for NewsSourceSection {
    fn default() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4".to_string(),
            api_key_env: "GNEWS_API_KEY".to_string(),
            lang: "en".to_string(),
            max_results: 10,
            timeout_secs: 15,
        }
    }
}

/// [sources.profiles] 段：RapidAPI 风格人物检索
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileSourceSection {
    pub base_url: String,
    pub host: String,
    pub api_key_env: String,
    /// 检索响应中候选数组的 JSON Pointer；为空则使用整个响应
    pub items_pointer: String,
    pub timeout_secs: u64,
}

impl Default for ProfileSourceSection {
    fn default() -> Self {
        Self {
            base_url: "https://linkedin-data-api.p.rapidapi.com".to_string(),
            host: "linkedin-data-api.p.rapidapi.com".to_string(),
            api_key_env: "RAPIDAPI_KEY".to_string(),
            items_pointer: "/data/items".to_string(),
            timeout_secs: 30,
        }
    }
}

/// 从 config 目录加载配置，环境变量 SCOUT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SCOUT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SCOUT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
