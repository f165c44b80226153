//! 预置 Agent
//!
//! people_research_agent：人物调研（检索 -> 人工消歧 -> 取详情 -> 背景报告）；
//! news_reporter_agent / news_producer_agent：新闻制作人把主题交给记者；
//! basic_news_agent：单 Agent 新闻对话。
//! 无 OPENAI_API_KEY 时各 Agent 由 offline 脚本驱动的 Mock LLM 跑通同样的工具链路。

use std::sync::Arc;

use crossterm::tty::IsTty;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, SelectorSection};
use crate::llm::LlmClient;
use crate::react::{Agent, Planner};
use crate::selector::{LinePrompt, Selector, SharedSelector};
use crate::sources::{NewsSource, ProfileSource};
use crate::tools::{
    GetProfileTool, HumanAssistanceTool, NewsReporterTool, QueryNewsTool, SearchProfilesTool,
    TopHeadlinesTool, ToolExecutor, ToolRegistry,
};

pub const DEFAULT_PERSON: &str = "Scott Persinger";
pub const DEFAULT_COMPANY: &str = "Tatari";
pub const DEFAULT_TOPIC: &str = "World Finance";

const PEOPLE_RESEARCH_PROMPT: &str = "\
You do research on people. Given a name and optionally a company:
1. Search for matching profiles on LinkedIn with search_profiles. If several profiles match, \
the tool asks the user to pick one and returns only that profile.
2. Retrieve the selected profile with get_profile using its URL.
3. Write a short background report on the person, focusing on their career progression and current role.
If you are missing information, ask the user with human_assistance.";

const NEWS_REPORTER_PROMPT: &str = "\
You are a hard news reporter.
Call query_news to get headlines on the indicated news topic.
Then write an NPR-style news report based on the headlines.";

const NEWS_PRODUCER_PROMPT: &str =
    "You are a news producer. Call the reporter with the indicated topic.";

const BASIC_NEWS_PROMPT: &str = "\
You are a helpful news assistant. Use query_news for a specific topic or top_headlines for \
general news, then summarize what you found in a few sentences.";

/// 人物调研请求
pub fn people_research_request(name: &str, company: Option<&str>) -> String {
    match company {
        Some(c) => format!(
            "Find LinkedIn profiles for a software engineer named {name} who works at {c}."
        ),
        None => format!("Find LinkedIn profiles for a software engineer named {name}."),
    }
}

/// 新闻请求
pub fn news_request(topic: &str) -> String {
    format!("Get the news about {topic}")
}

/// Ctrl-C 时取消返回的 token；三个入口共用
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });
    cancel
}

/// 只有 stdout 是终端时才输出 ANSI 颜色
fn color_enabled(configured: bool, stdout_is_tty: bool) -> bool {
    configured && stdout_is_tty
}

/// 控制台选择器：候选列表写 stdout，选择从 stdin 读
pub fn console_selector(cfg: &SelectorSection) -> SharedSelector {
    let color = color_enabled(cfg.color, std::io::stdout().is_tty());
    Selector::new(LinePrompt::stdio(cfg.style, color))
        .with_timeout(cfg.timeout())
        .with_fallback(cfg.fallback)
        .shared()
}

fn build_agent(cfg: &AppConfig, name: &str, llm: Arc<dyn LlmClient>, prompt: &str, tools: ToolRegistry) -> Agent {
    let planner = Planner::with_tools(llm, prompt, &tools);
    Agent::new(name, planner, ToolExecutor::new(tools, cfg.tools.tool_timeout_secs))
        .with_max_steps(cfg.agent.max_steps)
        .with_max_context_turns(cfg.app.max_context_turns)
}

/// Person Researcher：search_profiles（人工消歧）+ get_profile + human_assistance，共用同一个选择器
pub fn people_research_agent(
    cfg: &AppConfig,
    llm: Arc<dyn LlmClient>,
    profiles: Arc<dyn ProfileSource>,
    selector: SharedSelector,
    cancel: CancellationToken,
) -> Agent {
    let mut tools = ToolRegistry::new();
    tools.register(
        SearchProfilesTool::new(profiles.clone(), selector.clone()).with_cancel(cancel.clone()),
    );
    tools.register(GetProfileTool::new(profiles));
    tools.register(HumanAssistanceTool::new(selector).with_cancel(cancel.clone()));
    build_agent(cfg, "Person Researcher", llm, PEOPLE_RESEARCH_PROMPT, tools).with_cancel(cancel)
}

/// News Reporter：query_news
pub fn news_reporter_agent(cfg: &AppConfig, llm: Arc<dyn LlmClient>, news: Arc<dyn NewsSource>) -> Agent {
    let mut tools = ToolRegistry::new();
    tools.register(QueryNewsTool::new(news));
    build_agent(cfg, "News Reporter", llm, NEWS_REPORTER_PROMPT, tools)
}

/// News Producer：唯一的工具是 news_reporter（内层为 reporter Agent），取消同时作用于内外两层
pub fn news_producer_agent(
    cfg: &AppConfig,
    llm: Arc<dyn LlmClient>,
    reporter: Agent,
    cancel: CancellationToken,
) -> Agent {
    let mut tools = ToolRegistry::new();
    tools.register(NewsReporterTool::new(reporter.with_cancel(cancel.clone())));
    build_agent(cfg, "News Producer", llm, NEWS_PRODUCER_PROMPT, tools).with_cancel(cancel)
}

/// 单 Agent 新闻对话：query_news + top_headlines
pub fn basic_news_agent(cfg: &AppConfig, llm: Arc<dyn LlmClient>, news: Arc<dyn NewsSource>) -> Agent {
    let mut tools = ToolRegistry::new();
    tools.register(QueryNewsTool::new(news.clone()));
    tools.register(TopHeadlinesTool::new(news));
    build_agent(cfg, "News Assistant", llm, BASIC_NEWS_PROMPT, tools)
}

/// 离线脚本：Mock LLM 依次输出这些 Tool Call，之后以最后一次观察作为回复
pub mod offline {
    use serde_json::json;

    fn call(tool: &str, args: serde_json::Value) -> String {
        json!({"tool": tool, "args": args}).to_string()
    }

    pub fn people_research(name: &str, company: Option<&str>) -> Vec<String> {
        let args = match company {
            Some(c) => json!({"name": name, "company": c}),
            None => json!({"name": name}),
        };
        vec![call("search_profiles", args)]
    }

    pub fn reporter(topic: &str) -> Vec<String> {
        vec![call("query_news", json!({"topic": topic}))]
    }

    pub fn producer(topic: &str) -> Vec<String> {
        vec![call("news_reporter", json!({"topic": topic}))]
    }

    pub fn basic(topic: &str) -> Vec<String> {
        reporter(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::sources::StaticNewsSource;

    #[test]
    fn test_people_research_request() {
        assert_eq!(
            people_research_request("Scott Persinger", Some("Tatari")),
            "Find LinkedIn profiles for a software engineer named Scott Persinger who works at Tatari."
        );
        assert_eq!(
            people_research_request("Scott Persinger", None),
            "Find LinkedIn profiles for a software engineer named Scott Persinger."
        );
    }

    #[test]
    fn test_news_request() {
        assert_eq!(news_request("World Finance"), "Get the news about World Finance");
    }

    #[test]
    fn test_color_needs_terminal() {
        assert!(color_enabled(true, true));
        assert!(!color_enabled(true, false));
        assert!(!color_enabled(false, true));
        assert!(!color_enabled(false, false));
    }

    #[test]
    fn test_offline_script_is_tool_call() {
        let script = offline::people_research("Scott Persinger", Some("Tatari"));
        let v: serde_json::Value = serde_json::from_str(&script[0]).unwrap();
        assert_eq!(v["tool"], "search_profiles");
        assert_eq!(v["args"]["company"], "Tatari");
    }

    #[tokio::test]
    async fn test_basic_news_agent_offline() {
        let cfg = AppConfig::default();
        let llm = Arc::new(MockLlmClient::scripted(offline::basic("World Finance")));
        let agent = basic_news_agent(&cfg, llm, Arc::new(StaticNewsSource::sample()));
        assert_eq!(agent.tool_names(), vec!["query_news", "top_headlines"]);
        let run = agent.run(&news_request("World Finance")).await.unwrap();
        assert!(run.response.contains("debt relief"));
    }

    #[tokio::test]
    async fn test_producer_delegates_to_reporter() {
        let cfg = AppConfig::default();
        let news: Arc<dyn NewsSource> = Arc::new(StaticNewsSource::sample());
        let reporter = news_reporter_agent(
            &cfg,
            Arc::new(MockLlmClient::scripted(offline::reporter("World Finance"))),
            news,
        );
        let producer = news_producer_agent(
            &cfg,
            Arc::new(MockLlmClient::scripted(offline::producer("World Finance"))),
            reporter,
            CancellationToken::new(),
        );
        let run = producer.run(&news_request("World Finance")).await.unwrap();
        assert_eq!(
            run.response,
            "- World finance leaders meet to discuss debt relief (Associated Press)"
        );
        assert_eq!(run.steps, 2);
    }

    #[tokio::test]
    async fn test_cancelled_producer_stops_before_reporter() {
        let cfg = AppConfig::default();
        let news: Arc<dyn NewsSource> = Arc::new(StaticNewsSource::sample());
        let reporter = news_reporter_agent(
            &cfg,
            Arc::new(MockLlmClient::scripted(offline::reporter("World Finance"))),
            news,
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        let producer = news_producer_agent(
            &cfg,
            Arc::new(MockLlmClient::scripted(offline::producer("World Finance"))),
            reporter,
            cancel,
        );
        let err = producer.run(&news_request("World Finance")).await.unwrap_err();
        assert!(matches!(err, crate::core::AgentError::Cancelled));
    }
}
