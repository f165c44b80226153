//! scout-basic：单 Agent 新闻对话

use anyhow::Context;

use scout::agent::{basic_news_agent, cancel_on_ctrl_c, news_request, offline, DEFAULT_TOPIC};
use scout::config::load_config;
use scout::llm::create_llm_from_config;
use scout::sources::create_sources_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout::observability::init();
    let cfg = load_config(None).context("Failed to load config")?;

    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    let cancel = cancel_on_ctrl_c();
    let (news, _) = create_sources_from_config(&cfg);
    let agent = basic_news_agent(&cfg, create_llm_from_config(&cfg, offline::basic(&topic)), news)
        .with_cancel(cancel);
    let run = agent
        .run(&news_request(&topic))
        .await
        .context("News conversation failed")?;
    println!("{}", run.response);
    Ok(())
}
