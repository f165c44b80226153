//! scout-news：新闻制作人 -> 记者
//!
//! 用法：scout-news [topic]，默认 World Finance。Ctrl-C 同时取消制作人与记者。

use anyhow::Context;

use scout::agent::{
    cancel_on_ctrl_c, news_producer_agent, news_reporter_agent, news_request, offline, DEFAULT_TOPIC,
};
use scout::config::load_config;
use scout::llm::create_llm_from_config;
use scout::sources::create_sources_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout::observability::init();
    let cfg = load_config(None).context("Failed to load config")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let topic = if args.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        args.join(" ")
    };

    let cancel = cancel_on_ctrl_c();
    let (news, _) = create_sources_from_config(&cfg);
    let reporter = news_reporter_agent(&cfg, create_llm_from_config(&cfg, offline::reporter(&topic)), news);
    let producer = news_producer_agent(
        &cfg,
        create_llm_from_config(&cfg, offline::producer(&topic)),
        reporter,
        cancel,
    );

    let run = producer
        .run(&news_request(&topic))
        .await
        .context("News workflow failed")?;
    println!("{}", run.response);
    Ok(())
}
