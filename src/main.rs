//! scout：人物调研
//!
//! 用法：scout [name] [company]；不带参数时调研 Scott Persinger（Tatari）。
//! 检索到多个候选时在控制台列出并等待选择，Ctrl-C 取消。

use anyhow::Context;

use scout::agent::{
    cancel_on_ctrl_c, console_selector, offline, people_research_agent, people_research_request,
    DEFAULT_COMPANY, DEFAULT_PERSON,
};
use scout::config::load_config;
use scout::llm::create_llm_from_config;
use scout::sources::create_sources_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout::observability::init();
    let cfg = load_config(None).context("Failed to load config")?;

    let mut args = std::env::args().skip(1);
    let (name, company) = match args.next() {
        Some(name) => (name, args.next()),
        None => (DEFAULT_PERSON.to_string(), Some(DEFAULT_COMPANY.to_string())),
    };

    let cancel = cancel_on_ctrl_c();

    let (_, profiles) = create_sources_from_config(&cfg);
    let llm = create_llm_from_config(&cfg, offline::people_research(&name, company.as_deref()));
    let agent = people_research_agent(&cfg, llm, profiles, console_selector(&cfg.selector), cancel);

    let run = agent
        .run(&people_research_request(&name, company.as_deref()))
        .await
        .context("People research failed")?;
    tracing::info!(steps = run.steps, "done");
    println!("{}", run.response);
    Ok(())
}
