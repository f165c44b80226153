//! 认知层：Planner、ReAct 主循环、过程事件

pub mod events;
pub mod loop_;
pub mod planner;

pub use events::ReactEvent;
pub use loop_::{Agent, AgentRun, DEFAULT_MAX_STEPS};
pub use planner::{build_system_prompt, parse_llm_output, Planner, PlannerOutput, ToolCall};
