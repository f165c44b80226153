pub mod executor;
pub mod human;
pub mod news;
pub mod profiles;
pub mod registry;
pub mod reporter;
pub mod schema;

pub use executor::ToolExecutor;
pub use human::HumanAssistanceTool;
pub use news::{QueryNewsTool, TopHeadlinesTool};
pub use profiles::{GetProfileTool, SearchProfilesTool};
pub use registry::{Tool, ToolRegistry};
pub use reporter::{reporter_task, NewsReporterTool};
pub use schema::tool_call_schema_json;
