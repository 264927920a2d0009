mod error;
mod interface;
mod manager;
mod process;
mod rpc;
mod web_search;

pub use error::ToolCallError;
pub use interface::{LocalTool, ServerToolInfo, ToolServerInterface};
pub use manager::ServerManager;
pub use web_search::{SearchHit, WEB_SEARCH_TOOL, WebSearchTool};
