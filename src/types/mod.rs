mod tool;
mod tool_object;
mod toolset;

pub use tool::{Tool, ToolError};
pub use toolset::{ToolCallError, ToolSet, ToolSetCreationError};
