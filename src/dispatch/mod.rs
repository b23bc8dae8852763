mod executor;

pub use executor::Executor;

use async_openai::types::{RunToolCallObject, ToolsOutputs};

/// One tool invocation requested by the remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub call_id: String,
    pub tool_name: String,
    pub raw_arguments: String,
}

/// The output reported back for exactly one [`ToolCallRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub call_id: String,
    pub output: String,
}

impl From<&RunToolCallObject> for ToolCallRequest {
    fn from(call: &RunToolCallObject) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.function.name.clone(),
            raw_arguments: call.function.arguments.clone(),
        }
    }
}

impl From<ToolResult> for ToolsOutputs {
    fn from(result: ToolResult) -> Self {
        ToolsOutputs {
            tool_call_id: Some(result.call_id),
            output: Some(result.output),
        }
    }
}
