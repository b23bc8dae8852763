use super::{ToolCallRequest, ToolResult};
use crate::types::{ToolCallError, ToolSet};

/// Runs requested tool calls against a [`ToolSet`] with a fixed context.
///
/// Every request yields a [`ToolResult`]; failures are rendered as text so
/// the remote run always gets an output for each call it is waiting on.
pub struct Executor<C> {
    toolset: ToolSet<C>,
    context: C,
}

impl<C> Executor<C> {
    pub fn new(toolset: ToolSet<C>, context: C) -> Self {
        Self { toolset, context }
    }

    pub fn execute(&self, request: &ToolCallRequest) -> ToolResult {
        tracing::info!(
            tool = %request.tool_name,
            call_id = %request.call_id,
            "executing tool call"
        );
        tracing::debug!(arguments = %request.raw_arguments);

        let arguments = match request.raw_arguments.trim() {
            "" => "{}",
            arguments => arguments,
        };
        let output = match self
            .toolset
            .try_tool_call(&self.context, &request.tool_name, arguments)
        {
            Ok(output) => output,
            Err(error) => {
                tracing::warn!(
                    tool = %request.tool_name,
                    call_id = %request.call_id,
                    %error,
                    "tool call failed"
                );
                describe_failure(&request.tool_name, &error)
            }
        };
        tracing::debug!(call_id = %request.call_id, %output, "tool call finished");

        ToolResult {
            call_id: request.call_id.clone(),
            output,
        }
    }

    /// Executes a whole batch in order, one result per request.
    pub fn dispatch(&self, requests: &[ToolCallRequest]) -> Vec<ToolResult> {
        requests.iter().map(|request| self.execute(request)).collect()
    }
}

fn describe_failure(tool_name: &str, error: &ToolCallError) -> String {
    match error {
        ToolCallError::NotFound(_) => format!("Error: tool '{tool_name}' is not supported"),
        ToolCallError::Deserialization(source) => {
            format!("Error: invalid arguments for '{tool_name}': {source}")
        }
        ToolCallError::Tool(source) => format!("Error: {source}"),
    }
}
