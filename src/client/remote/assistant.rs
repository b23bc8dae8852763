use super::RemoteFault;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{AssistantTools, CreateAssistantRequestArgs};

const INSTRUCTIONS: &str =
    "You are a weather bot. Use the provided functions to answer questions.";

/// Returns the id of the assistant to talk to: the existing one when an id
/// is given, otherwise a new assistant advertising `tools`.
pub async fn provision_assistant(
    client: &Client<OpenAIConfig>,
    assistant_id: Option<&str>,
    model: &str,
    tools: Vec<AssistantTools>,
) -> Result<String, RemoteFault> {
    let assistant = match assistant_id {
        Some(id) => {
            tracing::info!(assistant_id = id, "reusing assistant");
            client.assistants().retrieve(id).await?
        }
        None => {
            let request = CreateAssistantRequestArgs::default()
                .instructions(INSTRUCTIONS)
                .model(model)
                .tools(tools)
                .build()?;
            let assistant = client.assistants().create(request).await?;
            tracing::info!(assistant_id = %assistant.id, model, "created assistant");
            assistant
        }
    };
    Ok(assistant.id)
}
