use super::RemoteFault;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    CreateMessageRequestArgs, CreateThreadRequestArgs, MessageContent, MessageObject, MessageRole,
};

pub(super) async fn create_thread(client: &Client<OpenAIConfig>) -> Result<String, RemoteFault> {
    let request = CreateThreadRequestArgs::default().build()?;
    let thread = client.threads().create(request).await?;
    tracing::info!(thread_id = %thread.id, "created thread");
    Ok(thread.id)
}

pub(super) async fn add_user_message(
    client: &Client<OpenAIConfig>,
    thread_id: &str,
    text: &str,
) -> Result<(), RemoteFault> {
    let request = CreateMessageRequestArgs::default()
        .role(MessageRole::User)
        .content(text)
        .build()?;
    let message = client.threads().messages(thread_id).create(request).await?;
    tracing::debug!(message_id = %message.id, "added user message");
    Ok(())
}

pub(super) async fn latest_assistant_message(
    client: &Client<OpenAIConfig>,
    thread_id: &str,
) -> Result<Option<String>, RemoteFault> {
    let messages = client
        .threads()
        .messages(thread_id)
        .list(&[("limit", "1"), ("order", "desc")])
        .await?;
    Ok(messages
        .data
        .first()
        .filter(|message| matches!(message.role, MessageRole::Assistant))
        .map(message_text))
}

fn message_text(message: &MessageObject) -> String {
    message
        .content
        .iter()
        .filter_map(|block| match block {
            MessageContent::Text(text) => Some(text.text.value.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
