use super::{RemoteFault, RunBackend, RunEvent, RunEventStream, Session, thread};
use crate::dispatch::ToolResult;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    AssistantEventStream, AssistantStreamEvent, CreateRunRequestArgs, MessageDeltaContent,
    MessageDeltaObject, SubmitToolOutputsRunRequest,
};
use async_stream::stream;
use async_trait::async_trait;
use futures::stream::StreamExt;

/// Observes runs through the server-sent event stream.
pub struct StreamingRuns {
    client: Client<OpenAIConfig>,
}

impl StreamingRuns {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

fn map_events(mut events: AssistantEventStream) -> RunEventStream {
    Box::pin(stream! {
        while let Some(event) = events.next().await {
            match event {
                Ok(AssistantStreamEvent::ThreadMessageDelta(delta)) => {
                    for text in delta_text(&delta) {
                        yield Ok(RunEvent::TextDelta(text));
                    }
                }
                Ok(AssistantStreamEvent::ThreadRunRequiresAction(run))
                | Ok(AssistantStreamEvent::ThreadRunCompleted(run))
                | Ok(AssistantStreamEvent::ThreadRunFailed(run))
                | Ok(AssistantStreamEvent::ThreadRunCancelled(run))
                | Ok(AssistantStreamEvent::ThreadRunExpired(run))
                | Ok(AssistantStreamEvent::ThreadRunIncomplete(run)) => {
                    if let Some(event) = RunEvent::from_settled_run(&run) {
                        tracing::debug!(run_id = %run.id, status = ?run.status, "run settled");
                        yield Ok(event);
                    }
                }
                Ok(AssistantStreamEvent::ErrorEvent(error)) => {
                    yield Err(RemoteFault::Stream(error.message));
                    break;
                }
                Ok(AssistantStreamEvent::Done(_)) => break,
                Ok(other) => tracing::trace!(event = ?other, "ignored stream event"),
                Err(error) => {
                    yield Err(RemoteFault::from(error));
                    break;
                }
            }
        }
    })
}

fn delta_text(delta: &MessageDeltaObject) -> Vec<String> {
    delta
        .delta
        .content
        .iter()
        .flatten()
        .filter_map(|content| match content {
            MessageDeltaContent::Text(text) => text.text.as_ref()?.value.clone(),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl RunBackend for StreamingRuns {
    async fn create_thread(&self) -> Result<String, RemoteFault> {
        thread::create_thread(&self.client).await
    }

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), RemoteFault> {
        thread::add_user_message(&self.client, thread_id, text).await
    }

    async fn start_run(&self, session: &Session) -> Result<RunEventStream, RemoteFault> {
        let request = CreateRunRequestArgs::default()
            .assistant_id(&session.assistant_id)
            .build()?;
        let events = self
            .client
            .threads()
            .runs(&session.thread_id)
            .create_stream(request)
            .await?;
        Ok(map_events(events))
    }

    async fn submit_tool_outputs(
        &self,
        session: &Session,
        run_id: &str,
        outputs: Vec<ToolResult>,
    ) -> Result<RunEventStream, RemoteFault> {
        let request = SubmitToolOutputsRunRequest {
            tool_outputs: outputs.into_iter().map(Into::into).collect(),
            stream: None,
        };
        let events = self
            .client
            .threads()
            .runs(&session.thread_id)
            .submit_tool_outputs_stream(run_id, request)
            .await
            .map_err(|source| RemoteFault::SubmitToolOutputs {
                run_id: run_id.to_string(),
                source,
            })?;
        Ok(map_events(events))
    }

    async fn latest_assistant_message(
        &self,
        thread_id: &str,
    ) -> Result<Option<String>, RemoteFault> {
        thread::latest_assistant_message(&self.client, thread_id).await
    }
}
