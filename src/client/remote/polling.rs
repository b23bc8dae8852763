use super::{RemoteFault, RunBackend, RunEvent, RunEventStream, Session, thread};
use crate::dispatch::ToolResult;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateRunRequestArgs, RunObject, SubmitToolOutputsRunRequest};
use async_stream::stream;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Observes runs by retrieving their status until they settle.
pub struct PollingRuns {
    client: Client<OpenAIConfig>,
    interval: Duration,
}

impl PollingRuns {
    pub fn new(client: Client<OpenAIConfig>, interval: Duration) -> Self {
        Self { client, interval }
    }

    fn poll_until_settled(&self, thread_id: &str, run: RunObject) -> RunEventStream {
        let client = self.client.clone();
        let interval = self.interval;
        let thread_id = thread_id.to_string();
        Box::pin(stream! {
            let mut run = run;
            loop {
                if let Some(event) = RunEvent::from_settled_run(&run) {
                    tracing::debug!(run_id = %run.id, status = ?run.status, "run settled");
                    yield Ok(event);
                    break;
                }
                tracing::trace!(run_id = %run.id, status = ?run.status, "run pending");
                sleep(interval).await;
                match client.threads().runs(&thread_id).retrieve(&run.id).await {
                    Ok(latest) => run = latest,
                    Err(error) => {
                        yield Err(RemoteFault::from(error));
                        break;
                    }
                }
            }
        })
    }
}

#[async_trait]
impl RunBackend for PollingRuns {
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
        let run = self
            .client
            .threads()
            .runs(&session.thread_id)
            .create(request)
            .await?;
        tracing::info!(run_id = %run.id, "started run");
        Ok(self.poll_until_settled(&session.thread_id, run))
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
        let run = self
            .client
            .threads()
            .runs(&session.thread_id)
            .submit_tool_outputs(run_id, request)
            .await
            .map_err(|source| RemoteFault::SubmitToolOutputs {
                run_id: run_id.to_string(),
                source,
            })?;
        Ok(self.poll_until_settled(&session.thread_id, run))
    }

    async fn latest_assistant_message(
        &self,
        thread_id: &str,
    ) -> Result<Option<String>, RemoteFault> {
        thread::latest_assistant_message(&self.client, thread_id).await
    }
}
