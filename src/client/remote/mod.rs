mod assistant;
mod polling;
mod streaming;
mod thread;

pub use assistant::provision_assistant;
pub use polling::PollingRuns;
pub use streaming::StreamingRuns;

use crate::dispatch::{ToolCallRequest, ToolResult};

use async_openai::error::OpenAIError;
use async_openai::types::{RunObject, RunStatus};
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Failures of the hosted assistant service.
#[derive(Debug, Error)]
pub enum RemoteFault {
    #[error(transparent)]
    Api(#[from] OpenAIError),
    #[error("failed to submit tool outputs for run {run_id}: {source}")]
    SubmitToolOutputs {
        run_id: String,
        #[source]
        source: OpenAIError,
    },
    #[error("run ended with status {status}{}", reason_suffix(.reason))]
    RunEnded {
        status: String,
        reason: Option<String>,
    },
    #[error("run stream error: {0}")]
    Stream(String),
    #[error("run stream closed before the run settled")]
    StreamClosed,
    #[error("run {run_id} requires tool output but requested no tool calls")]
    EmptyToolRequest { run_id: String },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}

/// State transitions of a remote run, as seen by the turn driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    TextDelta(String),
    RequiresToolOutput {
        run_id: String,
        calls: Vec<ToolCallRequest>,
    },
    Completed,
    Ended {
        status: String,
        reason: Option<String>,
    },
}

impl RunEvent {
    /// Maps a settled run to its event. Returns `None` while the run is
    /// still queued or in progress.
    pub fn from_settled_run(run: &RunObject) -> Option<Self> {
        match run.status {
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling => None,
            RunStatus::RequiresAction => Some(Self::RequiresToolOutput {
                run_id: run.id.clone(),
                calls: run
                    .required_action
                    .as_ref()
                    .map(|action| {
                        action
                            .submit_tool_outputs
                            .tool_calls
                            .iter()
                            .map(ToolCallRequest::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
            RunStatus::Completed => Some(Self::Completed),
            ref status => Some(Self::Ended {
                status: format!("{status:?}").to_lowercase(),
                reason: run.last_error.as_ref().map(|error| error.message.clone()),
            }),
        }
    }
}

pub type RunEventStream = Pin<Box<dyn Stream<Item = Result<RunEvent, RemoteFault>> + Send>>;

/// Identifiers of the conversation, fixed once the session has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub assistant_id: String,
    pub thread_id: String,
}

/// The remote side of a conversation. Implementations differ in how a run
/// is observed (polled or streamed) but report the same [`RunEvent`]s.
#[async_trait]
pub trait RunBackend {
    async fn create_thread(&self) -> Result<String, RemoteFault>;

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), RemoteFault>;

    async fn start_run(&self, session: &Session) -> Result<RunEventStream, RemoteFault>;

    async fn submit_tool_outputs(
        &self,
        session: &Session,
        run_id: &str,
        outputs: Vec<ToolResult>,
    ) -> Result<RunEventStream, RemoteFault>;

    async fn latest_assistant_message(&self, thread_id: &str)
    -> Result<Option<String>, RemoteFault>;
}
