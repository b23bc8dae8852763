use super::io::{Unescaper, read_user_input, write_assistant_message};

use crate::client::remote::{RemoteFault, RunBackend, RunEvent, Session};
use crate::dispatch::Executor;

use anyhow::Result;
use futures::stream::StreamExt;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::signal;

const WELCOME: &str =
    "Welcome to the weather assistant!\nType 'exit' or 'quit' to end the conversation.\n\n";
const GOODBYE: &str = "Exiting the chat. Goodbye!\n";

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Remote(#[from] RemoteFault),
    #[error("console i/o failed")]
    Console(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnState {
    Submitted,
    AwaitingCompletion,
    RequiresToolOutput,
    Completed,
}

fn transition(from: TurnState, to: TurnState) -> TurnState {
    tracing::debug!(?from, ?to, "turn state");
    to
}

enum Input {
    Line(String),
    Exhausted,
    Interrupted,
}

pub struct CliClient<B, C> {
    backend: B,
    executor: Executor<C>,
    session: Session,
}

async fn interrupted<W: AsyncWrite + Unpin>(output: &mut W) -> Result<()> {
    output.write_all(b"\nDetected keyboard interrupt. ").await?;
    output.write_all(GOODBYE.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

impl<B: RunBackend, C> CliClient<B, C> {
    pub fn new(backend: B, executor: Executor<C>, session: Session) -> Self {
        CliClient {
            backend,
            executor,
            session,
        }
    }

    /// Opens a fresh thread for `assistant_id`.
    pub async fn start(
        backend: B,
        executor: Executor<C>,
        assistant_id: String,
    ) -> Result<Self, RemoteFault> {
        let thread_id = backend.create_thread().await?;
        let session = Session {
            assistant_id,
            thread_id,
        };
        Ok(Self::new(backend, executor, session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads turns until the operator quits, input ends or Ctrl-C arrives.
    /// Remote faults are reported and the loop carries on.
    pub async fn chat<R, W>(&self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let ctrl_c = async {
            if let Err(error) = signal::ctrl_c().await {
                tracing::warn!(%error, "could not listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        self.chat_until(input, output, ctrl_c).await
    }

    /// [`Self::chat`] with the operator interrupt supplied by the caller.
    /// `interrupt` is raced against both the prompt and the running turn.
    pub async fn chat_until<R, W, F>(
        &self,
        input: &mut R,
        output: &mut W,
        interrupt: F,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        output.write_all(WELCOME.as_bytes()).await?;
        loop {
            let next = tokio::select! {
                line = read_user_input(input, output) => match line? {
                    Some(line) => Input::Line(line),
                    None => Input::Exhausted,
                },
                _ = &mut interrupt => Input::Interrupted,
            };

            let user_input = match next {
                Input::Line(line) => line,
                Input::Exhausted => {
                    output.write_all(b"\n").await?;
                    output.write_all(GOODBYE.as_bytes()).await?;
                    return Ok(());
                }
                Input::Interrupted => return interrupted(output).await,
            };

            if matches!(user_input.to_lowercase().as_str(), "exit" | "quit") {
                output.write_all(GOODBYE.as_bytes()).await?;
                return Ok(());
            }
            if user_input.is_empty() {
                output
                    .write_all(b"Please enter a message or type 'exit' to quit.\n")
                    .await?;
                continue;
            }

            let turn = tokio::select! {
                result = self.run_turn(&user_input, output) => Some(result),
                _ = &mut interrupt => None,
            };
            match turn {
                None => return interrupted(output).await,
                Some(Ok(())) => {}
                Some(Err(TurnError::Remote(fault))) => {
                    tracing::error!(error = %fault, "turn failed");
                    output
                        .write_all(
                            format!(
                                "An error occurred: {fault}\nPlease try again or type 'exit' to quit.\n"
                            )
                            .as_bytes(),
                        )
                        .await?;
                }
                Some(Err(TurnError::Console(error))) => return Err(error.into()),
            }
            output.flush().await?;
        }
    }

    /// Drives one exchange: submits `user_input`, answers every tool call
    /// the run asks for, and prints the assistant's reply.
    pub async fn run_turn<W>(&self, user_input: &str, output: &mut W) -> Result<(), TurnError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut state = TurnState::Submitted;
        self.backend
            .add_user_message(&self.session.thread_id, user_input)
            .await?;
        let mut events = self.backend.start_run(&self.session).await?;
        state = transition(state, TurnState::AwaitingCompletion);

        let mut unescaper = Unescaper::default();
        let mut streamed = false;
        while state != TurnState::Completed {
            let event = events.next().await.ok_or(RemoteFault::StreamClosed)??;
            match event {
                RunEvent::TextDelta(text) => {
                    if !streamed {
                        output.write_all(b"Assistant: ").await?;
                        streamed = true;
                    }
                    output.write_all(unescaper.push(&text).as_bytes()).await?;
                    output.flush().await?;
                }
                RunEvent::RequiresToolOutput { run_id, calls } => {
                    state = transition(state, TurnState::RequiresToolOutput);
                    if calls.is_empty() {
                        return Err(RemoteFault::EmptyToolRequest { run_id }.into());
                    }
                    let outputs = self.executor.dispatch(&calls);
                    tracing::info!(%run_id, count = outputs.len(), "submitting tool outputs");
                    events = self
                        .backend
                        .submit_tool_outputs(&self.session, &run_id, outputs)
                        .await?;
                    state = transition(state, TurnState::AwaitingCompletion);
                }
                RunEvent::Completed => state = transition(state, TurnState::Completed),
                RunEvent::Ended { status, reason } => {
                    return Err(RemoteFault::RunEnded { status, reason }.into());
                }
            }
        }

        if streamed {
            output.write_all(unescaper.finish().as_bytes()).await?;
            output.write_all(b"\n\n").await?;
            output.flush().await?;
        } else if let Some(text) = self
            .backend
            .latest_assistant_message(&self.session.thread_id)
            .await?
        {
            write_assistant_message(output, &text).await?;
        } else {
            tracing::warn!(thread_id = %self.session.thread_id, "run completed without a reply");
        }
        Ok(())
    }
}
