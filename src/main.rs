mod client;
mod config;
mod dispatch;
mod types;
mod weather_tools;

use client::cli::CliClient;
use client::remote::{PollingRuns, RunBackend, StreamingRuns, provision_assistant};
use config::{Cli, SubmitMode};
use dispatch::Executor;
use weather_tools::{WeatherContext, weather_toolset};

use anyhow::{Context, Result};
use async_openai::Client;
use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let toolset = weather_toolset().context("invalid tool definitions")?;
    let client = Client::with_config(cli.openai_config());
    let assistant_id = provision_assistant(
        &client,
        cli.assistant_id.as_deref(),
        &cli.model,
        toolset.assistant_tools(),
    )
    .await
    .context("failed to initialize assistant")?;

    let executor = Executor::new(toolset, WeatherContext::default());
    match cli.mode {
        SubmitMode::Poll => {
            let backend = PollingRuns::new(client, cli.poll_interval());
            chat(backend, executor, assistant_id).await
        }
        SubmitMode::Stream => chat(StreamingRuns::new(client), executor, assistant_id).await,
    }
}

async fn chat<B: RunBackend>(
    backend: B,
    executor: Executor<WeatherContext>,
    assistant_id: String,
) -> Result<()> {
    let cli_client = CliClient::start(backend, executor, assistant_id)
        .await
        .context("error creating thread")?;
    tracing::info!(thread_id = %cli_client.session().thread_id, "session started");
    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    cli_client.chat(&mut input, &mut output).await
}
