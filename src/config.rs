use async_openai::config::OpenAIConfig;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// How a run is observed while it works through a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SubmitMode {
    /// Retrieve the run status until it settles
    Poll,
    /// Follow the run's event stream
    Stream,
}

#[derive(Debug, Parser)]
#[command(name = "weatherbot")]
#[command(about = "Chat with a weather assistant that answers through local tool calls")]
pub struct Cli {
    /// How tool outputs are submitted and the run followed
    #[arg(long, value_enum, default_value_t = SubmitMode::Poll)]
    pub mode: SubmitMode,

    /// Reuse an existing assistant instead of creating one
    #[arg(long, env = "ASSISTANT_ID")]
    pub assistant_id: Option<String>,

    /// Model for a newly created assistant
    #[arg(long, default_value = "gpt-4o")]
    pub model: String,

    /// The API key to use
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// The base URL to use
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// Milliseconds between run status checks in poll mode
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,
}

impl Cli {
    pub fn openai_config(&self) -> OpenAIConfig {
        let mut config = OpenAIConfig::new();
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base);
        }
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_polling() {
        let cli = Cli::try_parse_from(["weatherbot"]).unwrap();
        assert_eq!(cli.mode, SubmitMode::Poll);
        assert_eq!(cli.model, "gpt-4o");
        assert_eq!(cli.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn parses_stream_mode_and_assistant() {
        let cli = Cli::try_parse_from([
            "weatherbot",
            "--mode",
            "stream",
            "--assistant-id",
            "asst_123",
            "--poll-interval-ms",
            "50",
        ])
        .unwrap();
        assert_eq!(cli.mode, SubmitMode::Stream);
        assert_eq!(cli.assistant_id.as_deref(), Some("asst_123"));
        assert_eq!(cli.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["weatherbot", "--mode", "carrier-pigeon"]).is_err());
    }
}
