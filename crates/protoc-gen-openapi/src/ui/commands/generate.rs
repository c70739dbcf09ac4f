use std::path::PathBuf;

use prost::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

use crate::{generator::handle_request, ui::Cli};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateConfig {
  pub input: Option<PathBuf>,
  pub output: Option<PathBuf>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_cli(cli: Cli) -> Self {
    let Cli {
      input,
      output,
      verbose,
      quiet,
    } = cli;
    Self {
      input,
      output,
      verbose,
      quiet,
    }
  }

  /// Log filter directive. The flags win over `RUST_LOG`, which wins over the
  /// default.
  fn log_directive(&self) -> Option<&'static str> {
    if self.verbose {
      Some("debug")
    } else if self.quiet {
      Some("error")
    } else {
      None
    }
  }

  fn env_filter(&self) -> EnvFilter {
    match self.log_directive() {
      Some(directive) => EnvFilter::new(directive),
      None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    }
  }

  /// Installs the global subscriber. Logs go to stderr; stdout carries the
  /// plugin response.
  pub fn init_logging(&self) {
    tracing_subscriber::fmt()
      .with_env_filter(self.env_filter())
      .with_writer(std::io::stderr)
      .with_target(false)
      .init();
  }

  async fn read_request(&self) -> anyhow::Result<Vec<u8>> {
    match &self.input {
      Some(path) => Ok(tokio::fs::read(path).await?),
      None => {
        let mut buffer = Vec::new();
        tokio::io::stdin().read_to_end(&mut buffer).await?;
        Ok(buffer)
      }
    }
  }

  async fn write_response(&self, encoded: Vec<u8>) -> anyhow::Result<()> {
    match &self.output {
      Some(path) => {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
          tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, encoded).await?;
      }
      None => {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
      }
    }
    Ok(())
  }
}

/// Reads one request, converts it and writes one response. Conversion errors
/// travel inside the response; only I/O failures end up here.
pub async fn run_plugin(config: GenerateConfig) -> anyhow::Result<()> {
  let input = config.read_request().await?;
  tracing::debug!(bytes = input.len(), "read request");

  let response = handle_request(&input);
  config.write_response(response.encode_to_vec()).await?;
  Ok(())
}
