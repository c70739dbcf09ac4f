#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, commands::GenerateConfig};

mod descriptor;
mod generator;
mod ui;
mod utils;

#[cfg(test)]
mod tests;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let config = GenerateConfig::from_cli(Cli::parse());
  config.init_logging();
  ui::commands::run_plugin(config).await
}
