use std::path::PathBuf;

use clap::Parser;

/// `protoc` runs the plugin without arguments and talks to it over stdin and
/// stdout. The options exist for running it by hand against a captured
/// request.
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-openapi")]
#[command(author, version, about = "protoc plugin that generates an OpenAPI v3 document")]
pub struct Cli {
  /// Read the encoded CodeGeneratorRequest from FILE instead of stdin
  #[arg(short, long, value_name = "FILE")]
  pub input: Option<PathBuf>,

  /// Write the encoded CodeGeneratorResponse to FILE instead of stdout
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Log every conversion step to stderr
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Log errors only
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}
