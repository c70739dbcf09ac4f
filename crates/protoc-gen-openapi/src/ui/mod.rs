pub mod cli;
pub mod commands;

pub use cli::Cli;
