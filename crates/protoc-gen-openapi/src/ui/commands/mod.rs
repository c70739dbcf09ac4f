pub mod generate;

pub use generate::{GenerateConfig, run_plugin};
