pub mod config;
pub mod errors;
pub(crate) mod metrics;
pub mod orchestrator;
pub(crate) mod path_converter;
pub(crate) mod path_template;
pub mod plugin;
pub(crate) mod schema_converter;
pub(crate) mod source_info;
pub(crate) mod type_registry;

pub use plugin::handle_request;

#[cfg(test)]
pub(crate) mod tests;
