use prost::Message;

use crate::{
  descriptor::{
    CodeGeneratorRequest, CodeGeneratorResponse,
    wire::{FEATURE_PROTO3_OPTIONAL, GeneratedFile},
  },
  generator::{
    config::GeneratorConfig,
    errors::ConvertError,
    orchestrator::{GeneratedOutput, Orchestrator},
  },
};

/// Name of the single file the plugin emits.
pub const OUTPUT_FILE_NAME: &str = "spec.json";

/// Turns an encoded `CodeGeneratorRequest` into a `CodeGeneratorResponse`.
///
/// Never fails: conversion errors are reported through the response's `error`
/// field, which is how `protoc` expects plugins to signal problems.
pub fn handle_request(input: &[u8]) -> CodeGeneratorResponse {
  let (file, error) = match generate(input) {
    Ok(file) => (vec![file], None),
    Err(error) => {
      tracing::error!(%error, "conversion failed");
      (Vec::new(), Some(error.to_string()))
    }
  };

  CodeGeneratorResponse {
    error,
    supported_features: Some(FEATURE_PROTO3_OPTIONAL),
    file,
  }
}

fn generate(input: &[u8]) -> Result<GeneratedFile, ConvertError> {
  let request = CodeGeneratorRequest::decode(input)?;
  let config = GeneratorConfig::from_parameter(request.parameter())?;
  tracing::debug!(
    files = request.proto_file.len(),
    targets = request.file_to_generate.len(),
    "decoded request"
  );

  let GeneratedOutput { spec, stats } = Orchestrator::new(config).run(&request)?;
  tracing::info!(
    registered = stats.files_registered,
    skipped = stats.files_skipped,
    converted = stats.files_converted,
    schemas = stats.schemas_generated,
    operations = stats.operations_converted,
    cycles = stats.cycles_detected,
    warnings = stats.warnings.len(),
    "generated document"
  );
  for warning in &stats.warnings {
    tracing::warn!(%warning, "conversion warning");
  }
  for cycle in &stats.cycle_details {
    tracing::debug!(cycle = %cycle.join(" -> "), "recursive message group");
  }

  Ok(GeneratedFile {
    name: Some(OUTPUT_FILE_NAME.to_string()),
    insertion_point: None,
    content: Some(serde_json::to_string_pretty(&spec)?),
  })
}
