//! Two-pass conversion of a plugin request into one OpenAPI document.
//!
//! Pass 1 walks every file of the request, targets or not, and registers its
//! messages and enums in a [`TypeRegistry`]; it also indexes the file's source
//! comments. Registration never fails: a group field or an unknown custom verb
//! only aborts the run when Pass 2 converts it. Pass 2 converts only the generation targets: first every message
//! (so that schemas exist), then every service. A method may therefore take or
//! return a message from a dependency that is not itself a target.
//!
//! The first error aborts the run; no partial document is produced.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};
use serde_json::json;

use crate::{
  descriptor::{CodeGeneratorRequest, FileDescriptor},
  generator::{
    config::{GeneratorConfig, OPENAPI_VERSION},
    errors::ConvertError,
    metrics::GenerationStats,
    path_converter::PathConverter,
    schema_converter::SchemaConverter,
    source_info::SourceInfo,
    type_registry::{PackageNode, TypeRegistry},
  },
};

#[derive(Debug)]
pub struct GeneratedOutput {
  pub spec: oas3::Spec,
  pub stats: GenerationStats,
}

pub struct Orchestrator {
  config: GeneratorConfig,
}

impl Orchestrator {
  pub fn new(config: GeneratorConfig) -> Self {
    Self { config }
  }

  pub fn run(&self, request: &CodeGeneratorRequest) -> Result<GeneratedOutput, ConvertError> {
    let mut stats = GenerationStats::default();
    let mut registry = TypeRegistry::new();
    let mut source_info = SourceInfo::new();
    let mut files = HashMap::<String, FileDescriptor>::new();

    for proto in &request.proto_file {
      let Some(package) = proto.package.as_deref().filter(|package| !package.is_empty()) else {
        tracing::debug!(file = proto.name(), "file has no package declaration");
        stats.record_skipped_file(proto.name());
        continue;
      };
      let file = FileDescriptor::from(proto);

      let comments = source_info.add_file(proto).len();
      registry.register_package(package);
      for message in &file.messages {
        registry.register_message(package, message);
      }
      for enumeration in &file.enums {
        registry.register_enum(package, enumeration);
      }
      let types = registry.lookup_package(package).map_or(0, PackageNode::type_count);
      tracing::debug!(file = %file.name, package, types, comments, "registered file");
      stats.record_registered_file();
      files.insert(file.name.clone(), file);
    }

    let mut schemas = SchemaConverter::new(&registry, &source_info, self.config.property_naming);
    let mut paths = PathConverter::new(&registry, &source_info);

    for target in &request.file_to_generate {
      let Some(file) = files.get(target) else {
        tracing::warn!(file = %target, "generation target was not registered; skipping");
        continue;
      };
      tracing::info!(file = %target, "converting file");
      Self::convert_file(file, &mut schemas, &mut paths).map_err(|error| error.in_file(target))?;
      stats.record_converted_file();
    }

    let output = paths.finish();
    stats.schemas_generated = schemas.len();
    stats.record_operations(output.operations);
    stats.record_warnings(output.warnings);
    stats.record_cycles(detect_cycles(schemas.dependencies()));

    let mut spec = self.skeleton()?;
    spec.paths = Some(output.paths);
    if let Some(components) = spec.components.as_mut() {
      components.schemas = schemas
        .into_schemas()
        .into_iter()
        .map(|(title, schema)| (title, oas3::spec::ObjectOrReference::Object(schema)))
        .collect();
    }

    Ok(GeneratedOutput { spec, stats })
  }

  /// Converts the messages of one target file, then its services.
  fn convert_file<'a>(
    file: &FileDescriptor,
    schemas: &mut SchemaConverter<'a>,
    paths: &mut PathConverter<'a>,
  ) -> Result<(), ConvertError> {
    for message in file.messages.iter().flat_map(|message| message.descendants()) {
      if message.map_entry {
        continue;
      }
      schemas.convert_message(message)?;
    }

    for service in &file.services {
      let contributed = paths.convert_service(service, schemas)?;
      tracing::debug!(service = %service.full_name, paths = contributed.len(), "converted service");
    }

    Ok(())
  }

  fn skeleton(&self) -> Result<oas3::Spec, ConvertError> {
    let config = &self.config;
    let document = json!({
      "openapi": OPENAPI_VERSION,
      "info": {
        "title": config.title,
        "description": config.description,
        "version": config.version,
      },
      "servers": [
        {
          "url": config.server_url,
          "description": config.server_description,
        }
      ],
      "paths": {},
      "components": {
        "schemas": {},
      },
    });
    Ok(serde_json::from_value(document)?)
  }
}

/// Groups of messages that reference each other, directly or transitively,
/// including messages that reference themselves.
fn detect_cycles(dependencies: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<String>> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for (node, deps) in dependencies {
    graph.add_node(node.as_str());
    for dep in deps {
      graph.add_edge(node.as_str(), dep.as_str(), ());
    }
  }

  kosaraju_scc(&graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|scc| {
      let mut cycle: Vec<String> = scc.into_iter().map(String::from).collect();
      cycle.sort();
      cycle
    })
    .collect()
}
