use oas3::spec::{ObjectOrReference, ObjectSchema};
use prost::Message;

use crate::{
  descriptor::{
    CodeGeneratorRequest, CodeGeneratorResponse, FileDescriptor, MessageDescriptor,
    model::location_tags,
    wire::{
      CustomHttpPattern, DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
      FieldLabel, FieldType, FileDescriptorProto, HttpRule, Location, MessageOptions, MethodDescriptorProto,
      MethodOptions, OneofDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
    },
  },
  generator::{
    config::{GeneratorConfig, PropertyNaming},
    errors::ConvertError,
    handle_request,
    orchestrator::{GeneratedOutput, Orchestrator},
    schema_converter::SchemaConverter,
    source_info::SourceInfo,
    type_registry::TypeRegistry,
  },
  utils::refs::SCHEMA_REF_PREFIX,
};

pub(crate) fn scalar(name: &str, field_type: FieldType) -> FieldDescriptorProto {
  FieldDescriptorProto {
    name: Some(name.to_string()),
    label: Some(FieldLabel::Optional as i32),
    r#type: Some(field_type as i32),
    ..Default::default()
  }
}

pub(crate) fn message_field(name: &str, type_name: &str) -> FieldDescriptorProto {
  FieldDescriptorProto {
    type_name: Some(type_name.to_string()),
    ..scalar(name, FieldType::Message)
  }
}

pub(crate) fn enum_field(name: &str, type_name: &str) -> FieldDescriptorProto {
  FieldDescriptorProto {
    type_name: Some(type_name.to_string()),
    ..scalar(name, FieldType::Enum)
  }
}

pub(crate) fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
  FieldDescriptorProto {
    label: Some(FieldLabel::Repeated as i32),
    ..field
  }
}

pub(crate) fn in_oneof(field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
  FieldDescriptorProto {
    oneof_index: Some(index),
    ..field
  }
}

pub(crate) fn with_json_name(field: FieldDescriptorProto, json_name: &str) -> FieldDescriptorProto {
  FieldDescriptorProto {
    json_name: Some(json_name.to_string()),
    ..field
  }
}

pub(crate) fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
  DescriptorProto {
    name: Some(name.to_string()),
    field: fields,
    ..Default::default()
  }
}

pub(crate) fn with_nested(mut parent: DescriptorProto, nested: DescriptorProto) -> DescriptorProto {
  parent.nested_type.push(nested);
  parent
}

pub(crate) fn with_oneofs(parent: DescriptorProto, names: &[&str]) -> DescriptorProto {
  DescriptorProto {
    oneof_decl: names
      .iter()
      .map(|name| OneofDescriptorProto {
        name: Some((*name).to_string()),
      })
      .collect(),
    ..parent
  }
}

/// The synthetic entry message `protoc` generates for `map<K, V> <field>`.
pub(crate) fn map_entry(name: &str, key: FieldType, value: FieldDescriptorProto) -> DescriptorProto {
  DescriptorProto {
    options: Some(MessageOptions { map_entry: Some(true) }),
    ..message(
      name,
      vec![
        scalar("key", key),
        FieldDescriptorProto {
          name: Some("value".to_string()),
          ..value
        },
      ],
    )
  }
}

pub(crate) fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
  EnumDescriptorProto {
    name: Some(name.to_string()),
    value: values
      .iter()
      .zip(0..)
      .map(|(value, number)| EnumValueDescriptorProto {
        name: Some((*value).to_string()),
        number: Some(number),
      })
      .collect(),
  }
}

pub(crate) fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
  MethodDescriptorProto {
    name: Some(name.to_string()),
    input_type: Some(input.to_string()),
    output_type: Some(output.to_string()),
    ..Default::default()
  }
}

pub(crate) fn with_http(method: MethodDescriptorProto, rule: HttpRule) -> MethodDescriptorProto {
  let options = method.options.clone().unwrap_or_default();
  MethodDescriptorProto {
    options: Some(MethodOptions {
      http: Some(rule),
      ..options
    }),
    ..method
  }
}

pub(crate) fn deprecated(method: MethodDescriptorProto) -> MethodDescriptorProto {
  let options = method.options.clone().unwrap_or_default();
  MethodDescriptorProto {
    options: Some(MethodOptions {
      deprecated: Some(true),
      ..options
    }),
    ..method
  }
}

pub(crate) fn get(path: &str) -> HttpRule {
  HttpRule {
    get: Some(path.to_string()),
    ..Default::default()
  }
}

pub(crate) fn post(path: &str, body: &str) -> HttpRule {
  HttpRule {
    post: Some(path.to_string()),
    body: Some(body.to_string()),
    ..Default::default()
  }
}

pub(crate) fn patch(path: &str) -> HttpRule {
  HttpRule {
    patch: Some(path.to_string()),
    ..Default::default()
  }
}

pub(crate) fn custom(kind: &str, path: &str) -> HttpRule {
  HttpRule {
    custom: Some(CustomHttpPattern {
      kind: Some(kind.to_string()),
      path: Some(path.to_string()),
    }),
    ..Default::default()
  }
}

pub(crate) fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
  ServiceDescriptorProto {
    name: Some(name.to_string()),
    method: methods,
  }
}

pub(crate) fn file(
  name: &str,
  package: &str,
  messages: Vec<DescriptorProto>,
  services: Vec<ServiceDescriptorProto>,
) -> FileDescriptorProto {
  FileDescriptorProto {
    name: Some(name.to_string()),
    package: Some(package.to_string()).filter(|package| !package.is_empty()),
    message_type: messages,
    service: services,
    syntax: Some("proto3".to_string()),
    ..Default::default()
  }
}

pub(crate) fn with_enums(file: FileDescriptorProto, enums: Vec<EnumDescriptorProto>) -> FileDescriptorProto {
  FileDescriptorProto {
    enum_type: enums,
    ..file
  }
}

pub(crate) fn with_comments(file: FileDescriptorProto, comments: &[(Vec<i32>, &str)]) -> FileDescriptorProto {
  FileDescriptorProto {
    source_code_info: Some(SourceCodeInfo {
      location: comments
        .iter()
        .map(|(path, text)| Location {
          path: path.clone(),
          leading_comments: Some((*text).to_string()),
          ..Default::default()
        })
        .collect(),
    }),
    ..file
  }
}

/// Location path of the `field`-th field of the `message`-th top-level
/// message.
pub(crate) fn field_path(message: i32, field: i32) -> Vec<i32> {
  vec![location_tags::FILE_MESSAGE_TYPE, message, location_tags::MESSAGE_FIELD, field]
}

pub(crate) fn message_path(message: i32) -> Vec<i32> {
  vec![location_tags::FILE_MESSAGE_TYPE, message]
}

pub(crate) fn method_path(service: i32, method: i32) -> Vec<i32> {
  vec![location_tags::FILE_SERVICE, service, location_tags::SERVICE_METHOD, method]
}

pub(crate) fn request(files: Vec<FileDescriptorProto>, targets: &[&str]) -> CodeGeneratorRequest {
  CodeGeneratorRequest {
    file_to_generate: targets.iter().map(|target| (*target).to_string()).collect(),
    parameter: None,
    proto_file: files,
  }
}

pub(crate) fn run(request: &CodeGeneratorRequest) -> Result<GeneratedOutput, ConvertError> {
  Orchestrator::new(GeneratorConfig::default()).run(request)
}

/// Runs the full plugin round trip and returns the decoded response.
pub(crate) fn respond(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
  let encoded = handle_request(&request.encode_to_vec());
  CodeGeneratorResponse::decode(encoded.encode_to_vec().as_slice()).expect("response decodes")
}

/// Runs the plugin and parses the generated document.
pub(crate) fn document(request: &CodeGeneratorRequest) -> serde_json::Value {
  let response = respond(request);
  assert_eq!(response.error, None, "conversion failed");
  assert_eq!(response.file.len(), 1);
  let content = response.file[0].content.as_deref().expect("file has content");
  serde_json::from_str(content).expect("document is JSON")
}

pub(crate) fn ref_title(schema: &ObjectOrReference<ObjectSchema>) -> Option<&str> {
  match schema {
    ObjectOrReference::Ref { ref_path, .. } => ref_path.strip_prefix(SCHEMA_REF_PREFIX),
    ObjectOrReference::Object(_) => None,
  }
}

/// The greeter example: one `greet` file with `Greeter.SayHello` and no HTTP
/// binding.
pub(crate) fn greeter_file() -> FileDescriptorProto {
  file(
    "greet.proto",
    "greet",
    vec![
      message("HelloRequest", vec![scalar("name", FieldType::String)]),
      message("HelloResponse", vec![scalar("message", FieldType::String)]),
    ],
    vec![service(
      "Greeter",
      vec![method("SayHello", ".greet.HelloRequest", ".greet.HelloResponse")],
    )],
  )
}

/// Registry and comments of a set of files, registered the way pass 1 does.
pub(crate) struct Fixture {
  pub registry: TypeRegistry,
  pub source_info: SourceInfo,
}

impl Fixture {
  pub(crate) fn new(protos: &[FileDescriptorProto]) -> Self {
    let mut registry = TypeRegistry::new();
    let mut source_info = SourceInfo::new();
    for proto in protos {
      let file = FileDescriptor::from(proto);
      let package = file.package.as_deref().unwrap_or_default();
      source_info.add_file(proto);
      registry.register_package(package);
      for message in &file.messages {
        registry.register_message(package, message);
      }
      for enumeration in &file.enums {
        registry.register_enum(package, enumeration);
      }
    }
    Self { registry, source_info }
  }

  pub(crate) fn converter(&self, naming: PropertyNaming) -> SchemaConverter<'_> {
    SchemaConverter::new(&self.registry, &self.source_info, naming)
  }

  pub(crate) fn message(&self, full_name: &str) -> &MessageDescriptor {
    self
      .registry
      .resolve_message("", &format!(".{full_name}"))
      .expect("message is registered")
  }
}

pub(crate) fn schema_json(converter: &SchemaConverter<'_>, title: &str) -> serde_json::Value {
  serde_json::to_value(converter.schema(title).expect("schema was converted")).expect("schema serializes")
}
