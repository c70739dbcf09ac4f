//! Wire-level messages of the `protoc` plugin protocol.
//!
//! Only the subset of `google/protobuf/compiler/plugin.proto` and
//! `google/protobuf/descriptor.proto` that the converter reads is declared here.
//! Fields this crate does not know about are skipped by the decoder, so a
//! request produced by any `protoc` release decodes cleanly.
//!
//! `google.api.http` is an extension of `MethodOptions`. Extensions travel on
//! the wire as ordinary fields, so declaring it as field `72295728` of
//! [`MethodOptions`] is enough to decode HTTP bindings without a reflective
//! protobuf runtime.

/// `google.protobuf.compiler.CodeGeneratorRequest`
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorRequest {
  #[prost(string, repeated, tag = "1")]
  pub file_to_generate: Vec<String>,
  #[prost(string, optional, tag = "2")]
  pub parameter: Option<String>,
  #[prost(message, repeated, tag = "15")]
  pub proto_file: Vec<FileDescriptorProto>,
}

/// `google.protobuf.compiler.CodeGeneratorResponse`
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorResponse {
  #[prost(string, optional, tag = "1")]
  pub error: Option<String>,
  #[prost(uint64, optional, tag = "2")]
  pub supported_features: Option<u64>,
  #[prost(message, repeated, tag = "15")]
  pub file: Vec<GeneratedFile>,
}

/// `google.protobuf.compiler.CodeGeneratorResponse.File`
#[derive(Clone, PartialEq, prost::Message)]
pub struct GeneratedFile {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(string, optional, tag = "2")]
  pub insertion_point: Option<String>,
  #[prost(string, optional, tag = "15")]
  pub content: Option<String>,
}

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`
pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

#[derive(Clone, PartialEq, prost::Message)]
pub struct FileDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(string, optional, tag = "2")]
  pub package: Option<String>,
  #[prost(string, repeated, tag = "3")]
  pub dependency: Vec<String>,
  #[prost(message, repeated, tag = "4")]
  pub message_type: Vec<DescriptorProto>,
  #[prost(message, repeated, tag = "5")]
  pub enum_type: Vec<EnumDescriptorProto>,
  #[prost(message, repeated, tag = "6")]
  pub service: Vec<ServiceDescriptorProto>,
  #[prost(message, optional, tag = "9")]
  pub source_code_info: Option<SourceCodeInfo>,
  #[prost(string, optional, tag = "12")]
  pub syntax: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(message, repeated, tag = "2")]
  pub field: Vec<FieldDescriptorProto>,
  #[prost(message, repeated, tag = "3")]
  pub nested_type: Vec<DescriptorProto>,
  #[prost(message, repeated, tag = "4")]
  pub enum_type: Vec<EnumDescriptorProto>,
  #[prost(message, optional, tag = "7")]
  pub options: Option<MessageOptions>,
  #[prost(message, repeated, tag = "8")]
  pub oneof_decl: Vec<OneofDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(int32, optional, tag = "3")]
  pub number: Option<i32>,
  #[prost(enumeration = "FieldLabel", optional, tag = "4")]
  pub label: Option<i32>,
  #[prost(enumeration = "FieldType", optional, tag = "5")]
  pub r#type: Option<i32>,
  #[prost(string, optional, tag = "6")]
  pub type_name: Option<String>,
  #[prost(int32, optional, tag = "9")]
  pub oneof_index: Option<i32>,
  #[prost(string, optional, tag = "10")]
  pub json_name: Option<String>,
  #[prost(bool, optional, tag = "17")]
  pub proto3_optional: Option<bool>,
}

/// `google.protobuf.FieldDescriptorProto.Type`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum FieldType {
  Double = 1,
  Float = 2,
  Int64 = 3,
  Uint64 = 4,
  Int32 = 5,
  Fixed64 = 6,
  Fixed32 = 7,
  Bool = 8,
  String = 9,
  Group = 10,
  Message = 11,
  Bytes = 12,
  Uint32 = 13,
  Enum = 14,
  Sfixed32 = 15,
  Sfixed64 = 16,
  Sint32 = 17,
  Sint64 = 18,
}

/// `google.protobuf.FieldDescriptorProto.Label`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum FieldLabel {
  Optional = 1,
  Required = 2,
  Repeated = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OneofDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EnumDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(message, repeated, tag = "2")]
  pub value: Vec<EnumValueDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EnumValueDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(int32, optional, tag = "2")]
  pub number: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ServiceDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(message, repeated, tag = "2")]
  pub method: Vec<MethodDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MethodDescriptorProto {
  #[prost(string, optional, tag = "1")]
  pub name: Option<String>,
  #[prost(string, optional, tag = "2")]
  pub input_type: Option<String>,
  #[prost(string, optional, tag = "3")]
  pub output_type: Option<String>,
  #[prost(message, optional, tag = "4")]
  pub options: Option<MethodOptions>,
  #[prost(bool, optional, tag = "5")]
  pub client_streaming: Option<bool>,
  #[prost(bool, optional, tag = "6")]
  pub server_streaming: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MessageOptions {
  #[prost(bool, optional, tag = "7")]
  pub map_entry: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MethodOptions {
  #[prost(bool, optional, tag = "33")]
  pub deprecated: Option<bool>,
  /// `google.api.http`
  #[prost(message, optional, tag = "72295728")]
  pub http: Option<HttpRule>,
}

/// `google.api.HttpRule`
///
/// The `pattern` oneof is flattened into optional fields; at most one of them
/// is set on a well-formed rule.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HttpRule {
  #[prost(string, optional, tag = "1")]
  pub selector: Option<String>,
  #[prost(string, optional, tag = "2")]
  pub get: Option<String>,
  #[prost(string, optional, tag = "3")]
  pub put: Option<String>,
  #[prost(string, optional, tag = "4")]
  pub post: Option<String>,
  #[prost(string, optional, tag = "5")]
  pub delete: Option<String>,
  #[prost(string, optional, tag = "6")]
  pub patch: Option<String>,
  #[prost(string, optional, tag = "7")]
  pub body: Option<String>,
  #[prost(message, optional, tag = "8")]
  pub custom: Option<CustomHttpPattern>,
  #[prost(message, repeated, tag = "11")]
  pub additional_bindings: Vec<HttpRule>,
  #[prost(string, optional, tag = "12")]
  pub response_body: Option<String>,
}

/// `google.api.CustomHttpPattern`
#[derive(Clone, PartialEq, prost::Message)]
pub struct CustomHttpPattern {
  #[prost(string, optional, tag = "1")]
  pub kind: Option<String>,
  #[prost(string, optional, tag = "2")]
  pub path: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SourceCodeInfo {
  #[prost(message, repeated, tag = "1")]
  pub location: Vec<Location>,
}

/// `google.protobuf.SourceCodeInfo.Location`
#[derive(Clone, PartialEq, prost::Message)]
pub struct Location {
  #[prost(int32, repeated, tag = "1")]
  pub path: Vec<i32>,
  #[prost(int32, repeated, tag = "2")]
  pub span: Vec<i32>,
  #[prost(string, optional, tag = "3")]
  pub leading_comments: Option<String>,
  #[prost(string, optional, tag = "4")]
  pub trailing_comments: Option<String>,
  #[prost(string, repeated, tag = "6")]
  pub leading_detached_comments: Vec<String>,
}
