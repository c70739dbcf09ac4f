//! Descriptor input: the `prost` wire messages of the plugin protocol and the
//! validated model the converters work on.

pub mod model;
pub mod wire;

pub use model::{
  EnumDescriptor, FieldDescriptor, FieldKind, FileDescriptor, HttpBinding, MessageDescriptor, MethodDescriptor,
  ScalarKind, ServiceDescriptor, SourceLocation,
};
pub use wire::{CodeGeneratorRequest, CodeGeneratorResponse};
