use http::Method;
use itertools::Itertools;
use strum::Display;

use super::wire::{
  DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldLabel, FieldType, FileDescriptorProto, HttpRule,
  MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::generator::errors::ConvertError;

/// Field numbers used to address nodes in `SourceCodeInfo.Location.path`.
pub(crate) mod location_tags {
  pub const FILE_MESSAGE_TYPE: i32 = 4;
  pub const FILE_ENUM_TYPE: i32 = 5;
  pub const FILE_SERVICE: i32 = 6;
  pub const MESSAGE_FIELD: i32 = 2;
  pub const MESSAGE_NESTED_TYPE: i32 = 3;
  pub const MESSAGE_ENUM_TYPE: i32 = 4;
  pub const SERVICE_METHOD: i32 = 2;
}

use location_tags::{
  FILE_ENUM_TYPE, FILE_MESSAGE_TYPE, FILE_SERVICE, MESSAGE_ENUM_TYPE, MESSAGE_FIELD, MESSAGE_NESTED_TYPE,
  SERVICE_METHOD,
};

/// A node inside one source file's descriptor tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
  pub file: String,
  pub path: Vec<i32>,
}

impl SourceLocation {
  pub fn new(file: impl Into<String>, path: Vec<i32>) -> Self {
    Self {
      file: file.into(),
      path,
    }
  }

  #[must_use]
  pub fn child(&self, tag: i32, index: usize) -> Self {
    let mut path = self.path.clone();
    path.extend([tag, i32::try_from(index).unwrap_or(i32::MAX)]);
    Self {
      file: self.file.clone(),
      path,
    }
  }
}

/// Scalar field kinds of the IDL. Every variant has an entry in the schema
/// mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScalarKind {
  Double,
  Float,
  Int32,
  Int64,
  Uint32,
  Uint64,
  Sint32,
  Sint64,
  Fixed32,
  Fixed64,
  Sfixed32,
  Sfixed64,
  Bool,
  String,
  Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
  Scalar(ScalarKind),
  /// Type reference as written in the descriptor.
  Enum(String),
  /// Type reference as written in the descriptor.
  Message(String),
  /// A kind with no schema mapping (groups, unknown type numbers). Carried so
  /// that only converting the field fails, not registering its message.
  Unsupported(String),
}

impl FieldKind {
  fn from_wire(proto: &FieldDescriptorProto) -> Self {
    let Some(raw) = proto.r#type else {
      return Self::Unsupported("unspecified".to_string());
    };
    let Ok(field_type) = FieldType::try_from(raw) else {
      return Self::Unsupported(format!("type #{raw}"));
    };

    match field_type {
      FieldType::Double => Self::Scalar(ScalarKind::Double),
      FieldType::Float => Self::Scalar(ScalarKind::Float),
      FieldType::Int64 => Self::Scalar(ScalarKind::Int64),
      FieldType::Uint64 => Self::Scalar(ScalarKind::Uint64),
      FieldType::Int32 => Self::Scalar(ScalarKind::Int32),
      FieldType::Fixed64 => Self::Scalar(ScalarKind::Fixed64),
      FieldType::Fixed32 => Self::Scalar(ScalarKind::Fixed32),
      FieldType::Bool => Self::Scalar(ScalarKind::Bool),
      FieldType::String => Self::Scalar(ScalarKind::String),
      FieldType::Bytes => Self::Scalar(ScalarKind::Bytes),
      FieldType::Uint32 => Self::Scalar(ScalarKind::Uint32),
      FieldType::Sfixed32 => Self::Scalar(ScalarKind::Sfixed32),
      FieldType::Sfixed64 => Self::Scalar(ScalarKind::Sfixed64),
      FieldType::Sint32 => Self::Scalar(ScalarKind::Sint32),
      FieldType::Sint64 => Self::Scalar(ScalarKind::Sint64),
      FieldType::Enum => Self::Enum(proto.type_name().to_string()),
      FieldType::Message => Self::Message(proto.type_name().to_string()),
      FieldType::Group => Self::Unsupported("group".to_string()),
    }
  }

  /// Short human-readable kind, used in error messages.
  pub fn describe(&self) -> String {
    match self {
      Self::Scalar(scalar) => scalar.to_string(),
      Self::Enum(name) => format!("enum {name}"),
      Self::Message(name) => format!("message {name}"),
      Self::Unsupported(kind) => kind.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
  pub name: String,
  pub json_name: String,
  pub kind: FieldKind,
  pub repeated: bool,
  pub oneof: Option<String>,
  /// Set when the field is a `map<K, V>`; `kind` then references the
  /// synthetic map-entry message.
  pub map: bool,
  pub location: SourceLocation,
}

impl FieldDescriptor {
  fn from_wire(
    message_name: &str,
    proto: &DescriptorProto,
    field: &FieldDescriptorProto,
    location: SourceLocation,
  ) -> Self {
    let name = field.name().to_string();
    let kind = FieldKind::from_wire(field);
    let repeated = field.label() == FieldLabel::Repeated;
    let map = repeated
      && match &kind {
        FieldKind::Message(type_name) => proto.nested_type.iter().any(|nested| {
          nested.options.as_ref().is_some_and(|options| options.map_entry())
            && type_name.trim_start_matches('.') == format!("{message_name}.{}", nested.name())
        }),
        _ => false,
      };

    // proto3 `optional` fields live in a synthetic oneof that is not a real group
    let oneof = match field.oneof_index {
      Some(index) if !field.proto3_optional() => usize::try_from(index)
        .ok()
        .and_then(|index| proto.oneof_decl.get(index))
        .map(|oneof| oneof.name().to_string()),
      _ => None,
    };

    let json_name = match field.json_name.as_deref() {
      Some(json_name) if !json_name.is_empty() => json_name.to_string(),
      _ => name.clone(),
    };

    Self {
      json_name,
      kind,
      repeated,
      oneof,
      map,
      location,
      name,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
  /// Fully-qualified name without the leading dot, e.g. `greet.HelloRequest`.
  pub full_name: String,
  pub name: String,
  pub fields: Vec<FieldDescriptor>,
  pub map_entry: bool,
  pub nested_messages: Vec<MessageDescriptor>,
  pub nested_enums: Vec<EnumDescriptor>,
  pub location: SourceLocation,
}

impl MessageDescriptor {
  fn from_wire(scope: &str, proto: &DescriptorProto, location: SourceLocation) -> Self {
    let name = proto.name().to_string();
    let full_name = qualify(scope, &name);

    let fields = proto
      .field
      .iter()
      .enumerate()
      .map(|(index, field)| FieldDescriptor::from_wire(&full_name, proto, field, location.child(MESSAGE_FIELD, index)))
      .collect();

    let nested_messages = proto
      .nested_type
      .iter()
      .enumerate()
      .map(|(index, nested)| Self::from_wire(&full_name, nested, location.child(MESSAGE_NESTED_TYPE, index)))
      .collect();

    let nested_enums = proto
      .enum_type
      .iter()
      .enumerate()
      .map(|(index, nested)| EnumDescriptor::from_wire(&full_name, nested, location.child(MESSAGE_ENUM_TYPE, index)))
      .collect();

    Self {
      full_name,
      name,
      fields,
      map_entry: proto.options.as_ref().is_some_and(|options| options.map_entry()),
      nested_messages,
      nested_enums,
      location,
    }
  }

  pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
    self.fields.iter().find(|field| field.name == name)
  }

  /// This message and every nested message, depth first.
  pub fn descendants(&self) -> Vec<&MessageDescriptor> {
    let mut all = vec![self];
    for nested in &self.nested_messages {
      all.extend(nested.descendants());
    }
    all
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
  pub full_name: String,
  pub name: String,
  /// Value names in declaration order.
  pub values: Vec<String>,
  pub location: SourceLocation,
}

impl EnumDescriptor {
  fn from_wire(scope: &str, proto: &EnumDescriptorProto, location: SourceLocation) -> Self {
    let name = proto.name().to_string();
    Self {
      full_name: qualify(scope, &name),
      values: proto
        .value
        .iter()
        .map(|value| value.name().to_string())
        .collect(),
      name,
      location,
    }
  }
}

/// A resolved `google.api.http` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBinding {
  pub method: Method,
  pub path: String,
  /// `None` when the rule has no body selector, `Some("*")` for the whole
  /// request.
  pub body: Option<String>,
  pub response_body: Option<String>,
  pub additional_bindings: Vec<HttpBinding>,
}

impl HttpBinding {
  /// Resolves the verb of `rule` and of its additional bindings. Returns
  /// `None` for a rule without a pattern.
  pub fn from_rule(method_name: &str, rule: &HttpRule) -> Result<Option<Self>, ConvertError> {
    let (method, path) = if let Some(path) = &rule.get {
      (Method::GET, path.clone())
    } else if let Some(path) = &rule.put {
      (Method::PUT, path.clone())
    } else if let Some(path) = &rule.post {
      (Method::POST, path.clone())
    } else if let Some(path) = &rule.delete {
      (Method::DELETE, path.clone())
    } else if let Some(path) = &rule.patch {
      (Method::PATCH, path.clone())
    } else if let Some(custom) = &rule.custom {
      let verb = custom.kind().to_ascii_uppercase();
      let method = Method::from_bytes(verb.as_bytes()).map_err(|_| ConvertError::UnsupportedHttpVerb {
        method: method_name.to_string(),
        verb: custom.kind().to_string(),
      })?;
      (method, custom.path().to_string())
    } else {
      return Ok(None);
    };

    let additional_bindings = rule
      .additional_bindings
      .iter()
      .map(|binding| Self::from_rule(method_name, binding))
      .flatten_ok()
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Self {
      method,
      path,
      body: rule.body.clone().filter(|body| !body.is_empty()),
      response_body: rule.response_body.clone().filter(|body| !body.is_empty()),
      additional_bindings,
    }))
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
  pub name: String,
  pub input_type: String,
  pub output_type: String,
  /// The raw `google.api.http` rule; resolved by [`Self::binding`] when the
  /// method is converted.
  pub http: Option<HttpRule>,
  pub client_streaming: bool,
  pub server_streaming: bool,
  pub deprecated: bool,
  pub location: SourceLocation,
}

impl MethodDescriptor {
  fn from_wire(proto: &MethodDescriptorProto, location: SourceLocation) -> Self {
    let options = proto.options.as_ref();
    Self {
      name: proto.name().to_string(),
      input_type: proto.input_type().to_string(),
      output_type: proto.output_type().to_string(),
      http: options.and_then(|options| options.http.clone()),
      client_streaming: proto.client_streaming(),
      server_streaming: proto.server_streaming(),
      deprecated: options.is_some_and(|options| options.deprecated()),
      location,
    }
  }

  /// The method's HTTP binding, if it declares one. `qualified` names the
  /// method in errors.
  pub fn binding(&self, qualified: &str) -> Result<Option<HttpBinding>, ConvertError> {
    match &self.http {
      Some(rule) => HttpBinding::from_rule(qualified, rule),
      None => Ok(None),
    }
  }

  pub fn is_streaming(&self) -> bool {
    self.client_streaming || self.server_streaming
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
  pub full_name: String,
  pub name: String,
  pub methods: Vec<MethodDescriptor>,
  pub location: SourceLocation,
}

impl ServiceDescriptor {
  fn from_wire(package: &str, proto: &ServiceDescriptorProto, location: SourceLocation) -> Self {
    let name = proto.name().to_string();
    let methods = proto
      .method
      .iter()
      .enumerate()
      .map(|(index, method)| MethodDescriptor::from_wire(method, location.child(SERVICE_METHOD, index)))
      .collect();

    Self {
      full_name: qualify(package, &name),
      name,
      methods,
      location,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
  pub name: String,
  /// `None` for files without a `package` statement.
  pub package: Option<String>,
  pub messages: Vec<MessageDescriptor>,
  pub enums: Vec<EnumDescriptor>,
  pub services: Vec<ServiceDescriptor>,
}

/// Builds the model of one file. Nothing is rejected here: unsupported field
/// kinds and HTTP verbs only fail once the element is converted.
impl From<&FileDescriptorProto> for FileDescriptor {
  fn from(proto: &FileDescriptorProto) -> Self {
    let name = proto.name().to_string();
    let package = proto.package.clone().filter(|package| !package.is_empty());
    let scope = package.as_deref().unwrap_or_default();
    let root = SourceLocation::new(name.clone(), Vec::new());

    let messages = proto
      .message_type
      .iter()
      .enumerate()
      .map(|(index, message)| MessageDescriptor::from_wire(scope, message, root.child(FILE_MESSAGE_TYPE, index)))
      .collect();

    let enums = proto
      .enum_type
      .iter()
      .enumerate()
      .map(|(index, nested)| EnumDescriptor::from_wire(scope, nested, root.child(FILE_ENUM_TYPE, index)))
      .collect();

    let services = proto
      .service
      .iter()
      .enumerate()
      .map(|(index, service)| ServiceDescriptor::from_wire(scope, service, root.child(FILE_SERVICE, index)))
      .collect();

    Self {
      name,
      package,
      messages,
      enums,
      services,
    }
  }
}

/// Joins a scope and a simple name into a fully-qualified name.
pub fn qualify(scope: &str, name: &str) -> String {
  if scope.is_empty() {
    name.to_string()
  } else {
    format!("{scope}.{name}")
  }
}
