use std::collections::{BTreeMap, BTreeSet};

use http::Method;
use oas3::spec::{
  MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response,
  SchemaType, SchemaTypeSet,
};

use crate::{
  descriptor::{FieldDescriptor, FieldKind, HttpBinding, MessageDescriptor, MethodDescriptor, ServiceDescriptor},
  generator::{
    errors::ConvertError,
    metrics::GenerationWarning,
    path_template::PathTemplate,
    schema_converter::{SchemaConverter, scalar_schema},
    source_info::SourceInfo,
    type_registry::TypeRegistry,
  },
  utils::schema_ref,
};

const JSON_CONTENT_TYPE: &str = "application/json";
const SUCCESS_STATUS: &str = "200";
const SUCCESS_DESCRIPTION: &str = "A successful response.";
const WHOLE_MESSAGE_SELECTOR: &str = "*";

/// Everything the path conversion of a run produced.
#[derive(Debug, Default)]
pub(crate) struct PathOutput {
  pub paths: BTreeMap<String, PathItem>,
  pub operations: usize,
  pub warnings: Vec<GenerationWarning>,
}

/// Where the fields of the request message that are not bound to the path go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyPlacement<'s> {
  /// Every unbound field is a body property.
  Remaining,
  /// One field is the body; the other unbound fields are query parameters.
  Field(&'s str),
  /// No body; every unbound field is a query parameter.
  None,
}

impl<'s> BodyPlacement<'s> {
  fn for_binding(binding: &'s HttpBinding) -> Self {
    match binding.body.as_deref() {
      Some(WHOLE_MESSAGE_SELECTOR) => Self::Remaining,
      Some(field) => Self::Field(field),
      None if carries_body(&binding.method) => Self::Remaining,
      None => Self::None,
    }
  }
}

fn carries_body(method: &Method) -> bool {
  *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn json_content(schema: ObjectOrReference<ObjectSchema>) -> BTreeMap<String, MediaType> {
  BTreeMap::from([(
    JSON_CONTENT_TYPE.to_string(),
    MediaType {
      schema: Some(schema),
      ..MediaType::default()
    },
  )])
}

fn parameter(
  name: &str,
  location: ParameterIn,
  required: bool,
  schema: ObjectOrReference<ObjectSchema>,
  description: Option<String>,
) -> ObjectOrReference<Parameter> {
  ObjectOrReference::Object(Parameter {
    name: name.to_string(),
    location,
    required: Some(required),
    schema: Some(schema),
    description,
    deprecated: None,
    allow_empty_value: None,
    allow_reserved: None,
    explode: None,
    style: None,
    content: None,
    example: None,
    examples: BTreeMap::default(),
    extensions: BTreeMap::default(),
  })
}

fn operation_slot<'p>(item: &'p mut PathItem, verb: &Method) -> Option<&'p mut Option<Operation>> {
  let slot = match verb.as_str() {
    "GET" => &mut item.get,
    "PUT" => &mut item.put,
    "POST" => &mut item.post,
    "DELETE" => &mut item.delete,
    "OPTIONS" => &mut item.options,
    "HEAD" => &mut item.head,
    "PATCH" => &mut item.patch,
    "TRACE" => &mut item.trace,
    _ => return None,
  };
  Some(slot)
}

fn unsupported(field: String, kind: impl Into<String>) -> ConvertError {
  ConvertError::UnsupportedFieldKind {
    field,
    kind: kind.into(),
  }
}

fn field_shape(field: &FieldDescriptor) -> String {
  if field.map {
    "map".to_string()
  } else if field.repeated {
    format!("repeated {}", field.kind.describe())
  } else {
    field.kind.describe()
  }
}

/// Turns service methods into path items.
///
/// Methods with a `google.api.http` binding use its verb and template; methods
/// without one are published as `POST /<package>.<Service>/<Method>` with the
/// whole request message as the body. Two operations on the same template and
/// verb are rejected.
pub(crate) struct PathConverter<'a> {
  registry: &'a TypeRegistry,
  source_info: &'a SourceInfo,
  output: PathOutput,
  owners: BTreeMap<(String, String), String>,
}

impl<'a> PathConverter<'a> {
  pub(crate) fn new(registry: &'a TypeRegistry, source_info: &'a SourceInfo) -> Self {
    Self {
      registry,
      source_info,
      output: PathOutput::default(),
      owners: BTreeMap::new(),
    }
  }

  /// Converts every method of `service` and merges the result into the
  /// document-wide path map. Returns the service's own path items.
  pub(crate) fn convert_service(
    &mut self,
    service: &ServiceDescriptor,
    schemas: &mut SchemaConverter<'a>,
  ) -> Result<BTreeMap<String, PathItem>, ConvertError> {
    tracing::debug!(service = %service.full_name, methods = service.methods.len(), "converting service");
    let scope = service
      .full_name
      .rsplit_once('.')
      .map_or("", |(package, _)| package);

    let mut contribution = BTreeMap::<String, PathItem>::new();
    for method in &service.methods {
      let qualified = format!("{}.{}", service.full_name, method.name);
      if method.is_streaming() {
        tracing::debug!(method = %qualified, "streaming method");
        self
          .output
          .warnings
          .push(GenerationWarning::StreamingMethod { method: qualified.clone() });
      }

      let registry = self.registry;
      let request = registry.resolve_message(scope, &method.input_type)?;
      let response = registry.resolve_message(scope, &method.output_type)?;
      let request_title = schemas.convert_message(request)?;
      let response_title = schemas.convert_message(response)?;

      let bindings = match method.binding(&qualified)? {
        Some(binding) => std::iter::once(&binding)
          .chain(&binding.additional_bindings)
          .cloned()
          .collect::<Vec<_>>(),
        None => vec![HttpBinding {
          method: Method::POST,
          path: format!("/{}/{}", service.full_name, method.name),
          body: Some(WHOLE_MESSAGE_SELECTOR.to_string()),
          response_body: None,
          additional_bindings: Vec::new(),
        }],
      };

      let base_id = format!("{}_{}", service.name, method.name);
      for (index, binding) in bindings.iter().enumerate() {
        let operation_id = if index == 0 {
          base_id.clone()
        } else {
          format!("{base_id}_{index}")
        };

        let template = PathTemplate::parse(&binding.path).map_err(|error| ConvertError::InvalidPathTemplate {
          method: qualified.clone(),
          template: binding.path.clone(),
          error,
        })?;

        let mut operation = Operation {
          tags: vec![service.name.clone()],
          operation_id: Some(operation_id),
          description: self.source_info.description(&method.location),
          deprecated: method.deprecated.then_some(true),
          ..Operation::default()
        };
        self.bind_request(&mut operation, schemas, &template, binding, request, &request_title)?;
        let success = self.response_schema(schemas, binding, response, &response_title)?;
        operation.responses = Some(BTreeMap::from([(
          SUCCESS_STATUS.to_string(),
          ObjectOrReference::Object(Response {
            description: Some(SUCCESS_DESCRIPTION.to_string()),
            content: json_content(success),
            ..Response::default()
          }),
        )]));

        self.place(&template.path, &binding.method, &qualified, method, operation, &mut contribution)?;
      }
    }

    Ok(contribution)
  }

  /// Fills path parameters, query parameters and the request body.
  fn bind_request(
    &self,
    operation: &mut Operation,
    schemas: &mut SchemaConverter<'a>,
    template: &PathTemplate,
    binding: &HttpBinding,
    request: &'a MessageDescriptor,
    request_title: &str,
  ) -> Result<(), ConvertError> {
    let mut bound = BTreeSet::new();
    for param in &template.params {
      let field = self.path_field(request, param)?;
      let FieldKind::Scalar(scalar) = field.kind else {
        return Err(unsupported(format!("{}.{param}", request.full_name), field_shape(field)));
      };
      operation.parameters.push(parameter(
        param,
        ParameterIn::Path,
        true,
        ObjectOrReference::Object(scalar_schema(scalar)),
        self.source_info.description(&field.location),
      ));
      // A nested placeholder binds only part of its top-level field, which
      // therefore stays in the body or query.
      if !param.contains('.') {
        bound.insert(param.as_str());
      }
    }

    let remaining = request
      .fields
      .iter()
      .filter(|field| !bound.contains(field.name.as_str()))
      .collect::<Vec<_>>();

    let query_fields = match BodyPlacement::for_binding(binding) {
      BodyPlacement::Remaining => {
        let body = if bound.is_empty() {
          Some(schema_ref(request_title))
        } else if remaining.is_empty() {
          None
        } else {
          let mut object = ObjectSchema {
            schema_type: Some(SchemaTypeSet::Single(SchemaType::Object)),
            ..ObjectSchema::default()
          };
          for field in &remaining {
            let property = schemas.field_schema(request, field)?;
            object.properties.insert(schemas.property_name(field).to_string(), property);
          }
          Some(ObjectOrReference::Object(object))
        };
        operation.request_body = body.map(request_body);
        Vec::new()
      }
      BodyPlacement::Field(selector) => {
        let body_field = request
          .field(selector)
          .ok_or_else(|| unsupported(format!("{}.{selector}", request.full_name), "unknown body field"))?;
        operation.request_body = Some(request_body(schemas.field_schema(request, body_field)?));
        remaining.into_iter().filter(|field| field.name != selector).collect()
      }
      BodyPlacement::None => remaining,
    };

    for field in query_fields {
      let schema = schemas.field_schema(request, field)?;
      operation.parameters.push(parameter(
        schemas.property_name(field),
        ParameterIn::Query,
        false,
        schema,
        self.source_info.description(&field.location),
      ));
    }

    Ok(())
  }

  /// Walks a dotted placeholder through nested messages to a single scalar
  /// field.
  fn path_field(&self, request: &'a MessageDescriptor, param: &str) -> Result<&'a FieldDescriptor, ConvertError> {
    let registry = self.registry;
    let qualified = || format!("{}.{param}", request.full_name);
    let (parents, leaf) = match param.rsplit_once('.') {
      Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
      None => (Vec::new(), param),
    };

    let mut message = request;
    for segment in parents {
      let field = message
        .field(segment)
        .ok_or_else(|| unsupported(qualified(), "unknown field"))?;
      match &field.kind {
        FieldKind::Message(reference) if !field.repeated => {
          message = registry.resolve_message(&message.full_name, reference)?;
        }
        _ => return Err(unsupported(qualified(), field_shape(field))),
      }
    }

    let field = message.field(leaf).ok_or_else(|| unsupported(qualified(), "unknown field"))?;
    if field.repeated {
      return Err(unsupported(qualified(), field_shape(field)));
    }
    Ok(field)
  }

  fn response_schema(
    &self,
    schemas: &mut SchemaConverter<'a>,
    binding: &HttpBinding,
    response: &'a MessageDescriptor,
    response_title: &str,
  ) -> Result<ObjectOrReference<ObjectSchema>, ConvertError> {
    match binding.response_body.as_deref() {
      None | Some(WHOLE_MESSAGE_SELECTOR) => Ok(schema_ref(response_title)),
      Some(selector) => {
        let field = response
          .field(selector)
          .ok_or_else(|| unsupported(format!("{}.{selector}", response.full_name), "unknown response field"))?;
        schemas.field_schema(response, field)
      }
    }
  }

  fn place(
    &mut self,
    path: &str,
    verb: &Method,
    qualified: &str,
    method: &MethodDescriptor,
    operation: Operation,
    contribution: &mut BTreeMap<String, PathItem>,
  ) -> Result<(), ConvertError> {
    let key = (path.to_string(), verb.as_str().to_string());
    if let Some(existing) = self.owners.get(&key) {
      return Err(ConvertError::PathCollision {
        path: path.to_string(),
        verb: verb.to_string(),
        existing: existing.clone(),
        incoming: qualified.to_string(),
      });
    }

    let unsupported_verb = || ConvertError::UnsupportedHttpVerb {
      method: qualified.to_string(),
      verb: verb.to_string(),
    };
    let document_item = self.output.paths.entry(path.to_string()).or_default();
    *operation_slot(document_item, verb).ok_or_else(unsupported_verb)? = Some(operation.clone());
    let service_item = contribution.entry(path.to_string()).or_default();
    *operation_slot(service_item, verb).ok_or_else(unsupported_verb)? = Some(operation);

    tracing::debug!(method = %qualified, %verb, path, deprecated = method.deprecated, "converted method");
    self.owners.insert(key, qualified.to_string());
    self.output.operations += 1;
    Ok(())
  }

  pub(crate) fn finish(self) -> PathOutput {
    self.output
  }
}

fn request_body(schema: ObjectOrReference<ObjectSchema>) -> ObjectOrReference<RequestBody> {
  ObjectOrReference::Object(RequestBody {
    content: json_content(schema),
    ..RequestBody::default()
  })
}
