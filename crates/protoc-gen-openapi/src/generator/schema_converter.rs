use std::collections::{BTreeMap, BTreeSet};

use oas3::spec::{ObjectOrReference, ObjectSchema, Schema, SchemaType, SchemaTypeSet};
use serde_json::Value;

use crate::{
  descriptor::{EnumDescriptor, FieldDescriptor, FieldKind, MessageDescriptor, ScalarKind},
  generator::{config::PropertyNaming, errors::ConvertError, source_info::SourceInfo, type_registry::TypeRegistry},
  utils::schema_ref,
};

/// The single mapping table from scalar kinds to OpenAPI types and formats.
pub(crate) fn scalar_type(kind: ScalarKind) -> (SchemaType, Option<&'static str>) {
  match kind {
    ScalarKind::Double => (SchemaType::Number, Some("double")),
    ScalarKind::Float => (SchemaType::Number, Some("float")),
    ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32 => (SchemaType::Integer, Some("int32")),
    ScalarKind::Int64 | ScalarKind::Sint64 | ScalarKind::Sfixed64 => (SchemaType::Integer, Some("int64")),
    ScalarKind::Uint32 | ScalarKind::Fixed32 => (SchemaType::Integer, Some("uint32")),
    ScalarKind::Uint64 | ScalarKind::Fixed64 => (SchemaType::Integer, Some("uint64")),
    ScalarKind::Bool => (SchemaType::Boolean, None),
    ScalarKind::String => (SchemaType::String, None),
    ScalarKind::Bytes => (SchemaType::String, Some("byte")),
  }
}

pub(crate) fn scalar_schema(kind: ScalarKind) -> ObjectSchema {
  let (schema_type, format) = scalar_type(kind);
  ObjectSchema {
    schema_type: Some(SchemaTypeSet::Single(schema_type)),
    format: format.map(String::from),
    ..ObjectSchema::default()
  }
}

fn typed_schema(schema_type: SchemaType) -> ObjectSchema {
  ObjectSchema {
    schema_type: Some(SchemaTypeSet::Single(schema_type)),
    ..ObjectSchema::default()
  }
}

fn boxed(schema: ObjectOrReference<ObjectSchema>) -> Schema {
  Schema::Object(Box::new(schema))
}

/// Converts messages into component schemas titled by their fully-qualified
/// name.
///
/// Every message is converted at most once. A message is marked in-progress
/// before its fields are visited, so a field that refers back to it (directly
/// or through a chain of other messages) becomes a `$ref` instead of a new
/// conversion.
///
/// Two mappings are intentionally lossy: oneof members become independent
/// optional properties, and map keys are not represented (only the value
/// schema, as `additionalProperties`).
pub(crate) struct SchemaConverter<'a> {
  registry: &'a TypeRegistry,
  source_info: &'a SourceInfo,
  property_naming: PropertyNaming,
  schemas: BTreeMap<String, ObjectSchema>,
  in_progress: BTreeSet<String>,
  dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl<'a> SchemaConverter<'a> {
  pub(crate) fn new(registry: &'a TypeRegistry, source_info: &'a SourceInfo, property_naming: PropertyNaming) -> Self {
    Self {
      registry,
      source_info,
      property_naming,
      schemas: BTreeMap::new(),
      in_progress: BTreeSet::new(),
      dependencies: BTreeMap::new(),
    }
  }

  /// Converts `message` and every message reachable from it. Returns the
  /// component title of `message`.
  pub(crate) fn convert_message(&mut self, message: &MessageDescriptor) -> Result<String, ConvertError> {
    let title = message.full_name.clone();
    if self.schemas.contains_key(&title) || self.in_progress.contains(&title) {
      return Ok(title);
    }

    tracing::debug!(message = %title, "converting message");
    self.in_progress.insert(title.clone());
    self.dependencies.entry(title.clone()).or_default();

    let mut schema = ObjectSchema {
      title: Some(title.clone()),
      description: self.source_info.description(&message.location),
      ..typed_schema(SchemaType::Object)
    };

    for field in &message.fields {
      let property = self.field_schema(message, field)?;
      schema.properties.insert(self.property_name(field).to_string(), property);
    }

    self.in_progress.remove(&title);
    self.schemas.insert(title.clone(), schema);
    Ok(title)
  }

  /// Schema of one field of `owner`, including its description.
  pub(crate) fn field_schema(
    &mut self,
    owner: &MessageDescriptor,
    field: &FieldDescriptor,
  ) -> Result<ObjectOrReference<ObjectSchema>, ConvertError> {
    let description = self.source_info.description(&field.location);

    let schema = if field.map {
      ObjectOrReference::Object(ObjectSchema {
        additional_properties: Some(boxed(self.map_value_schema(owner, field)?)),
        ..typed_schema(SchemaType::Object)
      })
    } else {
      let item = self.kind_schema(&owner.full_name, owner, field, &field.kind)?;
      if field.repeated {
        ObjectOrReference::Object(ObjectSchema {
          items: Some(Box::new(boxed(item))),
          ..typed_schema(SchemaType::Array)
        })
      } else {
        item
      }
    };

    Ok(with_description(schema, description))
  }

  fn map_value_schema(
    &mut self,
    owner: &MessageDescriptor,
    field: &FieldDescriptor,
  ) -> Result<ObjectOrReference<ObjectSchema>, ConvertError> {
    let FieldKind::Message(entry_name) = &field.kind else {
      return Err(ConvertError::UnsupportedFieldKind {
        field: format!("{}.{}", owner.full_name, field.name),
        kind: format!("map of {}", field.kind.describe()),
      });
    };

    let registry = self.registry;
    let entry = registry.resolve_message(&owner.full_name, entry_name)?;
    let value = entry.field("value").ok_or_else(|| ConvertError::UnsupportedFieldKind {
      field: format!("{}.{}", owner.full_name, field.name),
      kind: "map entry without a value field".to_string(),
    })?;

    self.kind_schema(&entry.full_name, owner, field, &value.kind)
  }

  /// Schema of `kind`, resolved from `scope`. `field` of `owner` is the field
  /// being converted, which differs from `kind`'s holder for map values.
  fn kind_schema(
    &mut self,
    scope: &str,
    owner: &MessageDescriptor,
    field: &FieldDescriptor,
    kind: &FieldKind,
  ) -> Result<ObjectOrReference<ObjectSchema>, ConvertError> {
    let registry = self.registry;
    match kind {
      FieldKind::Scalar(scalar) => Ok(ObjectOrReference::Object(scalar_schema(*scalar))),
      FieldKind::Enum(reference) => {
        let enumeration = registry.resolve_enum(scope, reference)?;
        Ok(ObjectOrReference::Object(self.enum_schema(enumeration)))
      }
      FieldKind::Message(reference) => {
        let message = registry.resolve_message(scope, reference)?;
        let title = self.convert_message(message)?;
        self
          .dependencies
          .entry(owner.full_name.clone())
          .or_default()
          .insert(title.clone());
        Ok(schema_ref(&title))
      }
      FieldKind::Unsupported(kind) => Err(ConvertError::UnsupportedFieldKind {
        field: format!("{}.{}", owner.full_name, field.name),
        kind: kind.clone(),
      }),
    }
  }

  fn enum_schema(&self, enumeration: &EnumDescriptor) -> ObjectSchema {
    ObjectSchema {
      description: self.source_info.description(&enumeration.location),
      enum_values: enumeration.values.iter().cloned().map(Value::String).collect(),
      ..typed_schema(SchemaType::String)
    }
  }

  pub(crate) fn property_name<'f>(&self, field: &'f FieldDescriptor) -> &'f str {
    match self.property_naming {
      PropertyNaming::Proto => &field.name,
      PropertyNaming::Json => &field.json_name,
    }
  }

  #[cfg(test)]
  pub(crate) fn schema(&self, title: &str) -> Option<&ObjectSchema> {
    self.schemas.get(title)
  }

  pub(crate) fn len(&self) -> usize {
    self.schemas.len()
  }

  /// Message title → titles of the messages its fields reference.
  pub(crate) fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
    &self.dependencies
  }

  pub(crate) fn into_schemas(self) -> BTreeMap<String, ObjectSchema> {
    self.schemas
  }
}

/// Field comments take precedence over the comment of the referenced type.
fn with_description(
  schema: ObjectOrReference<ObjectSchema>,
  description: Option<String>,
) -> ObjectOrReference<ObjectSchema> {
  if description.is_none() {
    return schema;
  }
  match schema {
    ObjectOrReference::Object(object) => ObjectOrReference::Object(ObjectSchema { description, ..object }),
    ObjectOrReference::Ref { ref_path, summary, .. } => ObjectOrReference::Ref {
      ref_path,
      summary,
      description,
    },
  }
}
