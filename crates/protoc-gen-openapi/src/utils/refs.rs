use oas3::spec::{ObjectOrReference, ObjectSchema};

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Builds a `$ref` to the component schema titled `title`.
pub fn schema_ref(title: &str) -> ObjectOrReference<ObjectSchema> {
  ObjectOrReference::Ref {
    ref_path: format!("{SCHEMA_REF_PREFIX}{title}"),
    summary: None,
    description: None,
  }
}
