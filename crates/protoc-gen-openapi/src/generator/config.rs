use crate::generator::errors::ConvertError;

pub const DEFAULT_TITLE: &str = "Micro API";
pub const DEFAULT_DESCRIPTION: &str = "Generated by protoc-gen-openapi";
pub const DEFAULT_VERSION: &str = "1";
pub const DEFAULT_SERVER_URL: &str = "https://cruft.micro.com";
pub const DEFAULT_SERVER_DESCRIPTION: &str = "Micro API";
pub const OPENAPI_VERSION: &str = "3.0.0";

/// How message fields are named in schema properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyNaming {
  /// The field name as declared in the `.proto` file.
  #[default]
  Proto,
  /// The field's JSON name (lowerCamelCase unless overridden by `json_name`).
  Json,
}

/// Document-level settings. Every value defaults to the fixed skeleton of the
/// generated document and can be overridden through the plugin parameter.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorConfig {
  #[builder(into, default = DEFAULT_TITLE)]
  pub title: String,
  #[builder(into, default = DEFAULT_DESCRIPTION)]
  pub description: String,
  #[builder(into, default = DEFAULT_VERSION)]
  pub version: String,
  #[builder(into, default = DEFAULT_SERVER_URL)]
  pub server_url: String,
  #[builder(into, default = DEFAULT_SERVER_DESCRIPTION)]
  pub server_description: String,
  #[builder(default)]
  pub property_naming: PropertyNaming,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GeneratorConfig {
  /// Parses the `protoc` plugin parameter, e.g.
  /// `--openapi_opt=title=Greeter API,version=2`.
  ///
  /// Entries are comma separated `KEY=VALUE` pairs; an empty parameter yields
  /// the defaults.
  pub fn from_parameter(parameter: &str) -> Result<Self, ConvertError> {
    let mut config = Self::default();

    for entry in parameter.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
      let (key, value) = entry.split_once('=').ok_or_else(|| ConvertError::InvalidParameter {
        entry: entry.to_string(),
      })?;
      let value = value.trim().to_string();

      match key.trim() {
        "title" => config.title = value,
        "description" => config.description = value,
        "version" => config.version = value,
        "server_url" => config.server_url = value,
        "server_description" => config.server_description = value,
        "json_names" => {
          config.property_naming = match value.as_str() {
            "true" => PropertyNaming::Json,
            "false" => PropertyNaming::Proto,
            _ => {
              return Err(ConvertError::InvalidParameter {
                entry: entry.to_string(),
              });
            }
          }
        }
        other => {
          return Err(ConvertError::UnknownParameter { key: other.to_string() });
        }
      }
    }

    Ok(config)
  }
}
