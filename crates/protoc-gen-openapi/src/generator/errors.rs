use super::path_template::PathParseError;

/// Every way a conversion run can fail. The first error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
  #[error("can't unmarshal input: {0}")]
  InputDecode(#[from] prost::DecodeError),
  #[error("no such package found for '{name}' from scope '{scope}'")]
  UnresolvedPackage { scope: String, name: String },
  #[error("no such type found: {name}")]
  UnresolvedType { name: String },
  #[error("'{name}' is not {expected}")]
  UnexpectedTypeKind { name: String, expected: &'static str },
  #[error("field '{field}' has an unsupported kind ({kind})")]
  UnsupportedFieldKind { field: String, kind: String },
  #[error("method '{method}' uses unsupported HTTP verb '{verb}'")]
  UnsupportedHttpVerb { method: String, verb: String },
  #[error("method '{method}' has an invalid path template '{template}': {error}")]
  InvalidPathTemplate {
    method: String,
    template: String,
    error: PathParseError,
  },
  #[error("{verb} {path} is bound by both '{existing}' and '{incoming}'")]
  PathCollision {
    path: String,
    verb: String,
    existing: String,
    incoming: String,
  },
  #[error("invalid parameter '{entry}': expected KEY=VALUE")]
  InvalidParameter { entry: String },
  #[error("unknown parameter '{key}'")]
  UnknownParameter { key: String },
  #[error("unable to marshal the OpenAPI spec: {0}")]
  OutputEncode(#[from] serde_json::Error),
  #[error("Failed to convert {file}: {error}")]
  File { file: String, error: Box<ConvertError> },
}

impl ConvertError {
  pub(crate) fn in_file(self, file: &str) -> Self {
    match self {
      Self::File { .. } => self,
      error => Self::File {
        file: file.to_string(),
        error: Box::new(error),
      },
    }
  }
}
