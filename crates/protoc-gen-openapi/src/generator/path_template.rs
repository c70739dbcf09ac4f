#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
  #[error("path must start with '/'")]
  MissingLeadingSlash,
  #[error("unclosed '{{' at position {position}")]
  UnclosedBrace { position: usize },
  #[error("empty parameter '{{}}' at position {position}")]
  EmptyParameter { position: usize },
  #[error("unmatched '}}' at position {position}")]
  UnmatchedClosingBrace { position: usize },
  #[error("nested '{{' at position {position}")]
  NestedBraces { position: usize },
  #[error("parameter '{field}' appears more than once")]
  DuplicateParameter { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart<'a> {
  Literal(&'a str),
  Param(&'a str),
}

/// An HTTP rule path template with its placeholders extracted.
///
/// `{name=shelves/*}` captures are reduced to `{name}`; the segment pattern is
/// not representable in an OpenAPI path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
  pub path: String,
  /// Field paths bound by the template, in order of appearance. Nested fields
  /// use dots, e.g. `book.name`.
  pub params: Vec<String>,
}

impl PathTemplate {
  pub fn parse(template: &str) -> Result<Self, PathParseError> {
    if !template.starts_with('/') {
      return Err(PathParseError::MissingLeadingSlash);
    }

    let mut path = String::with_capacity(template.len());
    let mut params: Vec<String> = vec![];
    for part in Self::tokenize(template)? {
      match part {
        TemplatePart::Literal(lit) => path.push_str(lit),
        TemplatePart::Param(field) => {
          if params.iter().any(|existing| existing == field) {
            return Err(PathParseError::DuplicateParameter {
              field: field.to_string(),
            });
          }
          path.push('{');
          path.push_str(field);
          path.push('}');
          params.push(field.to_string());
        }
      }
    }

    Ok(Self { path, params })
  }

  fn tokenize(template: &str) -> Result<Vec<TemplatePart<'_>>, PathParseError> {
    let mut parts = vec![];
    let mut rest = template;
    let mut offset = 0;

    while !rest.is_empty() {
      let Some(open_pos) = rest.find('{') else {
        if let Some(stray_close) = rest.find('}') {
          return Err(PathParseError::UnmatchedClosingBrace {
            position: offset + stray_close,
          });
        }
        parts.push(TemplatePart::Literal(rest));
        break;
      };

      if let Some(stray_close) = rest[..open_pos].find('}') {
        return Err(PathParseError::UnmatchedClosingBrace {
          position: offset + stray_close,
        });
      }

      if open_pos > 0 {
        parts.push(TemplatePart::Literal(&rest[..open_pos]));
      }

      let after_open = &rest[open_pos + 1..];
      let Some(close_pos) = after_open.find('}') else {
        return Err(PathParseError::UnclosedBrace {
          position: offset + open_pos,
        });
      };

      let capture = &after_open[..close_pos];
      if let Some(nested) = capture.find('{') {
        return Err(PathParseError::NestedBraces {
          position: offset + open_pos + 1 + nested,
        });
      }

      let field = capture.split_once('=').map_or(capture, |(field, _)| field).trim();
      if field.is_empty() {
        return Err(PathParseError::EmptyParameter {
          position: offset + open_pos,
        });
      }
      parts.push(TemplatePart::Param(field));

      let consumed = open_pos + 1 + close_pos + 1;
      offset += consumed;
      rest = &rest[consumed..];
    }

    Ok(parts)
  }
}
