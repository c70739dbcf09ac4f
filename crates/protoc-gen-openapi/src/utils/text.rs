/// Normalizes a protobuf comment for use as an OpenAPI description.
///
/// `protoc` keeps the single space that follows `//` on every line as well as
/// the trailing newline; both are removed here. Returns `None` for comments
/// that are blank once trimmed.
#[must_use]
pub(crate) fn clean_comment(input: &str) -> Option<String> {
  let lines = input
    .lines()
    .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end())
    .collect::<Vec<_>>();
  let text = lines.join("\n").trim().to_string();
  (!text.is_empty()).then_some(text)
}
