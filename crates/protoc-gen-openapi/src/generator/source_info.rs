use std::collections::HashMap;

use crate::{
  descriptor::{SourceLocation, wire::FileDescriptorProto},
  utils::clean_comment,
};

/// Leading comments of one source file, keyed by structural location.
#[derive(Debug, Default)]
pub struct SourceInfoIndex {
  comments: HashMap<Vec<i32>, String>,
}

impl SourceInfoIndex {
  pub fn build(file: &FileDescriptorProto) -> Self {
    let comments = file
      .source_code_info
      .iter()
      .flat_map(|info| &info.location)
      .filter_map(|location| {
        let comment = clean_comment(location.leading_comments.as_deref()?)?;
        Some((location.path.clone(), comment))
      })
      .collect();
    Self { comments }
  }

  pub fn lookup(&self, path: &[i32]) -> Option<&str> {
    self.comments.get(path).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.comments.len()
  }
}

/// The [`SourceInfoIndex`] of every input file of a run.
#[derive(Debug, Default)]
pub struct SourceInfo {
  files: HashMap<String, SourceInfoIndex>,
}

impl SourceInfo {
  pub fn new() -> Self {
    Self::default()
  }

  /// Indexes `file` unless an index for its name already exists.
  pub fn add_file(&mut self, file: &FileDescriptorProto) -> &SourceInfoIndex {
    self
      .files
      .entry(file.name().to_string())
      .or_insert_with(|| SourceInfoIndex::build(file))
  }

  pub fn lookup(&self, location: &SourceLocation) -> Option<&str> {
    self.files.get(&location.file)?.lookup(&location.path)
  }

  /// Comment text as an owned description, if any.
  pub fn description(&self, location: &SourceLocation) -> Option<String> {
    self.lookup(location).map(str::to_string)
  }
}
