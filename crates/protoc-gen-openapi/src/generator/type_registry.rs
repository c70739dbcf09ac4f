use std::collections::BTreeMap;

use crate::{
  descriptor::{EnumDescriptor, MessageDescriptor, model::qualify},
  generator::errors::ConvertError,
};

/// Marks a reference that starts at the root namespace.
const QUALIFIER_MARKER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisteredType {
  Message(MessageDescriptor),
  Enum(EnumDescriptor),
}

impl RegisteredType {
  pub fn full_name(&self) -> &str {
    match self {
      Self::Message(message) => &message.full_name,
      Self::Enum(enumeration) => &enumeration.full_name,
    }
  }
}

/// One scope of the namespace tree. Packages and messages with nested
/// declarations both open a scope.
#[derive(Debug, Default)]
pub struct PackageNode {
  children: BTreeMap<String, PackageNode>,
  types: BTreeMap<String, RegisteredType>,
}

impl PackageNode {
  pub fn child(&self, segment: &str) -> Option<&PackageNode> {
    self.children.get(segment)
  }

  pub fn get_type(&self, name: &str) -> Option<&RegisteredType> {
    self.types.get(name)
  }

  /// Number of types declared directly in this scope.
  pub fn type_count(&self) -> usize {
    self.types.len()
  }

  fn walk<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Option<&PackageNode> {
    segments.into_iter().try_fold(self, |node, segment| node.child(segment))
  }

  /// Resolves a dotted chain (`Outer.Inner`) relative to this node.
  fn lookup_chain(&self, segments: &[&str]) -> Option<&RegisteredType> {
    let (name, scopes) = segments.split_last()?;
    self.walk(scopes.iter().copied())?.get_type(name)
  }
}

/// Cross-file namespace tree holding every message and enum of a run.
#[derive(Debug, Default)]
pub struct TypeRegistry {
  root: PackageNode,
}

fn segments(path: &str) -> Vec<&str> {
  path.split('.').filter(|segment| !segment.is_empty()).collect()
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  fn node_mut(&mut self, package_path: &str) -> &mut PackageNode {
    segments(package_path).into_iter().fold(&mut self.root, |node, segment| {
      node
        .children
        .entry(segment.to_string())
        .or_default()
    })
  }

  /// Makes sure every scope of `package_path` exists.
  pub fn register_package(&mut self, package_path: &str) {
    self.node_mut(package_path);
  }

  /// Inserts a type under `package_path`, creating intermediate scopes.
  ///
  /// A fully-qualified name is only ever registered once; later registrations
  /// are ignored and `false` is returned.
  pub fn register_type(&mut self, package_path: &str, descriptor: RegisteredType) -> bool {
    let name = match &descriptor {
      RegisteredType::Message(message) => message.name.clone(),
      RegisteredType::Enum(enumeration) => enumeration.name.clone(),
    };
    let node = self.node_mut(package_path);
    if node.types.contains_key(&name) {
      tracing::debug!(name = descriptor.full_name(), "type already registered; ignoring");
      return false;
    }
    node.types.insert(name, descriptor);
    true
  }

  /// Registers a message together with its nested messages and enums, each
  /// under the scope of its enclosing message.
  pub fn register_message(&mut self, package_path: &str, message: &MessageDescriptor) -> bool {
    let inserted = self.register_type(package_path, RegisteredType::Message(message.clone()));
    let scope = qualify(package_path, &message.name);
    for nested in &message.nested_messages {
      self.register_message(&scope, nested);
    }
    for nested in &message.nested_enums {
      self.register_type(&scope, RegisteredType::Enum(nested.clone()));
    }
    inserted
  }

  pub fn register_enum(&mut self, package_path: &str, enumeration: &EnumDescriptor) -> bool {
    self.register_type(package_path, RegisteredType::Enum(enumeration.clone()))
  }

  pub fn lookup_package(&self, package_path: &str) -> Option<&PackageNode> {
    self.root.walk(segments(package_path))
  }

  /// Resolves a type reference from within `scope`.
  ///
  /// References starting with `.` are looked up from the root without any
  /// search. Anything else is tried against every enclosing scope, innermost
  /// first and ending at the root; the first scope that resolves the whole
  /// dotted chain wins.
  pub fn resolve(&self, scope: &str, reference: &str) -> Result<&RegisteredType, ConvertError> {
    if let Some(absolute) = reference.strip_prefix(QUALIFIER_MARKER) {
      return self
        .root
        .lookup_chain(&segments(absolute))
        .ok_or_else(|| ConvertError::UnresolvedType {
          name: reference.to_string(),
        });
    }

    let chain = segments(reference);
    let scope_segments = segments(scope);
    (0..=scope_segments.len())
      .rev()
      .filter_map(|depth| self.root.walk(scope_segments[..depth].iter().copied()))
      .find_map(|node| node.lookup_chain(&chain))
      .ok_or_else(|| ConvertError::UnresolvedPackage {
        scope: scope.to_string(),
        name: reference.to_string(),
      })
  }

  pub fn resolve_message(&self, scope: &str, reference: &str) -> Result<&MessageDescriptor, ConvertError> {
    match self.resolve(scope, reference)? {
      RegisteredType::Message(message) => Ok(message),
      RegisteredType::Enum(_) => Err(ConvertError::UnexpectedTypeKind {
        name: reference.to_string(),
        expected: "a message",
      }),
    }
  }

  pub fn resolve_enum(&self, scope: &str, reference: &str) -> Result<&EnumDescriptor, ConvertError> {
    match self.resolve(scope, reference)? {
      RegisteredType::Enum(enumeration) => Ok(enumeration),
      RegisteredType::Message(_) => Err(ConvertError::UnexpectedTypeKind {
        name: reference.to_string(),
        expected: "an enum",
      }),
    }
  }
}
