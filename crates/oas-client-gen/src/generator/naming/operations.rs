use std::collections::BTreeSet;

use http::Method;
use itertools::Itertools;

use crate::generator::naming::identifiers::{ensure_unique, to_rust_field_name, to_upper_identifier};

/// Derives an operation's method name.
///
/// Precedence: the operation id (whitespace acts as a word separator), then the last path
/// segment that is not a `{placeholder}`, then `<Verb>Api`.
///
/// ```text
/// (GET, "/users/{id}", None)             -> "Users"
/// (POST, "/pets", Some("add new pet"))   -> "AddNewPet"
/// (DELETE, "/{id}", None)                -> "DeleteApi"
/// ```
pub(crate) fn operation_method_name(method: &Method, path: &str, operation_id: Option<&str>) -> String {
  if let Some(id) = operation_id.map(str::trim).filter(|id| !id.is_empty()) {
    let joined = id.split_whitespace().join("_");
    return to_upper_identifier(&joined);
  }

  path
    .rsplit('/')
    .find(|segment| !segment.is_empty() && !is_placeholder(segment))
    .map_or_else(|| verb_fallback_name(method), to_upper_identifier)
}

fn is_placeholder(segment: &str) -> bool {
  segment.starts_with('{') && segment.ends_with('}')
}

fn verb_fallback_name(method: &Method) -> String {
  format!("{}Api", to_upper_identifier(&method.as_str().to_ascii_lowercase()))
}

/// Methods every generated client defines next to its operations.
pub(crate) const CLIENT_RESERVED_METHODS: &[&str] = &["new", "with_base_url", "base_url", "default"];

/// Hands out unique Rust method identifiers across a client.
///
/// Starts with [`CLIENT_RESERVED_METHODS`] taken.
#[derive(Debug)]
pub(crate) struct MethodNameAllocator {
  used: BTreeSet<String>,
}

impl Default for MethodNameAllocator {
  fn default() -> Self {
    Self {
      used: CLIENT_RESERVED_METHODS.iter().map(ToString::to_string).collect(),
    }
  }
}

/// Result of [`MethodNameAllocator::allocate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AllocatedName {
  pub ident: String,
  pub renamed_from: Option<String>,
}

impl MethodNameAllocator {
  /// Renders `name` as a `snake_case` identifier, appending the verb and then a number
  /// when it is already taken.
  pub(crate) fn allocate(&mut self, name: &str, method: &Method) -> AllocatedName {
    let preferred = to_rust_field_name(name);
    if self.used.insert(preferred.clone()) {
      return AllocatedName {
        ident: preferred,
        renamed_from: None,
      };
    }

    let with_verb = to_rust_field_name(&format!("{name}_{}", method.as_str().to_ascii_lowercase()));
    let ident = ensure_unique(&with_verb, &self.used);
    self.used.insert(ident.clone());
    AllocatedName {
      ident,
      renamed_from: Some(preferred),
    }
  }
}
