use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::{
  document::FORM_FILE_SCHEMA,
  generator::{
    ast::FORM_FILE_TYPE,
    naming::identifiers::{ensure_unique, to_rust_type_name, to_upper_identifier},
  },
};

/// Rust type name for a schema name, before any collision handling.
pub(crate) fn type_name_for_schema(schema_name: &str) -> String {
  if schema_name.eq_ignore_ascii_case(FORM_FILE_SCHEMA) {
    return FORM_FILE_TYPE.to_string();
  }
  to_rust_type_name(&to_upper_identifier(schema_name))
}

/// Reference string to registered type name.
///
/// Filled while models are synthesized and read-only afterwards. Each reference is
/// registered once; later registrations of the same reference keep the first name.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceCache {
  names: IndexMap<String, String>,
  used_names: BTreeSet<String>,
}

impl ReferenceCache {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Registers `reference` under the type name derived from `schema_name` and returns it.
  ///
  /// Two schemas whose names case to the same identifier get numeric suffixes.
  pub(crate) fn register(&mut self, reference: &str, schema_name: &str) -> &str {
    if !self.names.contains_key(reference) {
      let name = ensure_unique(&type_name_for_schema(schema_name), &self.used_names);
      self.used_names.insert(name.clone());
      self.names.insert(reference.to_string(), name);
    }
    &self.names[reference]
  }

  pub(crate) fn get(&self, reference: &str) -> Option<&str> {
    self.names.get(reference).map(String::as_str)
  }

  pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.names.iter().map(|(reference, name)| (reference.as_str(), name.as_str()))
  }
}
