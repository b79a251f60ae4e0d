use super::cache::{ReferenceCache, type_name_for_schema};
use crate::{
  document::{Schema, is_form_file_collection_reference, is_form_file_reference, reference_name},
  generator::ast::{RustPrimitive, TypeRef},
};

/// Maps schema nodes to type references.
///
/// Resolution is total: missing schemas, unknown kinds and dangling references all
/// produce a usable type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SchemaResolver<'a> {
  cache: &'a ReferenceCache,
}

impl<'a> SchemaResolver<'a> {
  pub(crate) fn new(cache: &'a ReferenceCache) -> Self {
    Self { cache }
  }

  pub(crate) fn resolve(&self, schema: Option<&Schema>) -> TypeRef {
    let Some(schema) = schema else {
      return TypeRef::untyped();
    };

    if let Some((_, upload)) = form_file_property(schema) {
      return upload;
    }

    if let Some(reference) = schema.reference() {
      return self.resolve_reference(reference);
    }

    match schema.primary_kind() {
      Some("array") => self.resolve_array(schema.items.as_deref()),
      Some(kind) => Self::resolve_primitive(kind, schema.format.as_deref()),
      None => TypeRef::untyped(),
    }
  }

  /// Upload sentinels first, then the cache, then a name derived from the last segment.
  pub(crate) fn resolve_reference(&self, reference: &str) -> TypeRef {
    if is_form_file_reference(reference) {
      return TypeRef::FormFile;
    }
    if is_form_file_collection_reference(reference) {
      return TypeRef::FormFileArray;
    }

    match self.cache.get(reference) {
      Some(name) => TypeRef::named(name),
      None => TypeRef::named(type_name_for_schema(reference_name(reference))),
    }
  }

  fn resolve_array(&self, items: Option<&Schema>) -> TypeRef {
    match self.resolve(items) {
      TypeRef::FormFile => TypeRef::FormFileArray,
      item => TypeRef::sequence_of(item),
    }
  }

  fn resolve_primitive(kind: &str, format: Option<&str>) -> TypeRef {
    let primitive = match (kind, format) {
      ("integer", Some("int64")) => RustPrimitive::I64,
      ("integer", _) => RustPrimitive::I32,
      ("number", Some("float")) => RustPrimitive::F32,
      ("number", _) => RustPrimitive::F64,
      ("string", Some("date-time")) => RustPrimitive::DateTime,
      ("string", Some("byte")) => RustPrimitive::Bytes,
      ("string", Some("binary")) => RustPrimitive::ByteStream,
      ("string", _) => RustPrimitive::String,
      ("boolean", _) => RustPrimitive::Bool,
      _ => RustPrimitive::Value,
    };
    primitive.into()
  }
}

/// The first property of an inline record that references an upload sentinel.
///
/// Returns the property key and the upload type it stands for. Reference nodes never
/// match since their own properties carry no meaning.
pub(crate) fn form_file_property(schema: &Schema) -> Option<(&str, TypeRef)> {
  if schema.reference().is_some() {
    return None;
  }

  schema.properties.iter().find_map(|(key, property)| {
    let reference = property.reference()?;
    if is_form_file_reference(reference) {
      Some((key.as_str(), TypeRef::FormFile))
    } else if is_form_file_collection_reference(reference) {
      Some((key.as_str(), TypeRef::FormFileArray))
    } else {
      None
    }
  })
}
