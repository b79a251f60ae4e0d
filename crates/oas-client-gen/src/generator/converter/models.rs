use std::collections::{BTreeSet, HashSet};

use anyhow::bail;

use super::{cache::ReferenceCache, cycles::box_recursive_fields, type_resolver::SchemaResolver};
use crate::{
  document::{Document, FORM_FILE_COLLECTION_SCHEMA, FORM_FILE_SCHEMA, SCHEMA_REF_PREFIX, Schema},
  generator::{
    ast::{Documentation, EnumDef, EnumMember, FieldDef, ModelDef, RecordDef, record_derives},
    metrics::GenerationWarning,
    naming::identifiers::{ensure_unique, to_lower_identifier, to_rust_field_name, to_rust_type_name, to_upper_identifier},
  },
};

/// What a named schema becomes, decided once before any of its fields are looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaShape {
  BinaryFile,
  BinaryFileArray,
  Enumeration,
  Record,
}

impl SchemaShape {
  pub(crate) fn classify(schema_name: &str, schema: &Schema) -> Self {
    if schema_name.eq_ignore_ascii_case(FORM_FILE_SCHEMA) {
      Self::BinaryFile
    } else if schema_name.eq_ignore_ascii_case(FORM_FILE_COLLECTION_SCHEMA) {
      Self::BinaryFileArray
    } else if schema.is_integer_like() {
      Self::Enumeration
    } else {
      Self::Record
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct ModelOutput {
  pub models: Vec<ModelDef>,
  pub cache: ReferenceCache,
  pub warnings: Vec<GenerationWarning>,
}

/// Emits one type per entry of `components.schemas`, in document order.
///
/// Owns the reference cache; it is handed back in [`ModelOutput`] for the client pass.
pub(crate) struct ModelSynthesizer<'a> {
  document: &'a Document,
  cache: ReferenceCache,
  warnings: Vec<GenerationWarning>,
}

impl<'a> ModelSynthesizer<'a> {
  pub(crate) fn new(document: &'a Document) -> Self {
    Self {
      document,
      cache: ReferenceCache::new(),
      warnings: vec![],
    }
  }

  pub(crate) fn synthesize(mut self) -> anyhow::Result<ModelOutput> {
    let document = self.document;
    let schemas = &document.components.schemas;

    for schema_name in schemas.keys() {
      self.cache.register(&format!("{SCHEMA_REF_PREFIX}{schema_name}"), schema_name);
    }

    let mut models = Vec::with_capacity(schemas.len());
    for (schema_name, schema) in schemas {
      if let Some(model) = self.synthesize_one(schema_name, schema)? {
        models.push(model);
      }
    }

    box_recursive_fields(&mut models);
    apply_record_derives(&mut models);

    Ok(ModelOutput {
      models,
      cache: self.cache,
      warnings: self.warnings,
    })
  }

  fn synthesize_one(&mut self, schema_name: &str, schema: &Schema) -> anyhow::Result<Option<ModelDef>> {
    let reference = format!("{SCHEMA_REF_PREFIX}{schema_name}");
    let type_name = self.cache.register(&reference, schema_name).to_string();
    let docs = Documentation::from_optional(schema.description.as_deref());

    let model = match SchemaShape::classify(schema_name, schema) {
      SchemaShape::BinaryFile => ModelDef::Record(RecordDef::form_file()),
      SchemaShape::BinaryFileArray => {
        self.warnings.push(GenerationWarning::schema(
          schema_name,
          "references resolve to a list of uploads, no type emitted",
        ));
        return Ok(None);
      }
      SchemaShape::Enumeration => ModelDef::Enum(self.build_enum(schema_name, type_name, docs, schema)?),
      SchemaShape::Record => ModelDef::Record(self.build_record(type_name, docs, schema)),
    };

    Ok(Some(model))
  }

  fn build_enum(
    &mut self,
    schema_name: &str,
    type_name: String,
    docs: Documentation,
    schema: &Schema,
  ) -> anyhow::Result<EnumDef> {
    if schema.enum_values.is_empty() {
      if !schema.enum_var_names.is_empty() {
        self.warnings.push(GenerationWarning::schema(
          schema_name,
          "enum names declared without values, emitting a placeholder",
        ));
      }
      return Ok(EnumDef::placeholder(type_name, docs));
    }

    let Some(values) = schema.integer_enum_values() else {
      bail!("schema `{schema_name}` is an integer enumeration but its `enum` list holds non-integer values");
    };

    let names: Vec<String> = if schema.enum_var_names.is_empty() {
      values.iter().map(|value| default_member_name(*value)).collect()
    } else if schema.enum_var_names.len() == values.len() {
      schema.enum_var_names.clone()
    } else {
      bail!(
        "schema `{schema_name}` declares {} enum names for {} enum values",
        schema.enum_var_names.len(),
        values.len()
      );
    };

    let mut used_names = BTreeSet::new();
    let mut used_values = HashSet::new();
    let mut members = Vec::with_capacity(values.len());

    for (name, value) in names.iter().zip(values) {
      if !used_values.insert(value) {
        self.warnings.push(GenerationWarning::schema(
          schema_name,
          format!("member '{name}' repeats enum value {value}, decoding yields the first member with that value"),
        ));
      }

      let member_name = ensure_unique(&to_rust_type_name(&to_upper_identifier(name)), &used_names);
      used_names.insert(member_name.clone());
      members.push(EnumMember::new(member_name, value));
    }

    Ok(EnumDef::builder().name(type_name).docs(docs).members(members).build())
  }

  fn build_record(&self, type_name: String, docs: Documentation, schema: &Schema) -> RecordDef {
    let fields = record_fields(SchemaResolver::new(&self.cache), schema);
    RecordDef::builder().name(type_name).docs(docs).fields(fields).build()
  }
}

/// One field per declared property, in declaration order, with the nullability policy applied.
pub(crate) fn record_fields(resolver: SchemaResolver<'_>, schema: &Schema) -> Vec<FieldDef> {
  let mut used_idents = BTreeSet::new();

  schema
    .properties
    .iter()
    .map(|(key, property)| {
      let ident = ensure_unique(&to_rust_field_name(&to_lower_identifier(key)), &used_idents);
      used_idents.insert(ident.clone());

      FieldDef::builder()
        .ident(ident)
        .wire_name(key.as_str())
        .rust_type(resolver.resolve(Some(property)).with_nullability_policy())
        .docs(Documentation::from_optional(property.description.as_deref()))
        .build()
    })
    .collect()
}

fn default_member_name(value: i64) -> String {
  if value < 0 {
    format!("ValueMinus{}", value.unsigned_abs())
  } else {
    format!("Value{value}")
  }
}

/// Records that hold streams or uploads, directly or through other records, lose
/// `Clone` and serde derives.
fn apply_record_derives(models: &mut [ModelDef]) {
  let mut streaming: HashSet<String> = HashSet::new();

  loop {
    let before = streaming.len();
    for record in models.iter().filter_map(ModelDef::as_record) {
      if streaming.contains(&record.name) {
        continue;
      }
      let holds_stream = record.fields.iter().any(|field| {
        field.rust_type.is_streaming()
          || field
            .rust_type
            .referenced_name()
            .is_some_and(|name| streaming.contains(name))
      });
      if holds_stream {
        streaming.insert(record.name.clone());
      }
    }
    if streaming.len() == before {
      break;
    }
  }

  for model in models {
    if let ModelDef::Record(record) = model {
      record.derives = record_derives(streaming.contains(&record.name));
    }
  }
}
