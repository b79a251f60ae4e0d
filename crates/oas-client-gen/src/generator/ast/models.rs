use std::collections::BTreeSet;

use crate::generator::ast::{
  DeriveTrait, Documentation, FORM_FILE_TYPE, RustPrimitive, TypeRef, enum_derives, record_derives,
};

/// A single field of a generated record.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct FieldDef {
  #[builder(into)]
  pub ident: String,
  /// Property key used on the wire.
  #[builder(into)]
  pub wire_name: String,
  pub rust_type: TypeRef,
  #[builder(default)]
  pub docs: Documentation,
}

impl FieldDef {
  #[must_use]
  pub fn needs_rename(&self) -> bool {
    self.ident.strip_prefix("r#").unwrap_or(&self.ident) != self.wire_name
  }
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct RecordDef {
  #[builder(into)]
  pub name: String,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub fields: Vec<FieldDef>,
  #[builder(default = record_derives(false))]
  pub derives: BTreeSet<DeriveTrait>,
}

impl RecordDef {
  /// The upload record: a byte stream plus the file name.
  #[must_use]
  pub fn form_file() -> Self {
    let fields = vec![
      FieldDef::builder()
        .ident("data")
        .wire_name("data")
        .rust_type(RustPrimitive::ByteStream.into())
        .build(),
      FieldDef::builder()
        .ident("name")
        .wire_name("name")
        .rust_type(RustPrimitive::String.into())
        .build(),
    ];

    Self::builder()
      .name(FORM_FILE_TYPE)
      .docs(Documentation::from_lines(["A file sent as one part of a multipart upload."]))
      .fields(fields)
      .derives(record_derives(true))
      .build()
  }

  #[must_use]
  pub fn is_serializable(&self) -> bool {
    self.derives.contains(&DeriveTrait::Serialize)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
  pub name: String,
  pub value: i64,
}

impl EnumMember {
  #[must_use]
  pub fn new(name: impl Into<String>, value: i64) -> Self {
    Self {
      name: name.into(),
      value,
    }
  }
}

/// Integer enumeration serialized as its numeric value.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct EnumDef {
  #[builder(into)]
  pub name: String,
  #[builder(default)]
  pub docs: Documentation,
  pub members: Vec<EnumMember>,
  #[builder(default = enum_derives())]
  pub derives: BTreeSet<DeriveTrait>,
}

/// Placeholder member emitted for integer schemas without a value list.
pub const UNDEFINED_MEMBER: &str = "Undefined";

impl EnumDef {
  #[must_use]
  pub fn placeholder(name: impl Into<String>, docs: Documentation) -> Self {
    Self::builder()
      .name(name)
      .docs(docs)
      .members(vec![EnumMember::new(UNDEFINED_MEMBER, 0)])
      .build()
  }

  /// Whether two members share a value, which rules out explicit discriminants.
  #[must_use]
  pub fn has_aliased_values(&self) -> bool {
    let mut seen = BTreeSet::new();
    !self.members.iter().all(|member| seen.insert(member.value))
  }
}

/// One generated type per named schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDef {
  Record(RecordDef),
  Enum(EnumDef),
}

impl ModelDef {
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Record(def) => &def.name,
      Self::Enum(def) => &def.name,
    }
  }

  #[must_use]
  pub fn as_record(&self) -> Option<&RecordDef> {
    match self {
      Self::Record(def) => Some(def),
      Self::Enum(_) => None,
    }
  }

  #[cfg(test)]
  pub fn as_enum(&self) -> Option<&EnumDef> {
    match self {
      Self::Enum(def) => Some(def),
      Self::Record(_) => None,
    }
  }
}
