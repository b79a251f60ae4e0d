use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

/// Prefix of every reference into `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Sentinel schema name for a single uploaded file.
pub const FORM_FILE_SCHEMA: &str = "IFormFile";
/// Sentinel schema name for a collection of uploaded files.
pub const FORM_FILE_COLLECTION_SCHEMA: &str = "IFormFileCollection";

const INTEGER_ENUM_FORMATS: [&str; 3] = ["int16", "int32", "int64"];

/// The ordered list of kinds declared by a schema's `type` keyword.
///
/// Decodes from either a bare string or an array of strings. A one-element list
/// encodes back to a bare string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaKinds(Vec<String>);

impl SchemaKinds {
  #[must_use]
  pub fn single(kind: impl Into<String>) -> Self {
    Self(vec![kind.into()])
  }

  /// Returns `None` for an empty list.
  #[must_use]
  pub fn multiple<I, S>(kinds: I) -> Option<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let kinds: Vec<String> = kinds.into_iter().map(Into::into).collect();
    (!kinds.is_empty()).then_some(Self(kinds))
  }

  /// The first declared kind. Only this entry drives type resolution.
  #[must_use]
  pub fn primary(&self) -> &str {
    &self.0[0]
  }

  #[must_use]
  pub fn as_slice(&self) -> &[String] {
    &self.0
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaKindsRepr {
  Single(String),
  Multiple(Vec<String>),
}

impl<'de> Deserialize<'de> for SchemaKinds {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    match SchemaKindsRepr::deserialize(deserializer).map_err(|_| {
      D::Error::custom("schema `type` must be a string or an array of strings")
    })? {
      SchemaKindsRepr::Single(kind) => Ok(Self::single(kind)),
      SchemaKindsRepr::Multiple(kinds) => {
        Self::multiple(kinds).ok_or_else(|| D::Error::custom("schema `type` array must not be empty"))
      }
    }
  }
}

impl Serialize for SchemaKinds {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self.0.as_slice() {
      [single] => serializer.serialize_str(single),
      kinds => kinds.serialize(serializer),
    }
  }
}

/// A (possibly recursive) description of a data shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub kinds: Option<SchemaKinds>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<Schema>>,

  #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
  pub reference: Option<String>,

  #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<serde_json::Value>,

  #[serde(
    rename = "x-enum-varnames",
    alias = "x-enumNames",
    default,
    skip_serializing_if = "Vec::is_empty"
  )]
  pub enum_var_names: Vec<String>,
}

impl Schema {
  #[cfg(test)]
  pub fn reference_to(name: &str) -> Self {
    Self {
      reference: Some(format!("{SCHEMA_REF_PREFIX}{name}")),
      ..Default::default()
    }
  }

  #[must_use]
  pub fn primary_kind(&self) -> Option<&str> {
    self.kinds.as_ref().map(SchemaKinds::primary)
  }

  /// The non-empty `$ref` string, if any.
  #[must_use]
  pub fn reference(&self) -> Option<&str> {
    self.reference.as_deref().filter(|r| !r.is_empty())
  }

  /// Integer kind with no format or one of `int16`/`int32`/`int64`.
  ///
  /// Named schemas of this shape synthesize as enumerations, never as records.
  #[must_use]
  pub fn is_integer_like(&self) -> bool {
    self.primary_kind() == Some("integer")
      && self
        .format
        .as_deref()
        .is_none_or(|format| INTEGER_ENUM_FORMATS.contains(&format))
  }

  /// The `enum` list when every entry is an integer.
  #[must_use]
  pub fn integer_enum_values(&self) -> Option<Vec<i64>> {
    if self.enum_values.is_empty() {
      return None;
    }
    self.enum_values.iter().map(serde_json::Value::as_i64).collect()
  }
}

/// Trailing path segment of a reference string (`#/components/schemas/Pet` -> `Pet`).
#[must_use]
pub fn reference_name(reference: &str) -> &str {
  reference.rsplit('/').next().unwrap_or(reference)
}

/// Whether a reference points at one of the upload sentinels.
#[must_use]
pub fn is_form_file_reference(reference: &str) -> bool {
  reference_name(reference) == FORM_FILE_SCHEMA
}

#[must_use]
pub fn is_form_file_collection_reference(reference: &str) -> bool {
  reference_name(reference) == FORM_FILE_COLLECTION_SCHEMA
}
