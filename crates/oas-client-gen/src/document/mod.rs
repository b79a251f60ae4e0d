//! Typed, immutable view of an OpenAPI document.
//!
//! Only the parts the generator consumes are modelled; everything else is ignored
//! while decoding. Maps are [`IndexMap`]s so iteration follows the document order.

mod schema;

#[cfg(test)]
mod tests;

use anyhow::Context;
use http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use schema::{
  FORM_FILE_COLLECTION_SCHEMA, FORM_FILE_SCHEMA, SCHEMA_REF_PREFIX, Schema, is_form_file_collection_reference,
  is_form_file_reference, reference_name,
};

/// Media types with dedicated handling.
pub mod media {
  pub const JSON: &str = "application/json";
  pub const MULTIPART: &str = "multipart/form-data";
  pub const OCTET_STREAM: &str = "application/octet-stream";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
  #[serde(default)]
  pub info: Info,
  #[serde(default)]
  pub servers: Vec<Server>,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default)]
  pub components: Components,
}

impl Document {
  pub fn from_json(source: &str) -> anyhow::Result<Self> {
    serde_json::from_str(source).context("decoding JSON document")
  }

  pub fn from_json_slice(source: &[u8]) -> anyhow::Result<Self> {
    serde_json::from_slice(source).context("decoding JSON document")
  }

  pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
    serde_yaml::from_str(source).context("decoding YAML document")
  }

  #[must_use]
  pub fn title(&self) -> &str {
    &self.info.title
  }

  #[must_use]
  pub fn version(&self) -> &str {
    &self.info.version
  }

  #[must_use]
  pub fn base_url(&self) -> Option<&str> {
    self.servers.first().map(|server| server.url.as_str())
  }

  /// Every populated verb slot, path by path, in document order.
  pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation)> {
    self
      .paths
      .iter()
      .flat_map(|(path, item)| item.operations().map(move |(method, op)| (path.as_str(), method, op)))
  }

  /// The first API-key security scheme, if the document declares one.
  #[must_use]
  pub fn api_key_scheme(&self) -> Option<&SecurityScheme> {
    self
      .components
      .security_schemes
      .values()
      .find(|scheme| scheme.is_api_key())
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
  pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, Schema>,
  #[serde(default)]
  pub security_schemes: IndexMap<String, SecurityScheme>,
  #[serde(default)]
  pub parameters: IndexMap<String, Parameter>,
  #[serde(default)]
  pub request_bodies: IndexMap<String, RequestBody>,
  #[serde(default)]
  pub responses: IndexMap<String, Response>,
}

/// Up to one operation per supported verb.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub get: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub put: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delete: Option<Operation>,
}

impl PathItem {
  /// Populated slots in GET, POST, PUT, DELETE order.
  pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
    [
      (Method::GET, self.get.as_ref()),
      (Method::POST, self.post.as_ref()),
      (Method::PUT, self.put.as_ref()),
      (Method::DELETE, self.delete.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operation_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub request_body: Option<ObjectOrReference<RequestBody>>,
  #[serde(default)]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Header,
  Query,
  Cookie,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterLocation,
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
}

/// Looks up a content entry by media-type essence, ignoring case and parameters.
fn content_entry<'a>(content: &'a IndexMap<String, MediaType>, essence: &str) -> Option<&'a MediaType> {
  content.iter().find_map(|(key, media_type)| {
    let key_essence = key.split(';').next().unwrap_or_default().trim();
    key_essence.eq_ignore_ascii_case(essence).then_some(media_type)
  })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
  #[must_use]
  pub fn media(&self, essence: &str) -> Option<&MediaType> {
    content_entry(&self.content, essence)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
}

impl Response {
  #[must_use]
  pub fn media(&self, essence: &str) -> Option<&MediaType> {
    content_entry(&self.content, essence)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
  Header,
  Query,
  Cookie,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
  pub location: Option<ApiKeyLocation>,
}

impl SecurityScheme {
  #[must_use]
  pub fn is_api_key(&self) -> bool {
    self.kind == "apiKey" && self.name.is_some()
  }

  /// Header name carrying the key when the scheme is a header API key.
  #[must_use]
  pub fn api_key_header(&self) -> Option<&str> {
    match self.location {
      Some(ApiKeyLocation::Header) if self.is_api_key() => self.name.as_deref(),
      _ => None,
    }
  }
}

/// Components that can be the target of a `$ref` from an operation.
pub trait Component: Sized {
  const SECTION: &'static str;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a Self>;
}

impl Component for Parameter {
  const SECTION: &'static str = "parameters";

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a Self> {
    components.parameters.get(name)
  }
}

impl Component for RequestBody {
  const SECTION: &'static str = "requestBodies";

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a Self> {
    components.request_bodies.get(name)
  }
}

impl Component for Response {
  const SECTION: &'static str = "responses";

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a Self> {
    components.responses.get(name)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectOrReference<T> {
  Ref {
    #[serde(rename = "$ref")]
    ref_path: String,
  },
  Object(T),
}

impl<T: Component> ObjectOrReference<T> {
  /// Returns the inline object or the component the reference points at.
  pub fn resolve<'a>(&'a self, document: &'a Document) -> anyhow::Result<&'a T> {
    match self {
      Self::Object(object) => Ok(object),
      Self::Ref { ref_path } => {
        let prefix = format!("#/components/{}/", T::SECTION);
        let name = ref_path
          .strip_prefix(&prefix)
          .ok_or_else(|| anyhow::anyhow!("unsupported reference `{ref_path}`, expected `{prefix}<name>`"))?;
        T::lookup(&document.components, name).ok_or_else(|| anyhow::anyhow!("unresolved reference `{ref_path}`"))
      }
    }
  }
}

impl<T> From<T> for ObjectOrReference<T> {
  fn from(object: T) -> Self {
    Self::Object(object)
  }
}
