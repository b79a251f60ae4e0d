use http::Method;

use crate::generator::ast::{Documentation, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterKind {
  Path,
  Header,
  Query,
  Body,
}

/// A method argument.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ParameterDef {
  #[builder(into)]
  pub ident: String,
  /// Name as declared in the document (header name, query key, path placeholder).
  #[builder(into)]
  pub wire_name: String,
  pub kind: ParameterKind,
  pub required: bool,
  /// Argument type; `Option<_>` for optional parameters.
  pub rust_type: TypeRef,
  /// Rendering of the value (or of each item when `repeated`) for paths, headers and queries.
  #[builder(default)]
  pub encoding: TextEncoding,
  /// A query sequence sent as one pair per item.
  #[builder(default)]
  pub repeated: bool,
  #[builder(default)]
  pub docs: Documentation,
}

/// How a value is rendered as text on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum TextEncoding {
  /// `String` sent as is.
  Plain,
  /// Numbers and booleans through `to_string`.
  Display,
  /// Timestamps as RFC 3339 text.
  Rfc3339,
  /// Anything else as JSON text.
  #[default]
  Json,
}

/// How a value becomes one multipart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartEncoding {
  Text(TextEncoding),
  Bytes,
  Stream,
  File,
  Files,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartField {
  pub ident: String,
  pub wire_name: String,
  pub nullable: bool,
  pub encoding: PartEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartBody {
  /// The body is a single upload.
  File { part_name: String },
  /// The body is a list of uploads sent as repeated parts.
  Files { part_name: String },
  /// One part per record field.
  Fields(Vec<MultipartField>),
  /// A non-record body sent as one part.
  Single { part_name: String, encoding: PartEncoding },
  /// Untyped body sent as one text part per top-level JSON member.
  Untyped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyEncoding {
  Multipart(MultipartBody),
  Json,
  Empty,
}

impl BodyEncoding {
  #[must_use]
  pub fn is_multipart(&self) -> bool {
    matches!(self, Self::Multipart(_))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyDef {
  pub encoding: BodyEncoding,
  pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseKind {
  #[default]
  Nothing,
  Json(TypeRef),
  Stream,
}

impl ResponseKind {
  /// Rust type of a successful call, as written in the method signature.
  #[must_use]
  pub fn success_type(&self) -> String {
    match self {
      Self::Nothing => "()".to_string(),
      Self::Json(type_ref) => type_ref.to_rust_type(),
      Self::Stream => "oas_client_gen_support::ByteStream".to_string(),
    }
  }
}

/// Literal text or a placeholder of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPart {
  Literal(String),
  /// Placeholder bound to the argument with this identifier.
  Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct OperationDef {
  pub method: Method,
  #[builder(into)]
  pub path: String,
  /// Method name before Rust casing (`Users`).
  #[builder(into)]
  pub name: String,
  /// Rust method identifier (`users`).
  #[builder(into)]
  pub ident: String,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub path_parts: Vec<PathPart>,
  #[builder(default)]
  pub parameters: Vec<ParameterDef>,
  pub body: Option<RequestBodyDef>,
  #[builder(default)]
  pub response: ResponseKind,
}

impl OperationDef {
  pub fn parameters_of(&self, kind: ParameterKind) -> impl Iterator<Item = &ParameterDef> {
    self.parameters.iter().filter(move |param| param.kind == kind)
  }

  #[must_use]
  pub fn body_parameter(&self) -> Option<&ParameterDef> {
    self.parameters_of(ParameterKind::Body).next()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyPlacement {
  Header,
  Query,
}

/// The API key every call attaches when one is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyDef {
  pub name: String,
  pub placement: ApiKeyPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ClientDef {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub options_name: String,
  #[builder(default)]
  pub docs: Documentation,
  pub base_url: Option<String>,
  pub api_key: Option<ApiKeyDef>,
  #[builder(default)]
  pub operations: Vec<OperationDef>,
}
