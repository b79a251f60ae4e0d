use std::collections::BTreeSet;

use anyhow::Context;
use http::Method;
use itertools::Itertools;

use super::{
  cache::ReferenceCache,
  models::{SchemaShape, record_fields},
  type_resolver::{SchemaResolver, form_file_property},
};
use crate::{
  document::{
    ApiKeyLocation, Document, Operation, Parameter, ParameterLocation, RequestBody, Schema, media, reference_name,
  },
  generator::{
    ast::{
      ApiKeyDef, ApiKeyPlacement, BodyEncoding, ClientDef, Documentation, ModelDef, MultipartBody, MultipartField,
      OperationDef, ParameterDef, ParameterKind, PartEncoding, PathPart, RequestBodyDef, ResponseKind, RustPrimitive,
      TextEncoding, TypeRef,
    },
    metrics::GenerationWarning,
    naming::{
      identifiers::{ensure_unique, to_lower_identifier, to_rust_field_name, to_rust_type_name, to_upper_identifier},
      operations::{MethodNameAllocator, operation_method_name},
    },
  },
};

/// Locals of every generated method body; arguments never take these names.
const METHOD_LOCALS: &[&str] = &["url", "request", "response", "form", "query", "part", "value", "values", "key"];

const DEFAULT_FILE_PART: &str = "file";
const DEFAULT_FILES_PART: &str = "files";
const DEFAULT_BODY_PART: &str = "body";

#[derive(Debug, Clone)]
pub(crate) struct ClientOutput {
  pub client: ClientDef,
  pub warnings: Vec<GenerationWarning>,
}

/// Builds the client definition: one method per path and populated verb, in document order.
pub(crate) struct ClientSynthesizer<'a> {
  document: &'a Document,
  resolver: SchemaResolver<'a>,
  api_key: Option<ApiKeyDef>,
  /// Records emitted without serde derives.
  non_serde: BTreeSet<String>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> ClientSynthesizer<'a> {
  pub(crate) fn new(document: &'a Document, cache: &'a ReferenceCache, models: &[ModelDef]) -> Self {
    let mut warnings = vec![];
    let api_key = document.api_key_scheme().and_then(|scheme| {
      let name = scheme.name.clone()?;
      match scheme.location {
        Some(ApiKeyLocation::Header) => Some(ApiKeyDef {
          name,
          placement: ApiKeyPlacement::Header,
        }),
        Some(ApiKeyLocation::Query) => Some(ApiKeyDef {
          name,
          placement: ApiKeyPlacement::Query,
        }),
        Some(ApiKeyLocation::Cookie) | None => {
          warnings.push(GenerationWarning::schema(
            name,
            "API key is not sent in a header or query, the client will not attach it",
          ));
          None
        }
      }
    });

    let non_serde = models
      .iter()
      .filter_map(ModelDef::as_record)
      .filter(|record| !record.is_serializable())
      .map(|record| record.name.clone())
      .collect();

    Self {
      document,
      resolver: SchemaResolver::new(cache),
      api_key,
      non_serde,
      warnings,
    }
  }

  pub(crate) fn synthesize(mut self, client_name: Option<&str>) -> anyhow::Result<ClientOutput> {
    let name = client_name.map_or_else(|| client_type_name(self.document.title()), to_rust_type_name);
    let mut allocator = MethodNameAllocator::default();

    let document = self.document;
    let mut operations = vec![];
    for (path, method, operation) in document.operations() {
      let def = self
        .synthesize_operation(path, &method, operation, &mut allocator)
        .with_context(|| format!("synthesizing operation {method} {path}"))?;
      operations.push(def);
    }

    let client = ClientDef::builder()
      .options_name(format!("{name}Options"))
      .name(name)
      .docs(Documentation::from_optional(document.info.description.as_deref()))
      .maybe_base_url(document.base_url().map(str::to_string))
      .maybe_api_key(self.api_key)
      .operations(operations)
      .build();

    Ok(ClientOutput {
      client,
      warnings: self.warnings,
    })
  }

  fn synthesize_operation(
    &mut self,
    path: &str,
    method: &Method,
    operation: &Operation,
    allocator: &mut MethodNameAllocator,
  ) -> anyhow::Result<OperationDef> {
    let name = operation_method_name(method, path, operation.operation_id.as_deref());
    let allocated = allocator.allocate(&name, method);
    if let Some(original) = allocated.renamed_from {
      self.warnings.push(GenerationWarning::MethodRenamed {
        original,
        renamed: allocated.ident.clone(),
      });
    }

    let mut used_idents: BTreeSet<String> = METHOD_LOCALS.iter().map(ToString::to_string).collect();
    let mut path_params = vec![];
    let mut header_params = vec![];
    let mut query_params = vec![];

    for parameter in &operation.parameters {
      let parameter = parameter.resolve(self.document).context("resolving parameter")?;
      if self.is_api_key_parameter(parameter) {
        continue;
      }
      match parameter.location {
        ParameterLocation::Path => {
          path_params.push(self.parameter(parameter, ParameterKind::Path, true, &mut used_idents));
        }
        ParameterLocation::Header => {
          header_params.push(self.parameter(parameter, ParameterKind::Header, parameter.required, &mut used_idents));
        }
        ParameterLocation::Query => {
          query_params.push(self.parameter(parameter, ParameterKind::Query, parameter.required, &mut used_idents));
        }
        ParameterLocation::Cookie => self.warnings.push(GenerationWarning::operation(
          method,
          path,
          format!("cookie parameter '{}' ignored", parameter.name),
        )),
      }
    }

    let path_parts = self.path_parts(method, path, &mut path_params, &mut used_idents);

    let mut body = None;
    let mut body_params = vec![];
    if let Some(request_body) = &operation.request_body {
      let request_body = request_body.resolve(self.document).context("resolving request body")?;
      let (param, def) = self.request_body(method, path, request_body, &mut used_idents);
      body_params.push(param);
      body = Some(def);
    }

    let mut parameters: Vec<ParameterDef> = path_params
      .into_iter()
      .chain(header_params)
      .chain(query_params)
      .chain(body_params)
      .collect();
    parameters.sort_by_key(|param| !param.required);

    let response = self.response(method, path, operation)?;

    Ok(
      OperationDef::builder()
        .method(method.clone())
        .path(path)
        .name(name)
        .ident(allocated.ident)
        .docs(operation_docs(operation))
        .path_parts(path_parts)
        .parameters(parameters)
        .maybe_body(body)
        .response(response)
        .build(),
    )
  }

  fn is_api_key_parameter(&self, parameter: &Parameter) -> bool {
    self.api_key.as_ref().is_some_and(|key| {
      let placement_matches = matches!(
        (key.placement, parameter.location),
        (ApiKeyPlacement::Header, ParameterLocation::Header) | (ApiKeyPlacement::Query, ParameterLocation::Query)
      );
      placement_matches && key.name.eq_ignore_ascii_case(&parameter.name)
    })
  }

  fn parameter(
    &self,
    parameter: &Parameter,
    kind: ParameterKind,
    required: bool,
    used_idents: &mut BTreeSet<String>,
  ) -> ParameterDef {
    let base = self.resolver.resolve(parameter.schema.as_ref());
    let repeated = kind == ParameterKind::Query && base.is_sequence();
    let encoding = match &base {
      TypeRef::Sequence(item) if repeated => text_encoding_for(item),
      other => text_encoding_for(other),
    };
    let rust_type = if required { base } else { base.with_option() };

    ParameterDef::builder()
      .ident(unique_ident(&parameter.name, used_idents))
      .wire_name(parameter.name.as_str())
      .kind(kind)
      .required(required)
      .rust_type(rust_type)
      .encoding(encoding)
      .repeated(repeated)
      .docs(Documentation::from_optional(parameter.description.as_deref()))
      .build()
  }

  /// Splits the route template and binds every placeholder to a path argument.
  ///
  /// Placeholders without a declared parameter become required text arguments.
  fn path_parts(
    &mut self,
    method: &Method,
    path: &str,
    path_params: &mut Vec<ParameterDef>,
    used_idents: &mut BTreeSet<String>,
  ) -> Vec<PathPart> {
    let mut parts = vec![];
    let mut bound = BTreeSet::new();
    let mut rest = path;

    while let Some(start) = rest.find('{') {
      let Some(length) = rest[start..].find('}') else {
        break;
      };
      if start > 0 {
        parts.push(PathPart::Literal(rest[..start].to_string()));
      }

      let placeholder = &rest[start + 1..start + length];
      let ident = match path_params.iter().find(|param| param.wire_name == placeholder) {
        Some(param) => param.ident.clone(),
        None => {
          self.warnings.push(GenerationWarning::operation(
            method,
            path,
            format!("placeholder '{{{placeholder}}}' has no declared parameter, taking it as text"),
          ));
          let param = ParameterDef::builder()
            .ident(unique_ident(placeholder, used_idents))
            .wire_name(placeholder)
            .kind(ParameterKind::Path)
            .required(true)
            .rust_type(RustPrimitive::String.into())
            .encoding(TextEncoding::Plain)
            .build();
          let ident = param.ident.clone();
          path_params.push(param);
          ident
        }
      };
      bound.insert(ident.clone());
      parts.push(PathPart::Param(ident));

      rest = &rest[start + length + 1..];
    }

    if !rest.is_empty() {
      parts.push(PathPart::Literal(rest.to_string()));
    }

    for param in path_params.iter().filter(|param| !bound.contains(&param.ident)) {
      self.warnings.push(GenerationWarning::operation(
        method,
        path,
        format!("path parameter '{}' does not appear in the route", param.wire_name),
      ));
    }

    parts
  }

  fn request_body(
    &mut self,
    method: &Method,
    path: &str,
    request_body: &RequestBody,
    used_idents: &mut BTreeSet<String>,
  ) -> (ParameterDef, RequestBodyDef) {
    let (body_type, encoding) = if let Some(media_type) = request_body.media(media::MULTIPART) {
      let schema = media_type.schema.as_ref();
      let body_type = self.resolver.resolve(schema);
      let multipart = self.multipart_body(schema, &body_type);
      (body_type, BodyEncoding::Multipart(multipart))
    } else if let Some(media_type) = request_body.media(media::JSON) {
      let body_type = self.resolver.resolve(media_type.schema.as_ref());
      if self.is_serde(&body_type) {
        (body_type, BodyEncoding::Json)
      } else {
        self.warnings.push(GenerationWarning::operation(
          method,
          path,
          format!("JSON body of type {body_type} cannot be serialized, sending an empty payload"),
        ));
        (body_type, BodyEncoding::Empty)
      }
    } else {
      let first = request_body.content.iter().next();
      if let Some((media_type, _)) = first {
        self.warnings.push(GenerationWarning::operation(
          method,
          path,
          format!("request media type '{media_type}' is not supported, sending an empty payload"),
        ));
      }
      let body_type = self.resolver.resolve(first.and_then(|(_, entry)| entry.schema.as_ref()));
      (body_type, BodyEncoding::Empty)
    };

    let rust_type = if request_body.required {
      body_type
    } else {
      body_type.with_option()
    };

    let ident = ensure_unique("body", used_idents);
    used_idents.insert(ident.clone());

    let param = ParameterDef::builder()
      .ident(ident)
      .wire_name(DEFAULT_BODY_PART)
      .kind(ParameterKind::Body)
      .required(request_body.required)
      .rust_type(rust_type)
      .docs(Documentation::from_optional(request_body.description.as_deref()))
      .build();

    let def = RequestBodyDef {
      encoding,
      required: request_body.required,
    };

    (param, def)
  }

  fn multipart_body(&self, schema: Option<&Schema>, body_type: &TypeRef) -> MultipartBody {
    let sentinel_key = || schema.and_then(form_file_property).map(|(key, _)| key.to_string());

    match body_type {
      TypeRef::FormFile => MultipartBody::File {
        part_name: sentinel_key().unwrap_or_else(|| DEFAULT_FILE_PART.to_string()),
      },
      TypeRef::FormFileArray => MultipartBody::Files {
        part_name: sentinel_key().unwrap_or_else(|| DEFAULT_FILES_PART.to_string()),
      },
      TypeRef::Primitive(RustPrimitive::Value) => MultipartBody::Untyped,
      TypeRef::Named(_) => match self.referenced_record(schema) {
        Some(record) => MultipartBody::Fields(
          record_fields(self.resolver, record)
            .into_iter()
            .map(|field| MultipartField {
              nullable: field.rust_type.is_nullable(),
              encoding: part_encoding_for(&field.rust_type),
              ident: field.ident,
              wire_name: field.wire_name,
            })
            .collect(),
        ),
        None => MultipartBody::Single {
          part_name: DEFAULT_BODY_PART.to_string(),
          encoding: part_encoding_for(body_type),
        },
      },
      other => MultipartBody::Single {
        part_name: DEFAULT_BODY_PART.to_string(),
        encoding: part_encoding_for(other),
      },
    }
  }

  /// The component schema behind a `$ref`, when it synthesizes as a record.
  fn referenced_record(&self, schema: Option<&Schema>) -> Option<&'a Schema> {
    let document = self.document;
    let schema_name = reference_name(schema?.reference()?);
    let component = document.components.schemas.get(schema_name)?;
    (SchemaShape::classify(schema_name, component) == SchemaShape::Record).then_some(component)
  }

  /// Only the `200` entry counts; JSON wins over a raw octet stream.
  fn response(&mut self, method: &Method, path: &str, operation: &Operation) -> anyhow::Result<ResponseKind> {
    let Some(response) = operation.responses.get("200") else {
      return Ok(ResponseKind::Nothing);
    };
    let response = response.resolve(self.document).context("resolving 200 response")?;

    if let Some(media_type) = response.media(media::JSON) {
      let success_type = self.resolver.resolve(media_type.schema.as_ref());
      if self.is_serde(&success_type) {
        return Ok(ResponseKind::Json(success_type));
      }
      self.warnings.push(GenerationWarning::operation(
        method,
        path,
        format!("response type {success_type} cannot be decoded from JSON, returning the raw stream"),
      ));
      return Ok(ResponseKind::Stream);
    }

    if response.media(media::OCTET_STREAM).is_some() {
      return Ok(ResponseKind::Stream);
    }

    Ok(ResponseKind::Nothing)
  }

  fn is_serde(&self, type_ref: &TypeRef) -> bool {
    !type_ref.is_streaming()
      && type_ref
        .referenced_name()
        .is_none_or(|name| !self.non_serde.contains(name))
  }
}

/// `<Title>Client`, with whitespace in the title acting as a word separator.
pub(crate) fn client_type_name(title: &str) -> String {
  let joined = title.split_whitespace().join("_");
  let stem = to_upper_identifier(&joined);
  if stem.is_empty() {
    return "ApiClient".to_string();
  }
  to_rust_type_name(&format!("{stem}Client"))
}

fn unique_ident(name: &str, used_idents: &mut BTreeSet<String>) -> String {
  let ident = ensure_unique(&to_rust_field_name(&to_lower_identifier(name)), used_idents);
  used_idents.insert(ident.clone());
  ident
}

fn operation_docs(operation: &Operation) -> Documentation {
  match (operation.summary.as_deref(), operation.description.as_deref()) {
    (Some(summary), Some(description)) => Documentation::from_raw(&format!("{summary}\n\n{description}")),
    (summary, description) => Documentation::from_optional(summary.or(description)),
  }
}

pub(crate) fn text_encoding_for(type_ref: &TypeRef) -> TextEncoding {
  match type_ref.base() {
    TypeRef::Primitive(RustPrimitive::String) => TextEncoding::Plain,
    TypeRef::Primitive(primitive) if primitive.is_numeric() || *primitive == RustPrimitive::Bool => {
      TextEncoding::Display
    }
    TypeRef::Primitive(RustPrimitive::DateTime) => TextEncoding::Rfc3339,
    _ => TextEncoding::Json,
  }
}

pub(crate) fn part_encoding_for(type_ref: &TypeRef) -> PartEncoding {
  match type_ref.base() {
    TypeRef::FormFile => PartEncoding::File,
    TypeRef::FormFileArray => PartEncoding::Files,
    TypeRef::Primitive(RustPrimitive::Bytes) => PartEncoding::Bytes,
    TypeRef::Primitive(RustPrimitive::ByteStream) => PartEncoding::Stream,
    other => PartEncoding::Text(text_encoding_for(other)),
  }
}
