use http::Method;
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::LitStr;

use super::Visibility;
use crate::generator::ast::{
  ApiKeyDef, ApiKeyPlacement, BodyEncoding, ClientDef, MultipartBody, MultipartField, OperationDef, ParameterDef,
  ParameterKind, PartEncoding, PathPart, ResponseKind, TextEncoding,
};

/// Base URL of a client whose document declares no server.
pub(crate) const FALLBACK_BASE_URL: &str = "http://localhost";

/// Expression rendering `value` as a `String`.
fn text_expr(encoding: TextEncoding, value: &TokenStream) -> TokenStream {
  match encoding {
    TextEncoding::Plain | TextEncoding::Display => quote! { #value.to_string() },
    TextEncoding::Rfc3339 => quote! { #value.to_rfc3339() },
    TextEncoding::Json => quote! { oas_client_gen_support::to_text(&#value)? },
  }
}

fn param_ident(param: &ParameterDef) -> syn::Ident {
  format_ident!("{}", param.ident)
}

#[derive(Clone, Debug)]
pub(crate) struct HttpInitFragment {
  method: Method,
}

impl HttpInitFragment {
  pub(crate) fn new(method: Method) -> Self {
    Self { method }
  }
}

impl ToTokens for HttpInitFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.method.as_str() {
      "GET" => quote! { self.http_client.get(url) },
      "POST" => quote! { self.http_client.post(url) },
      "PUT" => quote! { self.http_client.put(url) },
      "DELETE" => quote! { self.http_client.delete(url) },
      _ => {
        let m = format_ident!("{}", self.method.as_str());
        quote! { self.http_client.request(reqwest::Method::#m, url) }
      }
    };
    tokens.extend(ts);
  }
}

/// Builds `url` from the route template, percent-encoding every path argument.
#[derive(Clone, Debug)]
pub(crate) struct UrlConstructionFragment<'a> {
  op: &'a OperationDef,
}

impl<'a> UrlConstructionFragment<'a> {
  pub(crate) fn new(op: &'a OperationDef) -> Self {
    Self { op }
  }
}

impl ToTokens for UrlConstructionFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let mut template = String::new();
    let mut args = vec![];

    for part in &self.op.path_parts {
      match part {
        PathPart::Literal(text) => template.push_str(&text.replace('{', "{{").replace('}', "}}")),
        PathPart::Param(ident) => {
          let Some(param) = self.op.parameters_of(ParameterKind::Path).find(|p| &p.ident == ident) else {
            continue;
          };
          let text = text_expr(param.encoding, &param_ident(param).into_token_stream());
          template.push_str("{}");
          args.push(quote! { oas_client_gen_support::percent_encode_path_segment(&#text) });
        }
      }
    }

    let unused = self
      .op
      .parameters_of(ParameterKind::Path)
      .filter(|param| {
        !self
          .op
          .path_parts
          .iter()
          .any(|part| matches!(part, PathPart::Param(ident) if *ident == param.ident))
      })
      .map(|param| {
        let ident = param_ident(param);
        quote! { let _ = &#ident; }
      });

    let template = LitStr::new(&template, Span::call_site());
    tokens.extend(quote! {
      #(#unused)*
      let url = oas_client_gen_support::join_url(&self.base_url, &format!(#template #(, #args)*))?;
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiKeyHeaderFragment<'a> {
  api_key: Option<&'a ApiKeyDef>,
}

impl<'a> ApiKeyHeaderFragment<'a> {
  pub(crate) fn new(api_key: Option<&'a ApiKeyDef>) -> Self {
    Self { api_key }
  }
}

impl ToTokens for ApiKeyHeaderFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let Some(key) = self.api_key.filter(|key| key.placement == ApiKeyPlacement::Header) else {
      return;
    };
    let name = key.name.as_str();

    tokens.extend(quote! {
      if let Some(key) = &self.api_key {
        request = request.header(#name, oas_client_gen_support::header_value(#name, key)?);
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct HeaderParamFragment<'a> {
  param: &'a ParameterDef,
}

impl<'a> HeaderParamFragment<'a> {
  pub(crate) fn new(param: &'a ParameterDef) -> Self {
    Self { param }
  }
}

impl ToTokens for HeaderParamFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ident = param_ident(self.param);
    let name = self.param.wire_name.as_str();

    let ts = if self.param.required {
      let text = text_expr(self.param.encoding, &ident.to_token_stream());
      quote! {
        request = request.header(#name, oas_client_gen_support::header_value(#name, #text)?);
      }
    } else {
      let text = text_expr(self.param.encoding, &quote! { value });
      quote! {
        if let Some(value) = &#ident {
          request = request.header(#name, oas_client_gen_support::header_value(#name, #text)?);
        }
      }
    };

    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) struct QueryParamsFragment<'a> {
  params: Vec<&'a ParameterDef>,
  api_key: Option<&'a ApiKeyDef>,
}

impl<'a> QueryParamsFragment<'a> {
  pub(crate) fn new(op: &'a OperationDef, api_key: Option<&'a ApiKeyDef>) -> Self {
    Self {
      params: op.parameters_of(ParameterKind::Query).collect(),
      api_key: api_key.filter(|key| key.placement == ApiKeyPlacement::Query),
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.params.is_empty() && self.api_key.is_none()
  }

  fn push(param: &ParameterDef) -> TokenStream {
    let ident = param_ident(param);
    let name = param.wire_name.as_str();
    let text = text_expr(param.encoding, &quote! { value });

    match (param.required, param.repeated) {
      (true, false) => {
        let text = text_expr(param.encoding, &ident.to_token_stream());
        quote! { query.push((#name, #text)); }
      }
      (false, false) => quote! {
        if let Some(value) = &#ident {
          query.push((#name, #text));
        }
      },
      (true, true) => quote! {
        for value in &#ident {
          query.push((#name, #text));
        }
      },
      (false, true) => quote! {
        if let Some(values) = &#ident {
          for value in values {
            query.push((#name, #text));
          }
        }
      },
    }
  }
}

impl ToTokens for QueryParamsFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    if self.is_empty() {
      return;
    }

    let pushes = self.params.iter().map(|param| Self::push(param));
    let api_key = self.api_key.map(|key| {
      let name = key.name.as_str();
      quote! {
        if let Some(key) = &self.api_key {
          query.push((#name, key.clone()));
        }
      }
    });

    tokens.extend(quote! {
      let mut query: Vec<(&str, String)> = Vec::new();
      #(#pushes)*
      #api_key
      request = request.query(&query);
    });
  }
}

/// Statements adding one value to `form` as a part named `wire_name`.
fn part_statement(wire_name: &str, encoding: PartEncoding, value: &TokenStream) -> TokenStream {
  match encoding {
    PartEncoding::Text(text) => {
      let text = text_expr(text, value);
      quote! { form = form.text(#wire_name, #text); }
    }
    PartEncoding::Bytes => quote! {
      form = form.part(#wire_name, reqwest::multipart::Part::bytes(#value));
    },
    PartEncoding::Stream => quote! {
      form = form.part(#wire_name, reqwest::multipart::Part::stream(#value.into_body()));
    },
    PartEncoding::File => quote! {
      form = form.part(#wire_name, oas_client_gen_support::file_part(#value.data, #value.name));
    },
    PartEncoding::Files => quote! {
      for item in #value {
        form = form.part(#wire_name, oas_client_gen_support::file_part(item.data, item.name));
      }
    },
  }
}

#[derive(Clone, Debug)]
pub(crate) struct MultipartFieldFragment<'a> {
  body: &'a syn::Ident,
  field: &'a MultipartField,
}

impl<'a> MultipartFieldFragment<'a> {
  pub(crate) fn new(body: &'a syn::Ident, field: &'a MultipartField) -> Self {
    Self { body, field }
  }
}

impl ToTokens for MultipartFieldFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let body = self.body;
    let ident = format_ident!("{}", self.field.ident);
    let name = self.field.wire_name.as_str();

    let ts = if self.field.nullable {
      let part = part_statement(name, self.field.encoding, &quote! { value });
      quote! {
        if let Some(value) = #body.#ident {
          #part
        }
      }
    } else {
      part_statement(name, self.field.encoding, &quote! { #body.#ident })
    };

    tokens.extend(ts);
  }
}

/// One text part per top-level member of an untyped body.
#[derive(Clone, Debug)]
pub(crate) struct MultipartFallbackFragment<'a> {
  body: &'a syn::Ident,
}

impl<'a> MultipartFallbackFragment<'a> {
  pub(crate) fn new(body: &'a syn::Ident) -> Self {
    Self { body }
  }
}

impl ToTokens for MultipartFallbackFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let body = self.body;

    tokens.extend(quote! {
      if let serde_json::Value::Object(map) = #body {
        for (key, value) in map {
          if let Some(part) = oas_client_gen_support::json_value_text(value)? {
            form = form.text(key, part);
          }
        }
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct MultipartFormFragment<'a> {
  body: syn::Ident,
  multipart: &'a MultipartBody,
  optional: bool,
}

impl<'a> MultipartFormFragment<'a> {
  pub(crate) fn new(param: &ParameterDef, multipart: &'a MultipartBody) -> Self {
    Self {
      body: param_ident(param),
      multipart,
      optional: !param.required,
    }
  }

  fn inner_logic(&self) -> TokenStream {
    let body = &self.body;
    let value = body.to_token_stream();

    match self.multipart {
      MultipartBody::File { part_name } => part_statement(part_name, PartEncoding::File, &value),
      MultipartBody::Files { part_name } => part_statement(part_name, PartEncoding::Files, &value),
      MultipartBody::Single { part_name, encoding } => part_statement(part_name, *encoding, &value),
      MultipartBody::Untyped => MultipartFallbackFragment::new(body).into_token_stream(),
      MultipartBody::Fields(fields) => {
        let parts = fields.iter().map(|field| MultipartFieldFragment::new(body, field));
        quote! { #(#parts)* }
      }
    }
  }
}

impl ToTokens for MultipartFormFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let body = &self.body;
    let logic = self.inner_logic();
    let form = if logic.is_empty() {
      quote! { let form = reqwest::multipart::Form::new(); }
    } else {
      quote! { let mut form = reqwest::multipart::Form::new(); }
    };

    let ts = if self.optional {
      quote! {
        if let Some(#body) = #body {
          #form
          #logic
          request = request.multipart(form);
        }
      }
    } else {
      quote! {
        #form
        #logic
        request = request.multipart(form);
      }
    };

    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) enum RequestBodyFragment<'a> {
  None,
  Json { body: syn::Ident, optional: bool },
  Empty { body: syn::Ident },
  Multipart(MultipartFormFragment<'a>),
}

impl<'a> RequestBodyFragment<'a> {
  pub(crate) fn new(op: &'a OperationDef) -> Self {
    let (Some(def), Some(param)) = (op.body.as_ref(), op.body_parameter()) else {
      return Self::None;
    };

    match &def.encoding {
      BodyEncoding::Json => Self::Json {
        body: param_ident(param),
        optional: !param.required,
      },
      BodyEncoding::Empty => Self::Empty {
        body: param_ident(param),
      },
      BodyEncoding::Multipart(multipart) => Self::Multipart(MultipartFormFragment::new(param, multipart)),
    }
  }

  pub(crate) fn is_none(&self) -> bool {
    matches!(self, Self::None)
  }
}

impl ToTokens for RequestBodyFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    match self {
      Self::None => {}
      Self::Json { body, optional: true } => tokens.extend(quote! {
        if let Some(#body) = &#body {
          request = request.json(#body);
        }
      }),
      Self::Json { body, optional: false } => tokens.extend(quote! {
        request = request.json(&#body);
      }),
      Self::Empty { body } => tokens.extend(quote! {
        let _ = #body;
        request = request.body(Vec::<u8>::new());
      }),
      Self::Multipart(fragment) => fragment.to_tokens(tokens),
    }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ResponseParsingFragment<'a> {
  kind: &'a ResponseKind,
}

impl<'a> ResponseParsingFragment<'a> {
  pub(crate) fn new(kind: &'a ResponseKind) -> Self {
    Self { kind }
  }

  pub(crate) fn success_type(&self) -> TokenStream {
    match self.kind {
      ResponseKind::Nothing => quote! { () },
      ResponseKind::Json(type_ref) => quote! { #type_ref },
      ResponseKind::Stream => quote! { oas_client_gen_support::ByteStream },
    }
  }

  pub(crate) fn parse_body(&self) -> TokenStream {
    match self.kind {
      ResponseKind::Nothing => quote! {
        drop(response);
        Ok(())
      },
      ResponseKind::Json(type_ref) => quote! { oas_client_gen_support::decode_json::<#type_ref>(response).await },
      ResponseKind::Stream => quote! { Ok(oas_client_gen_support::ByteStream::from_response(response)) },
    }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientMethodFragment<'a> {
  op: &'a OperationDef,
  api_key: Option<&'a ApiKeyDef>,
  visibility: Visibility,
}

impl<'a> ClientMethodFragment<'a> {
  pub(crate) fn new(op: &'a OperationDef, api_key: Option<&'a ApiKeyDef>, visibility: Visibility) -> Self {
    Self { op, api_key, visibility }
  }
}

impl ToTokens for ClientMethodFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let method_name = format_ident!("{}", self.op.ident);
    let docs = &self.op.docs;
    let vis = self.visibility.to_tokens();

    let args = self.op.parameters.iter().map(|param| {
      let ident = param_ident(param);
      let ty = &param.rust_type;
      quote! { #ident: #ty }
    });

    let url_construction = UrlConstructionFragment::new(self.op);
    let http_init = HttpInitFragment::new(self.op.method.clone());
    let api_key_header = ApiKeyHeaderFragment::new(self.api_key);
    let headers: Vec<_> = self
      .op
      .parameters_of(ParameterKind::Header)
      .map(HeaderParamFragment::new)
      .collect();
    let query = QueryParamsFragment::new(self.op, self.api_key);
    let body = RequestBodyFragment::new(self.op);
    let response = ResponseParsingFragment::new(&self.op.response);

    let needs_mut = self.api_key.is_some() || !headers.is_empty() || !query.is_empty() || !body.is_none();
    let request_binding = if needs_mut {
      quote! { let mut request }
    } else {
      quote! { let request }
    };

    let return_type = response.success_type();
    let parse_block = response.parse_body();

    tokens.extend(quote! {
      #docs
      #vis async fn #method_name(&self #(, #args)*) -> Result<#return_type, oas_client_gen_support::ApiError> {
        #url_construction
        #request_binding = #http_init;
        #api_key_header
        #(#headers)*
        #query
        #body
        let response = request.send().await?;
        let response = oas_client_gen_support::error_for_status(response).await?;
        #parse_block
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientOptionsFragment<'a> {
  def: &'a ClientDef,
  visibility: Visibility,
}

impl<'a> ClientOptionsFragment<'a> {
  pub(crate) fn new(def: &'a ClientDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }
}

impl ToTokens for ClientOptionsFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.to_tokens();
    let client = format_ident!("{}", self.def.name);
    let options = format_ident!("{}", self.def.options_name);
    let has_key = self.def.api_key.is_some();

    let api_key_field = has_key.then(|| {
      quote! {
        /// Key attached to every request when set.
        #vis api_key: Option<String>,
      }
    });
    let api_key_default = has_key.then(|| quote! { api_key: None, });

    tokens.extend(quote! {
      /// Settings for constructing the client.
      #[derive(Debug, Clone)]
      #vis struct #options {
        /// URL every request path is appended to.
        #vis base_url: String,
        #api_key_field
        /// Preconfigured HTTP client; a default one is built when absent.
        #vis http_client: Option<reqwest::Client>,
      }

      impl Default for #options {
        fn default() -> Self {
          Self {
            base_url: #client::DEFAULT_BASE_URL.to_string(),
            #api_key_default
            http_client: None,
          }
        }
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientStructFragment<'a> {
  def: &'a ClientDef,
  visibility: Visibility,
}

impl<'a> ClientStructFragment<'a> {
  pub(crate) fn new(def: &'a ClientDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }
}

impl ToTokens for ClientStructFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.def.name);
    let docs = &self.def.docs;
    let vis = self.visibility.to_tokens();
    let api_key_field = self.def.api_key.is_some().then(|| quote! { api_key: Option<String>, });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone)]
      #vis struct #name {
        http_client: reqwest::Client,
        base_url: String,
        #api_key_field
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientConstructorsFragment<'a> {
  def: &'a ClientDef,
  visibility: Visibility,
}

impl<'a> ClientConstructorsFragment<'a> {
  pub(crate) fn new(def: &'a ClientDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }
}

impl ToTokens for ClientConstructorsFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.to_tokens();
    let options = format_ident!("{}", self.def.options_name);
    let base_url = LitStr::new(
      self.def.base_url.as_deref().unwrap_or(FALLBACK_BASE_URL),
      Span::call_site(),
    );
    let api_key_init = self.def.api_key.is_some().then(|| quote! { api_key: options.api_key, });

    tokens.extend(quote! {
      /// The first server URL declared by the document.
      #vis const DEFAULT_BASE_URL: &'static str = #base_url;

      #[must_use]
      #vis fn new(options: #options) -> Self {
        Self {
          http_client: options.http_client.unwrap_or_default(),
          base_url: options.base_url.trim_end_matches('/').to_string(),
          #api_key_init
        }
      }

      /// Create a client for a custom base URL with default settings otherwise.
      #[must_use]
      #vis fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(#options {
          base_url: base_url.into(),
          ..#options::default()
        })
      }

      #[must_use]
      #vis fn base_url(&self) -> &str {
        &self.base_url
      }
    });
  }
}

/// The whole `client.rs`: options, client type and one method per operation.
#[derive(Clone, Debug)]
pub struct ClientFragment<'a> {
  def: &'a ClientDef,
  visibility: Visibility,
}

impl<'a> ClientFragment<'a> {
  pub fn new(def: &'a ClientDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }
}

impl ToTokens for ClientFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let client_ident = format_ident!("{}", self.def.name);
    let options = ClientOptionsFragment::new(self.def, self.visibility);
    let client_struct = ClientStructFragment::new(self.def, self.visibility);
    let constructors = ClientConstructorsFragment::new(self.def, self.visibility);
    let methods = self
      .def
      .operations
      .iter()
      .map(|op| ClientMethodFragment::new(op, self.def.api_key.as_ref(), self.visibility));

    quote! {
      #[allow(unused_imports)]
      use super::models::*;

      #options

      #client_struct

      impl Default for #client_ident {
        fn default() -> Self {
          Self::new(Default::default())
        }
      }

      impl #client_ident {
        #constructors
        #(#methods)*
      }
    }
    .to_tokens(tokens);
  }
}
