use std::fmt::{Display, Formatter};

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::Ident;

/// Scalar and library types a schema can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RustPrimitive {
  #[strum(serialize = "i32")]
  I32,
  #[strum(serialize = "i64")]
  I64,
  #[strum(serialize = "f32")]
  F32,
  #[strum(serialize = "f64")]
  F64,
  #[strum(serialize = "bool")]
  Bool,
  #[strum(serialize = "String")]
  String,
  #[strum(serialize = "Vec<u8>")]
  Bytes,
  #[strum(serialize = "oas_client_gen_support::ByteStream")]
  ByteStream,
  #[strum(serialize = "chrono::DateTime<chrono::Utc>")]
  DateTime,
  #[strum(serialize = "serde_json::Value")]
  Value,
}

impl RustPrimitive {
  #[must_use]
  pub fn is_numeric(self) -> bool {
    matches!(self, Self::I32 | Self::I64 | Self::F32 | Self::F64)
  }
}

impl ToTokens for RustPrimitive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self {
      Self::I32 => quote! { i32 },
      Self::I64 => quote! { i64 },
      Self::F32 => quote! { f32 },
      Self::F64 => quote! { f64 },
      Self::Bool => quote! { bool },
      Self::String => quote! { String },
      Self::Bytes => quote! { Vec<u8> },
      Self::ByteStream => quote! { oas_client_gen_support::ByteStream },
      Self::DateTime => quote! { chrono::DateTime<chrono::Utc> },
      Self::Value => quote! { serde_json::Value },
    };
    tokens.extend(ts);
  }
}

/// Name of the record synthesized for the upload sentinel schema.
pub const FORM_FILE_TYPE: &str = "FormFile";

/// Outcome of resolving a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
  Primitive(RustPrimitive),
  /// A type registered for a named schema.
  Named(String),
  /// A single uploaded file.
  FormFile,
  /// Repeated uploaded files; counts as a sequence.
  FormFileArray,
  Sequence(Box<TypeRef>),
  Nullable(Box<TypeRef>),
  /// Heap indirection for a record that contains itself.
  Boxed(Box<TypeRef>),
}

impl TypeRef {
  #[must_use]
  pub fn untyped() -> Self {
    Self::Primitive(RustPrimitive::Value)
  }

  #[must_use]
  pub fn named(name: impl Into<String>) -> Self {
    Self::Named(name.into())
  }

  #[must_use]
  pub fn sequence_of(item: TypeRef) -> Self {
    Self::Sequence(Box::new(item))
  }

  #[must_use]
  pub fn is_text(&self) -> bool {
    matches!(self, Self::Primitive(RustPrimitive::String))
  }

  #[must_use]
  pub fn is_sequence(&self) -> bool {
    matches!(self, Self::Sequence(_) | Self::FormFileArray)
  }

  #[must_use]
  pub fn is_nullable(&self) -> bool {
    matches!(self, Self::Nullable(_))
  }

  /// Whether the type is or contains a value that cannot go through serde.
  #[must_use]
  pub fn is_streaming(&self) -> bool {
    match self {
      Self::Primitive(primitive) => *primitive == RustPrimitive::ByteStream,
      Self::FormFile | Self::FormFileArray => true,
      Self::Named(_) => false,
      Self::Sequence(inner) | Self::Nullable(inner) | Self::Boxed(inner) => inner.is_streaming(),
    }
  }

  #[must_use]
  pub fn mentions_form_file(&self) -> bool {
    match self {
      Self::FormFile | Self::FormFileArray => true,
      Self::Primitive(_) | Self::Named(_) => false,
      Self::Sequence(inner) | Self::Nullable(inner) | Self::Boxed(inner) => inner.mentions_form_file(),
    }
  }

  /// The named schema type this resolves to, looking through `Vec`, `Option` and `Box`.
  #[must_use]
  pub fn referenced_name(&self) -> Option<&str> {
    match self {
      Self::Named(name) => Some(name.as_str()),
      Self::Sequence(inner) | Self::Nullable(inner) | Self::Boxed(inner) => inner.referenced_name(),
      Self::Primitive(_) | Self::FormFile | Self::FormFileArray => None,
    }
  }

  /// The named type stored inline in the containing value.
  ///
  /// `Vec` already allocates, so sequences never count.
  #[must_use]
  pub fn inline_name(&self) -> Option<&str> {
    match self {
      Self::Named(name) => Some(name.as_str()),
      Self::Nullable(inner) | Self::Boxed(inner) => inner.inline_name(),
      Self::Primitive(_) | Self::FormFile | Self::FormFileArray | Self::Sequence(_) => None,
    }
  }

  /// Boxes the value inside any outer `Option`: `Option<T>` becomes `Option<Box<T>>`.
  #[must_use]
  pub fn with_boxed(self) -> TypeRef {
    match self {
      Self::Nullable(inner) => Self::Nullable(Box::new(inner.with_boxed())),
      Self::Boxed(_) => self,
      other => Self::Boxed(Box::new(other)),
    }
  }

  /// The type without its outer `Option`.
  #[must_use]
  pub fn base(&self) -> &TypeRef {
    match self {
      Self::Nullable(inner) => inner.as_ref(),
      other => other,
    }
  }

  /// Wraps in `Option` unless the type is text, a sequence, or already optional.
  #[must_use]
  pub fn with_nullability_policy(self) -> TypeRef {
    if self.is_text() || self.is_sequence() || self.is_nullable() {
      self
    } else {
      Self::Nullable(Box::new(self))
    }
  }

  /// Wraps in `Option` unless already optional.
  #[must_use]
  pub fn with_option(self) -> TypeRef {
    if self.is_nullable() {
      self
    } else {
      Self::Nullable(Box::new(self))
    }
  }

  #[must_use]
  pub fn to_rust_type(&self) -> String {
    self.to_string()
  }
}

impl From<RustPrimitive> for TypeRef {
  fn from(primitive: RustPrimitive) -> Self {
    Self::Primitive(primitive)
  }
}

impl Display for TypeRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Primitive(primitive) => write!(f, "{primitive}"),
      Self::Named(name) => write!(f, "{name}"),
      Self::FormFile => write!(f, "{FORM_FILE_TYPE}"),
      Self::FormFileArray => write!(f, "Vec<{FORM_FILE_TYPE}>"),
      Self::Sequence(inner) => write!(f, "Vec<{inner}>"),
      Self::Nullable(inner) => write!(f, "Option<{inner}>"),
      Self::Boxed(inner) => write!(f, "Box<{inner}>"),
    }
  }
}

impl ToTokens for TypeRef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self {
      Self::Primitive(primitive) => quote! { #primitive },
      Self::Named(name) => {
        let ident = Ident::new(name, Span::call_site());
        quote! { #ident }
      }
      Self::FormFile => {
        let ident = Ident::new(FORM_FILE_TYPE, Span::call_site());
        quote! { #ident }
      }
      Self::FormFileArray => {
        let ident = Ident::new(FORM_FILE_TYPE, Span::call_site());
        quote! { Vec<#ident> }
      }
      Self::Sequence(inner) => quote! { Vec<#inner> },
      Self::Nullable(inner) => quote! { Option<#inner> },
      Self::Boxed(inner) => quote! { Box<#inner> },
    };
    tokens.extend(ts);
  }
}
