use std::collections::BTreeSet;

use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, format_ident, quote};

use super::Visibility;
use crate::generator::ast::{DeriveTrait, EnumDef, FieldDef, ModelDef, RecordDef};

/// One model file's items.
#[derive(Clone, Debug)]
pub(crate) struct ModelFragment<'a> {
  model: &'a ModelDef,
  visibility: Visibility,
}

impl<'a> ModelFragment<'a> {
  pub(crate) fn new(model: &'a ModelDef, visibility: Visibility) -> Self {
    Self { model, visibility }
  }
}

impl ToTokens for ModelFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let body = match self.model {
      ModelDef::Record(def) => RecordFragment::new(def, self.visibility).into_token_stream(),
      ModelDef::Enum(def) => EnumFragment::new(def, self.visibility).into_token_stream(),
    };

    tokens.extend(quote! {
      #[allow(unused_imports)]
      use super::*;

      #body
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct RecordFragment<'a> {
  def: &'a RecordDef,
  visibility: Visibility,
}

impl<'a> RecordFragment<'a> {
  pub(crate) fn new(def: &'a RecordDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }

  fn field(&self, field: &FieldDef) -> TokenStream {
    let ident = format_ident!("{}", field.ident);
    let ty = &field.rust_type;
    let docs = &field.docs;
    let vis = self.visibility.to_tokens();

    let rename = (self.def.is_serializable() && field.needs_rename()).then(|| {
      let wire_name = field.wire_name.as_str();
      quote! { #[serde(rename = #wire_name)] }
    });
    let skip_none = (self.def.is_serializable() && field.rust_type.is_nullable())
      .then(|| quote! { #[serde(skip_serializing_if = "Option::is_none")] });

    quote! {
      #docs
      #rename
      #skip_none
      #vis #ident: #ty
    }
  }
}

impl ToTokens for RecordFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.def.name);
    let docs = &self.def.docs;
    let vis = self.visibility.to_tokens();
    let derives = self.def.derives.iter();
    let container_attrs = self.def.is_serializable().then(|| quote! { #[serde(default)] });
    let fields = self.def.fields.iter().map(|field| self.field(field));

    tokens.extend(quote! {
      #docs
      #[derive(#(#derives),*)]
      #container_attrs
      #vis struct #name {
        #(#fields),*
      }
    });
  }
}

/// Integer enumeration serialized through `i64`.
///
/// Members get explicit discriminants unless two of them share a value; then the
/// value mapping lives only in the serde impls and decoding picks the first member.
#[derive(Clone, Debug)]
pub(crate) struct EnumFragment<'a> {
  def: &'a EnumDef,
  visibility: Visibility,
}

impl<'a> EnumFragment<'a> {
  pub(crate) fn new(def: &'a EnumDef, visibility: Visibility) -> Self {
    Self { def, visibility }
  }

  fn serde_impls(&self, aliased: bool) -> TokenStream {
    let name = format_ident!("{}", self.def.name);
    let unknown = format!("unknown {} value {{other}}", self.def.name);

    let mut decoded = BTreeSet::new();
    let arms = self
      .def
      .members
      .iter()
      .filter(|member| decoded.insert(member.value))
      .map(|member| {
        let member_ident = format_ident!("{}", member.name);
        let value = int_literal(member.value);
        quote! { #value => Ok(Self::#member_ident), }
      })
      .collect::<Vec<_>>();

    let to_value = if aliased {
      let value_arms = self.def.members.iter().map(|member| {
        let member_ident = format_ident!("{}", member.name);
        let value = int_literal(member.value);
        quote! { Self::#member_ident => #value, }
      });
      quote! {
        let value: i64 = match self {
          #(#value_arms)*
        };
        serializer.serialize_i64(value)
      }
    } else {
      quote! { serializer.serialize_i64(*self as i64) }
    };

    quote! {
      impl serde::Serialize for #name {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
          #to_value
        }
      }

      impl<'de> serde::Deserialize<'de> for #name {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
          let value = <i64 as serde::Deserialize>::deserialize(deserializer)?;
          match value {
            #(#arms)*
            other => Err(serde::de::Error::custom(format!(#unknown))),
          }
        }
      }
    }
  }
}

impl ToTokens for EnumFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.def.name);
    let docs = &self.def.docs;
    let vis = self.visibility.to_tokens();
    let derives = self.def.derives.iter();
    let has_default = self.def.derives.contains(&DeriveTrait::Default);
    let aliased = self.def.has_aliased_values();

    let members = self.def.members.iter().enumerate().map(|(index, member)| {
      let member_ident = format_ident!("{}", member.name);
      let default_attr = (index == 0 && has_default).then(|| quote! { #[default] });
      let discriminant = (!aliased).then(|| {
        let value = int_literal(member.value);
        quote! { = #value }
      });
      quote! {
        #default_attr
        #member_ident #discriminant
      }
    });
    let repr = (!aliased).then(|| quote! { #[repr(i64)] });
    let serde_impls = self.serde_impls(aliased);

    tokens.extend(quote! {
      #docs
      #[derive(#(#derives),*)]
      #repr
      #vis enum #name {
        #(#members),*
      }

      #serde_impls
    });
  }
}

/// An `i64` literal; negative values become a negated unsigned literal.
fn int_literal(value: i64) -> TokenStream {
  let magnitude = Literal::u64_unsuffixed(value.unsigned_abs());
  if value < 0 {
    quote! { -#magnitude }
  } else {
    quote! { #magnitude }
  }
}
