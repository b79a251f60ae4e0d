use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::Visibility;

/// A generated model module: its file stem and the type it defines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ModelModule {
  pub stem: String,
  pub type_name: String,
}

/// `models/mod.rs`: one module and one re-export per model.
#[derive(Clone, Debug)]
pub(crate) struct ModelsModFragment<'a> {
  modules: &'a [ModelModule],
  visibility: Visibility,
}

impl<'a> ModelsModFragment<'a> {
  pub(crate) fn new(modules: &'a [ModelModule], visibility: Visibility) -> Self {
    Self { modules, visibility }
  }
}

impl ToTokens for ModelsModFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.to_tokens();
    let declarations = self.modules.iter().map(|module| {
      let stem = format_ident!("{}", module.stem);
      let type_name = format_ident!("{}", module.type_name);
      quote! {
        mod #stem;
        #vis use #stem::#type_name;
      }
    });

    tokens.extend(quote! { #(#declarations)* });
  }
}

/// The output root `mod.rs`.
#[derive(Clone, Debug)]
pub(crate) struct RootModFragment<'a> {
  client_name: &'a str,
  options_name: &'a str,
  visibility: Visibility,
}

impl<'a> RootModFragment<'a> {
  pub(crate) fn new(client_name: &'a str, options_name: &'a str, visibility: Visibility) -> Self {
    Self {
      client_name,
      options_name,
      visibility,
    }
  }
}

impl ToTokens for RootModFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.to_tokens();
    let client = format_ident!("{}", self.client_name);
    let options = format_ident!("{}", self.options_name);

    tokens.extend(quote! {
      #vis mod client;
      #vis mod models;

      #vis use client::{#client, #options};
    });
  }
}
