//! Token emission for models and the client, plus the formatter used on the result.

use anyhow::Context;
use proc_macro2::TokenStream;
use quote::quote;

pub mod client;
pub mod mod_file;
pub mod models;

#[cfg(test)]
mod tests;

/// Visibility of every emitted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
  #[default]
  Public,
  Crate,
}

impl Visibility {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "public" => Some(Visibility::Public),
      "crate" => Some(Visibility::Crate),
      _ => None,
    }
  }

  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
    }
  }
}

/// Parses the tokens as a file and pretty-prints them.
pub(crate) fn format_tokens(tokens: &TokenStream) -> anyhow::Result<String> {
  let file: syn::File = syn::parse2(tokens.clone()).context("parsing generated tokens")?;
  Ok(prettyplease::unparse(&file))
}
