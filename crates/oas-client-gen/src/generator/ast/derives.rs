use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

#[derive(Debug, Clone, Copy, strum::Display, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeriveTrait {
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  #[strum(serialize = "serde::Serialize")]
  Serialize,
  #[strum(serialize = "serde::Deserialize")]
  Deserialize,
}

impl ToTokens for DeriveTrait {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self {
      Self::Debug => quote! { Debug },
      Self::Clone => quote! { Clone },
      Self::Copy => quote! { Copy },
      Self::PartialEq => quote! { PartialEq },
      Self::Eq => quote! { Eq },
      Self::Hash => quote! { Hash },
      Self::Default => quote! { Default },
      Self::Serialize => quote! { serde::Serialize },
      Self::Deserialize => quote! { serde::Deserialize },
    };
    tokens.extend(ts);
  }
}

/// Derives for a record; records holding streams or uploads cannot be cloned or serialized.
pub fn record_derives(streaming: bool) -> BTreeSet<DeriveTrait> {
  if streaming {
    return [DeriveTrait::Debug, DeriveTrait::Default].into_iter().collect();
  }

  [
    DeriveTrait::Debug,
    DeriveTrait::Clone,
    DeriveTrait::PartialEq,
    DeriveTrait::Default,
    DeriveTrait::Serialize,
    DeriveTrait::Deserialize,
  ]
  .into_iter()
  .collect()
}

/// Derives for an integer enumeration; serde is implemented by hand through `i64`.
pub fn enum_derives() -> BTreeSet<DeriveTrait> {
  [
    DeriveTrait::Debug,
    DeriveTrait::Clone,
    DeriveTrait::Copy,
    DeriveTrait::PartialEq,
    DeriveTrait::Eq,
    DeriveTrait::Hash,
    DeriveTrait::Default,
  ]
  .into_iter()
  .collect()
}
