use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Doc comment lines attached to a generated item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  #[must_use]
  pub fn from_raw(input: &str) -> Self {
    let text = input.replace("\\n", "\n");
    Self {
      lines: text.trim().lines().map(|line| line.trim_end().to_string()).collect(),
    }
  }

  #[must_use]
  pub fn from_optional(desc: Option<&str>) -> Self {
    desc.map_or_else(Self::default, Self::from_raw)
  }

  #[must_use]
  pub fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      lines: lines.into_iter().map(Into::into).collect(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let doc_lines = self.lines.iter().map(|line| {
      let line = if line.is_empty() { String::new() } else { format!(" {line}") };
      quote! { #[doc = #line] }
    });
    quote! { #(#doc_lines)* }.to_tokens(tokens);
  }
}
