use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Doc comment lines attached to a generated item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  #[must_use]
  pub(crate) fn from_raw(input: &str) -> Self {
    Self {
      lines: input.replace("\\n", "\n").trim_end().lines().map(str::to_string).collect(),
    }
  }

  #[must_use]
  pub(crate) fn from_optional(desc: Option<&str>) -> Self {
    desc.map_or_else(Self::default, Self::from_raw)
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Appends a paragraph, separated from existing text by a blank line.
  pub(crate) fn paragraph(&mut self, text: &str) {
    let incoming = Self::from_raw(text);
    if incoming.is_empty() {
      return;
    }
    if !self.lines.is_empty() {
      self.lines.push(String::new());
    }
    self.lines.extend(incoming.lines);
  }

  fn padded_lines(&self) -> impl Iterator<Item = String> {
    self
      .lines
      .iter()
      .map(|line| if line.is_empty() { String::new() } else { format!(" {line}") })
  }

  /// Renders the lines as `#![doc]` attributes for a module header.
  pub(crate) fn to_inner_tokens(&self) -> TokenStream {
    let doc_lines = self.padded_lines();
    quote! { #(#![doc = #doc_lines])* }
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let doc_lines = self.padded_lines();
    tokens.extend(quote! { #(#[doc = #doc_lines])* });
  }
}
