use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};

use crate::generator::{
  error::RenderError,
  model::{FieldKind, ScalarKind, TypeRef},
  type_graph::{CycleIndex, TypeGraph},
};

/// Parses an already-canonicalized name into an identifier.
pub(crate) fn parse_ident(entity: &str, name: &str) -> Result<Ident, RenderError> {
  syn::parse_str::<Ident>(name).map_err(|err| RenderError::new(entity, format!("`{name}` is not an identifier: {err}")))
}

impl ToTokens for ScalarKind {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self {
      Self::Int64 => quote! { i64 },
      Self::Int32 => quote! { i32 },
      Self::Double => quote! { f64 },
      Self::Float => quote! { f32 },
      Self::Date => quote! { chrono::NaiveDate },
      Self::DateTime => quote! { chrono::DateTime<chrono::Utc> },
      Self::Boolean => quote! { bool },
      Self::String => quote! { String },
    };
    tokens.extend(ts);
  }
}

/// Turns field kinds and payload references into Rust types against the
/// emitted graph.
///
/// References to names the graph does not contain (external or dangling
/// `$ref`s) degrade to `serde_json::Value`.
pub(crate) struct TypeRenderer<'a> {
  graph: &'a TypeGraph,
  cycles: CycleIndex,
}

impl<'a> TypeRenderer<'a> {
  pub(crate) fn new(graph: &'a TypeGraph, cycles: &[Vec<String>]) -> Self {
    Self {
      graph,
      cycles: CycleIndex::new(cycles),
    }
  }

  pub(crate) fn is_known(&self, name: &str) -> bool {
    self.graph.contains(name)
  }

  /// Type of a field owned by `owner`. A direct reference back into the
  /// owner's cycle is boxed; collections already add the indirection.
  pub(crate) fn field_type(&self, owner: &str, kind: &FieldKind) -> Result<TokenStream, RenderError> {
    match kind {
      FieldKind::Reference(target) if self.is_known(target) && self.cycles.is_recursive(owner, target) => {
        let ident = parse_ident(owner, target)?;
        Ok(quote! { Box<#ident> })
      }
      _ => self.kind_type(owner, kind),
    }
  }

  fn kind_type(&self, entity: &str, kind: &FieldKind) -> Result<TokenStream, RenderError> {
    let ts = match kind {
      FieldKind::Scalar(scalar) => scalar.to_token_stream(),
      FieldKind::Reference(name) if self.is_known(name) => parse_ident(entity, name)?.to_token_stream(),
      FieldKind::Array(inner) => {
        let inner = self.kind_type(entity, inner)?;
        quote! { Vec<#inner> }
      }
      FieldKind::Reference(_) | FieldKind::Any => quote! { serde_json::Value },
    };
    Ok(ts)
  }

  /// Type of a request or response payload.
  pub(crate) fn payload_type(&self, entity: &str, ty: &TypeRef) -> Result<TokenStream, RenderError> {
    let ts = match ty {
      TypeRef::Named(name) if self.is_known(name) => parse_ident(entity, name)?.to_token_stream(),
      TypeRef::Sequence(inner) => {
        let inner = self.payload_type(entity, inner)?;
        quote! { Vec<#inner> }
      }
      TypeRef::Scalar(scalar) => scalar.to_token_stream(),
      TypeRef::Named(_) | TypeRef::Any => quote! { serde_json::Value },
    };
    Ok(ts)
  }
}
