//! Expression trees for the generated Rust client.
//!
//! Every piece of generated code is a `ToTokens` fragment; nothing here
//! concatenates source text.

use proc_macro2::TokenStream;
use quote::quote;

use self::{
  client::{ApiTraitFragment, ClientImplFragment, ClientMethodFragment, ClientStructFragment},
  structs::StructGenerator,
  types::TypeRenderer,
};
use super::{error::RenderError, model::Endpoint, type_graph::TypeGraph};

pub(crate) mod client;
pub(crate) mod documentation;
pub(crate) mod route;
pub(crate) mod structs;
pub(crate) mod types;

#[cfg(test)]
mod tests;

/// Every type of `graph`, in name order.
pub(crate) fn generate_types(graph: &TypeGraph, cycles: &[Vec<String>]) -> Result<TokenStream, RenderError> {
  let renderer = TypeRenderer::new(graph, cycles);
  let generator = StructGenerator::new(&renderer);

  let items = graph
    .iter()
    .map(|named| generator.generate(named))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(quote! { #(#items)* })
}

/// The `Client` struct, the `Api` trait and its implementation.
pub(crate) fn generate_client(
  endpoints: &[Endpoint],
  graph: &TypeGraph,
  cycles: &[Vec<String>],
  base_url: &str,
) -> Result<TokenStream, RenderError> {
  let renderer = TypeRenderer::new(graph, cycles);
  let methods = endpoints
    .iter()
    .map(|endpoint| ClientMethodFragment::new(endpoint, &renderer))
    .collect::<Result<Vec<_>, _>>()?;

  let client = ClientStructFragment::new(base_url);
  let api = ApiTraitFragment::new(&methods);
  let implementation = ClientImplFragment::new(&methods);

  Ok(quote! {
    #client
    #api
    #implementation
  })
}
