pub(crate) mod codegen;
pub(crate) mod endpoints;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod output;
pub(crate) mod resolver;
pub mod templates;
pub mod type_graph;

#[cfg(test)]
mod tests;
