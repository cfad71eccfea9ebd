//! Orchestration for the OpenAPI to Rust client pipeline.
//!
//! The [`Orchestrator`] owns the parsed document and the template set and
//! runs resolve, extract, prune, render, format and write in that order.
//! The CLI builds one from a [`SpecLoader`](crate::utils::spec::SpecLoader)
//! result and [`TemplateSet::builtin`], then calls [`Orchestrator::generate`]
//! with the output directory.

use std::path::{Path, PathBuf};

use super::{
  endpoints::EndpointExtractor,
  error::GenerateError,
  model::Endpoint,
  output::OutputFormatter,
  resolver::ModelResolver,
  templates::{TemplateInput, TemplateSet},
  type_graph::TypeGraph,
};

/// High-level driver of one generation run.
pub struct Orchestrator {
  spec: oas3::Spec,
  templates: TemplateSet,
}

/// The resolved model of a document, before any rendering.
#[derive(Debug, Clone)]
pub struct PreparedModel {
  /// Endpoints sorted by name, then route, then verb.
  pub endpoints: Vec<Endpoint>,
  /// Types reachable from the endpoints.
  pub types: TypeGraph,
  /// Number of types resolved before pruning.
  pub types_resolved: usize,
  /// Mutually recursive groups among the emitted types.
  pub cycles: Vec<Vec<String>>,
}

/// Statistics about the code generation process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
  /// Number of types emitted
  pub types_generated: usize,
  /// Number of endpoints turned into client methods
  pub endpoints_extracted: usize,
  /// Number of resolved types dropped because no endpoint reaches them
  pub types_pruned: usize,
  /// Number of recursive type groups
  pub cycles_detected: usize,
  /// Members of every recursive group (for verbose logging)
  pub cycle_details: Vec<Vec<String>>,
  /// Paths written, in template order
  pub artifacts: Vec<PathBuf>,
}

impl Orchestrator {
  pub fn new(spec: oas3::Spec, templates: TemplateSet) -> Self {
    Self { spec, templates }
  }

  /// The first declared server URL, which becomes the client's default base URL.
  pub fn server_url(&self) -> Result<&str, GenerateError> {
    self
      .spec
      .servers
      .first()
      .map(|server| server.url.trim())
      .filter(|url| !url.is_empty())
      .ok_or(GenerateError::MissingServerUrl)
  }

  /// Resolves types, extracts endpoints and prunes the graph to what the
  /// endpoints reach.
  pub fn prepare(&self) -> Result<PreparedModel, GenerateError> {
    let mut graph = ModelResolver::new(&self.spec).resolve()?;
    let endpoints = EndpointExtractor::new(&self.spec).extract(&mut graph)?;

    let types = graph.reachable_from(endpoints.iter().flat_map(Endpoint::type_roots));
    let cycles = types.cycles();

    Ok(PreparedModel {
      endpoints,
      types_resolved: graph.len(),
      types,
      cycles,
    })
  }

  /// Renders and formats every template without touching the filesystem.
  #[cfg(test)]
  pub fn render_all(&self) -> Result<Vec<super::output::Artifact>, GenerateError> {
    let server_url = self.server_url()?;
    let model = self.prepare()?;
    let input = self.template_input(server_url, &model);

    self
      .templates
      .iter()
      .map(|template| OutputFormatter::format(template.name(), template.render(&input)?))
      .collect()
  }

  /// Runs the whole pipeline and writes one artifact per template into
  /// `output_dir`.
  ///
  /// The server URL is checked before anything is rendered. Each artifact is
  /// written as soon as it is formatted; a later failure leaves earlier
  /// artifacts on disk.
  pub fn generate(&self, output_dir: &Path) -> Result<GenerationStats, GenerateError> {
    let server_url = self.server_url()?;
    let model = self.prepare()?;
    let input = self.template_input(server_url, &model);

    let mut artifacts = Vec::new();
    for template in self.templates.iter() {
      let artifact = OutputFormatter::format(template.name(), template.render(&input)?)?;
      artifacts.push(OutputFormatter::write(output_dir, &artifact)?);
    }

    Ok(GenerationStats {
      types_generated: model.types.len(),
      endpoints_extracted: model.endpoints.len(),
      types_pruned: model.types_resolved - model.types.len(),
      cycles_detected: model.cycles.len(),
      cycle_details: model.cycles.clone(),
      artifacts,
    })
  }

  fn template_input<'a>(&'a self, server_url: &'a str, model: &'a PreparedModel) -> TemplateInput<'a> {
    TemplateInput {
      title: &self.spec.info.title,
      version: &self.spec.info.version,
      description: self.spec.info.description.as_deref(),
      server_url,
      endpoints: &model.endpoints,
      types: &model.types,
      cycles: &model.cycles,
    }
  }
}
