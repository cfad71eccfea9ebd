//! Templates turn the prepared model into artifact text.
//!
//! A [`TemplateSet`] is built once and handed to the orchestrator; nothing
//! is looked up through global state, so tests can swap in their own sets.

use std::fmt::{Debug, Write as _};

use itertools::Itertools;
use quote::quote;

use super::{
  codegen::{self, documentation::Documentation},
  error::GenerateError,
  model::{Endpoint, FieldKind, FieldSpec, TypeRef},
  type_graph::TypeGraph,
};

pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Everything a template may read. Endpoints are sorted and the type graph
/// is already pruned.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
  pub title: &'a str,
  pub version: &'a str,
  pub description: Option<&'a str>,
  pub server_url: &'a str,
  pub endpoints: &'a [Endpoint],
  pub types: &'a TypeGraph,
  pub cycles: &'a [Vec<String>],
}

impl TemplateInput<'_> {
  fn header(&self) -> Documentation {
    let mut docs = Documentation::from_raw(&format!("{} {}", self.title, self.version));
    if let Some(description) = self.description {
      docs.paragraph(description);
    }
    docs.paragraph("Generated by oas3-client-gen. Do not edit by hand.");
    docs
  }
}

pub trait Template: Debug + Send + Sync {
  /// Template name; the artifact is written under this name minus `.tmpl`.
  fn name(&self) -> &str;

  fn render(&self, input: &TemplateInput<'_>) -> Result<String, GenerateError>;
}

/// Immutable, ordered collection of templates.
#[derive(Debug)]
pub struct TemplateSet {
  templates: Vec<Box<dyn Template>>,
}

impl TemplateSet {
  pub fn new(templates: Vec<Box<dyn Template>>) -> Self {
    Self { templates }
  }

  /// `types.rs`, `client.rs`, `mod.rs` and `README.md`.
  pub fn builtin() -> Self {
    Self::new(vec![
      Box::new(TypesTemplate),
      Box::new(ClientTemplate),
      Box::new(ModTemplate),
      Box::new(ReadmeTemplate),
    ])
  }

  pub fn iter(&self) -> impl Iterator<Item = &dyn Template> {
    self.templates.iter().map(AsRef::as_ref)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct TypesTemplate;

impl Template for TypesTemplate {
  fn name(&self) -> &str {
    "types.rs.tmpl"
  }

  fn render(&self, input: &TemplateInput<'_>) -> Result<String, GenerateError> {
    let header = input.header().to_inner_tokens();
    let types = codegen::generate_types(input.types, input.cycles).map_err(|err| err.in_template(self.name()))?;

    Ok(
      quote! {
        #header
        #![allow(clippy::upper_case_acronyms, unused_imports)]

        use oas3_client_gen_support::{chrono, serde_json};
        use serde::{Deserialize, Serialize};

        #types
      }
      .to_string(),
    )
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ClientTemplate;

impl Template for ClientTemplate {
  fn name(&self) -> &str {
    "client.rs.tmpl"
  }

  fn render(&self, input: &TemplateInput<'_>) -> Result<String, GenerateError> {
    let header = input.header().to_inner_tokens();
    let client = codegen::generate_client(input.endpoints, input.types, input.cycles, input.server_url)
      .map_err(|err| err.in_template(self.name()))?;

    Ok(
      quote! {
        #header
        #![allow(clippy::upper_case_acronyms, unused_imports)]

        use oas3_client_gen_support::{ApiError, Method, RequestHandler, chrono, serde_json};

        use super::types::*;

        #client
      }
      .to_string(),
    )
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ModTemplate;

impl Template for ModTemplate {
  fn name(&self) -> &str {
    "mod.rs.tmpl"
  }

  fn render(&self, input: &TemplateInput<'_>) -> Result<String, GenerateError> {
    let header = input.header().to_inner_tokens();

    Ok(
      quote! {
        #header

        pub mod client;
        pub mod types;

        pub use client::{Api, Client};
        pub use oas3_client_gen_support::ApiError;
        pub use types::*;
      }
      .to_string(),
    )
  }
}

/// Human-readable summary of the generated client, including the query
/// parameters that are not part of the method signatures.
#[derive(Debug, Clone, Copy)]
pub struct ReadmeTemplate;

impl Template for ReadmeTemplate {
  fn name(&self) -> &str {
    "README.md.tmpl"
  }

  fn render(&self, input: &TemplateInput<'_>) -> Result<String, GenerateError> {
    self
      .write_readme(input)
      .map_err(|err| GenerateError::Render {
        template: self.name().to_string(),
        entity: "README".to_string(),
        message: err.to_string(),
      })
  }
}

impl ReadmeTemplate {
  fn write_readme(&self, input: &TemplateInput<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "# {} {}", input.title, input.version)?;
    writeln!(out)?;
    if let Some(description) = input.description {
      writeln!(out, "{}", description.trim_end())?;
      writeln!(out)?;
    }
    writeln!(out, "Default server: `{}`", input.server_url)?;
    writeln!(out)?;

    writeln!(out, "## Endpoints")?;
    writeln!(out)?;
    writeln!(out, "| Method | Verb | Route | Request | Response |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for endpoint in input.endpoints {
      let request = endpoint.request.as_ref().map_or_else(
        || "-".to_string(),
        |body| {
          let ty = type_ref_label(&body.ty);
          if body.required { ty } else { format!("{ty} (optional)") }
        },
      );
      let response = endpoint
        .response
        .as_ref()
        .map_or_else(|| "-".to_string(), |resp| format!("{} `{}`", type_ref_label(&resp.ty), resp.status));
      writeln!(
        out,
        "| `{}` | {} | `{}` | {} | {} |",
        endpoint.name, endpoint.method, endpoint.route, request, response
      )?;
    }

    for endpoint in input.endpoints {
      if endpoint.query_parameters.is_empty() && endpoint.request_example.is_none() && endpoint.response_example.is_none()
      {
        continue;
      }

      writeln!(out)?;
      writeln!(out, "### `{}`", endpoint.name)?;
      if !endpoint.query_parameters.is_empty() {
        writeln!(out)?;
        writeln!(
          out,
          "Query parameters (not part of the method signature): {}",
          endpoint.query_parameters.iter().map(field_label).join(", ")
        )?;
      }
      for (label, example) in [
        ("Request example", &endpoint.request_example),
        ("Response example", &endpoint.response_example),
      ] {
        let Some(example) = example else {
          continue;
        };
        let pretty = serde_json::to_string_pretty(example).map_err(|_| std::fmt::Error)?;
        writeln!(out)?;
        writeln!(out, "{label}:")?;
        writeln!(out)?;
        writeln!(out, "```json\n{pretty}\n```")?;
      }
    }

    if !input.types.is_empty() {
      writeln!(out)?;
      writeln!(out, "## Types")?;
      writeln!(out)?;
      for named in input.types.iter() {
        writeln!(out, "- `{}`", named.name)?;
      }
    }

    if !input.cycles.is_empty() {
      writeln!(out)?;
      writeln!(out, "Recursive types: {}", input.cycles.iter().map(|cycle| cycle.join(" -> ")).join("; "))?;
    }

    Ok(out)
  }
}

fn type_ref_label(ty: &TypeRef) -> String {
  match ty {
    TypeRef::Named(name) => format!("`{name}`"),
    TypeRef::Sequence(inner) => format!("list of {}", type_ref_label(inner)),
    TypeRef::Scalar(scalar) => format!("`{scalar}`"),
    TypeRef::Any => "any JSON".to_string(),
  }
}

fn kind_label(kind: &FieldKind) -> String {
  match kind {
    FieldKind::Scalar(scalar) => scalar.to_string(),
    FieldKind::Array(inner) => format!("list of {}", kind_label(inner)),
    FieldKind::Reference(name) => name.clone(),
    FieldKind::Any => "any".to_string(),
  }
}

fn field_label(field: &FieldSpec) -> String {
  let required = if field.required { "required" } else { "optional" };
  format!("`{}` ({}, {required})", field.key, kind_label(&field.kind))
}
