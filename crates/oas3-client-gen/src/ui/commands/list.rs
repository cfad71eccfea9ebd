use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    model::{Endpoint, TypeRef},
    orchestrator::Orchestrator,
    templates::TemplateSet,
  },
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::SpecLoader,
};

fn type_label(ty: &TypeRef) -> String {
  match ty {
    TypeRef::Named(name) => name.clone(),
    TypeRef::Sequence(inner) => format!("Vec<{}>", type_label(inner)),
    TypeRef::Scalar(scalar) => scalar.to_string(),
    TypeRef::Any => "Value".to_string(),
  }
}

fn response_label(endpoint: &Endpoint) -> String {
  endpoint
    .response
    .as_ref()
    .map_or_else(|| "()".to_string(), |response| type_label(&response.ty))
}

/// Prints the endpoints exactly as the generator names them.
pub fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::open(input)?.parse()?;
  let model = Orchestrator::new(spec, TemplateSet::builtin()).prepare()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["METHOD NAME", "VERB", "ROUTE", "RETURNS"] {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);

  for endpoint in &model.endpoints {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&endpoint.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(endpoint.method.as_str())
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&endpoint.route).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(response_label(endpoint)).fg(IntoComfyColor::into(colors.info())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
