use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  document::{Document, reference_name},
  generator::{
    ast::ModelDef,
    converter::{ClientSynthesizer, ModelSynthesizer},
  },
  ui::{Colors, colors::to_comfy, term_width},
  utils::spec::SpecLoader,
};

async fn load(input: &Path) -> anyhow::Result<Document> {
  SpecLoader::open(input).await?.parse()
}

fn table(colors: &Colors, headers: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(to_comfy(colors.label())));
  }
  table.set_header(row);
  table
}

/// Method name, verb, route and success type of every client method.
pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = load(input).await?;
  let models = ModelSynthesizer::new(&document).synthesize()?;
  let client = ClientSynthesizer::new(&document, &models.cache, &models.models).synthesize(None)?;

  let mut table = table(colors, &["METHOD", "VERB", "PATH", "RETURNS"]);
  for op in &client.client.operations {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&op.ident)
        .fg(to_comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(op.method.as_str())
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&op.path).fg(to_comfy(colors.primary())));
    row.add_cell(Cell::new(op.response.success_type()).fg(to_comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

/// Every component schema with the type synthesized for it.
pub async fn list_schemas(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = load(input).await?;
  let models = ModelSynthesizer::new(&document).synthesize()?;

  let mut table = table(colors, &["SCHEMA", "TYPE", "KIND"]);
  for (reference, type_name) in models.cache.iter() {
    let kind = match models.models.iter().find(|model| model.name() == type_name) {
      Some(ModelDef::Record(def)) => format!("record, {} fields", def.fields.len()),
      Some(ModelDef::Enum(def)) => format!("enum, {} members", def.members.len()),
      None => "upload".to_string(),
    };

    let mut row = Row::new();
    row.add_cell(Cell::new(reference_name(reference)).fg(to_comfy(colors.value())));
    row.add_cell(
      Cell::new(type_name)
        .fg(to_comfy(colors.accent()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(kind).fg(to_comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}
