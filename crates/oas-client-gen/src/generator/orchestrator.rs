//! Drives a whole generation run: document in, formatted module tree out.
//!
//! ```text
//! <output>/mod.rs
//! <output>/client.rs
//! <output>/models/mod.rs
//! <output>/models/<model>.rs
//! ```

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
};

use proc_macro2::TokenStream;
use quote::ToTokens;

use crate::{
  document::{Document, FORM_FILE_SCHEMA},
  generator::{
    ast::{FORM_FILE_TYPE, ModelDef, RecordDef},
    codegen::{
      Visibility,
      client::ClientFragment,
      format_tokens,
      mod_file::{ModelModule, ModelsModFragment, RootModFragment},
      models::ModelFragment,
    },
    converter::{ClientSynthesizer, ModelSynthesizer},
    metrics::{GenerationStats, GenerationWarning},
    naming::identifiers::{ensure_unique, to_module_file_stem},
  },
};

const CLIENT_LINTS: &[&str] = &["clippy::too_many_arguments", "clippy::doc_markdown"];
const MODEL_LINTS: &[&str] = &["clippy::doc_markdown"];

/// Document metadata repeated in every file header.
#[derive(Debug, Clone)]
pub struct CodeMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
}

/// One file of the generated module tree, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub path: PathBuf,
  pub code: String,
}

#[derive(Debug)]
pub struct GeneratedOutput {
  pub files: Vec<GeneratedFile>,
  pub stats: GenerationStats,
}

impl GeneratedOutput {
  #[must_use]
  pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
    self.files.iter().find(|file| file.path == path.as_ref())
  }
}

pub struct Orchestrator {
  document: Document,
  visibility: Visibility,
  client_name: Option<String>,
}

impl Orchestrator {
  pub fn new(document: Document, visibility: Visibility, client_name: Option<String>) -> Self {
    Self {
      document,
      visibility,
      client_name,
    }
  }

  pub fn metadata(&self) -> CodeMetadata {
    CodeMetadata {
      title: self.document.info.title.clone(),
      version: self.document.info.version.clone(),
      description: self.document.info.description.clone(),
    }
  }

  /// Runs the model pass, then the client pass, and renders every file.
  ///
  /// # Errors
  ///
  /// Fails on dangling references and on enumerations whose names and values
  /// cannot be paired. Formatting failures only produce a warning.
  pub fn generate(&self, source_path: &str) -> anyhow::Result<GeneratedOutput> {
    let models = ModelSynthesizer::new(&self.document).synthesize()?;
    let client = ClientSynthesizer::new(&self.document, &models.cache, &models.models)
      .synthesize(self.client_name.as_deref())?;

    let mut stats = GenerationStats::default();
    stats.record_warnings(models.warnings);
    stats.record_warnings(client.warnings);

    let mut model_defs = models.models;
    let client = client.client;

    let form_file_declared = model_defs.iter().any(|model| model.name() == FORM_FILE_TYPE);
    let form_file_used = model_defs
      .iter()
      .filter_map(ModelDef::as_record)
      .flat_map(|record| &record.fields)
      .any(|field| field.rust_type.mentions_form_file())
      || client
        .operations
        .iter()
        .flat_map(|op| &op.parameters)
        .any(|param| param.rust_type.mentions_form_file());
    if form_file_used && !form_file_declared {
      stats.record_warning(GenerationWarning::schema(
        FORM_FILE_SCHEMA,
        "uploads are used but the schema is not declared, emitting the default upload record",
      ));
      model_defs.push(ModelDef::Record(RecordDef::form_file()));
    }

    stats.record_models(&model_defs);
    stats.record_client(&client);

    let metadata = self.metadata();
    let mut files = vec![];
    let mut used_stems = BTreeSet::new();
    let mut modules = vec![];

    for model in &model_defs {
      let stem = ensure_unique(&to_module_file_stem(model.name()), &used_stems);
      used_stems.insert(stem.clone());

      let path = PathBuf::from("models").join(format!("{stem}.rs"));
      let tokens = ModelFragment::new(model, self.visibility).into_token_stream();
      files.push(render_file(path, &tokens, &metadata, source_path, MODEL_LINTS, &mut stats));

      modules.push(ModelModule {
        stem,
        type_name: model.name().to_string(),
      });
    }

    let tokens = ModelsModFragment::new(&modules, self.visibility).into_token_stream();
    files.push(render_file(
      PathBuf::from("models").join("mod.rs"),
      &tokens,
      &metadata,
      source_path,
      &[],
      &mut stats,
    ));

    let tokens = ClientFragment::new(&client, self.visibility).into_token_stream();
    files.push(render_file(
      PathBuf::from("client.rs"),
      &tokens,
      &metadata,
      source_path,
      CLIENT_LINTS,
      &mut stats,
    ));

    let tokens = RootModFragment::new(&client.name, &client.options_name, self.visibility).into_token_stream();
    files.push(render_file(
      PathBuf::from("mod.rs"),
      &tokens,
      &metadata,
      source_path,
      &[],
      &mut stats,
    ));

    Ok(GeneratedOutput { files, stats })
  }
}

fn render_file(
  path: PathBuf,
  tokens: &TokenStream,
  metadata: &CodeMetadata,
  source_path: &str,
  lints: &[&str],
  stats: &mut GenerationStats,
) -> GeneratedFile {
  let body = match format_tokens(tokens) {
    Ok(code) => code,
    Err(error) => {
      stats.record_warning(GenerationWarning::FormattingFailed {
        file: path.display().to_string(),
        error: format!("{error:#}"),
      });
      tokens.to_string()
    }
  };

  GeneratedFile {
    code: format!("{}{body}", file_header(metadata, source_path, lints)),
    path,
  }
}

fn file_header(metadata: &CodeMetadata, source_path: &str, lints: &[&str]) -> String {
  let description = metadata
    .description
    .as_deref()
    .map(|desc| format!("//!\n//! {}\n", desc.trim().replace('\n', "\n//! ")))
    .unwrap_or_default();
  let allow = if lints.is_empty() {
    String::new()
  } else {
    format!("#![allow({})]\n", lints.join(", "))
  };

  format!(
    "//! AUTO-GENERATED CODE - DO NOT EDIT!\n\
     //!\n\
     //! {}\n\
     //! Source: {source_path}\n\
     //! Version: {}\n\
     //! Generated by `oas-client-gen`\n\
     {description}{allow}\n",
    metadata.title, metadata.version,
  )
}
