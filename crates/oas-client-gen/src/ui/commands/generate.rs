use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  document::Document,
  generator::{
    codegen::Visibility,
    metrics::GenerationStats,
    orchestrator::{GeneratedOutput, Orchestrator},
  },
  ui::{Colors, GenerateCommand},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub client_name: Option<String>,
  pub visibility: Visibility,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      client_name,
      visibility,
      verbose,
      quiet,
    } = command;

    if output.is_file() {
      anyhow::bail!("Output path '{}' is a file, expected a directory", output.display());
    }
    let client_name = client_name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty());

    Ok(Self {
      input,
      output,
      client_name,
      visibility,
      verbose,
      quiet,
    })
  }

  async fn load_document(&self) -> anyhow::Result<Document> {
    SpecLoader::open(&self.input).await?.parse()
  }

  fn create_orchestrator(&self, document: Document) -> Orchestrator {
    Orchestrator::new(document, self.visibility, self.client_name.clone())
  }

  async fn write_output(&self, output: &mut GeneratedOutput) -> anyhow::Result<()> {
    for file in &output.files {
      let path = self.output.join(&file.path);
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
          .await
          .with_context(|| format!("creating {}", parent.display()))?;
      }
      tokio::fs::write(&path, &file.code)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
      output.stats.record_file_written();
    }
    Ok(())
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating Rust client...".with(self.colors.primary()).to_string());
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types generated:", stats.types_generated.to_string());
    self.stat("", format!("{} records", stats.records_generated));
    if stats.placeholder_enums_generated > 0 {
      self.stat(
        "",
        format!(
          "{} enums, {} placeholders",
          stats.enums_generated, stats.placeholder_enums_generated
        ),
      );
    } else {
      self.stat("", format!("{} enums", stats.enums_generated));
    }
    self.stat("Operations converted:", stats.operations_converted.to_string());
    if stats.multipart_operations > 0 {
      self.stat("", format!("{} multipart", stats.multipart_operations));
    }
    self.stat("Files written:", stats.files_written.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if !self.config.verbose || stats.warnings.is_empty() {
      return;
    }

    println!();
    for warning in &stats.warnings {
      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.warning()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated Rust client".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = config.load_document().await?;

  logger.log_generating();
  let orchestrator = config.create_orchestrator(document);
  let source_path = config.input.display().to_string();
  let mut output = orchestrator.generate(&source_path)?;

  logger.log_writing();
  config.write_output(&mut output).await?;
  logger.print_statistics(&output.stats);

  logger.log_success();
  Ok(())
}
