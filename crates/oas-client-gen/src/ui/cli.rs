use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::codegen::Visibility;

#[derive(Parser, Debug)]
#[command(name = "oas-client-gen")]
#[command(author, version, about = "Generate a typed Rust HTTP client from an OpenAPI document")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate the client module tree from an OpenAPI document
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the OpenAPI document (JSON, or YAML by `.yaml`/`.yml` extension)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory receiving `mod.rs`, `client.rs` and `models/`
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Name of the client type (default: derived from the document title)
  #[arg(long, value_name = "NAME")]
  pub client_name: Option<String>,

  /// Visibility of generated items (public or crate)
  #[arg(long, value_name = "VISIBILITY", default_value = "public", value_parser = parse_visibility)]
  pub visibility: Visibility,

  /// Enable verbose output, including every warning
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the client methods the document produces
  Operations {
    /// Path to the OpenAPI document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List the component schemas and the model each becomes
  Schemas {
    /// Path to the OpenAPI document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}

fn parse_visibility(value: &str) -> Result<Visibility, String> {
  Visibility::parse(value).ok_or_else(|| format!("invalid visibility '{value}': expected public or crate"))
}
