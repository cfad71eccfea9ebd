use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-client-gen")]
#[command(author, version, about = "OpenAPI to Rust HTTP client generator")]
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
  /// List information from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate a Rust client module from an OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the OpenAPI specification file (JSON, or YAML with a .yaml/.yml extension)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory where types.rs, client.rs, mod.rs and README.md are written
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations as they will appear on the generated client
  Operations {
    /// Path to the OpenAPI specification file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
