use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    orchestrator::{GenerationStats, Orchestrator},
    templates::TemplateSet,
  },
  ui::{Colors, GenerateCommand},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Plain settings for one `generate` run. Terminal options only change what
/// is logged, never what is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      verbose,
      quiet,
    } = command;

    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet cannot be used together");
    }

    Ok(Self {
      input,
      output,
      verbose,
      quiet,
    })
  }

  fn load_spec(&self) -> anyhow::Result<oas3::Spec> {
    Ok(SpecLoader::open(&self.input)?.parse()?)
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
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(
      &format!("Generating Rust client into: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types generated:", stats.types_generated.to_string());
    if stats.types_pruned > 0 {
      self.stat("", format!("{} unreachable types skipped", stats.types_pruned));
    }
    self.stat("Endpoints extracted:", stats.endpoints_extracted.to_string());
    self.print_cycles(stats);
    self.print_artifacts(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_artifacts(&self, stats: &GenerationStats) {
    self.stat("Files written:", stats.artifacts.len().to_string());

    if self.config.verbose {
      for path in &stats.artifacts {
        println!("              {}", path.display().to_string().with(self.colors.info()));
      }
    }
  }

  fn log_failure(&self, err: &crate::generator::error::GenerateError) {
    eprintln!(
      "{} {} {}",
      format_timestamp().with(self.colors.timestamp()),
      format!("{} error:", err.class()).with(self.colors.error()),
      err.to_string().with(self.colors.primary())
    );
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

pub fn generate_client(config: &GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(config, colors);

  logger.log_loading();
  let spec = config.load_spec()?;

  logger.log_generating();
  let orchestrator = Orchestrator::new(spec, TemplateSet::builtin());
  let stats = orchestrator.generate(&config.output).inspect_err(|err| logger.log_failure(err))?;

  logger.print_statistics(&stats);
  logger.log_success();
  Ok(())
}
