use std::path::PathBuf;

use strum::Display;

/// Broad failure classes of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorClass {
  Input,
  Precondition,
  Resolve,
  Render,
  Format,
  Write,
}

/// Terminal errors of a generation run. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
  #[error("cannot read OpenAPI spec: {0}")]
  ReadInput(#[source] std::io::Error),

  #[error("cannot parse OpenAPI spec: {message}")]
  ParseInput { message: String },

  #[error("no server URL declared in the OpenAPI spec")]
  MissingServerUrl,

  #[error("type name `{name}` is produced by both `{existing}` and `{incoming}`")]
  TypeNameCollision {
    name: String,
    existing: String,
    incoming: String,
  },

  #[error("template `{template}` failed to render {entity}: {message}")]
  Render {
    template: String,
    entity: String,
    message: String,
  },

  #[error("generated `{artifact}` is not valid Rust: {source}")]
  Format {
    artifact: String,
    #[source]
    source: syn::Error,
  },

  #[error("cannot write `{}`: {source}", .path.display())]
  WriteArtifact {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl GenerateError {
  pub fn class(&self) -> ErrorClass {
    match self {
      Self::ReadInput(_) | Self::ParseInput { .. } => ErrorClass::Input,
      Self::MissingServerUrl => ErrorClass::Precondition,
      Self::TypeNameCollision { .. } => ErrorClass::Resolve,
      Self::Render { .. } => ErrorClass::Render,
      Self::Format { .. } => ErrorClass::Format,
      Self::WriteArtifact { .. } => ErrorClass::Write,
    }
  }
}

/// Failure raised while rendering a single type or endpoint.
///
/// Templates attach their own name when converting it into a
/// [`GenerateError::Render`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity}: {message}")]
pub struct RenderError {
  pub entity: String,
  pub message: String,
}

impl RenderError {
  pub fn new(entity: impl Into<String>, message: impl ToString) -> Self {
    Self {
      entity: entity.into(),
      message: message.to_string(),
    }
  }

  pub fn in_template(self, template: &str) -> GenerateError {
    GenerateError::Render {
      template: template.to_string(),
      entity: self.entity,
      message: self.message,
    }
  }
}
