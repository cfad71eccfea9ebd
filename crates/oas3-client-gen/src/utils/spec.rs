use std::{ffi::OsStr, io::Read, path::Path};

use crate::generator::error::GenerateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

/// Reads an OpenAPI document from any byte stream.
pub struct SpecLoader {
  content: String,
  format: SpecFormat,
}

impl SpecLoader {
  pub fn from_reader(mut reader: impl Read, format: SpecFormat) -> Result<Self, GenerateError> {
    let mut content = String::new();
    reader.read_to_string(&mut content).map_err(GenerateError::ReadInput)?;
    Ok(Self { content, format })
  }

  pub fn open(path: &Path) -> Result<Self, GenerateError> {
    let file = std::fs::File::open(path).map_err(GenerateError::ReadInput)?;
    Self::from_reader(file, SpecFormat::from_path(path))
  }

  pub fn parse(&self) -> Result<oas3::Spec, GenerateError> {
    let parsed = match self.format {
      SpecFormat::Json => oas3::from_json(&self.content).map_err(|err| err.to_string()),
      SpecFormat::Yaml => oas3::from_yaml(&self.content).map_err(|err| err.to_string()),
    };
    parsed.map_err(|message| GenerateError::ParseInput { message })
  }
}
