use std::path::{Path, PathBuf};

use super::{error::GenerateError, templates::TEMPLATE_SUFFIX};

/// A rendered artifact, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub file_name: String,
  pub contents: String,
}

/// Canonicalizes rendered text and writes it to disk.
pub struct OutputFormatter;

impl OutputFormatter {
  /// Artifact file name for a template: the name minus its `.tmpl` suffix.
  #[must_use]
  pub fn artifact_name(template_name: &str) -> String {
    template_name
      .strip_suffix(TEMPLATE_SUFFIX)
      .unwrap_or(template_name)
      .to_string()
  }

  /// Formats Rust sources with `prettyplease`; anything else passes through.
  pub fn format(template_name: &str, raw: String) -> Result<Artifact, GenerateError> {
    let file_name = Self::artifact_name(template_name);

    let contents = if Path::new(&file_name).extension().is_some_and(|ext| ext == "rs") {
      let syntax_tree = syn::parse_file(&raw).map_err(|source| GenerateError::Format {
        artifact: file_name.clone(),
        source,
      })?;
      prettyplease::unparse(&syntax_tree)
    } else {
      raw
    };

    Ok(Artifact { file_name, contents })
  }

  /// Writes one artifact into `output_dir`, creating the directory if needed.
  pub fn write(output_dir: &Path, artifact: &Artifact) -> Result<PathBuf, GenerateError> {
    std::fs::create_dir_all(output_dir).map_err(|source| GenerateError::WriteArtifact {
      path: output_dir.to_path_buf(),
      source,
    })?;

    let path = output_dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.contents).map_err(|source| GenerateError::WriteArtifact {
      path: path.clone(),
      source,
    })?;
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_artifact_name_strips_suffix() {
    assert_eq!(OutputFormatter::artifact_name("types.rs.tmpl"), "types.rs");
    assert_eq!(OutputFormatter::artifact_name("README.md.tmpl"), "README.md");
    assert_eq!(OutputFormatter::artifact_name("NOTES"), "NOTES");
  }

  #[test]
  fn test_format_rust_is_canonical() {
    let artifact = OutputFormatter::format("lib.rs.tmpl", "pub   struct   A { x : i64 }".to_string()).unwrap();
    assert_eq!(artifact.file_name, "lib.rs");
    assert_eq!(artifact.contents, "pub struct A {\n    x: i64,\n}\n");
  }

  #[test]
  fn test_format_other_is_verbatim() {
    let raw = "# Title\n\n  indented   text\n".to_string();
    let artifact = OutputFormatter::format("README.md.tmpl", raw.clone()).unwrap();
    assert_eq!(artifact.contents, raw);
  }

  #[test]
  fn test_format_invalid_rust_is_format_error() {
    let err = OutputFormatter::format("broken.rs.tmpl", "pub struct {".to_string()).unwrap_err();
    assert!(matches!(err, GenerateError::Format { ref artifact, .. } if artifact == "broken.rs"));
  }

  #[test]
  fn test_write_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("out");
    let artifact = Artifact {
      file_name: "README.md".to_string(),
      contents: "hello\n".to_string(),
    };

    let path = OutputFormatter::write(&nested, &artifact).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
  }
}
