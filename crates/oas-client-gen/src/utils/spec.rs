use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
      Self::Yaml
    } else {
      Self::Json
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

/// A memory-mapped OpenAPI document, decoded on demand.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("opening {}", path.display()))?;

    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
    })
  }

  pub fn parse(&self) -> anyhow::Result<Document> {
    match self.format {
      SpecFormat::Json => Document::from_json_slice(self.file.as_slice()),
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice()).context("document is not UTF-8")?;
        Document::from_yaml(content)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn test_format_from_path() {
    let cases = [
      ("petstore.json", SpecFormat::Json),
      ("petstore.yaml", SpecFormat::Yaml),
      ("petstore.YML", SpecFormat::Yaml),
      ("petstore", SpecFormat::Json),
    ];
    for (path, expected) in cases {
      assert_eq!(SpecFormat::from_path(Path::new(path)), expected, "{path}");
    }
  }

  #[tokio::test]
  async fn test_loads_yaml_document() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "info:\n  title: Inventory\n  version: '3'\npaths: {{}}").unwrap();

    let document = SpecLoader::open(file.path()).await.unwrap().parse().unwrap();
    assert_eq!(document.title(), "Inventory");
    assert_eq!(document.version(), "3");
  }

  #[tokio::test]
  async fn test_missing_file_reports_path() {
    let error = SpecLoader::open(Path::new("/nonexistent/openapi.json"))
      .await
      .err()
      .unwrap();
    assert!(format!("{error:#}").contains("/nonexistent/openapi.json"));
  }
}
