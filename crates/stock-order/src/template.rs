//! Template and output files on disk.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{Error, Result};

pub const DOCX_MIME: &str =
  "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Read the template, reporting a missing file as [`Error::TemplateNotFound`].
pub async fn read_template(path: &Path) -> Result<Vec<u8>> {
  match tokio::fs::read(path).await {
    Ok(bytes) => Ok(bytes),
    Err(e) if e.kind() == ErrorKind::NotFound => {
      Err(Error::TemplateNotFound(path.to_path_buf()))
    }
    Err(e) => Err(e.into()),
  }
}

/// `BON_COMMANDE_<YYYYmmdd_HHMMSS>.docx`
pub fn output_file_name(now: DateTime<Utc>) -> String {
  format!("BON_COMMANDE_{}.docx", now.format("%Y%m%d_%H%M%S"))
}

/// Write a generated form into `dir`, creating it if needed.
pub async fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
  tokio::fs::create_dir_all(dir).await?;
  let path = dir.join(name);
  tokio::fs::write(&path, bytes).await?;
  info!(path = %path.display(), size = bytes.len(), "wrote order form");
  Ok(path)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stock-order-{tag}-{}", std::process::id()))
  }

  #[test]
  fn file_name_carries_timestamp() {
    let now = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
    assert_eq!(output_file_name(now), "BON_COMMANDE_20250309_140507.docx");
  }

  #[tokio::test]
  async fn missing_template_is_reported() {
    let path = scratch_dir("missing").join("BON_COMMANDE.docx");
    let err = read_template(&path).await.unwrap_err();
    assert!(matches!(err, Error::TemplateNotFound(p) if p == path));
  }

  #[tokio::test]
  async fn writes_output_into_new_directory() {
    let dir = scratch_dir("output").join("nested");
    let path = write_output(&dir, "form.docx", b"PK").await.unwrap();

    assert_eq!(path, dir.join("form.docx"));
    assert_eq!(read_template(&path).await.unwrap(), b"PK");
    let _ = std::fs::remove_dir_all(scratch_dir("output"));
  }
}
