//! Error type for `stock-order`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("order form template not found: {}", .0.display())]
  TemplateNotFound(PathBuf),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("xml error: {0}")]
  Xml(String),

  #[error("package has no {0} part")]
  MissingPart(&'static str),

  #[error("malformed document: {0}")]
  Malformed(String),
}

impl From<quick_xml::Error> for Error {
  fn from(e: quick_xml::Error) -> Self { Error::Xml(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
