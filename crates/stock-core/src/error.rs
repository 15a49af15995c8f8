//! Error types for `stock-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("location must be one of: box, apartment (got {0:?})")]
  InvalidLocation(String),

  #[error("product name must not be empty")]
  EmptyName,

  #[error("unknown history action: {0:?}")]
  UnknownAction(String),

  #[error("product not found: {0}")]
  ProductNotFound(i64),

  #[error("a {name:?} record already exists in {location}")]
  Conflict { name: String, location: String },
}

impl Error {
  /// Whether the error is a rejected input rather than a missing or
  /// conflicting record.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidLocation(_) | Self::EmptyName | Self::UnknownAction(_)
    )
  }
}

/// Exposes the domain failure wrapped inside a backend error, if any.
///
/// Storage backends implement this so that callers holding only the
/// associated `Error` type can still tell a missing product apart from an
/// I/O fault.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
