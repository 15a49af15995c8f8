//! The `InventoryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `stock-store-sqlite`).
//! Higher layers (`stock-api`, `stock-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  DomainError,
  history::{HistoryEntry, HistoryQuery},
  product::{Location, NewProduct, Product, ProductUpdate},
};

// ─── Query and result types ──────────────────────────────────────────────────

/// Parameters for [`InventoryStore::list_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
  /// Exact product name.
  pub name:     Option<String>,
  pub location: Option<Location>,
}

/// Result of [`InventoryStore::update`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Updated {
  pub product: Product,
  /// `None` when the requested values equalled the current ones and nothing
  /// was written.
  pub entry:   Option<HistoryEntry>,
}

impl Updated {
  pub fn changed(&self) -> bool { self.entry.is_some() }
}

/// Result of [`InventoryStore::delete`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deleted {
  /// The record as it was just before removal.
  pub product:         Product,
  /// Number of history entries removed along with it.
  pub history_removed: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an inventory backend.
///
/// Every mutating method writes the record change and its history entry
/// atomically: on error neither is persisted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait InventoryStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Ensure every catalog product has a record in both locations, creating
  /// missing ones with quantity 0 and a `create` entry each. Returns the
  /// records created; running it again returns an empty list.
  fn initialize_catalog(
    &self,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  /// Persist a new record and log its `create` entry.
  fn create(
    &self,
    input: NewProduct,
  ) -> impl Future<Output = Result<Product, Self::Error>> + Send + '_;

  /// Change quantity and location. Nothing is written, and no entry logged,
  /// if both already hold the requested values. Fails if `id` is unknown.
  fn update(
    &self,
    id: i64,
    change: ProductUpdate,
  ) -> impl Future<Output = Result<Updated, Self::Error>> + Send + '_;

  /// Remove a record together with its history. Fails if `id` is unknown.
  fn delete(&self, id: i64)
  -> impl Future<Output = Result<Deleted, Self::Error>> + Send + '_;

  /// Set every record's quantity to 0, logging one `reset` entry per record
  /// even when it was already 0. Returns the entries written.
  fn reset_all(
    &self,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  /// List records matching `query`, ordered by id.
  fn list_products<'a>(
    &'a self,
    query: &'a ProductQuery,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + 'a;

  /// History entries matching `query`, ordered by timestamp.
  fn history<'a>(
    &'a self,
    query: &'a HistoryQuery,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + 'a;
}
