//! History entries: the append-only change log kept per product.
//!
//! Entries are never updated. They disappear only when the product they
//! belong to is deleted (cascade).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{Error, Result, product::Location};

/// What happened to the product.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HistoryAction {
  Create,
  Update,
  Delete,
  Reset,
}

impl HistoryAction {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_: strum::ParseError| Error::UnknownAction(s.to_owned()))
  }
}

impl fmt::Display for HistoryAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One recorded change. `old_*` fields are `None` for creations, and
/// `old_location` is `None` for resets, which only touch the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub id:           i64,
  pub product_id:   i64,
  pub timestamp:    DateTime<Utc>,
  pub action:       HistoryAction,
  pub old_quantity: Option<u32>,
  pub new_quantity: Option<u32>,
  pub old_location: Option<Location>,
  pub new_location: Option<Location>,
}

/// Sort direction over `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
  Asc,
  /// Newest first; what a history page shows.
  #[default]
  Desc,
}

/// Parameters for [`InventoryStore::history`](crate::store::InventoryStore::history).
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
  pub product_id: Option<i64>,
  pub action:     Option<HistoryAction>,
  pub order:      Order,
  pub limit:      Option<usize>,
}

impl HistoryQuery {
  /// All entries of one product, oldest first.
  pub fn for_product(product_id: i64) -> Self {
    Self { product_id: Some(product_id), order: Order::Asc, ..Self::default() }
  }

  pub fn with_action(mut self, action: HistoryAction) -> Self {
    self.action = Some(action);
    self
  }
}
