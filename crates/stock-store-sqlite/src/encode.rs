//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision so that lexical order equals chronological order. Locations and
//! actions are stored as their lowercase names.

use chrono::{DateTime, SecondsFormat, Utc};
use stock_core::{
  history::{HistoryAction, HistoryEntry},
  product::{Location, Product},
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums
// ────────────────────────────────────────────────────────────────────

pub fn decode_location(s: &str) -> Result<Location> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown location: {s:?}")))
}

pub fn decode_action(s: &str) -> Result<HistoryAction> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown history action: {s:?}")))
}

pub fn decode_quantity(q: i64) -> Result<u32> {
  u32::try_from(q).map_err(|_| Error::Decode(format!("quantity out of range: {q}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const PRODUCT_COLUMNS: &str =
  "id, name, quantity, location, description, last_modified";

/// A `products` row as read from SQLite, before validation.
#[derive(Debug, Clone)]
pub struct RawProduct {
  pub id:            i64,
  pub name:          String,
  pub quantity:      i64,
  pub location:      String,
  pub description:   Option<String>,
  pub last_modified: String,
}

impl RawProduct {
  /// Read a row selected with [`PRODUCT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      quantity:      row.get(2)?,
      location:      row.get(3)?,
      description:   row.get(4)?,
      last_modified: row.get(5)?,
    })
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      id:            self.id,
      name:          self.name,
      quantity:      decode_quantity(self.quantity)?,
      location:      decode_location(&self.location)?,
      description:   self.description,
      last_modified: decode_dt(&self.last_modified)?,
    })
  }
}

pub const HISTORY_COLUMNS: &str = "id, product_id, timestamp, action, \
                                   old_quantity, new_quantity, old_location, \
                                   new_location";

/// A `product_history` row as read from SQLite, before validation.
#[derive(Debug, Clone)]
pub struct RawHistoryEntry {
  pub id:           i64,
  pub product_id:   i64,
  pub timestamp:    String,
  pub action:       String,
  pub old_quantity: Option<i64>,
  pub new_quantity: Option<i64>,
  pub old_location: Option<String>,
  pub new_location: Option<String>,
}

impl RawHistoryEntry {
  /// Read a row selected with [`HISTORY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      product_id:   row.get(1)?,
      timestamp:    row.get(2)?,
      action:       row.get(3)?,
      old_quantity: row.get(4)?,
      new_quantity: row.get(5)?,
      old_location: row.get(6)?,
      new_location: row.get(7)?,
    })
  }

  pub fn into_entry(self) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
      id:           self.id,
      product_id:   self.product_id,
      timestamp:    decode_dt(&self.timestamp)?,
      action:       decode_action(&self.action)?,
      old_quantity: self.old_quantity.map(decode_quantity).transpose()?,
      new_quantity: self.new_quantity.map(decode_quantity).transpose()?,
      old_location: self.old_location.as_deref().map(decode_location).transpose()?,
      new_location: self.new_location.as_deref().map(decode_location).transpose()?,
    })
  }
}

// ─── History inserts ─────────────────────────────────────────────────────────

/// Column values for a new `product_history` row.
#[derive(Debug, Clone)]
pub struct HistoryRow<'a> {
  pub product_id:   i64,
  pub timestamp:    &'a str,
  pub action:       HistoryAction,
  pub old_quantity: Option<i64>,
  pub new_quantity: Option<i64>,
  pub old_location: Option<&'a str>,
  pub new_location: Option<&'a str>,
}
