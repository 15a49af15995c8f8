//! Product records, one row per (name, location) pair.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Location ────────────────────────────────────────────────────────────────

/// One of the two storage sites for supplies.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Location {
  Box,
  Apartment,
}

impl Location {
  pub const ALL: [Location; 2] = [Location::Box, Location::Apartment];

  pub fn as_str(self) -> &'static str { self.into() }

  /// Accepts exactly `box` or `apartment`; anything else is a validation
  /// error.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_: strum::ParseError| Error::InvalidLocation(s.to_owned()))
  }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Product ─────────────────────────────────────────────────────────────────

/// A persisted quantity of one product at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id:            i64,
  pub name:          String,
  pub quantity:      u32,
  pub location:      Location,
  pub description:   Option<String>,
  pub last_modified: DateTime<Utc>,
}

/// Input to [`InventoryStore::create`](crate::store::InventoryStore::create).
/// The id and `last_modified` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
  pub name:        String,
  pub quantity:    u32,
  pub location:    Location,
  pub description: Option<String>,
}

impl NewProduct {
  /// Validate raw input. The name is trimmed and must not be empty; the
  /// location must parse as a [`Location`].
  pub fn new(name: &str, quantity: u32, location: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self {
      name: name.to_owned(),
      quantity,
      location: Location::parse(location)?,
      description: None,
    })
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}

/// The mutable part of a product: what `update` may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductUpdate {
  pub quantity: u32,
  pub location: Location,
}

impl ProductUpdate {
  pub fn new(quantity: u32, location: &str) -> Result<Self> {
    Ok(Self { quantity, location: Location::parse(location)? })
  }

  /// True if applying this update to `product` would change nothing.
  pub fn is_noop_for(&self, product: &Product) -> bool {
    product.quantity == self.quantity && product.location == self.location
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn location_parses_known_values() {
    assert_eq!(Location::parse("box").unwrap(), Location::Box);
    assert_eq!(Location::parse("apartment").unwrap(), Location::Apartment);
  }

  #[test]
  fn location_rejects_anything_else() {
    for bad in ["", "Box", "garage", "invalid_location"] {
      let err = Location::parse(bad).unwrap_err();
      assert!(matches!(err, Error::InvalidLocation(ref s) if s == bad));
      assert!(err.is_validation());
    }
  }

  #[test]
  fn location_display_matches_wire_form() {
    let names: Vec<String> = Location::ALL.iter().map(|l| l.to_string()).collect();
    assert_eq!(names, ["box", "apartment"]);
    assert_eq!(serde_json::to_string(&Location::Apartment).unwrap(), "\"apartment\"");
  }

  #[test]
  fn new_product_trims_and_validates() {
    let p = NewProduct::new("  Sodium ", 10, "box").unwrap();
    assert_eq!(p.name, "Sodium");
    assert_eq!(p.location, Location::Box);

    assert!(matches!(NewProduct::new("   ", 1, "box"), Err(Error::EmptyName)));
    assert!(matches!(
      NewProduct::new("K7 Ergo Flow", 5, "invalid_location"),
      Err(Error::InvalidLocation(_))
    ));
  }

  #[test]
  fn noop_update_detection() {
    let product = Product {
      id:            1,
      name:          "K7 FLOW".into(),
      quantity:      5,
      location:      Location::Box,
      description:   None,
      last_modified: Utc::now(),
    };
    assert!(ProductUpdate::new(5, "box").unwrap().is_noop_for(&product));
    assert!(!ProductUpdate::new(6, "box").unwrap().is_noop_for(&product));
    assert!(!ProductUpdate::new(5, "apartment").unwrap().is_noop_for(&product));
  }
}
