//! Per-product totals across both locations. The read model behind the
//! summary view and the order form. Never stored, always derived.

use serde::{Deserialize, Serialize};

use crate::{
  catalog::CATALOG,
  product::{Location, Product},
};

/// Quantities of one canonical product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockTotals {
  #[serde(rename = "box")]
  pub in_box:    u64,
  pub apartment: u64,
  pub total:     u64,
}

impl StockTotals {
  fn add(&mut self, location: Location, quantity: u32) {
    let quantity = u64::from(quantity);
    match location {
      Location::Box => self.in_box += quantity,
      Location::Apartment => self.apartment += quantity,
    }
    self.total += quantity;
  }
}

/// A named row of [`Totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotals {
  pub name:   String,
  #[serde(flatten)]
  pub totals: StockTotals,
}

/// Totals for every catalog product, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals {
  entries: Vec<ProductTotals>,
}

impl Totals {
  /// Totals over an explicit catalog. Every catalog name is present even
  /// without records; records outside the catalog are ignored. Several
  /// records for the same (name, location) are summed.
  pub fn compute<'a>(
    catalog: &[&str],
    products: impl IntoIterator<Item = &'a Product>,
  ) -> Self {
    let mut entries: Vec<ProductTotals> = catalog
      .iter()
      .map(|name| ProductTotals {
        name:   (*name).to_owned(),
        totals: StockTotals::default(),
      })
      .collect();

    for product in products {
      if let Some(entry) = entries.iter_mut().find(|e| e.name == product.name) {
        entry.totals.add(product.location, product.quantity);
      }
    }

    Self { entries }
  }

  pub fn get(&self, name: &str) -> Option<&StockTotals> {
    self.entries.iter().find(|e| e.name == name).map(|e| &e.totals)
  }

  pub fn iter(&self) -> impl Iterator<Item = &ProductTotals> { self.entries.iter() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Totals over the built-in [`CATALOG`].
pub fn compute_totals<'a>(products: impl IntoIterator<Item = &'a Product>) -> Totals {
  Totals::compute(CATALOG, products)
}
