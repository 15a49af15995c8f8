//! [`SqliteStore`], the SQLite implementation of [`InventoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use stock_core::{
  catalog::CATALOG,
  history::{HistoryAction, HistoryEntry, HistoryQuery, Order},
  product::{Location, NewProduct, Product, ProductUpdate},
  store::{Deleted, InventoryStore, ProductQuery, Updated},
};
use tracing::info;

use crate::{
  Error, Result,
  encode::{
    HISTORY_COLUMNS, HistoryRow, PRODUCT_COLUMNS, RawHistoryEntry, RawProduct,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Behavioural switches for [`SqliteStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
  /// Reject a `create` or location-changing `update` that would leave two
  /// records with the same name in the same location.
  pub unique_name_location: bool,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An inventory store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  options: StoreOptions,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, options: StoreOptions::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, options: StoreOptions::default() };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn with_options(mut self, options: StoreOptions) -> Self {
    self.options = options;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction outcomes ────────────────────────────────────────────────────

/// What a write closure reports back from the database thread. Domain
/// failures abort the transaction by returning before `commit`.
enum Outcome<T> {
  Done(T),
  NotFound(i64),
  Conflict { name: String, location: Location },
}

impl<T> Outcome<T> {
  fn into_result(self) -> Result<T> {
    match self {
      Outcome::Done(v) => Ok(v),
      Outcome::NotFound(id) => Err(stock_core::Error::ProductNotFound(id).into()),
      Outcome::Conflict { name, location } => Err(
        stock_core::Error::Conflict { name, location: location.to_string() }.into(),
      ),
    }
  }
}

// ─── Synchronous helpers (run on the database thread) ───────────────────────

fn select_product(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawProduct>> {
  conn
    .query_row(
      &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
      rusqlite::params![id],
      RawProduct::from_row,
    )
    .optional()
}

fn select_products(
  conn: &rusqlite::Connection,
  name: Option<&str>,
  location: Option<&str>,
) -> rusqlite::Result<Vec<RawProduct>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products
     WHERE (?1 IS NULL OR name = ?1)
       AND (?2 IS NULL OR location = ?2)
     ORDER BY id"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![name, location], RawProduct::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>();
  rows
}

/// Whether a record other than `except` already holds `(name, location)`.
fn occupied(
  conn: &rusqlite::Connection,
  name: &str,
  location: Location,
  except: Option<i64>,
) -> rusqlite::Result<bool> {
  conn
    .query_row(
      "SELECT 1 FROM products
       WHERE name = ?1 AND location = ?2 AND (?3 IS NULL OR id != ?3)
       LIMIT 1",
      rusqlite::params![name, location.as_str(), except],
      |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn insert_product(
  conn: &rusqlite::Connection,
  input: &NewProduct,
  now: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO products (name, quantity, location, description, last_modified)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      input.name,
      i64::from(input.quantity),
      input.location.as_str(),
      input.description,
      now,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_history(conn: &rusqlite::Connection, row: &HistoryRow<'_>) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO product_history (
       product_id, timestamp, action,
       old_quantity, new_quantity, old_location, new_location
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      row.product_id,
      row.timestamp,
      row.action.as_str(),
      row.old_quantity,
      row.new_quantity,
      row.old_location,
      row.new_location,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn select_entry(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawHistoryEntry> {
  conn.query_row(
    &format!("SELECT {HISTORY_COLUMNS} FROM product_history WHERE id = ?1"),
    rusqlite::params![id],
    RawHistoryEntry::from_row,
  )
}

/// Insert a record and its `create` entry; returns the new id.
fn create_logged(
  conn: &rusqlite::Connection,
  input: &NewProduct,
  now: &str,
) -> rusqlite::Result<i64> {
  let id = insert_product(conn, input, now)?;
  insert_history(conn, &HistoryRow {
    product_id:   id,
    timestamp:    now,
    action:       HistoryAction::Create,
    old_quantity: None,
    new_quantity: Some(i64::from(input.quantity)),
    old_location: None,
    new_location: Some(input.location.as_str()),
  })?;
  Ok(id)
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn initialize_catalog(&self) -> Result<Vec<Product>> {
    let now = encode_dt(Utc::now());

    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut created = Vec::new();
        for name in CATALOG {
          for location in Location::ALL {
            if occupied(&tx, name, location, None)? {
              continue;
            }
            let input = NewProduct {
              name: (*name).to_owned(),
              quantity: 0,
              location,
              description: None,
            };
            let id = create_logged(&tx, &input, &now)?;
            created.extend(select_product(&tx, id)?);
          }
        }
        tx.commit()?;
        Ok(created)
      })
      .await?;

    if !raws.is_empty() {
      info!(created = raws.len(), "seeded catalog records");
    }
    raws.into_iter().map(RawProduct::into_product).collect()
  }

  async fn create(&self, input: NewProduct) -> Result<Product> {
    let now = encode_dt(Utc::now());
    let unique = self.options.unique_name_location;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if unique && occupied(&tx, &input.name, input.location, None)? {
          return Ok(Outcome::Conflict { name: input.name, location: input.location });
        }
        let id = create_logged(&tx, &input, &now)?;
        let raw = select_product(&tx, id)?;
        tx.commit()?;
        Ok(match raw {
          Some(raw) => Outcome::Done(raw),
          None => Outcome::NotFound(id),
        })
      })
      .await?
      .into_result()?;

    let product = raw.into_product()?;
    info!(
      id = product.id,
      name = %product.name,
      quantity = product.quantity,
      location = %product.location,
      "created product"
    );
    Ok(product)
  }

  async fn update(&self, id: i64, change: ProductUpdate) -> Result<Updated> {
    let current = self
      .get_product(id)
      .await?
      .ok_or(stock_core::Error::ProductNotFound(id))?;
    if change.is_noop_for(&current) {
      return Ok(Updated { product: current, entry: None });
    }

    let now = encode_dt(Utc::now());
    let unique = self.options.unique_name_location;

    let (raw, raw_entry) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Re-read inside the transaction; the snapshot above only served the
        // no-op shortcut.
        let Some(before) = select_product(&tx, id)? else {
          return Ok(Outcome::NotFound(id));
        };
        let new_quantity = i64::from(change.quantity);
        let new_location = change.location.as_str();
        if before.quantity == new_quantity && before.location == new_location {
          return Ok(Outcome::Done((before, None)));
        }
        if unique
          && before.location != new_location
          && occupied(&tx, &before.name, change.location, Some(id))?
        {
          return Ok(Outcome::Conflict { name: before.name, location: change.location });
        }

        tx.execute(
          "UPDATE products SET quantity = ?1, location = ?2, last_modified = ?3
           WHERE id = ?4",
          rusqlite::params![new_quantity, new_location, now, id],
        )?;
        let entry_id = insert_history(&tx, &HistoryRow {
          product_id:   id,
          timestamp:    &now,
          action:       HistoryAction::Update,
          old_quantity: Some(before.quantity),
          new_quantity: Some(new_quantity),
          old_location: Some(before.location.as_str()),
          new_location: Some(new_location),
        })?;
        let after = select_product(&tx, id)?;
        let entry = select_entry(&tx, entry_id)?;
        tx.commit()?;
        Ok(match after {
          Some(after) => Outcome::Done((after, Some(entry))),
          None => Outcome::NotFound(id),
        })
      })
      .await?
      .into_result()?;

    let product = raw.into_product()?;
    let entry = raw_entry.map(RawHistoryEntry::into_entry).transpose()?;
    if entry.is_some() {
      info!(
        id,
        quantity = product.quantity,
        location = %product.location,
        "updated product"
      );
    }
    Ok(Updated { product, entry })
  }

  async fn delete(&self, id: i64) -> Result<Deleted> {
    let (raw, history_removed) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(raw) = select_product(&tx, id)? else {
          return Ok(Outcome::NotFound(id));
        };
        let history: i64 = tx.query_row(
          "SELECT COUNT(*) FROM product_history WHERE product_id = ?1",
          rusqlite::params![id],
          |r| r.get(0),
        )?;
        // History rows go with it through ON DELETE CASCADE.
        tx.execute("DELETE FROM products WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Outcome::Done((raw, history)))
      })
      .await?
      .into_result()?;

    let product = raw.into_product()?;
    let history_removed = usize::try_from(history_removed).unwrap_or_default();
    info!(id, name = %product.name, history_removed, "deleted product");
    Ok(Deleted { product, history_removed })
  }

  async fn reset_all(&self) -> Result<Vec<HistoryEntry>> {
    let now = encode_dt(Utc::now());

    let raws: Vec<RawHistoryEntry> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let products = select_products(&tx, None, None)?;
        let mut entries = Vec::with_capacity(products.len());
        for p in &products {
          tx.execute(
            "UPDATE products SET quantity = 0, last_modified = ?1 WHERE id = ?2",
            rusqlite::params![now, p.id],
          )?;
          let entry_id = insert_history(&tx, &HistoryRow {
            product_id:   p.id,
            timestamp:    &now,
            action:       HistoryAction::Reset,
            old_quantity: Some(p.quantity),
            new_quantity: Some(0),
            old_location: None,
            new_location: Some(p.location.as_str()),
          })?;
          entries.push(select_entry(&tx, entry_id)?);
        }
        tx.commit()?;
        Ok(entries)
      })
      .await?;

    info!(records = raws.len(), "reset inventory");
    raws.into_iter().map(RawHistoryEntry::into_entry).collect()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_product(&self, id: i64) -> Result<Option<Product>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_product(conn, id)?))
      .await?;
    raw.map(RawProduct::into_product).transpose()
  }

  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let name = query.name.clone();
    let location = query.location.map(Location::as_str);

    let raws = self
      .conn
      .call(move |conn| Ok(select_products(conn, name.as_deref(), location)?))
      .await?;
    raws.into_iter().map(RawProduct::into_product).collect()
  }

  async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>> {
    let product_id = query.product_id;
    let action = query.action.map(HistoryAction::as_str);
    // SQLite treats a negative LIMIT as "no limit".
    let limit = query.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let direction = match query.order {
      Order::Asc => "ASC",
      Order::Desc => "DESC",
    };

    let raws: Vec<RawHistoryEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HISTORY_COLUMNS} FROM product_history
           WHERE (?1 IS NULL OR product_id = ?1)
             AND (?2 IS NULL OR action = ?2)
           ORDER BY timestamp {direction}, id {direction}
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![product_id, action, limit], RawHistoryEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryEntry::into_entry).collect()
  }
}
