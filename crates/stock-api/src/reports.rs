//! Read-only views over the whole inventory.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/totals` | Per-product box/apartment/total, catalog order |
//! | `GET`  | `/summary` | Totals plus every record; seeds the catalog first |
//! | `GET`  | `/export.csv` | CSV attachment |

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use stock_core::{
  export::write_csv,
  product::Product,
  store::{InventoryStore, ProductQuery},
  totals::{Totals, compute_totals},
};

use crate::{AppState, error::ApiError};

async fn all_products<S: InventoryStore>(store: &S) -> Result<Vec<Product>, ApiError> {
  store
    .list_products(&ProductQuery::default())
    .await
    .map_err(ApiError::store)
}

/// `GET /totals`
pub async fn totals<S>(State(state): State<AppState<S>>) -> Result<Json<Totals>, ApiError>
where
  S: InventoryStore,
{
  let products = all_products(state.store.as_ref()).await?;
  Ok(Json(compute_totals(&products)))
}

#[derive(Debug, Serialize)]
pub struct Summary {
  pub totals:   Totals,
  pub products: Vec<Product>,
}

/// `GET /summary`
pub async fn summary<S>(State(state): State<AppState<S>>) -> Result<Json<Summary>, ApiError>
where
  S: InventoryStore,
{
  state
    .store
    .initialize_catalog()
    .await
    .map_err(ApiError::store)?;
  let products = all_products(state.store.as_ref()).await?;
  Ok(Json(Summary { totals: compute_totals(&products), products }))
}

/// `GET /export.csv`
pub async fn export_csv<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let products = all_products(state.store.as_ref()).await?;
  let mut body = Vec::new();
  write_csv(&mut body, &products).map_err(|e| ApiError::Internal(Box::new(e)))?;

  let name = format!("inventory_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
    ],
    Bytes::from(body),
  ))
}
