//! Handler for `GET /history`.
//!
//! Query params map directly to [`HistoryQuery`] fields. `action` is one of
//! `create`, `update`, `delete`, `reset`; `order` is `asc` or `desc`
//! (default, newest first).

use axum::{Json, extract::State};
use serde::Deserialize;
use stock_core::{
  history::{HistoryAction, HistoryEntry, HistoryQuery, Order},
  store::InventoryStore,
};

use crate::{AppState, error::ApiError, extract::Query};

#[derive(Debug, Deserialize, Default)]
pub struct HistoryParams {
  pub product_id: Option<i64>,
  pub action:     Option<String>,
  pub order:      Option<Order>,
  pub limit:      Option<usize>,
}

/// `GET /history[?product_id=...][&action=...][&order=asc|desc][&limit=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: InventoryStore,
{
  let query = HistoryQuery {
    product_id: params.product_id,
    action:     params
      .action
      .as_deref()
      .map(HistoryAction::parse)
      .transpose()?,
    order:      params.order.unwrap_or_default(),
    limit:      params.limit,
  };

  let entries = state.store.history(&query).await.map_err(ApiError::store)?;
  Ok(Json(entries))
}
