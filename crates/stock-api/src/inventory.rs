//! Handler for `POST /inventory/reset`.

use axum::{Json, extract::State};
use stock_core::{history::HistoryEntry, store::InventoryStore};

use crate::{AppState, error::ApiError};

/// `POST /inventory/reset`: zero every record; returns one `reset` entry per
/// record.
pub async fn reset<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: InventoryStore,
{
  let entries = state.store.reset_all().await.map_err(ApiError::store)?;
  Ok(Json(entries))
}
